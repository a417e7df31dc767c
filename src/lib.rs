pub mod config;
pub mod consts;
pub mod core_types;
pub mod error;
pub mod instance;
pub mod penalty;
pub mod tour;
// cmd and reports belong to the binary (main.rs).

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};
use trp_penalty::config::EvaluatorConfig;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with evaluator settings; explicit flags still win.
    #[arg(global = true, long = "config")]
    config_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Evaluate(cmd::evaluate::EvaluateArgs),
    Generate(cmd::generate::GenerateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate(args) => {
            let Some(sub_matches) = matches.subcommand_matches("evaluate") else {
                error!("❌ Missing arguments for 'evaluate'");
                process::exit(1);
            };

            let config = match &cli.config_file {
                Some(path) => {
                    info!("⚖️  Loading settings from: {}", path);
                    let mut file_config =
                        EvaluatorConfig::load_from_file(path).unwrap_or_else(|e| {
                            error!("❌ {}", e);
                            process::exit(1);
                        });
                    file_config.merge_from_cli(&args.config, sub_matches);
                    file_config
                }
                None => args.config.clone(),
            };

            let failures = cmd::evaluate::run(args, config);
            if failures > 0 {
                error!("❌ {} instance(s) failed", failures);
                process::exit(1);
            }
        }
        Commands::Generate(args) => {
            if let Err(e) = cmd::generate::run(args) {
                error!("❌ {}", e);
                process::exit(1);
            }
        }
    }
}

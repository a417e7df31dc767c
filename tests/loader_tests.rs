use std::io::{Cursor, Write};
use tempfile::NamedTempFile;
use trp_penalty::error::PenaltyError;
use trp_penalty::penalty::loader::{
    load_edge_list, load_edge_list_from_file, load_full_matrix, load_full_matrix_from_file,
};
use trp_penalty::penalty::CostModel;

// --- FULL MATRIX ---

#[test]
fn test_full_matrix_is_scaled_and_truncated() {
    let data = "0, 1.5, 2.999\n1.5, 0, 4\n3, 4, 0\n";
    let m = load_full_matrix(Cursor::new(data), 100).unwrap();
    assert_eq!(m.size(), 3);
    assert_eq!(m.distance(0, 1), 150);
    assert_eq!(m.distance(0, 2), 299);
    assert_eq!(m.distance(2, 1), 400);
}

#[test]
fn test_full_matrix_skips_blank_lines() {
    let data = "0,1\n\n1,0\n";
    let m = load_full_matrix(Cursor::new(data), 1).unwrap();
    assert_eq!(m.size(), 2);
}

#[test]
fn test_full_matrix_rejects_ragged_rows() {
    let data = "0,1,2\n1,0\n2,1,0\n";
    let err = load_full_matrix(Cursor::new(data), 1).unwrap_err();
    assert!(matches!(err, PenaltyError::Validation(_)));
    assert!(err.to_string().contains("Row 1 has 2 columns"));
}

#[test]
fn test_full_matrix_rejects_text() {
    let err = load_full_matrix(Cursor::new("0,abc\n1,0\n"), 1).unwrap_err();
    assert!(err.to_string().contains("'abc' is not a number"));
}

#[test]
fn test_full_matrix_rejects_empty_input() {
    assert!(load_full_matrix(Cursor::new(""), 1).is_err());
}

#[test]
fn test_full_matrix_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "0,2").unwrap();
    writeln!(file, "3,0").unwrap();
    let m = load_full_matrix_from_file(file.path(), 10).unwrap();
    assert_eq!(m.distance(1, 0), 30);
    // duplicate of 1 folds onto 1
    assert_eq!(m.distance(3, 0), 30);
}

// --- EDGE LIST ---

#[test]
fn test_edge_list_mirrors_missing_direction() {
    let data = "From,To,Cost\n0,1,2.5\n1,2,4\n2,1,6\n";
    let m = load_edge_list(Cursor::new(data), 3, 10, 99.0).unwrap();
    assert_eq!(m.distance(0, 1), 25);
    assert_eq!(m.distance(1, 0), 25);
    assert_eq!(m.distance(1, 2), 40);
    assert_eq!(m.distance(2, 1), 60);
    // never listed in either direction
    assert_eq!(m.distance(0, 2), 990);
    assert_eq!(m.distance(2, 2), 0);
}

#[test]
fn test_edge_list_skips_malformed_rows() {
    let data = "From,To,Cost\n0,1,abc\n0,1\n0,1,-3\n1,0,7\n";
    let m = load_edge_list(Cursor::new(data), 2, 1, 0.0).unwrap();
    assert_eq!(m.distance(0, 1), 7);
}

#[test]
fn test_edge_list_rejects_unknown_stop() {
    let data = "From,To,Cost\n0,5,1\n";
    let err = load_edge_list(Cursor::new(data), 2, 1, 0.0).unwrap_err();
    assert!(err.to_string().contains("Edge 0 -> 5 is outside 0..2"));
}

#[test]
fn test_edge_list_missing_file_is_io_error() {
    let err = load_edge_list_from_file("/no/such/costs.csv", 2, 1, 0.0).unwrap_err();
    assert!(matches!(err, PenaltyError::Io(_)));
}

use super::costs::CostMatrix;
use crate::core_types::Fixed;
use crate::error::{PenaltyError, PtResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Converts an unscaled value into the fixed-point domain (truncating).
#[inline(always)]
pub fn to_fixed(value: f64, scale: i64) -> Fixed {
    (value * scale as f64) as Fixed
}

/// Reads a headerless square matrix, one row per line.
pub fn load_full_matrix<R: Read>(reader: R, scale: i64) -> PtResult<CostMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<Fixed>> = Vec::new();
    for (r, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let v: f64 = field.parse().map_err(|_| {
                PenaltyError::Validation(format!("Row {}: '{}' is not a number", r, field))
            })?;
            if !v.is_finite() {
                return Err(PenaltyError::Validation(format!(
                    "Row {}: non-finite distance {}",
                    r, v
                )));
            }
            row.push(to_fixed(v, scale));
        }
        rows.push(row);
    }

    debug!("Loaded {}x{} distance matrix", rows.len(), rows.len());
    CostMatrix::from_rows(&rows)
}

/// Reads `From,To,Cost` rows over real ids `0..n`. Pairs that are not listed
/// fall back to the reverse direction, then to `fill`.
pub fn load_edge_list<R: Read>(
    reader: R,
    n: usize,
    scale: i64,
    fill: f64,
) -> PtResult<CostMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut given: Vec<Option<f64>> = vec![None; n * n];
    let mut skipped = 0;

    for record in rdr.records() {
        let record = record?;
        if record.len() < 3 {
            skipped += 1;
            continue;
        }
        let (Ok(a), Ok(b), Ok(cost)) = (
            record[0].parse::<usize>(),
            record[1].parse::<usize>(),
            record[2].parse::<f64>(),
        ) else {
            skipped += 1;
            continue;
        };
        if a >= n || b >= n {
            return Err(PenaltyError::Validation(format!(
                "Edge {} -> {} is outside 0..{}",
                a, b, n
            )));
        }
        if !cost.is_finite() || cost < 0.0 {
            skipped += 1;
            continue;
        }
        given[a * n + b] = Some(cost);
    }

    if skipped > 0 {
        debug!("Skipped {} malformed edge rows", skipped);
    }

    let mut weights = vec![0; n * n];
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            let v = given[a * n + b].or(given[b * n + a]).unwrap_or(fill);
            weights[a * n + b] = to_fixed(v, scale);
        }
    }
    CostMatrix::new(n, weights)
}

pub fn load_full_matrix_from_file<P: AsRef<Path>>(path: P, scale: i64) -> PtResult<CostMatrix> {
    load_full_matrix(File::open(path)?, scale)
}

pub fn load_edge_list_from_file<P: AsRef<Path>>(
    path: P,
    n: usize,
    scale: i64,
    fill: f64,
) -> PtResult<CostMatrix> {
    load_edge_list(File::open(path)?, n, scale, fill)
}

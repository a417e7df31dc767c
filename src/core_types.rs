/// Identity of a stop. Ids double as arena indices.
///
/// - `0..real_count`: real stops (customers and depot markers)
/// - `real_count..2 * real_count`: virtual duplicates, `k + real_count` mirrors `k`
pub type StopId = usize;

/// Scaled fixed-point quantity shared with the rest of the solver
/// (distances, potentials, service times, waits).
pub type Fixed = i64;

/// Penalty value returned to the search driver.
pub type Penalty = f64;

/// Tentative gain of the move under evaluation.
pub type Gain = i64;

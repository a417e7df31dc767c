/// Exponent applied to per-stop lateness when nothing overrides it.
pub const DEFAULT_COST_EXPONENT: f64 = 1.5;

/// The legacy risk-threshold knob carries the exponent multiplied by this.
pub const LEGACY_THRESHOLD_DIVISOR: f64 = 10.0;

/// Default fixed-point precision divisor.
pub const DEFAULT_SCALE: i64 = 100;

/// Marker value for ordinary (non-depot) stops.
pub const NOT_A_DEPOT: usize = 0;

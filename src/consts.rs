/// Default tolerance for treating a tableau entry as zero.
pub const EPS: f64 = 1e-9;

/// Default cap on the total number of pivots of a single solve.
pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;

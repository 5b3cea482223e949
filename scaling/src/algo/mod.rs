//! Numerical helpers shared by the interval, stretch and histogram modules.

pub mod interp;
pub mod stats;

pub use interp::{check_table, interp_clamped, InterpError};
pub use stats::{median_sorted, min_max, percentile_sorted, sort_values, std_dev};

//! Order statistics and score normalization
//!
//! - **quantile**: deterministic linear-interpolation quantiles
//! - **normalize**: robust 1st/99th percentile rescaling into `[0, 1]`

mod normalize;
mod quantile;

pub use normalize::{robust_normalize, LOWER_PERCENTILE, UPPER_PERCENTILE};
pub use quantile::{quantile, quantile_sorted, sorted_finite};

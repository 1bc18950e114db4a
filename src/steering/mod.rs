//! Steering estimation: band centroids in, smoothed angle/offset out.

mod estimator;
mod types;

pub use estimator::{lateral_offset, raw_angle_deg, select_pair, AngleEstimator};
pub use types::{AngleSignal, SmoothingState};

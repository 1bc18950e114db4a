//! Frame analysis: reduce a luma frame to per-band line centroids.
//!
//! The stages, in order:
//!
//! 1. **Adaptive threshold** - binarization cut from the frame's own
//!    mean intensity
//! 2. **Band centroids** - unweighted geometric centroid of sub-threshold
//!    pixels in the top/mid/bottom thirds of the frame
//! 3. **Observation assembly** - a single [`LineObservation`] per frame

mod centroid;
mod observation;
mod threshold;

pub use centroid::{band_centroid, ZoneMeasurement};
pub use observation::{observe, LineObservation};
pub use threshold::estimate_threshold;

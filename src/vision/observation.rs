//! Per-frame line observation: threshold estimation plus three-band
//! centroid extraction.

use crate::camera::Frame;

use super::centroid::{band_centroid, ZoneMeasurement};
use super::threshold::estimate_threshold;

/// Everything the steering stage needs to know about one frame.
///
/// Immutable once built; produced once per processed frame and handed
/// downstream through the observation relay.
#[derive(Debug, Clone, Copy)]
pub struct LineObservation {
    /// Binarization threshold used for this frame
    pub threshold: u8,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Centroid of the top third of the frame
    pub top: ZoneMeasurement,
    /// Centroid of the middle third
    pub mid: ZoneMeasurement,
    /// Centroid of the bottom third (closest to the vehicle)
    pub bottom: ZoneMeasurement,
    /// Monotonic timestamp of the observation, microseconds
    pub timestamp_us: u64,
}

/// Reduce a frame to a [`LineObservation`].
///
/// Estimates an adaptive threshold from the whole frame, then splits the
/// height into three contiguous bands - top `[0, h/3)`, mid
/// `[h/3, 2h/3)`, bottom `[2h/3, h)` - and extracts a centroid from each
/// with the same threshold and `min_pixels` floor. Bands are independent;
/// a band without enough foreground simply comes back invalid.
pub fn observe(
    frame: &Frame,
    threshold_offset: i32,
    min_pixels: u32,
    timestamp_us: u64,
) -> LineObservation {
    let threshold = estimate_threshold(&frame.data, threshold_offset);

    let h = frame.height as i32;
    let split = |y0, y1| {
        band_centroid(
            &frame.data,
            frame.width,
            frame.height,
            y0,
            y1,
            threshold,
            min_pixels,
        )
    };
    let top = split(0, h / 3);
    let mid = split(h / 3, 2 * h / 3);
    let bottom = split(2 * h / 3, h);

    log::debug!(
        "TH={} TOP:({},{}){} MID:({},{}){} BOT:({},{}){}",
        threshold,
        top.x,
        top.y,
        if top.valid { "" } else { " !" },
        mid.x,
        mid.y,
        if mid.valid { "" } else { " !" },
        bottom.x,
        bottom.y,
        if bottom.valid { "" } else { " !" },
    );

    LineObservation {
        threshold,
        width: frame.width,
        height: frame.height,
        top,
        mid,
        bottom,
        timestamp_us,
    }
}

//! Foreground centroid of a horizontal band.

/// Centroid of one horizontal band of the frame.
///
/// `valid == false` means the band held fewer than the requested minimum
/// of foreground pixels (or was empty after clamping); `x` and `y` carry
/// no meaning in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMeasurement {
    pub valid: bool,
    pub x: i32,
    pub y: i32,
}

impl ZoneMeasurement {
    /// A measurement for a band where no line was found.
    pub const fn invalid() -> Self {
        Self {
            valid: false,
            x: -1,
            y: -1,
        }
    }
}

/// Compute the unweighted geometric centroid of foreground pixels in the
/// row range `[y0, y1)`.
///
/// A pixel is foreground iff its value is strictly below `threshold`
/// (darker means line). The centroid is `sum(x)/count`, `sum(y)/count`
/// with integer truncation; intensity weighting is deliberately not
/// applied, the binarized assumption keeps this simple and stable.
///
/// The row range is clamped to `[0, height]` first. An empty range after
/// clamping, or fewer than `min_pixels` foreground pixels, yields an
/// invalid measurement.
pub fn band_centroid(
    pixels: &[u8],
    width: u32,
    height: u32,
    y0: i32,
    y1: i32,
    threshold: u8,
    min_pixels: u32,
) -> ZoneMeasurement {
    let y0 = y0.max(0);
    let y1 = y1.min(height as i32);
    if y1 <= y0 {
        return ZoneMeasurement::invalid();
    }

    let w = width as usize;
    let mut sum_x: u64 = 0;
    let mut sum_y: u64 = 0;
    let mut count: u64 = 0;

    for y in y0..y1 {
        let row = &pixels[y as usize * w..(y as usize + 1) * w];
        for (x, &p) in row.iter().enumerate() {
            if p < threshold {
                sum_x += x as u64;
                sum_y += y as u64;
                count += 1;
            }
        }
    }

    if count < min_pixels as u64 {
        return ZoneMeasurement::invalid();
    }

    ZoneMeasurement {
        valid: true,
        x: (sum_x / count) as i32,
        y: (sum_y / count) as i32,
    }
}

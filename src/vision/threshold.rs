//! Adaptive binarization threshold from the frame's mean intensity.

/// Estimate a binarization threshold as `mean - offset`, clamped to the
/// valid sample range.
///
/// The mean uses integer division over the whole buffer, so the scan is
/// a single O(len) pass with no floating point in the hot path. The
/// offset biases the cut below the ambient brightness; 15-40 works for
/// most lighting, higher values tolerate more glare.
///
/// # Arguments
/// * `pixels` - Luma samples for the whole frame
/// * `offset` - Bias subtracted from the mean
///
/// # Returns
/// A threshold in 0-255. An empty buffer yields 0.
pub fn estimate_threshold(pixels: &[u8], offset: i32) -> u8 {
    if pixels.is_empty() {
        return 0;
    }
    let sum: u64 = pixels.iter().map(|&p| p as u64).sum();
    let mean = (sum / pixels.len() as u64) as i32;
    (mean - offset).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_uniform_frame() {
        // mean = 100, offset 25 -> 75
        let pixels = vec![100u8; 64];
        assert_eq!(estimate_threshold(&pixels, 25), 75);
    }

    #[test]
    fn test_threshold_integer_mean() {
        // sum = 100 + 101 + 101 = 302, mean = 302 / 3 = 100 (truncated)
        let pixels = [100u8, 101, 101];
        assert_eq!(estimate_threshold(&pixels, 10), 90);
    }

    #[test]
    fn test_threshold_clamps_low() {
        // mean 10 - offset 40 would be negative
        let pixels = vec![10u8; 16];
        assert_eq!(estimate_threshold(&pixels, 40), 0);
    }

    #[test]
    fn test_threshold_clamps_high() {
        // Negative offset pushes past 255
        let pixels = vec![250u8; 16];
        assert_eq!(estimate_threshold(&pixels, -20), 255);
    }

    #[test]
    fn test_threshold_empty_buffer() {
        assert_eq!(estimate_threshold(&[], 25), 0);
    }

    #[test]
    fn test_threshold_full_range_sum() {
        // 4096 pixels of 255 overflows u32 pixel sums elsewhere;
        // make sure the accumulator holds up
        let pixels = vec![255u8; 4096];
        assert_eq!(estimate_threshold(&pixels, 0), 255);
    }
}

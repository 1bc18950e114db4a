//! Steering signal types.

/// One steering update, derived from a single line observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSignal {
    /// Line angle relative to vertical, degrees, right-positive
    pub angle_deg: f32,
    /// Lateral offset from the image center, pixels, right-positive
    pub offset_px: f32,
    /// Timestamp of the observation this signal came from, microseconds
    pub timestamp_us: u64,
}

/// Exponential-moving-average state for the steering signal.
///
/// Owned exclusively by the estimator worker for the life of the
/// process: zero-initialized at pipeline start, updated on every
/// observation that yields a signal, never reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothingState {
    pub angle_ema: f32,
    pub offset_ema: f32,
}

impl SmoothingState {
    /// Fold one raw sample pair into the running averages and return the
    /// smoothed values: `ema = alpha * raw + (1 - alpha) * ema`.
    pub fn update(&mut self, alpha: f32, raw_angle: f32, raw_offset: f32) -> (f32, f32) {
        self.angle_ema = alpha * raw_angle + (1.0 - alpha) * self.angle_ema;
        self.offset_ema = alpha * raw_offset + (1.0 - alpha) * self.offset_ema;
        (self.angle_ema, self.offset_ema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_first_sample_from_zero() {
        // After zero-init, one sample with alpha = 0.3 gives 0.3 * raw
        let mut state = SmoothingState::default();
        let (angle, offset) = state.update(0.3, 10.0, -20.0);
        assert!((angle - 3.0).abs() < 1e-6);
        assert!((offset + 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_ema_recurrence() {
        let mut state = SmoothingState::default();
        state.update(0.5, 8.0, 4.0); // ema = 4.0, 2.0
        let (angle, offset) = state.update(0.5, 0.0, 0.0);
        assert!((angle - 2.0).abs() < 1e-6);
        assert!((offset - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ema_alpha_one_tracks_raw() {
        let mut state = SmoothingState::default();
        let (angle, offset) = state.update(1.0, -7.5, 12.0);
        assert_eq!(angle, -7.5);
        assert_eq!(offset, 12.0);
    }
}

//! Steering angle and lateral offset from band centroids.

use crate::vision::LineObservation;

use super::types::{AngleSignal, SmoothingState};

/// Guard against a vertical pair: |dy| below this is clamped.
const DY_EPSILON: f32 = 1e-6;

/// Pick the point pair used for the angle, nearest-first.
///
/// Priority: (mid, bottom), then (top, mid), then (top, bottom). The
/// returned tuple is `((x1, y1), (x2, y2))` with the second point the
/// one closer to the vehicle. `None` when fewer than two bands saw the
/// line.
pub fn select_pair(obs: &LineObservation) -> Option<((i32, i32), (i32, i32))> {
    if obs.bottom.valid && obs.mid.valid {
        Some(((obs.mid.x, obs.mid.y), (obs.bottom.x, obs.bottom.y)))
    } else if obs.mid.valid && obs.top.valid {
        Some(((obs.top.x, obs.top.y), (obs.mid.x, obs.mid.y)))
    } else if obs.bottom.valid && obs.top.valid {
        Some(((obs.top.x, obs.top.y), (obs.bottom.x, obs.bottom.y)))
    } else {
        None
    }
}

/// Angle of the segment `(x1,y1) -> (x2,y2)` relative to vertical,
/// degrees, right-positive.
///
/// `dy` is clamped away from zero (sign-preserving, zero treated as
/// positive) so a horizontal pair produces a finite near-90-degree
/// answer instead of a division error.
pub fn raw_angle_deg((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> f32 {
    let dx = (x2 - x1) as f32;
    let mut dy = (y2 - y1) as f32;
    if dy.abs() < DY_EPSILON {
        dy = if dy >= 0.0 { DY_EPSILON } else { -DY_EPSILON };
    }
    (dx / dy).atan().to_degrees()
}

/// Lateral offset in pixels from the image center, right-positive.
///
/// Uses the most distal valid point with priority bottom > mid > top,
/// independent of which pair fed the angle. Falls back to 0 when no
/// band is valid (cannot happen when a pair was found, but guarded).
pub fn lateral_offset(obs: &LineObservation) -> f32 {
    let center = (obs.width / 2) as i32;
    let point = if obs.bottom.valid {
        Some(obs.bottom.x)
    } else if obs.mid.valid {
        Some(obs.mid.x)
    } else if obs.top.valid {
        Some(obs.top.x)
    } else {
        None
    };
    point.map_or(0.0, |x| (x - center) as f32)
}

/// Turns line observations into smoothed steering signals.
///
/// Holds the process-lifetime [`SmoothingState`]; one instance lives on
/// the estimator worker and nothing else touches it.
pub struct AngleEstimator {
    alpha: f32,
    state: SmoothingState,
}

impl AngleEstimator {
    /// Create an estimator with the given EMA weight (0 < alpha <= 1).
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: SmoothingState::default(),
        }
    }

    /// Process one observation.
    ///
    /// Returns `None` when no usable point pair exists; the cycle is
    /// skipped and nothing reaches the transmitter. The returned signal
    /// carries the smoothed angle/offset and the observation's capture
    /// timestamp.
    pub fn process(&mut self, obs: &LineObservation) -> Option<AngleSignal> {
        let Some((p1, p2)) = select_pair(obs) else {
            log::warn!(
                "not enough points to compute angle (ts={}us)",
                obs.timestamp_us
            );
            return None;
        };

        let raw_angle = raw_angle_deg(p1, p2);
        let raw_offset = lateral_offset(obs);
        let (angle_deg, offset_px) = self.state.update(self.alpha, raw_angle, raw_offset);

        log::debug!(
            "angle_v={:.2} deg offset={:.1} px | EMA: angle={:.2} deg, offset={:.1} px",
            raw_angle,
            raw_offset,
            angle_deg,
            offset_px
        );

        Some(AngleSignal {
            angle_deg,
            offset_px,
            timestamp_us: obs.timestamp_us,
        })
    }
}

//! Frame acquisition boundary and the built-in synthetic source.

use super::types::{Frame, Resolution};

/// Boundary to whatever produces luma frames.
///
/// The contract mirrors a camera driver's frame-buffer lease: `acquire`
/// transfers ownership of a buffer to the caller for the duration of
/// processing, and `release` must hand it back exactly once per
/// successful acquire, on every exit path. Hardware drivers (MIPI/DVP
/// bring-up, pin mapping) live behind this trait and are not part of
/// this crate.
pub trait FrameSource: Send {
    /// Take the next frame if one is currently available.
    ///
    /// `None` is a transient condition, not an error: the caller skips
    /// the cycle and retries on its next loop pass.
    fn acquire(&mut self) -> Option<Frame>;

    /// Return a frame's buffer to the source.
    fn release(&mut self, frame: Frame);
}

/// Synthetic frame source that renders a dark line sweeping over a light
/// background.
///
/// Stands in behind the [`FrameSource`] boundary where a camera driver
/// would sit; used by the demo binary and the integration tests. Buffers
/// are pooled and recycled through `acquire`/`release` so the ownership
/// contract gets exercised the same way a real driver's would.
pub struct PatternSource {
    width: u32,
    height: u32,
    pool: Vec<Vec<u8>>,
    frame_index: u64,
}

/// Luma value of the background in synthetic frames.
const PATTERN_BACKGROUND: u8 = 200;
/// Luma value of the line in synthetic frames.
const PATTERN_LINE: u8 = 20;
/// Number of buffers cycled through the pool.
const POOL_SIZE: usize = 2;

impl PatternSource {
    /// Create a source producing frames at the given resolution.
    pub fn new(resolution: Resolution) -> Self {
        let len = (resolution.width * resolution.height) as usize;
        Self {
            width: resolution.width,
            height: resolution.height,
            pool: (0..POOL_SIZE).map(|_| vec![0u8; len]).collect(),
            frame_index: 0,
        }
    }

    /// Render the line pattern for the current frame index into `data`.
    ///
    /// The line drifts left and right across the middle half of the
    /// frame and carries a slight tilt, so downstream geometry sees a
    /// non-trivial angle and offset.
    fn render(&self, data: &mut [u8]) {
        let w = self.width as i32;
        let h = self.height as i32;
        data.fill(PATTERN_BACKGROUND);

        // Triangle-wave sweep: -100..100 over 400 frames
        let phase = (self.frame_index % 400) as i32;
        let sweep = if phase < 200 { phase - 100 } else { 300 - phase };
        let center = w / 2 + sweep * (w / 4) / 100;

        // Wide enough that every third of the frame clears the default
        // min_pixels floor (800): 2*half+1 columns per row
        let half = (w / 16).max(1);

        for y in 0..h {
            let line_x = center + (y - h / 2) / 8;
            let x_lo = (line_x - half).max(0);
            let x_hi = (line_x + half).min(w - 1);
            for x in x_lo..=x_hi {
                data[(y * w + x) as usize] = PATTERN_LINE;
            }
        }
    }
}

impl FrameSource for PatternSource {
    fn acquire(&mut self) -> Option<Frame> {
        let mut data = self.pool.pop()?;
        self.render(&mut data);
        self.frame_index += 1;
        Some(Frame {
            data,
            width: self.width,
            height: self.height,
        })
    }

    fn release(&mut self, frame: Frame) {
        if self.pool.len() < POOL_SIZE {
            self.pool.push(frame.data);
        }
    }
}

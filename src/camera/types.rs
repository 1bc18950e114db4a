//! Frame types and data structures.

use std::fmt;

/// Frame resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// QQVGA (160x120) - the line camera's native size, fast to scan
    pub const QQVGA: Resolution = Resolution {
        width: 160,
        height: 120,
    };

    /// QVGA (320x240) - more detail, four times the scan cost
    pub const QVGA: Resolution = Resolution {
        width: 320,
        height: 240,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::QQVGA
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single-channel (luma) raster frame.
///
/// Pixels are row-major, one byte per pixel, darker values meaning less
/// light. The frame buffer is exclusively owned by whichever stage
/// currently holds it and must be handed back to its [`FrameSource`]
/// exactly once per acquisition.
///
/// [`FrameSource`]: super::FrameSource
#[derive(Debug)]
pub struct Frame {
    /// Raw luma samples, `width * height` bytes
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Total number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_constants() {
        assert_eq!(Resolution::QQVGA.width, 160);
        assert_eq!(Resolution::QQVGA.height, 120);
        assert_eq!(Resolution::QVGA.width, 320);
        assert_eq!(Resolution::QVGA.height, 240);
    }

    #[test]
    fn test_resolution_default() {
        assert_eq!(Resolution::default(), Resolution::QQVGA);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(format!("{}", Resolution::QQVGA), "160x120");
    }

    #[test]
    fn test_frame_pixel_count() {
        let frame = Frame {
            data: vec![0; 8],
            width: 4,
            height: 2,
        };
        assert_eq!(frame.pixel_count(), 8);
    }
}

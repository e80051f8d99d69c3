use core::time::Duration;

/// Pixel formats a frame source may report.
///
/// Luminance analysis always reads plane 0; for the planar YUV formats that
/// plane is the Y (luma) plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    Gray8,
    Nv12,
    Yuv420Planar,
    Yuyv,
    Bgra32,
}

/// Pixel dimensions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A rational number (numerator / denominator).
///
/// Used to represent frame rates (e.g. 30000/1000 = 30 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Time between frames when this ratio is a frame rate.
    ///
    /// A zero numerator means "unpaced" and yields [`Duration::ZERO`].
    pub fn frame_interval(&self) -> Duration {
        if self.numerator == 0 {
            return Duration::ZERO;
        }
        let nanos = u64::from(self.denominator) * 1_000_000_000 / u64::from(self.numerator);
        Duration::from_nanos(nanos)
    }
}

/// Configuration for a frame source.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub pixel_format: PixelFormat,
    pub size: Size,
    pub frame_rate: Ratio,
}

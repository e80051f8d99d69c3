//! Mean-luminance analysis of individual frames.

use crate::buffer::PlaneBuffer;
use crate::error::AnalysisError;
use crate::frame::{Frame, FrameGuard};

/// Index of the luminance plane read by [`LuminanceAnalyzer`].
pub const LUMA_PLANE: usize = 0;

/// Receives one luma value per analyzed frame.
///
/// Called synchronously on the thread that runs the analysis, before the
/// frame is released. Implementations that need another thread (a UI loop,
/// say) must hand the value over themselves.
pub trait LumaListener {
    fn on_luma(&self, luma: f64);
}

impl<F: Fn(f64)> LumaListener for F {
    fn on_luma(&self, luma: f64) {
        self(luma)
    }
}

/// Consumes frames delivered by a frame source.
///
/// `analyze` takes ownership of the frame and must release it before
/// returning, whatever the outcome.
pub trait Analyzer<F: Frame> {
    type Error;

    fn analyze(&self, frame: F) -> Result<(), Self::Error>;
}

/// Reports the mean byte value of each frame's luminance plane.
#[derive(Debug, Clone)]
pub struct LuminanceAnalyzer<L> {
    listener: L,
}

impl<L: LumaListener> LuminanceAnalyzer<L> {
    pub fn new(listener: L) -> Self {
        LuminanceAnalyzer { listener }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }
}

impl<F: Frame, L: LumaListener> Analyzer<F> for LuminanceAnalyzer<L> {
    type Error = AnalysisError;

    fn analyze(&self, frame: F) -> Result<(), AnalysisError> {
        let mut frame = FrameGuard::new(frame);
        let result = frame
            .plane_mut(LUMA_PLANE)
            .ok_or(AnalysisError::MissingPlane { index: LUMA_PLANE })
            .and_then(|plane| {
                plane.rewind();
                let data = plane.read_remaining();
                let luma = mean_luma(data).ok_or(AnalysisError::EmptyFrame)?;
                tracing::trace!(luma, bytes = data.len(), "analyzed frame");
                Ok(luma)
            });
        match result {
            Ok(luma) => {
                self.listener.on_luma(luma);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "frame analysis failed");
                Err(e)
            }
        }
    }
}

/// Arithmetic mean of `data` with every byte read as 0..=255.
///
/// Returns `None` for an empty slice.
pub fn mean_luma(data: &[u8]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let sum: u64 = data.iter().map(|&b| u64::from(b)).sum();
    Some(sum as f64 / data.len() as f64)
}

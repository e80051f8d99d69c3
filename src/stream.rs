use crate::analyzer::{Analyzer, LumaListener, LuminanceAnalyzer};
use crate::error::AnalysisError;
use crate::frame::Frame;

/// Callback-based frame delivery.
pub trait CameraStream {
    type Frame<'a>: Frame;
    type Error: std::error::Error;

    /// Start streaming. Callback is invoked on the stream's worker thread for
    /// each frame, one at a time. The callback owns the frame and must close
    /// it; the stream delivers nothing further until it does.
    fn start<F>(&mut self, callback: F) -> Result<(), Self::Error>
    where
        F: FnMut(Self::Frame<'_>) + Send + 'static;

    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// Run `analyzer` on every frame `stream` delivers.
///
/// Analysis errors go to `on_error`; the frame has already been released when
/// it is called.
pub fn start_luma_analysis<S, L, E>(
    stream: &mut S,
    analyzer: LuminanceAnalyzer<L>,
    mut on_error: E,
) -> Result<(), S::Error>
where
    S: CameraStream,
    L: LumaListener + Send + 'static,
    E: FnMut(AnalysisError) + Send + 'static,
{
    stream.start(move |frame| {
        if let Err(e) = analyzer.analyze(frame) {
            on_error(e);
        }
    })
}

use core::fmt;

/// Why a frame could not be turned into a luma value.
///
/// The frame has always been released by the time one of these reaches the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnalysisError {
    /// The luminance plane had no readable bytes, so its mean is undefined.
    EmptyFrame,
    /// The frame has no plane at the expected index.
    MissingPlane { index: usize },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrame => f.write_str("empty frame: luminance plane has no bytes"),
            Self::MissingPlane { index } => write!(f, "frame has no plane at index {index}"),
        }
    }
}

impl core::error::Error for AnalysisError {}

/// Top-level crate error.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    Analysis(AnalysisError),
    TooManyPlanes,
    AlreadyStarted,
    NotStarted,
    Looping,
    WorkerSpawn,
    WorkerPanicked,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis(e) => write!(f, "analysis failed: {e}"),
            Self::TooManyPlanes => f.write_str("too many planes for one frame"),
            Self::AlreadyStarted => f.write_str("stream already started"),
            Self::NotStarted => f.write_str("stream not started"),
            Self::Looping => f.write_str("looping stream never finishes"),
            Self::WorkerSpawn => f.write_str("failed to spawn frame delivery worker"),
            Self::WorkerPanicked => f.write_str("frame delivery worker panicked"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Analysis(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AnalysisError> for Error {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

use core::fmt;
use core::ops::{Deref, DerefMut};
use core::time::Duration;

use arrayvec::ArrayVec;

use crate::buffer::{PlaneBuffer, SlicePlane};
use crate::error::Error;
use crate::types::{PixelFormat, Size};

/// Maximum number of planes a [`MemoryFrame`] holds inline.
pub const MAX_PLANES: usize = 4;

/// A video frame lent out by a frame source.
///
/// The source withholds the next frame until [`close`](Frame::close) is
/// called, so every consumer must close every frame it receives.
pub trait Frame {
    type Plane: PlaneBuffer;

    fn pixel_format(&self) -> PixelFormat;
    fn size(&self) -> Size;
    fn timestamp(&self) -> Duration;
    fn plane_count(&self) -> usize;
    fn plane_mut(&mut self, index: usize) -> Option<&mut Self::Plane>;

    /// Release the frame back to its source. Calls after the first are no-ops.
    fn close(&mut self);
}

impl<F: Frame + ?Sized> Frame for &mut F {
    type Plane = F::Plane;

    fn pixel_format(&self) -> PixelFormat {
        (**self).pixel_format()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn timestamp(&self) -> Duration {
        (**self).timestamp()
    }

    fn plane_count(&self) -> usize {
        (**self).plane_count()
    }

    fn plane_mut(&mut self, index: usize) -> Option<&mut Self::Plane> {
        (**self).plane_mut(index)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Owns a frame and closes it when dropped, on every exit path.
pub struct FrameGuard<F: Frame> {
    frame: F,
}

impl<F: Frame> FrameGuard<F> {
    pub fn new(frame: F) -> Self {
        FrameGuard { frame }
    }
}

impl<F: Frame> Deref for FrameGuard<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.frame
    }
}

impl<F: Frame> DerefMut for FrameGuard<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.frame
    }
}

impl<F: Frame> Drop for FrameGuard<F> {
    fn drop(&mut self) {
        self.frame.close();
    }
}

/// A frame over caller-owned plane data.
pub struct MemoryFrame<'a> {
    planes: ArrayVec<SlicePlane<'a>, MAX_PLANES>,
    pixel_format: PixelFormat,
    size: Size,
    timestamp: Duration,
    closed: bool,
    on_close: Option<&'a dyn Fn()>,
}

impl<'a> MemoryFrame<'a> {
    pub fn new(pixel_format: PixelFormat, size: Size) -> Self {
        MemoryFrame {
            planes: ArrayVec::new(),
            pixel_format,
            size,
            timestamp: Duration::ZERO,
            closed: false,
            on_close: None,
        }
    }

    /// A single-plane 8-bit grayscale frame.
    pub fn gray(data: &'a [u8], size: Size) -> Self {
        let mut frame = Self::new(PixelFormat::Gray8, size);
        let bytes_per_row = if size.height == 0 {
            data.len()
        } else {
            data.len() / size.height as usize
        };
        frame
            .planes
            .push(SlicePlane::with_stride(data, bytes_per_row));
        frame
    }

    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Register a hook run once, when the frame is first closed.
    pub fn on_close(mut self, hook: &'a dyn Fn()) -> Self {
        self.on_close = Some(hook);
        self
    }

    pub fn push_plane(&mut self, plane: SlicePlane<'a>) -> Result<(), Error> {
        self.planes
            .try_push(plane)
            .map_err(|_| Error::TooManyPlanes)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<'a> Frame for MemoryFrame<'a> {
    type Plane = SlicePlane<'a>;

    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn size(&self) -> Size {
        self.size
    }

    fn timestamp(&self) -> Duration {
        self.timestamp
    }

    fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn plane_mut(&mut self, index: usize) -> Option<&mut SlicePlane<'a>> {
        self.planes.get_mut(index)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(hook) = self.on_close {
            hook();
        }
    }
}

impl fmt::Debug for MemoryFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFrame")
            .field("pixel_format", &self.pixel_format)
            .field("size", &self.size)
            .field("timestamp", &self.timestamp)
            .field("planes", &self.planes.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    #[test]
    fn close_runs_hook_once() {
        let calls = Cell::new(0);
        let hook = || calls.set(calls.get() + 1);
        let mut frame = MemoryFrame::gray(&[1, 2, 3], Size::default()).on_close(&hook);
        frame.close();
        frame.close();
        assert!(frame.is_closed());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn guard_closes_on_drop() {
        let mut frame = MemoryFrame::gray(&[0], Size::default());
        {
            let guard = FrameGuard::new(&mut frame);
            assert_eq!(guard.plane_count(), 1);
        }
        assert!(frame.is_closed());
    }

    #[test]
    fn push_plane_rejects_overflow() {
        let data = [0u8; 2];
        let mut frame = MemoryFrame::new(PixelFormat::Yuv420Planar, Size::default());
        for _ in 0..MAX_PLANES {
            assert!(frame.push_plane(SlicePlane::new(&data)).is_ok());
        }
        assert!(matches!(
            frame.push_plane(SlicePlane::new(&data)),
            Err(Error::TooManyPlanes)
        ));
    }

    #[test]
    fn gray_frame_derives_stride_from_height() {
        let data = [0u8; 12];
        let mut frame = MemoryFrame::gray(
            &data,
            Size {
                width: 4,
                height: 3,
            },
        );
        let plane = frame.plane_mut(0).map(|p| p.bytes_per_row());
        assert_eq!(plane, Some(4));
    }
}

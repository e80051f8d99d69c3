//! An in-memory [`CameraStream`] that replays recorded frames.

use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::buffer::SlicePlane;
use crate::error::Error;
use crate::frame::{MAX_PLANES, MemoryFrame};
use crate::stream::CameraStream;
use crate::types::StreamConfig;

/// Plane data for one replayed frame.
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    planes: Vec<Vec<u8>>,
    cursor: usize,
}

impl RecordedFrame {
    pub fn new(planes: Vec<Vec<u8>>) -> Result<Self, Error> {
        if planes.len() > MAX_PLANES {
            return Err(Error::TooManyPlanes);
        }
        Ok(RecordedFrame { planes, cursor: 0 })
    }

    /// A frame with a single luminance plane.
    pub fn luma(data: Vec<u8>) -> Self {
        RecordedFrame {
            planes: vec![data],
            cursor: 0,
        }
    }

    /// Deliver the planes with their read cursors already moved to `cursor`,
    /// as a producer that peeked at the data would.
    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    released: AtomicU64,
    stalled: AtomicBool,
}

/// Replays [`RecordedFrame`]s on a dedicated worker thread.
///
/// Frames are delivered one at a time and paced by the configured frame
/// rate. If the consumer returns without releasing a frame the stream stalls:
/// nothing further is delivered until it is stopped and restarted.
pub struct ReplayStream {
    config: StreamConfig,
    frames: Arc<Vec<RecordedFrame>>,
    looping: bool,
    counters: Arc<Counters>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ReplayStream {
    pub fn new(config: StreamConfig, frames: Vec<RecordedFrame>) -> Self {
        ReplayStream {
            config,
            frames: Arc::new(frames),
            looping: false,
            counters: Arc::new(Counters::default()),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Restart from the first frame after the last one until stopped.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Frames handed to the callback since the last start.
    pub fn delivered(&self) -> u64 {
        self.counters.delivered.load(Ordering::Acquire)
    }

    /// Frames closed by the consumer since the last start.
    pub fn released(&self) -> u64 {
        self.counters.released.load(Ordering::Acquire)
    }

    /// Whether delivery stopped because a frame was not released.
    pub fn is_stalled(&self) -> bool {
        self.counters.stalled.load(Ordering::Acquire)
    }

    /// Wait for the replay to deliver its last frame.
    ///
    /// Looping replays have no last frame and are refused; use
    /// [`stop`](CameraStream::stop) instead.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.worker.is_none() {
            return Err(Error::NotStarted);
        }
        if self.looping {
            return Err(Error::Looping);
        }
        let worker = self.worker.take().ok_or(Error::NotStarted)?;
        worker.join().map_err(|_| Error::WorkerPanicked)
    }
}

impl CameraStream for ReplayStream {
    type Frame<'a> = MemoryFrame<'a>;
    type Error = Error;

    fn start<F>(&mut self, callback: F) -> Result<(), Self::Error>
    where
        F: FnMut(Self::Frame<'_>) + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(Error::AlreadyStarted);
        }

        self.stop.store(false, Ordering::Release);
        self.counters = Arc::new(Counters::default());

        let worker = Worker {
            config: self.config.clone(),
            frames: self.frames.clone(),
            looping: self.looping,
            counters: self.counters.clone(),
            stop: self.stop.clone(),
        };
        let handle = thread::Builder::new()
            .name("frame-luma.replay".into())
            .spawn(move || worker.run(callback))
            .map_err(|_| Error::WorkerSpawn)?;

        tracing::debug!(
            frames = self.frames.len(),
            looping = self.looping,
            "replay stream started"
        );
        self.worker = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        let worker = self.worker.take().ok_or(Error::NotStarted)?;
        self.stop.store(true, Ordering::Release);
        worker.thread().unpark();
        worker.join().map_err(|_| Error::WorkerPanicked)?;
        tracing::debug!(delivered = self.delivered(), "replay stream stopped");
        Ok(())
    }
}

impl Drop for ReplayStream {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.stop();
        }
    }
}

struct Worker {
    config: StreamConfig,
    frames: Arc<Vec<RecordedFrame>>,
    looping: bool,
    counters: Arc<Counters>,
    stop: Arc<AtomicBool>,
}

impl Worker {
    fn run<F>(self, mut callback: F)
    where
        F: FnMut(MemoryFrame<'_>),
    {
        if self.frames.is_empty() {
            return;
        }

        let interval = self.config.frame_rate.frame_interval();
        let mut sequence: u64 = 0;

        loop {
            for recorded in self.frames.iter() {
                if self.stopping() {
                    return;
                }

                let deadline = Instant::now() + interval;
                let released = Cell::new(false);
                let on_close = || {
                    released.set(true);
                    self.counters.released.fetch_add(1, Ordering::AcqRel);
                };

                let timestamp = Duration::from_nanos(
                    u64::try_from(interval.as_nanos())
                        .unwrap_or(u64::MAX)
                        .saturating_mul(sequence),
                );
                let mut frame = MemoryFrame::new(self.config.pixel_format, self.config.size)
                    .with_timestamp(timestamp)
                    .on_close(&on_close);
                for data in &recorded.planes {
                    let mut plane = SlicePlane::with_stride(data, self.stride(data.len()));
                    plane.advance(recorded.cursor);
                    if frame.push_plane(plane).is_err() {
                        tracing::warn!(sequence, "recorded frame has too many planes");
                        return;
                    }
                }

                self.counters.delivered.fetch_add(1, Ordering::AcqRel);
                callback(frame);
                sequence += 1;

                if !released.get() {
                    tracing::warn!(sequence, "frame was not released; replay stalled");
                    self.counters.stalled.store(true, Ordering::Release);
                    return;
                }

                self.wait_until(deadline);
            }

            if !self.looping {
                return;
            }
        }
    }

    fn stride(&self, len: usize) -> usize {
        match self.config.size.height {
            0 => len,
            h => len / h as usize,
        }
    }

    fn stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    fn wait_until(&self, deadline: Instant) {
        loop {
            if self.stopping() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

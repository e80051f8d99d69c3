use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use frame_luma::{
    CameraStream, LuminanceAnalyzer, PixelFormat, Ratio, RecordedFrame, ReplayStream, Size,
    StreamConfig, start_luma_analysis,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("frame_luma=debug")),
        )
        .init();

    let size = Size {
        width: 320,
        height: 240,
    };

    // A fade from black to white, one step per frame.
    let frames: Vec<_> = (0..=8u32)
        .map(|step| {
            let level = (step * 255 / 8) as u8;
            RecordedFrame::luma(vec![level; size.pixel_count()])
        })
        .collect();

    let config = StreamConfig {
        pixel_format: PixelFormat::Gray8,
        size,
        frame_rate: Ratio {
            numerator: 30000,
            denominator: 1000,
        },
    };
    println!(
        "Replaying {} frames at {}x{} @ {:.1} fps",
        frames.len(),
        config.size.width,
        config.size.height,
        config.frame_rate.as_f64(),
    );

    let mut stream = ReplayStream::new(config, frames).looping(true);

    let frame_count = Arc::new(AtomicU64::new(0));
    let count_clone = frame_count.clone();
    let analyzer = LuminanceAnalyzer::new(move |luma: f64| {
        let n = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        println!("Frame {n}: average luminosity {luma:.2}");
    });

    start_luma_analysis(&mut stream, analyzer, |e| eprintln!("analysis failed: {e}"))
        .expect("failed to start stream");

    let target_frames: u64 = 27;
    loop {
        std::thread::sleep(Duration::from_millis(100));
        if frame_count.load(Ordering::Relaxed) >= target_frames {
            break;
        }
    }

    stream.stop().expect("failed to stop stream");
    println!(
        "\nDone. Analyzed {} frames, released {}.",
        frame_count.load(Ordering::Relaxed),
        stream.released()
    );
}

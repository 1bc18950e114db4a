//! Three-stage sensing pipeline: acquisition, steering estimation and
//! serial transmit, each on its own worker thread.
//!
//! Data flows one way through two lossy single-slot relays:
//!
//! ```text
//! FrameSource -> producer -> Slot<LineObservation> -> estimator
//!             -> Slot<AngleSignal> -> transmit -> SerialSink
//! ```
//!
//! The producer runs at the source's frame rate; the other two stages
//! block on their relay. Backpressure drops stale values instead of
//! queuing them - steering reacts to the newest frame, never to a
//! backlog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::camera::FrameSource;
use crate::relay::Slot;
use crate::serial::{format_signal, SerialSink};
use crate::steering::{AngleEstimator, AngleSignal};
use crate::vision::{observe, LineObservation};

/// How long a blocked consumer waits before re-checking the stop flag.
const RELAY_POLL: Duration = Duration::from_millis(100);

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Pause between acquisition attempts (the camera's natural pace)
    pub frame_interval: Duration,
    /// Bias subtracted from the frame mean to form the threshold
    pub threshold_offset: i32,
    /// Minimum foreground pixels for a band centroid to count
    pub min_pixels: u32,
    /// EMA weight for angle/offset smoothing (0 < alpha <= 1)
    pub alpha: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(10),
            threshold_offset: 25,
            min_pixels: 800,
            alpha: 0.3,
        }
    }
}

/// Monotonic microsecond clock for observation timestamps.
struct Clock {
    start: Instant,
}

impl Clock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Handle to a running pipeline.
///
/// The three workers run until [`stop`](Self::stop) is called (or the
/// handle is dropped); there is no other shutdown path, the pipeline is
/// built to run for the life of the process.
pub struct PipelineHandle {
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Shared stop flag, for wiring into a ctrl-c handler.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Signal all workers to stop and wait for them to finish.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    /// Whether any worker is still running.
    pub fn is_running(&self) -> bool {
        self.workers.iter().any(|h| !h.is_finished())
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the full pipeline against the given source and sink.
///
/// The relays are created here and handed to exactly the two workers
/// that use each of them; smoothing state lives inside the estimator
/// worker and is touched by nothing else.
pub fn spawn(
    settings: PipelineSettings,
    source: Box<dyn FrameSource>,
    sink: Box<dyn SerialSink>,
) -> PipelineHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let observations: Arc<Slot<LineObservation>> = Arc::new(Slot::new());
    let signals: Arc<Slot<AngleSignal>> = Arc::new(Slot::new());

    let producer = {
        let stop = Arc::clone(&stop);
        let observations = Arc::clone(&observations);
        thread::spawn(move || run_producer(settings, source, observations, stop))
    };

    let estimator = {
        let stop = Arc::clone(&stop);
        let signals = Arc::clone(&signals);
        thread::spawn(move || run_estimator(settings.alpha, observations, signals, stop))
    };

    let transmit = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || run_transmit(signals, sink, stop))
    };

    PipelineHandle {
        stop,
        workers: vec![producer, estimator, transmit],
    }
}

/// Acquisition worker: frames in, observations out.
///
/// Every acquired frame is released back to the source before the next
/// acquisition, on every path through the loop body. A cycle with no
/// frame available is skipped and retried on the next pass - transient
/// by design for a fixed-rate sensor, not an error.
fn run_producer(
    settings: PipelineSettings,
    mut source: Box<dyn FrameSource>,
    observations: Arc<Slot<LineObservation>>,
    stop: Arc<AtomicBool>,
) {
    let clock = Clock::new();
    let mut announced = false;
    let mut fps_frames = 0u32;
    let mut fps_window = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        let Some(frame) = source.acquire() else {
            log::debug!("no frame available, skipping cycle");
            thread::sleep(settings.frame_interval);
            continue;
        };

        if !announced {
            log::info!("frame source started: {}x{}", frame.width, frame.height);
            announced = true;
        }

        let observation = observe(
            &frame,
            settings.threshold_offset,
            settings.min_pixels,
            clock.micros(),
        );
        source.release(frame);
        observations.publish(observation);

        fps_frames += 1;
        if fps_window.elapsed() >= Duration::from_secs(1) {
            log::debug!("producer fps={}", fps_frames);
            fps_frames = 0;
            fps_window = Instant::now();
        }

        thread::sleep(settings.frame_interval);
    }
}

/// Estimation worker: observations in, smoothed steering signals out.
fn run_estimator(
    alpha: f32,
    observations: Arc<Slot<LineObservation>>,
    signals: Arc<Slot<AngleSignal>>,
    stop: Arc<AtomicBool>,
) {
    let mut estimator = AngleEstimator::new(alpha);

    while !stop.load(Ordering::Relaxed) {
        let Some(observation) = observations.consume_timeout(RELAY_POLL) else {
            continue;
        };
        if let Some(signal) = estimator.process(&observation) {
            signals.publish(signal);
        }
    }
}

/// Transmit worker: signals in, wire lines out. Write failures are
/// logged and dropped; the pipeline keeps going regardless.
fn run_transmit(
    signals: Arc<Slot<AngleSignal>>,
    mut sink: Box<dyn SerialSink>,
    stop: Arc<AtomicBool>,
) {
    while !stop.load(Ordering::Relaxed) {
        let Some(signal) = signals.consume_timeout(RELAY_POLL) else {
            continue;
        };
        let line = format_signal(&signal);
        if let Err(e) = sink.write(line.as_bytes()) {
            log::warn!("serial write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{PatternSource, Resolution};
    use crate::serial::MemorySink;

    #[test]
    fn test_pipeline_spawn_and_stop() {
        let source = Box::new(PatternSource::new(Resolution::QQVGA));
        let sink = MemorySink::new();
        let mut handle = spawn(
            PipelineSettings::default(),
            source,
            Box::new(sink.clone()),
        );
        assert!(handle.is_running());
        thread::sleep(Duration::from_millis(200));
        handle.stop();
        assert!(!handle.is_running());
        // The synthetic line is always visible, so signals reached the sink
        assert!(!sink.contents().is_empty());
    }

    #[test]
    fn test_settings_defaults_match_sensor_tuning() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.threshold_offset, 25);
        assert_eq!(settings.min_pixels, 800);
        assert!((settings.alpha - 0.3).abs() < f32::EPSILON);
        assert_eq!(settings.frame_interval, Duration::from_millis(10));
    }
}

//! Background frame loop
//!
//! Drives a tick callback from a dedicated thread at a fixed target rate.
//! This thread is the animation context: whatever the callback touches is
//! mutated there, and results reach the application thread through a
//! dispatcher, never by calling back into it.
//!
//! The loop raises a `needs_redraw` flag (and invokes the optional wake
//! callback) on every frame where the tick reports activity.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Callback used to wake the application's event loop
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// A background thread calling a tick function every frame
pub struct FrameLoop {
    target_fps: u32,
    stop_flag: Arc<AtomicBool>,
    needs_redraw: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            target_fps: 120,
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            frames: Arc::new(AtomicU64::new(0)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set the frame rate used by the next `start`
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Set a callback invoked from the loop thread on active frames
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start ticking on a background thread
    ///
    /// `tick` receives the elapsed seconds since the previous frame and
    /// returns whether anything is still animating.
    pub fn start<F>(&mut self, mut tick: F)
    where
        F: FnMut(f32) -> bool + Send + 'static,
    {
        if self.thread_handle.is_some() {
            return;
        }

        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let frames = Arc::clone(&self.frames);
        let wake_callback = self.wake_callback.clone();
        let frame_duration = Duration::from_micros(1_000_000 / u64::from(self.target_fps));

        tracing::debug!(fps = self.target_fps, "starting frame loop");

        self.thread_handle = Some(thread::spawn(move || {
            let mut last_frame = Instant::now();

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();
                let dt = (start - last_frame).as_secs_f32();
                last_frame = start;

                let active = tick(dt);
                let count = frames.fetch_add(1, Ordering::Relaxed);

                if active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        if count % 120 == 0 {
                            tracing::trace!(frame = count, "frame loop: waking event loop");
                        }
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread and wait for it to exit
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                tracing::warn!("frame loop thread panicked");
            }
            tracing::debug!("frame loop stopped");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Frames ticked since creation
    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

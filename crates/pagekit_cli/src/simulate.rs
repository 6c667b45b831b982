//! Script replay
//!
//! Steps are applied one at a time. In simulated mode every step is followed
//! by one fixed-length frame, so runs are deterministic. In realtime mode
//! the pager ticks on a [`FrameLoop`] thread and the script sleeps through
//! waits, exercising the cross-thread hand-off.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use pagekit_animation::FrameLoop;
use pagekit_pager::{PageKey, PagerBuilder, PagerConfig, PagerEvent, PagerHost, PagerRef, ScrollState};

use crate::script::{Script, Step};

/// Upper bound on a `settle` step
const SETTLE_TIMEOUT_SECS: f32 = 30.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub json: bool,
    pub realtime: bool,
}

/// Pager state after the last step
#[derive(Debug, Serialize)]
pub struct Summary {
    pub page: usize,
    pub offset: f32,
    pub state: ScrollState,
    pub events: usize,
    pub elapsed_ms: f32,
}

#[derive(Serialize)]
struct Record<'a> {
    time_ms: f32,
    #[serde(flatten)]
    event: &'a PagerEvent,
}

enum Clock {
    Simulated { dt: f32, elapsed: f32 },
    Realtime { dt: f32, started: Instant, frame_loop: FrameLoop },
}

impl Clock {
    fn elapsed_ms(&self) -> f32 {
        match self {
            Clock::Simulated { elapsed, .. } => elapsed * 1000.0,
            Clock::Realtime { started, .. } => started.elapsed().as_secs_f32() * 1000.0,
        }
    }
}

struct Replay<'a> {
    pager: PagerRef,
    host: PagerHost,
    clock: Clock,
    options: Options,
    events: usize,
    out: &'a mut dyn Write,
}

/// Replay `script` and write the event stream to `out`
pub fn run(
    script: &Script,
    config: PagerConfig,
    options: Options,
    out: &mut dyn Write,
) -> Result<Summary> {
    let (pager, host) = PagerBuilder::new(config)
        .children(script.page_keys())
        .build()
        .context("Invalid pager configuration")?;

    let dt = script.frame_dt();
    let clock = if options.realtime {
        let mut frame_loop = FrameLoop::new();
        frame_loop.set_target_fps(script.fps.max(1));
        pager.start_frame_loop(&mut frame_loop);
        Clock::Realtime {
            dt,
            started: Instant::now(),
            frame_loop,
        }
    } else {
        Clock::Simulated { dt, elapsed: 0.0 }
    };

    let mut replay = Replay {
        pager,
        host,
        clock,
        options,
        events: 0,
        out,
    };

    replay.pager.on_layout(script.width, script.height);
    replay.flush()?;

    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "step");
        replay.apply(step)?;
    }

    let summary = replay.finish();
    if let Clock::Realtime { frame_loop, .. } = &mut replay.clock {
        frame_loop.stop();
    }
    replay.pager.teardown();
    Ok(summary)
}

impl Replay<'_> {
    fn apply(&mut self, step: &Step) -> Result<()> {
        if let Some(input) = step.gesture() {
            self.pager.handle_input(input);
            return self.advance(1);
        }

        match step {
            Step::SetPage { page, animated } => {
                if *animated {
                    self.pager.set_page(*page);
                } else {
                    self.pager.set_page_without_animation(*page);
                }
                self.advance(1)
            }
            Step::SetScrollEnabled { enabled } => {
                self.pager.set_scroll_enabled(*enabled);
                self.advance(1)
            }
            Step::Wait { ms } => {
                let frames = (ms.max(0.0) / 1000.0 / self.dt()).ceil() as usize;
                self.advance(frames)
            }
            Step::Settle => self.settle(),
            Step::Resize { width, height } => {
                self.pager.on_layout(*width, *height);
                self.advance(1)
            }
            Step::Children { keys } => {
                let keys = keys.iter().map(|key| PageKey::new(key.as_str())).collect();
                self.pager.set_children(keys);
                self.advance(1)
            }
            Step::TouchDown { .. } | Step::Pan { .. } | Step::Release { .. } | Step::Cancel => {
                Ok(())
            }
        }
    }

    fn dt(&self) -> f32 {
        match self.clock {
            Clock::Simulated { dt, .. } | Clock::Realtime { dt, .. } => dt,
        }
    }

    fn is_busy(&self) -> bool {
        self.pager.with_engine(|engine| engine.is_offset_animating())
            || self.pager.scroll_state() == ScrollState::Settling
    }

    fn settle(&mut self) -> Result<()> {
        let max_frames = (SETTLE_TIMEOUT_SECS / self.dt()).ceil() as usize;
        for _ in 0..max_frames {
            if !self.is_busy() {
                return Ok(());
            }
            self.advance(1)?;
        }
        warn!(
            timeout_secs = SETTLE_TIMEOUT_SECS,
            "pager still animating after settle timeout"
        );
        Ok(())
    }

    /// Let `frames` frames pass and report what happened
    fn advance(&mut self, frames: usize) -> Result<()> {
        let dt = self.dt();
        for _ in 0..frames {
            match &mut self.clock {
                Clock::Simulated { elapsed, .. } => {
                    self.pager.tick(dt);
                    *elapsed += dt;
                }
                Clock::Realtime { .. } => thread::sleep(Duration::from_secs_f32(dt)),
            }
            self.host.tick(dt);
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let time_ms = self.clock.elapsed_ms();
        for event in self.host.drain() {
            self.events += 1;
            if self.options.json {
                let record = Record {
                    time_ms,
                    event: &event,
                };
                let line = serde_json::to_string(&record).context("Failed to serialize event")?;
                writeln!(self.out, "{line}")?;
            } else {
                writeln!(self.out, "{time_ms:>9.1}ms  {}", describe(&event))?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Summary {
        Summary {
            page: self.pager.current_page(),
            offset: self.pager.raw_offset(),
            state: self.pager.scroll_state(),
            events: self.events,
            elapsed_ms: self.clock.elapsed_ms(),
        }
    }
}

/// One-line description of an event
pub fn describe(event: &PagerEvent) -> String {
    match event {
        PagerEvent::PageSelected { page } => format!("page selected     {page}"),
        PagerEvent::ScrollStateChanged { state } => format!("scroll state      {state:?}"),
        PagerEvent::PageScroll { position } => format!("page scroll       {position:.3}"),
        PagerEvent::DragStart => "drag start".to_string(),
        PagerEvent::DragEnd => "drag end".to_string(),
        PagerEvent::InitialMeasure => "initial measure".to_string(),
        PagerEvent::Overscroll { side } => format!("overscroll        {side:?}"),
        PagerEvent::ChildrenChanged { keys, current_page } => {
            let keys: Vec<&str> = keys.iter().map(PageKey::as_str).collect();
            format!("children changed  [{}] current {current_page}", keys.join(", "))
        }
    }
}

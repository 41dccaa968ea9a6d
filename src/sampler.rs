// Motion sampling: throttled raw moves -> sample windows on a fixed report cadence.
// Host-driven: the caller supplies timestamps and calls `advance` to replay due ticks.
// Quiescence is a notification, not a terminal state.

use serde::Serialize;
use tracing::{debug, trace};

use crate::throttle::InputThrottle;
use crate::types::{Point, SamplerSettings, Timestamp};

/// Hard cap on samples held for one motion episode.
pub const WINDOW_CAPACITY: usize = 100;
/// Samples kept when the cap is reached.
pub const WINDOW_RETAIN: usize = 20;

/// Ordered, bounded sequence of pointer samples for one motion episode.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: Vec<Point>,
}

impl SampleWindow {
    pub fn new() -> Self {
        SampleWindow {
            samples: Vec::with_capacity(WINDOW_CAPACITY),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.samples.push(point);
    }

    /// Keep only the most recent tail once the cap is reached.
    pub fn enforce_capacity(&mut self) {
        if self.samples.len() >= WINDOW_CAPACITY {
            let drop = self.samples.len() - WINDOW_RETAIN;
            self.samples.drain(..drop);
        }
    }

    pub fn first(&self) -> Option<&Point> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.samples.last()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Where the sampler is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SamplerPhase {
    Detached,
    /// Attached, waiting for the first move of an episode.
    Armed,
    /// Window open, report timer running.
    Sampling,
}

/// What the sampler should do with the current episode after a stop notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResponse {
    /// Keep the window and keep sampling.
    Continue,
    /// Clear the window and keep sampling.
    Restart,
    /// Clear the window and stop observing. Nothing else fires this tick.
    Detach,
}

/// Receives sampler notifications synchronously, in tick order.
pub trait MotionObserver {
    fn on_start(&mut self, _origin: Point) {}

    fn on_sample(&mut self, window: &[Point]);

    fn on_stop(&mut self, window: &[Point]) -> StopResponse;
}

/// Motion sampler: throttles raw moves, reports sample batches, detects quiescence.
pub struct MotionSampler {
    settings: SamplerSettings,
    attached: bool,
    throttle: InputThrottle,
    window: SampleWindow,
    next_report: Option<Timestamp>,
    last_observed: Option<Point>,
}

impl MotionSampler {
    pub fn new(settings: SamplerSettings) -> Self {
        MotionSampler {
            throttle: InputThrottle::new(settings.sample_interval_us),
            settings,
            attached: false,
            window: SampleWindow::new(),
            next_report: None,
            last_observed: None,
        }
    }

    /// Start observing raw moves. No-op when already attached.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        debug!("motion sampler attached");
    }

    /// Stop observing, cancel the report timer, and drop buffered input.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.throttle.clear();
        self.window.clear();
        self.next_report = None;
        self.last_observed = None;
        debug!("motion sampler detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Clear the current window. Attachment and the report timer are untouched.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn phase(&self) -> SamplerPhase {
        match (self.attached, self.next_report) {
            (false, _) => SamplerPhase::Detached,
            (true, None) => SamplerPhase::Armed,
            (true, Some(_)) => SamplerPhase::Sampling,
        }
    }

    pub fn window(&self) -> &[Point] {
        self.window.as_slice()
    }

    /// Feed one raw pointer move observed at `now`.
    pub fn pointer_moved(
        &mut self,
        point: Point,
        now: Timestamp,
        observer: &mut impl MotionObserver,
    ) {
        if !self.attached {
            return;
        }
        self.advance(now, observer);
        if !self.attached {
            return;
        }
        if let Some(point) = self.throttle.offer(point, now) {
            self.accept(point, now, observer);
        }
    }

    /// Replay throttle expiries and report ticks due at or before `now`.
    /// Missed report slots collapse into one tick at the latest slot, like a
    /// timer that never fires twice to catch up.
    /// A throttle expiry sharing an instant with a report tick goes first.
    pub fn advance(&mut self, now: Timestamp, observer: &mut impl MotionObserver) {
        while self.attached {
            self.skip_missed_reports(now);
            let trailing = self.throttle.trailing_due().filter(|due| *due <= now);
            let report = self.next_report.filter(|due| *due <= now);

            match (trailing, report) {
                (Some(t), Some(r)) if t <= r => self.release_trailing(t, observer),
                (Some(t), None) => self.release_trailing(t, observer),
                (_, Some(r)) => self.report_tick(r, observer),
                (None, None) => break,
            }
        }
    }

    fn skip_missed_reports(&mut self, now: Timestamp) {
        let Some(due) = self.next_report else {
            return;
        };
        let interval = self.settings.report_interval_us;
        let missed = now.micros_since(due) / interval;
        if missed > 0 {
            trace!(missed, "skipping missed report slots");
            self.next_report = Some(due.saturating_add_micros(missed * interval));
        }
    }

    fn release_trailing(&mut self, at: Timestamp, observer: &mut impl MotionObserver) {
        if let Some(point) = self.throttle.fire_trailing(at) {
            self.accept(point, at, observer);
        }
    }

    fn accept(&mut self, point: Point, at: Timestamp, observer: &mut impl MotionObserver) {
        self.last_observed = Some(point);
        if self.next_report.is_some() {
            return;
        }

        self.window.clear();
        self.window.push(point);
        self.next_report = Some(at.saturating_add_micros(self.settings.report_interval_us));
        debug!(x = point.x, y = point.y, "motion episode started");
        observer.on_start(point);
    }

    fn report_tick(&mut self, at: Timestamp, observer: &mut impl MotionObserver) {
        self.next_report = Some(at.saturating_add_micros(self.settings.report_interval_us));
        self.window.enforce_capacity();

        let Some(observed) = self.last_observed else {
            return;
        };

        let stationary = self
            .window
            .last()
            .is_some_and(|latest| self.same_position(latest, &observed));

        if stationary {
            debug!(samples = self.window.len(), "pointer stopped");
            match observer.on_stop(self.window.as_slice()) {
                StopResponse::Continue => {}
                StopResponse::Restart => self.window.clear(),
                StopResponse::Detach => {
                    self.detach();
                    return;
                }
            }
        }

        self.window.push(observed);
        trace!(samples = self.window.len(), at_us = at.as_micros(), "sample batch ready");
        observer.on_sample(self.window.as_slice());
    }

    fn same_position(&self, a: &Point, b: &Point) -> bool {
        if self.settings.stop_tolerance == 0.0 {
            a.x == b.x && a.y == b.y
        } else {
            a.distance(b) <= self.settings.stop_tolerance
        }
    }
}

// Intent tracker: owns one registry, one sampler, and one affordance controller.
// Sampler notifications flow into the predictor and controller inside the same tick.

use serde::Serialize;
use tracing::{debug, trace};

use crate::affordance::{Affordance, AffordanceController, AffordanceState};
use crate::predictor::predict;
use crate::registry::{Target, TargetRegistry};
use crate::sampler::{MotionObserver, MotionSampler, SamplerPhase, StopResponse};
use crate::types::{EngineConfig, Highlight, Point, PredictorSettings, Timestamp};

/// Pointer-intent tracker for one set of targets and one affordance.
pub struct IntentTracker<T, A> {
    registry: TargetRegistry<T>,
    sampler: MotionSampler,
    predictor: PredictorSettings,
    controller: AffordanceController<T, A>,
}

/// Point-in-time view of the tracker for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerStatus {
    pub phase: SamplerPhase,
    pub samples: usize,
    pub tracked_targets: usize,
    /// Where the affordance is shown, if an offer is pending.
    pub affordance_at: Option<Point>,
    pub affordance_hovered: bool,
}

/// Routes sampler notifications for the duration of one call.
struct Reactor<'a, T, A> {
    registry: &'a TargetRegistry<T>,
    predictor: &'a PredictorSettings,
    controller: &'a mut AffordanceController<T, A>,
}

impl<T: Target + Clone + PartialEq, A: Affordance> MotionObserver for Reactor<'_, T, A> {
    fn on_start(&mut self, origin: Point) {
        trace!(x = origin.x, y = origin.y, "tracking motion");
    }

    fn on_sample(&mut self, window: &[Point]) {
        let candidates = predict(window, self.registry.positions(), self.predictor);
        for target in self.registry.targets() {
            target.set_highlight(Highlight::OnTarget, false);
        }
        if let Some(best) = candidates.first() {
            best.target.set_highlight(Highlight::OnTarget, true);
        }
    }

    fn on_stop(&mut self, window: &[Point]) -> StopResponse {
        let candidates = predict(window, self.registry.positions(), self.predictor);
        match candidates.first() {
            Some(best) => {
                self.controller.present(best);
                StopResponse::Detach
            }
            None => {
                trace!("pointer stopped with no candidate");
                StopResponse::Restart
            }
        }
    }
}

impl<T: Target + Clone + PartialEq, A: Affordance> IntentTracker<T, A> {
    /// Build a tracker. Validate `config` first when it comes from outside.
    pub fn new(config: EngineConfig, affordance: A) -> Self {
        IntentTracker {
            registry: TargetRegistry::new(),
            sampler: MotionSampler::new(config.sampler),
            predictor: config.predictor,
            controller: AffordanceController::new(config.affordance, affordance),
        }
    }

    /// Track a target. The first target arms the sampler.
    pub fn add_target(&mut self, target: T) {
        if self.registry.add(target) && !self.controller.is_pending() {
            self.sampler.attach();
        }
    }

    /// Stop tracking a target. No-op when it is not tracked.
    pub fn remove_target(&mut self, target: &T) {
        let Some(removed) = self.registry.remove(target) else {
            return;
        };
        removed.set_highlight(Highlight::OnTarget, false);

        let was_offered = matches!(
            self.controller.state(),
            AffordanceState::Pending { target: offered, .. } if *offered == removed
        );
        if was_offered {
            self.controller.cancel();
            self.rearm();
        }

        if self.registry.is_empty() {
            self.sampler.detach();
        }
    }

    /// Re-read target positions after a layout change.
    pub fn refresh_positions(&mut self) {
        self.registry.refresh_positions();
    }

    /// Feed a raw pointer move.
    pub fn pointer_moved(&mut self, point: Point, now: Timestamp) {
        let (sampler, mut reactor) = self.split();
        sampler.pointer_moved(point, now, &mut reactor);
    }

    /// Let host time pass; replays due report ticks.
    pub fn advance(&mut self, now: Timestamp) {
        let (sampler, mut reactor) = self.split();
        sampler.advance(now, &mut reactor);
    }

    pub fn affordance_hovered(&mut self, on: bool) {
        self.controller.hover(on);
    }

    /// Activate the offered target and start a fresh motion episode.
    pub fn affordance_activated(&mut self) -> Option<T> {
        let target = self.controller.activate()?;
        self.rearm();
        Some(target)
    }

    /// Withdraw the offer without activating and start a fresh motion episode.
    pub fn dismiss(&mut self) -> Option<T> {
        let target = self.controller.cancel()?;
        self.rearm();
        Some(target)
    }

    pub fn affordance_state(&self) -> &AffordanceState<T> {
        self.controller.state()
    }

    pub fn affordance(&self) -> &A {
        self.controller.affordance()
    }

    pub fn status(&self) -> TrackerStatus {
        let (affordance_at, affordance_hovered) = match self.controller.state() {
            AffordanceState::Idle => (None, false),
            AffordanceState::Pending {
                position, hovered, ..
            } => (Some(*position), *hovered),
        };
        TrackerStatus {
            phase: self.sampler.phase(),
            samples: self.sampler.window().len(),
            tracked_targets: self.registry.len(),
            affordance_at,
            affordance_hovered,
        }
    }

    pub fn sampler(&self) -> &MotionSampler {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut MotionSampler {
        &mut self.sampler
    }

    pub fn registry(&self) -> &TargetRegistry<T> {
        &self.registry
    }

    fn rearm(&mut self) {
        self.sampler.reset();
        if !self.registry.is_empty() {
            self.sampler.attach();
            debug!("tracking re-armed");
        }
    }

    fn split(&mut self) -> (&mut MotionSampler, Reactor<'_, T, A>) {
        (
            &mut self.sampler,
            Reactor {
                registry: &self.registry,
                predictor: &self.predictor,
                controller: &mut self.controller,
            },
        )
    }
}

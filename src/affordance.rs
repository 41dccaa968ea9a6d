// Confirmation affordance: placed between the pointer and the predicted target.
// Idle -> Pending on quiescence with a candidate; Pending -> Idle on activation or cancel.

use tracing::debug;

use crate::predictor::{Candidate, TriangleMetrics};
use crate::registry::Target;
use crate::types::{AffordanceSettings, Highlight, Point};

/// The externally rendered confirmation element.
pub trait Affordance {
    fn show_at(&mut self, position: Point);

    fn hide(&mut self);
}

/// Where the affordance goes: `pop_distance` from the pointer along the line to the target.
pub fn placement(metrics: &TriangleMetrics, pop_distance: f64) -> Point {
    let ratio = pop_distance / metrics.a;
    Point::new(
        metrics.last.x + (metrics.target.x - metrics.last.x) * ratio,
        metrics.last.y + (metrics.target.y - metrics.last.y) * ratio,
    )
}

/// Interaction state of the affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum AffordanceState<T> {
    Idle,
    Pending {
        target: T,
        position: Point,
        hovered: bool,
    },
}

/// Drives the affordance for one predicted target at a time.
pub struct AffordanceController<T, A> {
    settings: AffordanceSettings,
    affordance: A,
    state: AffordanceState<T>,
}

impl<T: Target + Clone, A: Affordance> AffordanceController<T, A> {
    pub fn new(settings: AffordanceSettings, affordance: A) -> Self {
        AffordanceController {
            settings,
            affordance,
            state: AffordanceState::Idle,
        }
    }

    pub fn state(&self) -> &AffordanceState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AffordanceState::Pending { .. })
    }

    pub fn affordance(&self) -> &A {
        &self.affordance
    }

    /// Offer the affordance for `candidate`. Any previous offer is cancelled first.
    pub fn present(&mut self, candidate: &Candidate<'_, T>) -> Point {
        self.cancel();

        let position = placement(&candidate.metrics, self.settings.pop_distance);
        self.affordance.show_at(position);
        candidate.target.set_highlight(Highlight::Bubbled, true);
        debug!(
            x = position.x,
            y = position.y,
            alpha = candidate.metrics.alpha,
            "affordance presented"
        );

        self.state = AffordanceState::Pending {
            target: candidate.target.clone(),
            position,
            hovered: false,
        };
        position
    }

    /// Pointer entered or left the affordance. Ignored unless pending.
    pub fn hover(&mut self, on: bool) {
        if let AffordanceState::Pending {
            target, hovered, ..
        } = &mut self.state
        {
            if *hovered != on {
                *hovered = on;
                target.set_highlight(Highlight::BubbledHover, on);
            }
        }
    }

    /// Invoke the pending target and return to idle. Returns the activated target.
    pub fn activate(&mut self) -> Option<T> {
        let target = self.dismiss()?;
        target.activate();
        debug!("affordance activated");
        Some(target)
    }

    /// Withdraw the affordance without invoking the target.
    pub fn cancel(&mut self) -> Option<T> {
        let target = self.dismiss()?;
        debug!("affordance cancelled");
        Some(target)
    }

    fn dismiss(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, AffordanceState::Idle) {
            AffordanceState::Idle => None,
            AffordanceState::Pending { target, .. } => {
                for highlight in Highlight::ALL {
                    target.set_highlight(highlight, false);
                }
                self.affordance.hide();
                Some(target)
            }
        }
    }
}

// Target registry: tracked targets plus a cached position snapshot.
// Positions are recomputed wholesale on every membership change; stale layouts corrupt geometry.

use tracing::debug;

use crate::types::{Highlight, Point};

/// Capabilities the UI glue provides for each tracked element.
pub trait Target {
    /// Current screen position.
    fn position(&self) -> Point;

    fn set_highlight(&self, highlight: Highlight, on: bool);

    /// Run the element's normal action.
    fn activate(&self);
}

/// Cached position of one target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPosition<T> {
    pub target: T,
    pub position: Point,
}

/// Set of targets eligible for prediction.
#[derive(Debug)]
pub struct TargetRegistry<T> {
    targets: Vec<T>,
    positions: Vec<TargetPosition<T>>,
}

impl<T> Default for TargetRegistry<T> {
    fn default() -> Self {
        TargetRegistry {
            targets: Vec::new(),
            positions: Vec::new(),
        }
    }
}

impl<T: Target + Clone + PartialEq> TargetRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a target. Returns `true` when the registry was empty before.
    pub fn add(&mut self, target: T) -> bool {
        let was_empty = self.targets.is_empty();
        self.targets.push(target);
        self.refresh_positions();
        debug!(tracked = self.targets.len(), "target added");
        was_empty
    }

    /// Stop tracking the first entry equal to `target`. No-op when absent.
    pub fn remove(&mut self, target: &T) -> Option<T> {
        let index = self.targets.iter().position(|t| t == target)?;
        let removed = self.targets.remove(index);
        self.refresh_positions();
        debug!(tracked = self.targets.len(), "target removed");
        Some(removed)
    }

    /// Re-read every target's position.
    pub fn refresh_positions(&mut self) {
        self.positions = self
            .targets
            .iter()
            .map(|target| TargetPosition {
                target: target.clone(),
                position: target.position(),
            })
            .collect();
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    pub fn positions(&self) -> &[TargetPosition<T>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

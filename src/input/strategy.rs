//! Curve strategy selection.

use serde::{Deserialize, Serialize};

/// Curve-drawing strategy understood by the surface tool.
///
/// The tool decides how controller motion is turned into a bezier curve;
/// the dispatcher only picks which strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStrategy {
    Simple,
    VectorAngle,
    RotationAngle,
    Distance,
}

/// Cycle order used by the next/previous strategy buttons.
pub const STRATEGY_ORDER: [CurveStrategy; 4] = [
    CurveStrategy::Simple,
    CurveStrategy::VectorAngle,
    CurveStrategy::RotationAngle,
    CurveStrategy::Distance,
];

/// Wrapping cursor over [`STRATEGY_ORDER`].
///
/// The counter is kept in `1..=len` and always reduced modulo `len` before
/// indexing, so the counter `len` selects the first entry. Stepping back from
/// `1` selects index 0 and then parks the counter on `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyCycle {
    counter: usize,
}

impl Default for StrategyCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyCycle {
    pub fn new() -> Self {
        Self {
            counter: STRATEGY_ORDER.len(),
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn index(&self) -> usize {
        self.counter % STRATEGY_ORDER.len()
    }

    pub fn current(&self) -> CurveStrategy {
        STRATEGY_ORDER[self.index()]
    }

    /// Advances and returns the newly selected strategy.
    pub fn next(&mut self) -> CurveStrategy {
        self.counter = self.counter % STRATEGY_ORDER.len() + 1;
        self.current()
    }

    /// Steps back and returns the newly selected strategy.
    pub fn previous(&mut self) -> CurveStrategy {
        self.counter -= 1;
        let selected = self.current();
        if self.counter == 0 {
            self.counter = STRATEGY_ORDER.len();
        }
        selected
    }
}

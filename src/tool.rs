//! Collaborator interfaces the dispatcher drives.
//!
//! The surface tool, the sketch world and the host runtime live outside this
//! crate. Host integrations implement these traits; [`crate::headless`]
//! provides recording implementations for replay and tests.

use crate::input::{CurveStrategy, Hand, SurfaceId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Lifecycle state reported by the surface tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolState {
    /// Tool is idle; the pointer is in control
    NotStarted,
    /// Tool is running, no stroke in progress
    Ready,
    /// Tool is running and a surface stroke is being drawn
    Drawing,
}

impl ToolState {
    pub fn is_started(self) -> bool {
        self != ToolState::NotStarted
    }
}

/// Notification emitted by the surface tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ToolEvent {
    StateChanged(ToolState),
    StrategyChanged(CurveStrategy),
}

/// Host handle naming the transform a controller is tracked by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ControllerOrigin(pub String);

impl fmt::Display for ControllerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bezier surface authoring tool.
pub trait SurfaceTool {
    fn current_state(&self) -> ToolState;

    /// Starts the tool, tracking the two controller origins.
    fn start_tool(&mut self, left: &ControllerOrigin, right: &ControllerOrigin);

    fn exit_tool(&mut self);

    fn start_draw_surface(&mut self);

    fn stop_draw_surface(&mut self);

    fn set_drawing_curve_strategy(&mut self, strategy: CurveStrategy);

    /// Adjusts the curve intensity of the given controller by `delta`.
    fn change_curve_intensity(&mut self, hand: Hand, delta: f32);

    /// Returns notifications emitted since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<ToolEvent>;
}

/// Scene container holding drawn surfaces and their persistence.
pub trait SketchWorld {
    fn save(&mut self, path: &Path) -> anyhow::Result<()>;

    fn load(&mut self, path: &Path) -> anyhow::Result<()>;

    fn highlight_surface(&mut self, id: SurfaceId);

    fn revert_highlight(&mut self, id: SurfaceId);

    fn delete_surface(&mut self, id: SurfaceId);
}

/// Host runtime affordances toggled together with the tool.
pub trait HostControls {
    /// Enables delivery of the tool action set.
    fn activate_tool_actions(&mut self);

    fn deactivate_tool_actions(&mut self);

    /// Shows or hides the laser pointer and pauses its updates.
    fn set_pointer_enabled(&mut self, enabled: bool);
}

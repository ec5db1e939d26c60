//! Generic controller event types for cross-host compatibility.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical controller role.
///
/// Host integrations map their native input sources to one of these two
/// roles through [`crate::config::HandsConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Returns the opposite hand.
    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the raw input source an event originated from.
///
/// This is whatever name the host uses for a tracked device, e.g.
/// `"left_hand"` or `"/user/hand/right"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All controller actions the dispatcher listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start or exit the surface tool
    ToggleTool,
    /// Two-handed draw button
    Draw,
    /// Select the next curve strategy
    NextStrategy,
    /// Select the previous curve strategy
    PreviousStrategy,
    /// Save the sketch world
    SaveWorld,
    /// Load the sketch world
    LoadWorld,
    /// Stick axis controlling curve intensity
    CurveIntensity,
}

impl Action {
    /// Whether this action belongs to the tool action set.
    ///
    /// Tool-set actions are only delivered while the set is active, i.e.
    /// while the surface tool is running.
    pub fn in_tool_set(self) -> bool {
        matches!(
            self,
            Action::Draw | Action::NextStrategy | Action::PreviousStrategy | Action::CurveIntensity
        )
    }
}

/// Button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonEdge {
    /// Button pressed
    Down,
    /// Button released
    Up,
}

/// Stable identifier of a drawn surface in the sketch world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Object under the laser pointer.
///
/// Surfaces are recognised by type, not by object name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// A bezier surface created by the tool
    Surface(SurfaceId),
    /// Anything else in the scene
    Other(String),
}

impl PointerTarget {
    pub fn surface(&self) -> Option<SurfaceId> {
        match self {
            PointerTarget::Surface(id) => Some(*id),
            PointerTarget::Other(_) => None,
        }
    }
}

/// Laser pointer notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Pointer started hovering the target
    Enter,
    /// Pointer stopped hovering the target
    Exit,
    /// Pointer clicked the target
    Click,
}

/// A single raw input event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Boolean action changed state
    Button {
        action: Action,
        source: SourceId,
        edge: ButtonEdge,
    },
    /// Two-axis stick deflection for the curve intensity action
    Axis {
        source: SourceId,
        #[serde(default)]
        x: f32,
        y: f32,
    },
    /// Laser pointer hover or click
    Pointer {
        phase: PointerPhase,
        target: PointerTarget,
    },
}

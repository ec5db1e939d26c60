//! Configuration type definitions.

use crate::tool::ControllerOrigin;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Controller identity settings.
///
/// Maps the host's raw input source names to the left/right roles and names
/// the transforms the surface tool tracks once started.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HandsConfig {
    /// Input source name of the left controller
    #[serde(default = "default_left_source")]
    pub left_source: String,

    /// Input source name of the right controller
    #[serde(default = "default_right_source")]
    pub right_source: String,

    /// Transform handed to the tool as the left controller origin
    #[serde(default = "default_left_origin")]
    pub left_origin: ControllerOrigin,

    /// Transform handed to the tool as the right controller origin
    #[serde(default = "default_right_origin")]
    pub right_origin: ControllerOrigin,
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            left_source: default_left_source(),
            right_source: default_right_source(),
            left_origin: default_left_origin(),
            right_origin: default_right_origin(),
        }
    }
}

/// Curve intensity stick settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IntensityConfig {
    /// Vertical deflection beyond which the stick changes intensity (valid range: 0.1 - 1.0)
    #[serde(default = "default_intensity_threshold")]
    pub threshold: f32,

    /// Intensity change applied per stick event (valid range: 0.001 - 1.0)
    #[serde(default = "default_intensity_step")]
    pub step: f32,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            threshold: default_intensity_threshold(),
            step: default_intensity_step(),
        }
    }
}

/// Sketch world save/load location.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PersistenceConfig {
    /// Directory holding the world file. `~/` is expanded. When unset, the
    /// platform data directory (`~/.local/share/sketch-dispatch/serialization`
    /// on Linux) is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// World file name inside the directory
    #[serde(default = "default_world_file")]
    pub file_name: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_world_file(),
        }
    }
}

fn default_left_source() -> String {
    "left_hand".to_string()
}

fn default_right_source() -> String {
    "right_hand".to_string()
}

fn default_left_origin() -> ControllerOrigin {
    ControllerOrigin("left_controller_origin".to_string())
}

fn default_right_origin() -> ControllerOrigin {
    ControllerOrigin("right_controller_origin".to_string())
}

fn default_intensity_threshold() -> f32 {
    0.9
}

fn default_intensity_step() -> f32 {
    0.05
}

pub(super) fn default_world_file() -> String {
    "BezierSurfaceTool.xml".to_string()
}

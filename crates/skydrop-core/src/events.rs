//! Commands emitted for the external scene collaborator.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityClass, EnvironmentId};

/// One side effect requested from the scene collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneCommand {
    SetVisibility { entity: EntityClass, visible: bool },
    /// Swap the active environment and its lighting.
    SetEnvironment { environment: EnvironmentId },
    /// Fire-and-forget asset warm-up; completion is never reported back.
    Preload { environment: EnvironmentId },
}

impl SceneCommand {
    pub fn show(entity: EntityClass) -> Self {
        SceneCommand::SetVisibility {
            entity,
            visible: true,
        }
    }

    pub fn hide(entity: EntityClass) -> Self {
        SceneCommand::SetVisibility {
            entity,
            visible: false,
        }
    }
}

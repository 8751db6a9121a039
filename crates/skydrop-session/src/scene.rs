//! Scene collaborator contract.

use std::collections::HashMap;

use skydrop_core::enums::{EntityClass, EnvironmentId};
use skydrop_core::events::SceneCommand;

/// The renderer side of the engine. Owns all actual scene state.
pub trait SceneCollaborator {
    fn set_visibility(&mut self, entity: EntityClass, visible: bool);
    fn set_environment(&mut self, environment: EnvironmentId);
    /// Fire-and-forget warm-up. Must not block the frame.
    fn preload(&mut self, environment: EnvironmentId);
}

/// Forward commands to the collaborator in order.
pub fn apply_scene_commands(commands: &[SceneCommand], scene: &mut dyn SceneCollaborator) {
    for command in commands {
        match *command {
            SceneCommand::SetVisibility { entity, visible } => {
                scene.set_visibility(entity, visible);
            }
            SceneCommand::SetEnvironment { environment } => scene.set_environment(environment),
            SceneCommand::Preload { environment } => scene.preload(environment),
        }
    }
}

/// In-memory collaborator that keeps the resulting scene state and a call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub visibility: HashMap<EntityClass, bool>,
    pub environment: EnvironmentId,
    pub preloads: Vec<EnvironmentId>,
    pub log: Vec<SceneCommand>,
}

impl RecordingScene {
    pub fn is_visible(&self, entity: EntityClass) -> bool {
        self.visibility.get(&entity).copied().unwrap_or(false)
    }

    /// How many times `entity` was set to `visible`.
    pub fn count(&self, entity: EntityClass, visible: bool) -> usize {
        let wanted = SceneCommand::SetVisibility { entity, visible };
        self.log.iter().filter(|c| **c == wanted).count()
    }
}

impl SceneCollaborator for RecordingScene {
    fn set_visibility(&mut self, entity: EntityClass, visible: bool) {
        self.visibility.insert(entity, visible);
        self.log.push(SceneCommand::SetVisibility { entity, visible });
    }

    fn set_environment(&mut self, environment: EnvironmentId) {
        self.environment = environment;
        self.log.push(SceneCommand::SetEnvironment { environment });
    }

    fn preload(&mut self, environment: EnvironmentId) {
        self.preloads.push(environment);
        self.log.push(SceneCommand::Preload { environment });
    }
}

//! Portal transition finite state machine.
//!
//! Pure functions that compute the next transition state and the scene
//! commands it requires from the previous state and this frame's inputs.
//! No scene or clock dependency, so every path is unit-testable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use skydrop_core::config::TransitionConfig;
use skydrop_core::enums::{EntityClass, EnvironmentId, TransitionState};
use skydrop_core::events::SceneCommand;
use skydrop_core::types::LocalPosition;

/// Per-session transition state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalState {
    pub state: TransitionState,
    /// Alternate assets already requested this episode.
    pub preload_requested: bool,
    /// Subject was still inside the trigger radius when the last swap ended.
    /// Triggering stays disabled until it leaves.
    pub awaiting_exit: bool,
}

/// Inputs to the FSM for one frame.
pub struct PortalContext<'a> {
    pub portal: PortalState,
    pub config: &'a TransitionConfig,
    /// Portal location in the local frame, `None` until an origin exists.
    pub portal_position: Option<LocalPosition>,
    /// Subject (viewer head) in the local frame, `None` until a fix arrives.
    pub subject_position: Option<LocalPosition>,
    pub now_millis: u64,
}

/// Output from the FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalUpdate {
    pub portal: PortalState,
    pub commands: Vec<SceneCommand>,
    pub state_changed: bool,
}

impl PortalContext<'_> {
    /// Subject-to-portal distance, when both are known.
    pub fn distance(&self) -> Option<f64> {
        match (self.subject_position, self.portal_position) {
            (Some(subject), Some(portal)) => Some(subject.distance_to(&portal)),
            _ => None,
        }
    }
}

impl PortalUpdate {
    fn unchanged(portal: PortalState) -> Self {
        Self {
            portal,
            commands: Vec::new(),
            state_changed: false,
        }
    }

    fn transition(portal: PortalState, commands: Vec<SceneCommand>) -> Self {
        Self {
            portal,
            commands,
            state_changed: true,
        }
    }
}

/// Evaluate the FSM for one frame. At most one state transition per call.
pub fn evaluate(ctx: &PortalContext) -> PortalUpdate {
    if ctx.config.portal_location.is_none() {
        return match ctx.portal.state {
            TransitionState::Dormant => PortalUpdate::unchanged(ctx.portal),
            _ => disarm(ctx),
        };
    }

    match ctx.portal.state {
        TransitionState::Dormant => PortalUpdate::transition(
            PortalState {
                state: TransitionState::Armed,
                preload_requested: false,
                awaiting_exit: false,
            },
            vec![SceneCommand::show(EntityClass::Portal)],
        ),
        TransitionState::Armed => evaluate_armed(ctx),
        TransitionState::Preloaded => evaluate_preloaded(ctx),
        TransitionState::Triggered { entered_at_millis } => {
            evaluate_triggered(ctx, entered_at_millis)
        }
        TransitionState::Returning => evaluate_returning(ctx),
    }
}

/// Portal configuration went away: hide everything and restore the primary
/// scene if the swap was on screen.
fn disarm(ctx: &PortalContext) -> PortalUpdate {
    let mut commands = vec![
        SceneCommand::hide(EntityClass::Portal),
        SceneCommand::hide(EntityClass::AlternateEnvironment),
    ];
    if matches!(ctx.portal.state, TransitionState::Triggered { .. }) {
        commands.push(SceneCommand::show(EntityClass::PrimaryScene));
        commands.push(SceneCommand::SetEnvironment {
            environment: EnvironmentId::Primary,
        });
    }
    PortalUpdate::transition(PortalState::default(), commands)
}

fn evaluate_armed(ctx: &PortalContext) -> PortalUpdate {
    let mut portal = ctx.portal;
    let Some(distance) = ctx.distance() else {
        return PortalUpdate::unchanged(portal);
    };

    if portal.awaiting_exit && distance > ctx.config.trigger_radius_m {
        portal.awaiting_exit = false;
    }

    if distance > ctx.config.preload_radius_m {
        return PortalUpdate::unchanged(portal);
    }

    let mut commands = Vec::new();
    if !portal.preload_requested {
        debug!(distance, "requesting alternate environment preload");
        commands.push(SceneCommand::Preload {
            environment: EnvironmentId::Alternate,
        });
        portal.preload_requested = true;
    }
    portal.state = TransitionState::Preloaded;
    PortalUpdate::transition(portal, commands)
}

fn evaluate_preloaded(ctx: &PortalContext) -> PortalUpdate {
    let mut portal = ctx.portal;
    let Some(distance) = ctx.distance() else {
        return PortalUpdate::unchanged(portal);
    };

    if distance > ctx.config.trigger_radius_m {
        portal.awaiting_exit = false;
        return PortalUpdate::unchanged(portal);
    }
    if portal.awaiting_exit {
        return PortalUpdate::unchanged(portal);
    }

    portal.state = TransitionState::Triggered {
        entered_at_millis: ctx.now_millis,
    };
    PortalUpdate::transition(
        portal,
        vec![
            SceneCommand::hide(EntityClass::PrimaryScene),
            SceneCommand::show(EntityClass::AlternateEnvironment),
            SceneCommand::SetEnvironment {
                environment: EnvironmentId::Alternate,
            },
        ],
    )
}

/// Distance is ignored while triggered: re-entering the radius mid-hold is a no-op.
fn evaluate_triggered(ctx: &PortalContext, entered_at_millis: u64) -> PortalUpdate {
    let held = ctx.now_millis.saturating_sub(entered_at_millis);
    if held < ctx.config.hold_duration_millis {
        return PortalUpdate::unchanged(ctx.portal);
    }

    let mut portal = ctx.portal;
    portal.state = TransitionState::Returning;
    PortalUpdate::transition(
        portal,
        vec![
            SceneCommand::hide(EntityClass::AlternateEnvironment),
            SceneCommand::show(EntityClass::PrimaryScene),
            SceneCommand::SetEnvironment {
                environment: EnvironmentId::Primary,
            },
        ],
    )
}

/// Re-arm. The preload flag survives only while the subject is still inside
/// the preload radius, so assets are not requested twice for one approach.
fn evaluate_returning(ctx: &PortalContext) -> PortalUpdate {
    let distance = ctx.distance();
    let inside_preload = distance.is_some_and(|d| d <= ctx.config.preload_radius_m);
    let inside_trigger = distance.is_some_and(|d| d <= ctx.config.trigger_radius_m);

    PortalUpdate::transition(
        PortalState {
            state: TransitionState::Armed,
            preload_requested: ctx.portal.preload_requested && inside_preload,
            awaiting_exit: inside_trigger,
        },
        Vec::new(),
    )
}

//! Session engine: the per-frame core of the overlay.
//!
//! `SessionEngine` owns the transform, point-of-interest selection, motion
//! estimator and portal state. The host calls `tick` from its frame loop;
//! fixes arrive independently through a shared `FixSlot`.

use std::collections::VecDeque;

use tracing::{debug, info};

use skydrop_core::config::{Adjustments, SessionConfig};
use skydrop_core::constants::NUDGE_DISTANCE_M;
use skydrop_core::enums::TransitionState;
use skydrop_core::error::ConfigError;
use skydrop_core::types::{GeodeticPosition, LocalPosition, MotionEstimate};
use skydrop_geo::transform::adjusted_destination;
use skydrop_geo::{GeoToLocal, PoiRegistry, PoiSelection};
use skydrop_portal::{evaluate, PortalContext, PortalState};

use crate::commands::{Cardinal, SessionCommand};
use crate::fix_slot::{FixSlot, ReceivedFix};
use crate::freshness::{present_readout, FreshnessEvaluator};
use crate::motion::{MotionEstimator, SmoothedVelocityEstimator};
use crate::scene::{apply_scene_commands, SceneCollaborator};
use crate::snapshot::FrameSnapshot;

pub struct SessionEngine {
    config: SessionConfig,
    registry: PoiRegistry,
    selection: PoiSelection,
    transform: GeoToLocal,
    freshness: FreshnessEvaluator,
    estimator: Box<dyn MotionEstimator>,
    fixes: FixSlot,
    last_fix: Option<ReceivedFix>,
    last_sequence: u64,
    portal: PortalState,
    command_queue: VecDeque<SessionCommand>,
}

impl SessionEngine {
    /// Validate the config and build a session reading fixes from `fixes`.
    pub fn new(config: SessionConfig, fixes: FixSlot) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = PoiRegistry::from_config(&config)?;
        let selection = PoiSelection::new(config.initial_selection.clone(), &registry);
        Ok(Self {
            transform: GeoToLocal::new(config.adjustments),
            freshness: FreshnessEvaluator::new(config.freshness),
            estimator: Box::new(SmoothedVelocityEstimator::default()),
            registry,
            selection,
            fixes,
            last_fix: None,
            last_sequence: 0,
            portal: PortalState::default(),
            command_queue: VecDeque::new(),
            config,
        })
    }

    /// Swap in a different motion estimator.
    pub fn with_estimator(mut self, estimator: Box<dyn MotionEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one frame and return the resulting snapshot.
    pub fn tick(&mut self, now_millis: u64) -> FrameSnapshot {
        self.process_commands();
        self.ingest_latest_fix();

        let motion = self.estimator.estimate();
        let subject = self.last_fix.and_then(|received| {
            self.transform
                .to_local(
                    &received.fix.position,
                    now_millis,
                    motion.as_ref(),
                    self.config.extrapolate,
                )
                .ok()
        });

        let active = self.selection.resolve(&self.registry);
        let destination = active.and_then(|poi| {
            let target = adjusted_destination(&poi.reference_point, &self.transform.adjustments());
            self.transform.to_local(&target, now_millis, None, false).ok()
        });

        let portal_position = self
            .config
            .transition
            .portal_location
            .and_then(|p| self.transform.to_local(&p, now_millis, None, false).ok());

        let update = evaluate(&PortalContext {
            portal: self.portal,
            config: &self.config.transition,
            portal_position,
            subject_position: subject,
            now_millis,
        });
        if update.state_changed {
            info!(
                from = self.portal.state.label(),
                to = update.portal.state.label(),
                "portal transition"
            );
        }
        self.portal = update.portal;

        let millis_since_fix = self
            .last_fix
            .map(|received| now_millis.saturating_sub(received.received_at_millis));
        let level = self.freshness.classify_age(millis_since_fix);

        let speed = self.last_fix.map(|received| received.fix.ground_speed);
        let altitude = self.last_fix.map(|received| {
            let ground = active.map_or(0.0, |poi| poi.reference_point.altitude_m);
            received.fix.position.altitude_m - ground
        });

        FrameSnapshot {
            now_millis,
            origin: self.transform.origin(),
            subject,
            destination,
            portal: portal_position,
            active_poi: active.map(|poi| poi.name.clone()),
            selection: self.selection.mode().clone(),
            transition: self.portal.state,
            millis_since_fix,
            freshness: level,
            freshness_color: self.freshness.color(millis_since_fix),
            speed: present_readout(speed, level, self.config.hud.speed_policy),
            altitude: present_readout(altitude, level, self.config.hud.altitude_policy),
            scene_commands: update.commands,
        }
    }

    /// Tick and forward this frame's scene commands to `scene`.
    pub fn tick_with_scene(
        &mut self,
        now_millis: u64,
        scene: &mut dyn SceneCollaborator,
    ) -> FrameSnapshot {
        let snapshot = self.tick(now_millis);
        apply_scene_commands(&snapshot.scene_commands, scene);
        snapshot
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &PoiRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &PoiSelection {
        &self.selection
    }

    pub fn transform(&self) -> &GeoToLocal {
        &self.transform
    }

    pub fn freshness(&self) -> &FreshnessEvaluator {
        &self.freshness
    }

    /// Read-only transition state for HUD display.
    pub fn transition_state(&self) -> TransitionState {
        self.portal.state
    }

    pub fn motion_estimate(&self) -> Option<MotionEstimate> {
        self.estimator.estimate()
    }

    pub fn last_fix(&self) -> Option<ReceivedFix> {
        self.last_fix
    }

    /// Project an arbitrary geodetic point with the session's origin and adjustments.
    pub fn to_local(&self, target: &GeodeticPosition, now_millis: u64) -> Option<LocalPosition> {
        self.transform.to_local(target, now_millis, None, false).ok()
    }

    /// Pull the slot and feed a new valid fix to every consumer exactly once.
    fn ingest_latest_fix(&mut self) {
        let Some(received) = self.fixes.latest() else {
            return;
        };
        if received.sequence == self.last_sequence {
            return;
        }
        self.last_sequence = received.sequence;

        let fix = received.fix;
        if !fix.valid {
            debug!(t = fix.timestamp_millis, "ignoring invalid fix");
            return;
        }
        self.transform.capture_origin_if_absent(&fix);
        self.estimator.update(&fix);
        self.selection
            .on_fix(&self.registry, &fix, self.config.auto_detect_radius_m);
        self.last_fix = Some(received);
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::CyclePointOfInterest => {
                self.selection.cycle(&self.registry);
                info!(selection = ?self.selection.mode(), "point of interest cycled");
            }
            SessionCommand::SelectPointOfInterest { name } => {
                self.selection.select(&name, &self.registry);
            }
            SessionCommand::ClearManualSelection => self.selection.clear_manual(),
            SessionCommand::SetAdjustments { adjustments } => {
                self.set_adjustments(adjustments);
            }
            SessionCommand::NudgeYaw { radians } => {
                let mut adj = self.transform.adjustments();
                adj.yaw_radians += radians;
                self.set_adjustments(adj);
            }
            SessionCommand::NudgeOffset {
                east_meters,
                north_meters,
            } => {
                let mut adj = self.transform.adjustments();
                adj.east_meters += east_meters;
                adj.north_meters += north_meters;
                self.set_adjustments(adj);
            }
            SessionCommand::Nudge { direction } => {
                let (east, north) = match direction {
                    Cardinal::North => (0.0, NUDGE_DISTANCE_M),
                    Cardinal::East => (NUDGE_DISTANCE_M, 0.0),
                    Cardinal::South => (0.0, -NUDGE_DISTANCE_M),
                    Cardinal::West => (-NUDGE_DISTANCE_M, 0.0),
                };
                self.handle_command(SessionCommand::NudgeOffset {
                    east_meters: east,
                    north_meters: north,
                });
            }
            SessionCommand::SetPortalLocation { location } => {
                self.config.transition.portal_location = location;
            }
        }
    }

    fn set_adjustments(&mut self, adjustments: Adjustments) {
        if ![
            adjustments.yaw_radians,
            adjustments.east_meters,
            adjustments.north_meters,
        ]
        .iter()
        .all(|v| v.is_finite())
        {
            debug!(?adjustments, "ignoring non-finite adjustments");
            return;
        }
        self.transform.set_adjustments(adjustments);
        self.config.adjustments = self.transform.adjustments();
        debug!(adjustments = ?self.config.adjustments, "adjustments updated");
    }
}

#[cfg(test)]
mod tests {
    use skydrop_core::config::TransitionConfig;
    use skydrop_core::enums::{EntityClass, EnvironmentId, TransitionState};
    use skydrop_core::events::SceneCommand;
    use skydrop_core::types::{GeodeticPosition, LocalPosition};

    use crate::fsm::{evaluate, PortalContext, PortalState, PortalUpdate};

    const HOLD_MS: u64 = 8_000;

    fn config() -> TransitionConfig {
        TransitionConfig {
            portal_location: Some(GeodeticPosition::new(47.2375, -123.1458, 84.0)),
            trigger_radius_m: 4.0,
            preload_radius_m: 100.0,
            hold_duration_millis: HOLD_MS,
        }
    }

    fn state(state: TransitionState) -> PortalState {
        PortalState {
            state,
            ..Default::default()
        }
    }

    /// Subject placed `distance` meters north of a portal at the origin.
    fn step(
        portal: PortalState,
        config: &TransitionConfig,
        distance: Option<f64>,
        now: u64,
    ) -> PortalUpdate {
        let ctx = PortalContext {
            portal,
            config,
            portal_position: Some(LocalPosition::default()),
            subject_position: distance.map(|d| LocalPosition::new(0.0, 0.0, d)),
            now_millis: now,
        };
        evaluate(&ctx)
    }

    fn preload_count(commands: &[SceneCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, SceneCommand::Preload { .. }))
            .count()
    }

    #[test]
    fn test_dormant_stays_without_config() {
        let cfg = TransitionConfig::default();
        let update = step(PortalState::default(), &cfg, Some(1.0), 0);
        assert!(!update.state_changed);
        assert_eq!(update.portal.state, TransitionState::Dormant);
        assert!(update.commands.is_empty());
    }

    #[test]
    fn test_dormant_arms_and_shows_portal() {
        let update = step(PortalState::default(), &config(), None, 0);
        assert!(update.state_changed);
        assert_eq!(update.portal.state, TransitionState::Armed);
        assert_eq!(update.commands, vec![SceneCommand::show(EntityClass::Portal)]);
    }

    #[test]
    fn test_armed_far_away_stays_armed() {
        let update = step(state(TransitionState::Armed), &config(), Some(200.0), 0);
        assert!(!update.state_changed);
        assert_eq!(update.portal.state, TransitionState::Armed);
    }

    #[test]
    fn test_armed_without_positions_waits() {
        let update = step(state(TransitionState::Armed), &config(), None, 0);
        assert!(!update.state_changed);
    }

    #[test]
    fn test_preload_radius_inclusive() {
        let update = step(state(TransitionState::Armed), &config(), Some(100.0), 0);
        assert_eq!(update.portal.state, TransitionState::Preloaded);
        assert_eq!(preload_count(&update.commands), 1);
        assert!(update.portal.preload_requested);
    }

    #[test]
    fn test_preloaded_does_not_repeat_preload() {
        let cfg = config();
        let mut portal = step(state(TransitionState::Armed), &cfg, Some(80.0), 0).portal;
        for t in 1..10 {
            let update = step(portal, &cfg, Some(80.0 - t as f64), t * 33);
            assert_eq!(preload_count(&update.commands), 0);
            assert_eq!(update.portal.state, TransitionState::Preloaded);
            portal = update.portal;
        }
    }

    #[test]
    fn test_trigger_swaps_environment() {
        let cfg = config();
        let mut portal = state(TransitionState::Preloaded);
        portal.preload_requested = true;
        let update = step(portal, &cfg, Some(3.0), 5_000);
        assert_eq!(
            update.portal.state,
            TransitionState::Triggered {
                entered_at_millis: 5_000
            }
        );
        assert_eq!(
            update.commands,
            vec![
                SceneCommand::hide(EntityClass::PrimaryScene),
                SceneCommand::show(EntityClass::AlternateEnvironment),
                SceneCommand::SetEnvironment {
                    environment: EnvironmentId::Alternate
                },
            ]
        );
    }

    #[test]
    fn test_triggered_holds_then_returns() {
        let cfg = config();
        let triggered = state(TransitionState::Triggered {
            entered_at_millis: 1_000,
        });
        let update = step(triggered, &cfg, Some(0.5), 1_000 + HOLD_MS - 1);
        assert!(!update.state_changed);

        let update = step(triggered, &cfg, Some(0.5), 1_000 + HOLD_MS);
        assert_eq!(update.portal.state, TransitionState::Returning);
        assert!(update
            .commands
            .contains(&SceneCommand::show(EntityClass::PrimaryScene)));
        assert!(update
            .commands
            .contains(&SceneCommand::hide(EntityClass::AlternateEnvironment)));
    }

    #[test]
    fn test_returning_outside_preload_resets_flag() {
        let mut portal = state(TransitionState::Returning);
        portal.preload_requested = true;
        let update = step(portal, &config(), Some(150.0), 0);
        assert_eq!(update.portal.state, TransitionState::Armed);
        assert!(!update.portal.preload_requested);
        assert!(!update.portal.awaiting_exit);
    }

    #[test]
    fn test_returning_inside_preload_keeps_flag() {
        let mut portal = state(TransitionState::Returning);
        portal.preload_requested = true;
        let update = step(portal, &config(), Some(50.0), 0);
        assert_eq!(update.portal.state, TransitionState::Armed);
        assert!(update.portal.preload_requested);

        // Back to Preloaded without a second preload request.
        let update = step(update.portal, &config(), Some(50.0), 33);
        assert_eq!(update.portal.state, TransitionState::Preloaded);
        assert_eq!(preload_count(&update.commands), 0);
    }

    #[test]
    fn test_lingering_inside_trigger_does_not_retrigger() {
        let cfg = config();
        let mut portal = state(TransitionState::Returning);
        portal.preload_requested = true;
        let mut now = 20_000;
        let mut swaps = 0;
        for _ in 0..50 {
            let update = step(portal, &cfg, Some(2.0), now);
            if matches!(update.portal.state, TransitionState::Triggered { .. }) {
                swaps += 1;
            }
            portal = update.portal;
            now += 33;
        }
        assert_eq!(swaps, 0);
        assert_eq!(portal.state, TransitionState::Preloaded);
        assert!(portal.awaiting_exit);

        // Leaving the trigger radius and coming back allows a new swap.
        portal = step(portal, &cfg, Some(10.0), now).portal;
        assert!(!portal.awaiting_exit);
        let update = step(portal, &cfg, Some(2.0), now + 33);
        assert!(matches!(
            update.portal.state,
            TransitionState::Triggered { .. }
        ));
    }

    #[test]
    fn test_config_cleared_disarms_from_every_state() {
        let cfg = TransitionConfig::default();
        for s in [
            TransitionState::Armed,
            TransitionState::Preloaded,
            TransitionState::Returning,
        ] {
            let update = step(state(s), &cfg, Some(1.0), 0);
            assert_eq!(update.portal, PortalState::default());
            assert_eq!(
                update.commands,
                vec![
                    SceneCommand::hide(EntityClass::Portal),
                    SceneCommand::hide(EntityClass::AlternateEnvironment),
                ]
            );
        }
    }

    #[test]
    fn test_config_cleared_while_triggered_restores_primary() {
        let cfg = TransitionConfig::default();
        let update = step(
            state(TransitionState::Triggered {
                entered_at_millis: 0,
            }),
            &cfg,
            Some(1.0),
            100,
        );
        assert_eq!(update.portal.state, TransitionState::Dormant);
        assert!(update
            .commands
            .contains(&SceneCommand::show(EntityClass::PrimaryScene)));
    }

    /// Full approach: 200 m -> 80 m -> 3 m -> hold -> return.
    #[test]
    fn test_full_episode() {
        let cfg = config();
        let mut portal = step(PortalState::default(), &cfg, Some(200.0), 0).portal;
        let mut preloads = 0;
        let mut restores = 0;
        let mut now = 0;

        let mut run = |portal: PortalState, d: f64, now: u64| {
            let update = step(portal, &cfg, Some(d), now);
            preloads += preload_count(&update.commands);
            restores += update
                .commands
                .iter()
                .filter(|c| **c == SceneCommand::show(EntityClass::PrimaryScene))
                .count();
            update.portal
        };

        for _ in 0..5 {
            now += 33;
            portal = run(portal, 200.0, now);
            assert_eq!(portal.state, TransitionState::Armed);
        }
        for _ in 0..5 {
            now += 33;
            portal = run(portal, 80.0, now);
            assert_eq!(portal.state, TransitionState::Preloaded);
        }
        now += 33;
        let triggered_at = now;
        portal = run(portal, 3.0, now);
        assert_eq!(
            portal.state,
            TransitionState::Triggered {
                entered_at_millis: triggered_at
            }
        );
        while now < triggered_at + HOLD_MS {
            now += 33;
            portal = run(portal, 3.0, now);
        }
        assert_eq!(portal.state, TransitionState::Returning);
        now += 33;
        portal = run(portal, 3.0, now);
        assert_eq!(portal.state, TransitionState::Armed);

        assert_eq!(preloads, 1);
        assert_eq!(restores, 1);
    }

    #[test]
    fn test_portal_state_serde() {
        let portal = PortalState {
            state: TransitionState::Triggered {
                entered_at_millis: 77,
            },
            preload_requested: true,
            awaiting_exit: false,
        };
        let json = serde_json::to_string(&portal).unwrap();
        let back: PortalState = serde_json::from_str(&json).unwrap();
        assert_eq!(portal, back);
    }
}

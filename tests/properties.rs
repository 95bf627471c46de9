//! Property tests for leaderboard, layout, pool and scoring invariants

use alien_invasion::consts::{MAX_ALIENS, SIM_DT};
use alien_invasion::highscores::MAX_HIGH_SCORES;
use alien_invasion::sim::{EntityPool, GamePhase, GameSession, TickInput, fleet_layout, tick};
use alien_invasion::{HighScores, Settings};
use proptest::prelude::*;

proptest! {
    #[test]
    fn high_score_table_is_the_top_ten(scores in prop::collection::vec(0u32..2000, 0..40)) {
        let mut table = HighScores::new();
        for &score in &scores {
            table.add_score(score);
        }

        let mut expected = scores.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(MAX_HIGH_SCORES);

        prop_assert!(table.len() <= MAX_HIGH_SCORES);
        prop_assert!(table.scores().windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(table.scores(), expected.as_slice());
    }

    #[test]
    fn fleet_layout_depends_only_on_geometry(
        width in 600.0f32..3000.0,
        height in 400.0f32..2000.0,
        spacing_x in 1.2f32..4.0,
        spacing_y in 1.2f32..4.0,
        step in 0.0f32..1.0,
    ) {
        let settings = Settings {
            screen_width: width,
            screen_height: height,
            fleet_spacing_x: spacing_x,
            fleet_spacing_y: spacing_y,
            ..Default::default()
        };
        let harder = Settings {
            difficulty_step: step,
            alien_speed: 400.0,
            ..settings.clone()
        };

        let layout = fleet_layout(&settings);
        prop_assert_eq!(&layout, &fleet_layout(&settings));
        prop_assert_eq!(&layout, &fleet_layout(&harder));
        prop_assert!(layout.len() <= MAX_ALIENS);

        let field_bottom = settings.alien_field_bottom();
        for pos in &layout {
            prop_assert!(pos.x >= 0.0 && pos.x + settings.alien_width <= width);
            prop_assert!(pos.y >= 0.0 && pos.y + settings.alien_height <= field_bottom);
        }
    }

    #[test]
    fn pool_never_exceeds_capacity(
        capacity in 0usize..12,
        ops in prop::collection::vec(any::<(bool, u8)>(), 0..100),
    ) {
        let mut pool = EntityPool::new(capacity);
        let mut handles = Vec::new();
        for (spawn, pick) in ops {
            if spawn {
                if let Some(h) = pool.spawn(pick) {
                    handles.push(h);
                }
            } else if !handles.is_empty() {
                let h = handles.swap_remove(pick as usize % handles.len());
                prop_assert!(pool.despawn(h));
                prop_assert!(!pool.despawn(h));
            }
            prop_assert!(pool.active_count() <= capacity);
            prop_assert_eq!(pool.iter_active().count(), pool.active_count());
            prop_assert!(pool.slot_count() <= capacity);
        }
    }

    #[test]
    fn score_never_decreases_during_a_run(
        seed in any::<u64>(),
        moves in prop::collection::vec(any::<(bool, bool, bool)>(), 1..400),
    ) {
        let mut session = GameSession::new(Settings::default(), seed);
        tick(&mut session, &TickInput { play: true, ..Default::default() }, SIM_DT);

        let mut last = session.stats.score;
        for (left, right, fire) in moves {
            let input = TickInput { left, right, fire, ..Default::default() };
            tick(&mut session, &input, SIM_DT);

            prop_assert!(session.stats.score >= last);
            prop_assert_eq!(session.stats.score % 10, 0);
            prop_assert!(session.player_bullets.active_count() <= session.settings.bullets_allowed);
            prop_assert!(session.enemy_bullets.active_count() <= session.settings.alien_bullets_allowed);
            last = session.stats.score;
            if session.phase != GamePhase::Playing {
                break;
            }
        }
    }
}

//! Property tests over random seeds and input sequences

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use barrage::consts::*;
use barrage::sim::{EnemyKind, FrameClock, GameState, TickInput, enemy_bullet_speed, tick};

/// (frame delta, fire held, pointer x)
fn frames() -> impl Strategy<Value = Vec<(f64, bool, f32)>> {
    prop::collection::vec((0.0f64..48.0, any::<bool>(), -50.0f32..420.0), 1..400)
}

fn run<F: FnMut(&GameState, &GameState)>(seed: u64, head_start: u64, frames: &[(f64, bool, f32)], mut check: F) {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = GameState::new(&mut rng);
    state.award(head_start);
    let mut now = 1000.0;
    for &(delta, firing, x) in frames {
        now += delta;
        let input = TickInput {
            target_x: Some(x),
            firing,
            ..Default::default()
        };
        let before = state.clone();
        tick(&mut state, &input, FrameClock::new(now, delta), &mut rng);
        check(&before, &state);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn entities_never_linger_out_of_bounds(seed in any::<u64>(), frames in frames()) {
        run(seed, 0, &frames, |_, state| {
            for bullet in state.player_bullets.iter().chain(state.enemy_bullets.iter()) {
                assert!(bullet.in_bounds(), "bullet {} at {:?}", bullet.id, bullet.pos);
            }
            for power_up in &state.power_ups {
                assert!(power_up.pos.y < FIELD_HEIGHT + BULLET_MARGIN);
            }
            for enemy in &state.enemies {
                assert!(enemy.pos.y < ENEMY_EXIT_Y);
            }
        });
    }

    #[test]
    fn score_never_decreases(seed in any::<u64>(), head_start in 0u64..6_000, frames in frames()) {
        run(seed, head_start, &frames, |before, after| {
            assert!(after.score >= before.score);
        });
    }

    #[test]
    fn boss_never_shares_the_field(seed in any::<u64>(), head_start in 4_000u64..6_000, frames in frames()) {
        run(seed, head_start, &frames, |_, state| {
            if state.boss.is_some() {
                assert!(state.enemies.is_empty());
                assert!(state.boss_phase);
            }
        });
    }

    #[test]
    fn progression_stays_in_range(seed in any::<u64>(), frames in frames()) {
        run(seed, 0, &frames, |before, after| {
            assert!((MIN_POWER_LEVEL..=MAX_POWER_LEVEL).contains(&after.power_level));
            assert!(after.power_level >= before.power_level);
            assert!(after.boss_clear_count >= before.boss_clear_count);
            assert!((PLAYER_MIN_X..=PLAYER_MAX_X).contains(&after.player_x));
        });
    }

    #[test]
    fn entity_ids_are_unique(seed in any::<u64>(), frames in frames()) {
        run(seed, 0, &frames, |_, state| {
            let mut seen = HashSet::new();
            let ids = state
                .player_bullets
                .iter()
                .map(|b| b.id)
                .chain(state.enemy_bullets.iter().map(|b| b.id))
                .chain(state.enemies.iter().map(|e| e.id))
                .chain(state.power_ups.iter().map(|p| p.id));
            for id in ids {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        });
    }

    #[test]
    fn clearing_a_boss_speeds_up_enemy_fire(clears in 1u32..50) {
        for kind in [EnemyKind::Normal, EnemyKind::Shooter, EnemyKind::Fast] {
            prop_assert!(enemy_bullet_speed(kind, clears) > enemy_bullet_speed(kind, 0));
        }
    }
}

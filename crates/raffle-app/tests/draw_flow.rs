//! End-to-end draw flow
//!
//! Draw → persist → reveal through the public session API, with seeded
//! randomness and in-memory or temporary-directory storage.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use raffle_app::{AppConfig, AppError, RaffleApp};
use raffle_draw::{BlockReason, DrawConfig, DrawEngine, MAX_DRAW_COUNT, PoolSource, run_draw};
use raffle_reveal::{RevealPhase, RevealTiming, TimingProfile};
use raffle_state::{KeyValueStore, MemoryStore, StateError, StateResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_chacha::ChaCha8Rng;

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

const NAMES: [&str; 4] = ["Ana", "Bruno", "Carla", "Duda"];

fn memory_app() -> RaffleApp {
    let config = AppConfig::default().with_timing_profile(TimingProfile::Instant);
    RaffleApp::with_store(config, Arc::new(MemoryStore::new()))
}

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Person {i}")).collect()
}

/// Store whose writes always fail
struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> StateResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StateResult<()> {
        Err(StateError::Unavailable("disk full".to_string()))
    }

    fn remove(&self, _key: &str) -> StateResult<()> {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_two_winners_from_list() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let config = DrawConfig::new(PoolSource::list(NAMES)).with_winners(2);

    let outcome = app.perform_draw(&config, &mut rng).unwrap();
    let result = outcome.result.as_slice();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|r| NAMES.contains(&r.as_str())));
    assert_ne!(result[0], result[1]);
}

#[test]
fn test_scenario_numeric_range_with_repetition() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let config = DrawConfig::new(PoolSource::range(1, 10))
        .with_winners(3)
        .with_repetition(true);

    let outcome = app.perform_draw(&config, &mut rng).unwrap();
    assert_eq!(outcome.result.len(), 3);
    for value in outcome.result.iter() {
        let n: i64 = value.parse().unwrap();
        assert!((1..=10).contains(&n));
    }
}

#[test]
fn test_scenario_full_ranking() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let pool = ["Ana", "Bruno", "Carla", "Duda", "Eva"];
    let config = DrawConfig::new(PoolSource::list(pool)).with_rank_all(true);

    let outcome = app.perform_draw(&config, &mut rng).unwrap();
    let mut ranked: Vec<&str> = outcome.result.iter().map(String::as_str).collect();
    assert_eq!(ranked.len(), 5);
    ranked.sort_unstable();
    let mut expected = pool.to_vec();
    expected.sort_unstable();
    assert_eq!(ranked, expected);
}

#[test]
fn test_scenario_empty_pool() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let config = DrawConfig::new(PoolSource::list(Vec::<String>::new())).with_winners(5);

    // The engine itself is total
    assert!(run_draw(&config, &mut rng).is_empty());

    // The session gate refuses it and records nothing
    let app = memory_app();
    assert!(matches!(
        app.perform_draw(&config, &mut rng),
        Err(AppError::DrawBlocked(_))
    ));
    assert!(app.history().is_empty());
}

#[test]
fn test_scenario_animations_off_single_terminal_snapshot() {
    let app = memory_app();
    app.toggle_animations().unwrap();
    assert!(!app.settings().animations_enabled);

    let mut rng = ChaCha8Rng::seed_from_u64(14);
    let config = DrawConfig::new(PoolSource::list(NAMES)).with_winners(3);
    let outcome = app.perform_draw(&config, &mut rng).unwrap();

    let mut reveal = app.start_reveal(&outcome, &mut rng);
    let frames = reveal.run_to_end();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].phase, RevealPhase::Revealed);
    assert!(frames.iter().all(|f| f.phase != RevealPhase::Spinning));
    assert_eq!(
        frames[0].revealed_values().as_deref(),
        Some(outcome.result.as_slice())
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_repetition_conserves_pool() {
    let mut rng = StdRng::seed_from_u64(20);
    for size in 0..12usize {
        let pool = names(size);
        for winners in 0..15u32 {
            let config = DrawConfig::new(PoolSource::list(pool.clone())).with_winners(winners);
            let result = run_draw(&config, &mut rng);

            assert_eq!(result.len(), (winners as usize).min(size));
            let unique: HashSet<&String> = result.iter().collect();
            assert_eq!(unique.len(), result.len());
            assert!(result.iter().all(|r| pool.contains(r)));
        }
    }
}

#[test]
fn test_ranking_is_permutation() {
    let mut rng = StdRng::seed_from_u64(21);
    for size in 0..10usize {
        let pool = names(size);
        let config = DrawConfig::new(PoolSource::list(pool.clone()))
            .with_winners(1)
            .with_rank_all(true);
        let mut result = run_draw(&config, &mut rng).into_vec();
        result.sort();
        let mut expected = pool;
        expected.sort();
        assert_eq!(result, expected);
    }

    let config = DrawConfig::new(PoolSource::range(-3, 3)).with_rank_all(true);
    let mut values: Vec<i64> = run_draw(&config, &mut rng)
        .iter()
        .map(|v| v.parse().unwrap())
        .collect();
    values.sort_unstable();
    assert_eq!(values, (-3..=3).collect::<Vec<_>>());
}

#[test]
fn test_repetition_preserves_count() {
    let mut rng = StdRng::seed_from_u64(22);
    for size in 1..6usize {
        let pool = names(size);
        for winners in 1..20u32 {
            let config = DrawConfig::new(PoolSource::list(pool.clone()))
                .with_winners(winners)
                .with_repetition(true);
            let result = run_draw(&config, &mut rng);
            assert_eq!(result.len(), winners as usize);
            assert!(result.iter().all(|r| pool.contains(r)));
        }
    }
}

#[test]
fn test_draw_deterministic_under_seed() {
    let configs = [
        DrawConfig::new(PoolSource::list(NAMES)).with_winners(3),
        DrawConfig::new(PoolSource::range(1, 1_000_000)).with_winners(10),
        DrawConfig::new(PoolSource::list(NAMES)).with_rank_all(true),
        DrawConfig::new(PoolSource::range(0, 9))
            .with_winners(30)
            .with_repetition(true),
    ];

    for config in &configs {
        let a = DrawEngine::seeded(99).draw(config);
        let b = DrawEngine::seeded(99).draw(config);
        assert_eq!(a, b);
    }
}

#[test]
fn test_reveal_matches_result_with_and_without_animation() {
    for animations in [true, false] {
        let app = memory_app();
        if !animations {
            app.toggle_animations().unwrap();
        }

        for seed in 0..5u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let config = DrawConfig::new(PoolSource::range(1, 50)).with_winners(4);
            let outcome = app.perform_draw(&config, &mut rng).unwrap();

            let mut reveal = app.start_reveal(&outcome, &mut rng);
            let frames = reveal.run_to_end();
            let revealed: Vec<_> = frames.iter().filter(|f| f.is_revealed()).collect();

            assert_eq!(revealed.len(), 1);
            assert_eq!(
                revealed[0].revealed_values().as_deref(),
                Some(outcome.result.as_slice())
            );
            assert_eq!(reveal.results(), outcome.result.as_slice());
        }
    }
}

#[test]
fn test_one_history_entry_per_draw() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(30);
    let config = DrawConfig::new(PoolSource::list(NAMES)).with_winners(2);

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        let outcome = app.perform_draw(&config, &mut rng).unwrap();
        let mut reveal = app.start_reveal(&outcome, &mut rng);
        reveal.run_to_end();
        outcomes.push(outcome);
    }

    let history = app.history();
    assert_eq!(history.len(), 3);
    // Newest first
    for (entry, outcome) in history.iter().zip(outcomes.iter().rev()) {
        assert_eq!(entry.results, outcome.result.as_slice());
        assert_eq!(Some(entry), outcome.entry());
    }
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default()
        .with_data_dir(dir.path())
        .with_timing_profile(TimingProfile::Instant);
    let mut rng = ChaCha8Rng::seed_from_u64(31);

    let first = {
        let app = RaffleApp::with_store(
            config.clone(),
            Arc::new(raffle_state::FileStore::new(dir.path())),
        );
        app.toggle_sound().unwrap();
        app.perform_draw(&DrawConfig::new(PoolSource::list(NAMES)), &mut rng)
            .unwrap()
    };

    let app = RaffleApp::with_store(config, Arc::new(raffle_state::FileStore::new(dir.path())));
    let history = app.history();
    assert_eq!(history.len(), 1);
    assert_eq!(Some(&history[0]), first.entry());
    assert!(!app.settings().sound_enabled);
}

#[test]
fn test_save_failure_is_reported_not_fatal() {
    let app = RaffleApp::with_store(AppConfig::default(), Arc::new(FailingStore));
    let mut rng = ChaCha8Rng::seed_from_u64(32);
    let config = DrawConfig::new(PoolSource::list(NAMES)).with_winners(2);

    let outcome = app.perform_draw(&config, &mut rng).unwrap();
    assert_eq!(outcome.result.len(), 2);
    assert!(!outcome.is_persisted());
    assert!(matches!(outcome.persisted, Err(StateError::Unavailable(_))));
    assert!(app.history().is_empty());

    // The reveal still shows the computed result
    let mut reveal = app.start_reveal(&outcome, &mut rng);
    let last = reveal.run_to_end().pop().unwrap();
    assert_eq!(
        last.revealed_values().as_deref(),
        Some(outcome.result.as_slice())
    );
}

#[test]
fn test_oversized_draws_are_blocked() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(33);

    let ranking = DrawConfig::new(PoolSource::range(1, 4_000_000_000)).with_rank_all(true);
    assert!(matches!(
        app.perform_draw(&ranking, &mut rng),
        Err(AppError::DrawBlocked(BlockReason::TooManyDraws {
            requested: 4_000_000_000,
            limit: MAX_DRAW_COUNT
        }))
    ));

    let repeated = DrawConfig::new(PoolSource::list(NAMES))
        .with_winners(u32::MAX)
        .with_repetition(true);
    assert!(matches!(
        app.perform_draw(&repeated, &mut rng),
        Err(AppError::DrawBlocked(BlockReason::TooManyDraws { .. }))
    ));
    assert!(app.history().is_empty());
}

#[test]
fn test_ambiguous_prefix_is_refused() {
    let app = memory_app();
    let mut rng = ChaCha8Rng::seed_from_u64(34);
    let config = DrawConfig::new(PoolSource::list(NAMES));

    // 17 ids over 16 hex digits: at least two share a first character
    for _ in 0..17 {
        app.perform_draw(&config, &mut rng).unwrap();
    }
    let mut by_first: HashMap<char, usize> = HashMap::new();
    for entry in app.history() {
        let first = entry.id.to_string().chars().next().unwrap();
        *by_first.entry(first).or_default() += 1;
    }
    let (shared, count) = by_first.into_iter().find(|(_, n)| *n > 1).unwrap();
    let prefix = shared.to_string();

    match app.delete_entry(&prefix) {
        Err(AppError::AmbiguousEntry { prefix: p, matches }) => {
            assert_eq!(p, prefix);
            assert_eq!(matches, count);
        }
        other => panic!("expected an ambiguous match, got {other:?}"),
    }
    assert!(app.export_entry(&prefix, raffle_state::ExportFormat::Text).is_err());
    assert_eq!(app.history().len(), 17);

    // A full id still resolves
    let target = app.history()[3].clone();
    assert_eq!(app.delete_entry(&target.id.to_string()).unwrap(), target);
    assert_eq!(app.history().len(), 16);
}

#[test]
fn test_configured_profile_sets_reveal_timing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    AppConfig::default()
        .with_timing_profile(TimingProfile::Turbo)
        .save_to(&path)
        .unwrap();

    let reveal_frames = |config: AppConfig| {
        let app = RaffleApp::with_store(config, Arc::new(MemoryStore::new()));
        let mut rng = ChaCha8Rng::seed_from_u64(35);
        let outcome = app
            .perform_draw(&DrawConfig::new(PoolSource::list(NAMES)).with_winners(2), &mut rng)
            .unwrap();
        app.start_reveal(&outcome, &mut rng).run_to_end()
    };

    let turbo = reveal_frames(AppConfig::load_from(&path));
    let normal = reveal_frames(AppConfig::default());

    let first_spin = |frames: &[raffle_reveal::RevealSnapshot]| {
        frames
            .iter()
            .find(|f| f.phase == RevealPhase::Spinning)
            .map(|f| f.at_ms)
    };
    assert_eq!(
        first_spin(&turbo),
        Some(RevealTiming::turbo().intro_duration_ms as u64)
    );
    assert_eq!(
        first_spin(&normal),
        Some(RevealTiming::normal().intro_duration_ms as u64)
    );
    assert!(turbo.last().unwrap().at_ms < normal.last().unwrap().at_ms);
}

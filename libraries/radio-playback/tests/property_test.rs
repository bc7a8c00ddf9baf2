//! Property-based tests for the playback session

mod common;

use common::{playlist, Harness, SharedStore};
use proptest::prelude::*;
use radio_core::SessionSettings;

fn names(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("T{i}")).collect()
}

fn started(len: usize, seed: u64) -> Harness {
    let names = names(len);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut h = Harness::seeded(SessionSettings::default(), SharedStore::default(), seed);
    h.start(playlist(&refs));
    h
}

proptest! {
    #[test]
    fn advance_never_repeats_current(
        len in 2usize..16,
        seed in any::<u64>(),
        steps in 1usize..40
    ) {
        let mut h = started(len, seed);
        for _ in 0..steps {
            let before = h.session.current_index();
            h.session.advance_random().unwrap();
            prop_assert_ne!(h.session.current_index(), before);
        }
    }

    #[test]
    fn tick_only_persists_usable_offsets(
        positions in prop::collection::vec(
            prop_oneof![
                Just(f64::NAN),
                Just(f64::INFINITY),
                Just(f64::NEG_INFINITY),
                -1.0e6f64..1.0e6f64,
            ],
            1..30
        )
    ) {
        let mut h = started(3, 1);
        h.session.handle_play_started();

        for position in positions {
            h.output.set_position(position);
            h.session.tick();

            let stored = h.store.get("currentTime").unwrap();
            let parsed: f64 = stored.parse().unwrap();
            prop_assert!(parsed.is_finite() && parsed >= 0.0, "stored {}", stored);
        }
    }
}

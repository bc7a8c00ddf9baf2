//! Random track selection
//!
//! The station never repeats the track that just played unless the playlist
//! has only one entry.

use rand::Rng;
use std::collections::HashSet;

/// Pick a playlist index uniformly at random, excluding `current`
///
/// With a single track, repetition is allowed and `0` is returned. Returns
/// `None` only for an empty playlist.
pub fn pick_random_index<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    match (len, current) {
        (0, _) => None,
        (1, _) => Some(0),
        (_, Some(current)) if current < len => {
            // Draw from the len-1 other slots and shift past the excluded one
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ => Some(rng.gen_range(0..len)),
    }
}

/// Pick uniformly among indices not in `excluded`
///
/// Returns `None` when every index is excluded.
pub fn pick_random_index_excluding<R: Rng + ?Sized>(
    len: usize,
    excluded: &HashSet<usize>,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..len).filter(|i| !excluded.contains(i)).collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_playlist_has_no_pick() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_random_index(0, None, &mut rng), None);
    }

    #[test]
    fn single_track_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_random_index(1, Some(0), &mut rng), Some(0));
        assert_eq!(pick_random_index(1, None, &mut rng), Some(0));
    }

    #[test]
    fn two_tracks_alternate() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut current = 0;
        for _ in 0..20 {
            let next = pick_random_index(2, Some(current), &mut rng).unwrap();
            assert_ne!(next, current);
            current = next;
        }
    }

    #[test]
    fn every_other_track_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_random_index(5, Some(2), &mut rng).unwrap());
        }
        assert_eq!(seen, HashSet::from([0, 1, 3, 4]));
    }

    #[test]
    fn stale_current_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(pick_random_index(3, Some(9), &mut rng).unwrap() < 3);
        }
    }

    #[test]
    fn exclusion_set_is_honored() {
        let mut rng = StdRng::seed_from_u64(11);
        let excluded = HashSet::from([0, 2]);
        for _ in 0..50 {
            assert_eq!(pick_random_index_excluding(3, &excluded, &mut rng), Some(1));
        }
        let all = HashSet::from([0, 1, 2]);
        assert_eq!(pick_random_index_excluding(3, &all, &mut rng), None);
    }

    proptest! {
        /// Property: the pick is in range and never the current track when len >= 2
        #[test]
        fn pick_never_repeats_current(
            len in 2usize..200,
            seed in any::<u64>(),
            current_seed in any::<usize>()
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let current = current_seed % len;
            let next = pick_random_index(len, Some(current), &mut rng).unwrap();
            prop_assert!(next < len);
            prop_assert_ne!(next, current);
        }
    }
}

use rand::Rng;
use serde::Serialize;

use crate::catalog::Place;
use crate::engine::score::score;
use crate::prefs::Preferences;

/// Most places shown at once.
pub const MAX_PICKS: usize = 3;
/// Size of the positive-score shortlist that picks are drawn from.
pub const SHORTLIST_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredPlace {
    pub place: Place,
    pub score: u32,
}

/// Every place with its score, best first. Ties keep catalog order.
pub fn rank(places: &[Place], prefs: &Preferences) -> Vec<ScoredPlace> {
    let mut scored = places
        .iter()
        .map(|place| ScoredPlace {
            score: score(place, prefs),
            place: place.clone(),
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Top positive-score entries, at most [`SHORTLIST_LEN`].
pub fn shortlist(ranked: Vec<ScoredPlace>) -> Vec<ScoredPlace> {
    ranked
        .into_iter()
        .filter(|entry| entry.score > 0)
        .take(SHORTLIST_LEN)
        .collect()
}

/// Uniform Fisher–Yates shuffle of a copy, truncated to `n`.
pub fn pick_n<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let j = rng.gen_range(0..=i);
        copy.swap(i, j);
    }
    copy.truncate(n);
    copy
}

/// Samples up to [`MAX_PICKS`] places from the shortlist, or from the whole
/// catalog when nothing scored above zero.
pub fn recommend<R: Rng + ?Sized>(
    places: &[Place],
    prefs: &Preferences,
    rng: &mut R,
) -> Vec<ScoredPlace> {
    let top = shortlist(rank(places, prefs));
    if !top.is_empty() {
        return pick_n(&top, MAX_PICKS, rng);
    }
    let everything = places
        .iter()
        .map(|place| ScoredPlace {
            place: place.clone(),
            score: 0,
        })
        .collect::<Vec<_>>();
    pick_n(&everything, MAX_PICKS, rng)
}

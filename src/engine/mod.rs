//! Preference scoring and random selection over the catalog.

pub mod score;
pub mod select;

pub use score::{explain, score, Contribution, Criterion};
pub use select::{pick_n, rank, recommend, shortlist, ScoredPlace, MAX_PICKS, SHORTLIST_LEN};

use rand::Rng;
use tracing::debug;

use crate::catalog::Catalog;
use crate::engine::{recommend, ScoredPlace};
use crate::prefs::Preferences;

/// Owns the loaded catalog and whatever was last shown to the user.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    last_prefs: Preferences,
    last_picks: Vec<ScoredPlace>,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            last_prefs: Preferences::default(),
            last_picks: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn last_prefs(&self) -> &Preferences {
        &self.last_prefs
    }

    pub fn last_picks(&self) -> &[ScoredPlace] {
        &self.last_picks
    }

    pub fn compute<R: Rng + ?Sized>(&mut self, prefs: Preferences, rng: &mut R) -> &[ScoredPlace] {
        self.last_picks = recommend(self.catalog.places(), &prefs, rng);
        self.last_prefs = prefs;
        debug!(
            "picked {} of {} places",
            self.last_picks.len(),
            self.catalog.len()
        );
        &self.last_picks
    }

    /// Draws again with the preferences of the last computation.
    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[ScoredPlace] {
        let prefs = self.last_prefs.clone();
        self.compute(prefs, rng)
    }
}

use serde::Serialize;

use crate::catalog::{Budget, Place, SocialEnergy};
use crate::prefs::{BudgetPref, CategoryPref, DurationPref, Preferences, RainPref};

const QUICK_MAX_START: u32 = 45;
const QUICK_MAX_TOTAL: u32 = 90;
const ONE_TWO_MAX_START: u32 = 90;
const ONE_TWO_MIN_END: u32 = 60;
const LONG_MIN_END: u32 = 120;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Duration,
    Moment,
    Rain,
    SocialEnergy,
    Budget,
    Category,
}

/// Points one criterion contributed to a place's score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Contribution {
    pub criterion: Criterion,
    pub points: u32,
}

pub fn score(place: &Place, prefs: &Preferences) -> u32 {
    duration_points(place, prefs.duration)
        + moment_points(place, prefs.moment.as_deref())
        + rain_points(place, prefs.rain)
        + energy_points(place, prefs.energy)
        + budget_points(place, prefs.budget)
        + category_points(place, &prefs.category)
}

/// Per-criterion breakdown; the points always sum to [`score`].
pub fn explain(place: &Place, prefs: &Preferences) -> Vec<Contribution> {
    [
        (Criterion::Duration, duration_points(place, prefs.duration)),
        (Criterion::Moment, moment_points(place, prefs.moment.as_deref())),
        (Criterion::Rain, rain_points(place, prefs.rain)),
        (Criterion::SocialEnergy, energy_points(place, prefs.energy)),
        (Criterion::Budget, budget_points(place, prefs.budget)),
        (Criterion::Category, category_points(place, &prefs.category)),
    ]
    .into_iter()
    .map(|(criterion, points)| Contribution { criterion, points })
    .collect()
}

fn duration_points(place: &Place, pref: Option<DurationPref>) -> u32 {
    let range = place.duration;
    match pref {
        Some(DurationPref::Quick) => {
            let mut points = 0;
            if range.min <= QUICK_MAX_START {
                points += 3;
            }
            if range.max <= QUICK_MAX_TOTAL {
                points += 1;
            }
            points
        }
        Some(DurationPref::OneTwo) => {
            if range.min <= ONE_TWO_MAX_START && range.max >= ONE_TWO_MIN_END {
                3
            } else {
                0
            }
        }
        Some(DurationPref::Long) => {
            if range.max >= LONG_MIN_END {
                2
            } else {
                0
            }
        }
        None => 0,
    }
}

fn moment_points(place: &Place, moment: Option<&str>) -> u32 {
    match moment {
        Some(moment) if place.time_of_day.iter().any(|m| m == moment) => 3,
        _ => 0,
    }
}

fn rain_points(place: &Place, pref: Option<RainPref>) -> u32 {
    match (pref, place.rainy_ok) {
        (Some(RainPref::Rain), Some(true)) => 3,
        (Some(RainPref::Dry), Some(false)) => 2,
        (Some(RainPref::Any), _) => 1,
        _ => 0,
    }
}

fn energy_points(place: &Place, pref: Option<SocialEnergy>) -> u32 {
    let need = pref.map(|level| level.quietness()).unwrap_or(0);
    let has = place.social_energy.map(|level| level.quietness()).unwrap_or(0);
    if has >= need {
        3
    } else {
        0
    }
}

fn budget_points(place: &Place, pref: Option<BudgetPref>) -> u32 {
    match (pref, place.budget) {
        (Some(BudgetPref::Any), _) => 1,
        (Some(BudgetPref::Low), Some(Budget::Low | Budget::Mid)) => 2,
        (Some(BudgetPref::Mid), Some(Budget::Mid | Budget::High)) => 2,
        _ => 0,
    }
}

fn category_points(place: &Place, pref: &CategoryPref) -> u32 {
    match pref {
        CategoryPref::Named(category) if place.category == *category => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DurationRange, Links};

    fn place() -> Place {
        Place {
            id: "1".to_string(),
            name: "Musée Fin-de-Siècle".to_string(),
            category: "museum".to_string(),
            area: "Sablon".to_string(),
            address: String::new(),
            transit: vec!["Gare Centrale".to_string()],
            budget: Some(Budget::Mid),
            duration: DurationRange::new(60, 120),
            time_of_day: vec!["morning".to_string(), "afternoon".to_string()],
            rainy_ok: Some(true),
            social_energy: Some(SocialEnergy::Zero),
            solo_why: "Silence et tableaux".to_string(),
            links: Links::default(),
        }
    }

    /// Preferences that grant nothing, including the energy criterion.
    fn strict_prefs() -> Preferences {
        Preferences {
            energy: Some(SocialEnergy::Zero),
            ..Preferences::default()
        }
    }

    #[test]
    fn quick_visit_earns_both_duration_bonuses() {
        let mut p = place();
        p.duration = DurationRange::new(30, 80);
        let prefs = Preferences {
            duration: Some(DurationPref::Quick),
            ..Preferences::default()
        };
        assert_eq!(duration_points(&p, prefs.duration), 4);
    }

    #[test]
    fn louder_place_misses_quiet_energy_need() {
        let mut p = place();
        p.social_energy = Some(SocialEnergy::Low);
        assert_eq!(energy_points(&p, Some(SocialEnergy::Zero)), 0);
        assert_eq!(energy_points(&p, Some(SocialEnergy::Low)), 3);
        assert_eq!(energy_points(&p, None), 3);
    }

    #[test]
    fn unknown_energy_ranks_as_high() {
        let mut p = place();
        p.social_energy = None;
        assert_eq!(energy_points(&p, Some(SocialEnergy::Neutral)), 0);
        assert_eq!(energy_points(&p, Some(SocialEnergy::High)), 3);
    }

    #[test]
    fn rain_branches_respect_tri_state() {
        let mut p = place();
        p.rainy_ok = None;
        assert_eq!(rain_points(&p, Some(RainPref::Rain)), 0);
        assert_eq!(rain_points(&p, Some(RainPref::Dry)), 0);
        assert_eq!(rain_points(&p, Some(RainPref::Any)), 1);
        p.rainy_ok = Some(false);
        assert_eq!(rain_points(&p, Some(RainPref::Dry)), 2);
        p.rainy_ok = Some(true);
        assert_eq!(rain_points(&p, Some(RainPref::Rain)), 3);
    }

    #[test]
    fn budget_tiers_overlap_on_mid() {
        let mut p = place();
        for (tier, low, mid) in [
            (Budget::Low, 2, 0),
            (Budget::Mid, 2, 2),
            (Budget::High, 0, 2),
        ] {
            p.budget = Some(tier);
            assert_eq!(budget_points(&p, Some(BudgetPref::Low)), low);
            assert_eq!(budget_points(&p, Some(BudgetPref::Mid)), mid);
            assert_eq!(budget_points(&p, Some(BudgetPref::Any)), 1);
        }
        p.budget = None;
        assert_eq!(budget_points(&p, Some(BudgetPref::Low)), 0);
    }

    #[test]
    fn full_match_adds_every_criterion() {
        let prefs = Preferences {
            duration: Some(DurationPref::OneTwo),
            moment: Some("morning".to_string()),
            energy: Some(SocialEnergy::Zero),
            rain: Some(RainPref::Rain),
            budget: Some(BudgetPref::Mid),
            category: CategoryPref::Named("museum".to_string()),
        };
        assert_eq!(score(&place(), &prefs), 3 + 3 + 3 + 3 + 2 + 2);
    }

    #[test]
    fn zero_when_nothing_matches() {
        let mut p = place();
        p.social_energy = Some(SocialEnergy::High);
        assert_eq!(score(&p, &strict_prefs()), 0);
    }

    #[test]
    fn category_any_never_matches() {
        let prefs = Preferences {
            category: CategoryPref::Any,
            ..strict_prefs()
        };
        let mut p = place();
        p.social_energy = Some(SocialEnergy::High);
        assert_eq!(category_points(&p, &prefs.category), 0);
    }

    #[test]
    fn explain_sums_to_score() {
        let prefs = Preferences {
            duration: Some(DurationPref::Long),
            moment: Some("afternoon".to_string()),
            rain: Some(RainPref::Any),
            budget: Some(BudgetPref::Any),
            ..Preferences::default()
        };
        let p = place();
        let breakdown = explain(&p, &prefs);
        let total: u32 = breakdown.iter().map(|c| c.points).sum();
        assert_eq!(total, score(&p, &prefs));
        assert_eq!(breakdown.len(), 6);
        assert_eq!(score(&p, &prefs), score(&p, &prefs));
    }
}

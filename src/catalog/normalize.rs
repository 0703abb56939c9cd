use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::catalog::schema::{
    Budget, DurationRange, Links, Place, SocialEnergy, DEFAULT_DURATION_MAX, DEFAULT_DURATION_MIN,
};

/// Field list requested from the remote `places` table.
pub const REMOTE_FIELDS: &str = "id,name,category,area,address,transit,budget,duration_min,\
duration_max,time_of_day,rainy_ok,social_energy,solo_why,website";

/// A row as the remote query interface returns it: snake_case, flat duration,
/// nullable everywhere.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub transit: Option<Vec<String>>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub duration_min: Option<u32>,
    #[serde(default)]
    pub duration_max: Option<u32>,
    #[serde(default)]
    pub time_of_day: Option<Vec<String>>,
    #[serde(default)]
    pub rainy_ok: Value,
    #[serde(default)]
    pub social_energy: Option<String>,
    #[serde(default)]
    pub solo_why: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

pub fn normalize_row(row: RemoteRow) -> Place {
    let budget = row.budget.as_deref().and_then(|raw| match raw.parse::<Budget>() {
        Ok(budget) => Some(budget),
        Err(err) => {
            warn!("dropping budget on remote row: {err}");
            None
        }
    });
    let social_energy =
        row.social_energy
            .as_deref()
            .and_then(|raw| match raw.parse::<SocialEnergy>() {
                Ok(level) => Some(level),
                Err(err) => {
                    warn!("dropping social energy on remote row: {err}");
                    None
                }
            });
    let website = row.website.filter(|url| !url.trim().is_empty());

    Place {
        id: id_to_string(&row.id),
        name: row.name.unwrap_or_default(),
        category: row.category.unwrap_or_default(),
        area: row.area.unwrap_or_default(),
        address: row.address.unwrap_or_default(),
        transit: row.transit.unwrap_or_default(),
        budget,
        duration: DurationRange {
            min: row.duration_min.unwrap_or(DEFAULT_DURATION_MIN),
            max: row.duration_max.unwrap_or(DEFAULT_DURATION_MAX),
        },
        time_of_day: row.time_of_day.unwrap_or_default(),
        rainy_ok: Some(truthy(&row.rainy_ok)),
        social_energy,
        solo_why: row.solo_why.unwrap_or_default(),
        links: Links { website },
    }
}

pub fn normalize_rows(rows: Vec<RemoteRow>) -> Vec<Place> {
    rows.into_iter().map(normalize_row).collect()
}

/// Logs places whose duration range is inverted. They are kept as-is.
pub fn warn_on_invalid(places: &[Place]) {
    for place in places.iter().filter(|p| !p.duration.is_ordered()) {
        warn!(
            "place {} has duration min {} above max {}",
            place.id, place.duration.min, place.duration.max
        );
    }
}

fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0 && !v.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_DURATION_MIN: u32 = 0;
pub const DEFAULT_DURATION_MAX: u32 = 999;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "deserialize_strings")]
    pub transit: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_budget")]
    pub budget: Option<Budget>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: DurationRange,
    #[serde(default, deserialize_with = "deserialize_strings")]
    pub time_of_day: Vec<String>,
    #[serde(default)]
    pub rainy_ok: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_social_energy")]
    pub social_energy: Option<SocialEnergy>,
    #[serde(default)]
    pub solo_why: String,
    #[serde(default)]
    pub links: Links,
}

impl Place {
    /// Text handed to the clipboard by the card's copy action.
    pub fn copy_text(&self) -> String {
        format!("{} — {}", self.name, self.area)
    }

    pub fn website(&self) -> Option<&str> {
        self.links.website.as_deref()
    }
}

/// Closed range of minutes a visit usually takes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationRange {
    #[serde(default = "default_duration_min")]
    pub min: u32,
    #[serde(default = "default_duration_max")]
    pub max: u32,
}

impl DurationRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for DurationRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_DURATION_MIN,
            max: DEFAULT_DURATION_MAX,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Price tier, written as one to three euro signs in source data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Budget {
    #[serde(rename = "€", alias = "low")]
    Low,
    #[serde(rename = "€€", alias = "mid")]
    Mid,
    #[serde(rename = "€€€", alias = "high")]
    High,
}

impl Budget {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Low => "€",
            Self::Mid => "€€",
            Self::High => "€€€",
        }
    }
}

impl Display for Budget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Error)]
#[error("unknown budget tier: {0}")]
pub struct BudgetParseError(pub String);

impl FromStr for Budget {
    type Err = BudgetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "€" | "low" => Ok(Self::Low),
            "€€" | "mid" => Ok(Self::Mid),
            "€€€" | "high" => Ok(Self::High),
            _ => Err(BudgetParseError(s.to_string())),
        }
    }
}

/// How much social interaction a place entails, from none to a lot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SocialEnergy {
    Zero,
    Low,
    Neutral,
    High,
}

impl SocialEnergy {
    pub const ALL: [SocialEnergy; 4] = [
        SocialEnergy::Zero,
        SocialEnergy::Low,
        SocialEnergy::Neutral,
        SocialEnergy::High,
    ];

    /// Quietness level: 3 for `zero` down to 0 for `high`.
    pub fn quietness(&self) -> u8 {
        match self {
            Self::Zero => 3,
            Self::Low => 2,
            Self::Neutral => 1,
            Self::High => 0,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Low => "low",
            Self::Neutral => "neutral",
            Self::High => "high",
        }
    }
}

impl Display for SocialEnergy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown social energy: {0}")]
pub struct SocialEnergyParseError(pub String);

impl FromStr for SocialEnergy {
    type Err = SocialEnergyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SocialEnergy::ALL
            .into_iter()
            .find(|level| level.as_slug() == normalized)
            .ok_or_else(|| SocialEnergyParseError(s.to_string()))
    }
}

fn default_duration_min() -> u32 {
    DEFAULT_DURATION_MIN
}

fn default_duration_max() -> u32 {
    DEFAULT_DURATION_MAX
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(number) => number.to_string(),
    })
}

/// Unknown tiers load as "no tier" instead of failing the whole file.
fn deserialize_budget<'de, D>(deserializer: D) -> Result<Option<Budget>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(raw) => match raw.parse::<Budget>() {
            Ok(budget) => Some(budget),
            Err(err) => {
                warn!("dropping budget on place: {err}");
                None
            }
        },
        other => {
            warn!("dropping budget on place: unexpected value {other}");
            None
        }
    })
}

/// Unknown levels load as `None`, which scores like `high`.
fn deserialize_social_energy<'de, D>(deserializer: D) -> Result<Option<SocialEnergy>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(raw) => match raw.parse::<SocialEnergy>() {
            Ok(level) => Some(level),
            Err(err) => {
                warn!("dropping social energy on place: {err}");
                None
            }
        },
        other => {
            warn!("dropping social energy on place: unexpected value {other}");
            None
        }
    })
}

/// `null` or a non-list reads as empty; non-string entries are skipped.
fn deserialize_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                other => {
                    warn!("skipping non-text list entry {other}");
                    None
                }
            })
            .collect(),
        other => {
            warn!("expected a list, got {other}");
            Vec::new()
        }
    })
}

/// Missing, null or malformed bounds fall back to 0 and 999.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<DurationRange, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let bound = |key: &str, default: u32| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(default)
    };
    if !value.is_null() && !value.is_object() {
        warn!("expected a duration object, got {value}");
    }
    Ok(DurationRange {
        min: bound("min", DEFAULT_DURATION_MIN),
        max: bound("max", DEFAULT_DURATION_MAX),
    })
}

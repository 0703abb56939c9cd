use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::SocialEnergy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DurationPref {
    Quick,
    OneTwo,
    Long,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RainPref {
    Rain,
    Dry,
    Any,
}

/// Budget filter. There is deliberately no "high" option.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPref {
    Any,
    Low,
    Mid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPref {
    #[default]
    Any,
    Named(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub duration: Option<DurationPref>,
    pub moment: Option<String>,
    pub energy: Option<SocialEnergy>,
    pub rain: Option<RainPref>,
    pub budget: Option<BudgetPref>,
    pub category: CategoryPref,
}

/// Raw form state, one optional string per named field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceForm {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub moment: Option<String>,
    #[serde(default)]
    pub energy: Option<String>,
    #[serde(default)]
    pub rain: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {field}: {value}")]
pub struct PreferenceError {
    pub field: &'static str,
    pub value: String,
}

impl PreferenceError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl FromStr for DurationPref {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "quick" => Ok(Self::Quick),
            "oneTwo" | "one_two" => Ok(Self::OneTwo),
            "long" => Ok(Self::Long),
            _ => Err(PreferenceError::new("duration", s)),
        }
    }
}

impl FromStr for RainPref {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rain" => Ok(Self::Rain),
            "dry" => Ok(Self::Dry),
            "any" => Ok(Self::Any),
            _ => Err(PreferenceError::new("rain", s)),
        }
    }
}

impl FromStr for BudgetPref {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" => Ok(Self::Any),
            "low" => Ok(Self::Low),
            "mid" => Ok(Self::Mid),
            _ => Err(PreferenceError::new("budget", s)),
        }
    }
}

impl Display for CategoryPref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

impl From<&str> for CategoryPref {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "any" => Self::Any,
            other => Self::Named(other.to_string()),
        }
    }
}

impl TryFrom<&PreferenceForm> for Preferences {
    type Error = PreferenceError;

    fn try_from(form: &PreferenceForm) -> Result<Self, Self::Error> {
        Ok(Self {
            duration: field(&form.duration).map(str::parse::<DurationPref>).transpose()?,
            moment: field(&form.moment).map(str::to_string),
            energy: field(&form.energy)
                .map(|raw| {
                    raw.parse::<SocialEnergy>()
                        .map_err(|_| PreferenceError::new("energy", raw))
                })
                .transpose()?,
            rain: field(&form.rain).map(str::parse::<RainPref>).transpose()?,
            budget: field(&form.budget).map(str::parse::<BudgetPref>).transpose()?,
            category: field(&form.category)
                .map(CategoryPref::from)
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<PreferenceForm> for Preferences {
    type Error = PreferenceError;

    fn try_from(form: PreferenceForm) -> Result<Self, Self::Error> {
        Preferences::try_from(&form)
    }
}

fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact form exactly as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub email: String,
    pub place: String,
    pub why: String,
    pub details: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email")]
    InvalidEmail,
}

impl ContactForm {
    pub fn validate(&self) -> Result<Suggestion, ContactError> {
        let suggestion = Suggestion {
            name: single_line(&self.name),
            email: single_line(&self.email),
            place: single_line(&self.place),
            why: multi_line(&self.why),
            details: multi_line(&self.details),
        };
        if suggestion.name.is_empty()
            || suggestion.email.is_empty()
            || suggestion.place.is_empty()
            || suggestion.why.is_empty()
        {
            return Err(ContactError::MissingFields);
        }
        if !is_valid_email(&suggestion.email) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(suggestion)
    }
}

/// Trimmed, with CR and LF turned into spaces so the value is header-safe.
fn single_line(value: &Option<String>) -> String {
    value
        .as_deref()
        .unwrap_or_default()
        .trim()
        .replace(['\r', '\n'], " ")
}

fn multi_line(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.len() > 253 {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c));
    if !local_ok {
        return false;
    }
    let labels = domain.split('.').collect::<Vec<_>>();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: Some("  Ana ".to_string()),
            email: Some("ana@example.be".to_string()),
            place: Some("Parc\r\nTenbosch".to_string()),
            why: Some("  Calme le matin\nBancs à l'ombre ".to_string()),
            details: None,
        }
    }

    #[test]
    fn cleans_single_line_fields() {
        let suggestion = form().validate().expect("failed to validate form");
        assert_eq!(suggestion.name, "Ana");
        assert_eq!(suggestion.place, "Parc  Tenbosch");
        assert_eq!(suggestion.why, "Calme le matin\nBancs à l'ombre");
        assert_eq!(suggestion.details, "");
    }

    #[test]
    fn empty_why_is_missing() {
        let mut f = form();
        f.why = Some("   ".to_string());
        assert_eq!(f.validate(), Err(ContactError::MissingFields));
        assert_eq!(ContactError::MissingFields.to_string(), "Missing required fields");
    }

    #[test]
    fn missing_field_wins_over_bad_email() {
        let mut f = form();
        f.email = Some("not-an-email".to_string());
        f.name = None;
        assert_eq!(f.validate(), Err(ContactError::MissingFields));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut f = form();
        f.email = Some("ana@localhost".to_string());
        assert_eq!(f.validate(), Err(ContactError::InvalidEmail));
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("first..last@example.org"));
        assert!(!is_valid_email("@example.org"));
        assert!(!is_valid_email("ana@-example.org"));
        assert!(!is_valid_email("ana example@example.org"));
        assert!(!is_valid_email("ana@example..org"));
    }
}

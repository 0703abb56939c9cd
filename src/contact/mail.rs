use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ContactConfig;
use crate::contact::form::Suggestion;

/// Plain-text message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

impl MailMessage {
    pub fn headers(&self) -> Vec<String> {
        vec![
            format!("From: {}", self.from),
            format!("Reply-To: {}", self.reply_to),
            "Content-Type: text/plain; charset=UTF-8".to_string(),
        ]
    }
}

pub fn compose(suggestion: &Suggestion, config: &ContactConfig) -> MailMessage {
    let body = format!(
        "Nouvelle suggestion {}\n\n\
         Nom: {}\n\
         Email: {}\n\
         Lieu: {}\n\n\
         Pourquoi c'est solo-friendly:\n{}\n\n\
         Détails:\n{}\n",
        config.site_name,
        suggestion.name,
        suggestion.email,
        suggestion.place,
        suggestion.why,
        suggestion.details
    );
    MailMessage {
        to: config.recipient.clone(),
        from: config.sender.clone(),
        reply_to: suggestion.email.clone(),
        subject: config.subject.clone(),
        body,
        received_at: Utc::now(),
    }
}

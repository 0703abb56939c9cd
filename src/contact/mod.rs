pub mod form;
pub mod mail;
pub mod transport;

use tracing::{info, warn};

pub use form::{ContactError, ContactForm, Suggestion};
pub use mail::{compose, MailMessage};
pub use transport::{transport_for, LogTransport, MailTransport, MemoryTransport, WebhookTransport};

use crate::config::ContactConfig;

/// Validates, composes and hands the message to `transport`. Delivery
/// failures are logged and otherwise ignored.
pub async fn relay(
    form: &ContactForm,
    config: &ContactConfig,
    transport: &dyn MailTransport,
) -> Result<MailMessage, ContactError> {
    let suggestion = form.validate()?;
    let message = compose(&suggestion, config);
    if let Err(err) = transport.send(&message).await {
        warn!("failed sending suggestion mail: {err}");
    } else {
        info!("relayed suggestion for {}", suggestion.place);
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::*;

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        fn name(&self) -> &str {
            "failing"
        }

        async fn send(&self, _message: &MailMessage) -> Result<()> {
            Err(anyhow!("smtp down"))
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: Some("Ana".to_string()),
            email: Some("ana@example.be".to_string()),
            place: Some("Wiels".to_string()),
            why: Some("Expo au calme".to_string()),
            details: Some("Forest".to_string()),
        }
    }

    #[tokio::test]
    async fn relays_valid_submission() {
        let outbox = MemoryTransport::default();
        let message = relay(&form(), &ContactConfig::default(), &outbox)
            .await
            .expect("failed to relay");
        assert_eq!(outbox.sent(), vec![message]);
    }

    #[tokio::test]
    async fn transport_failure_is_not_an_error() {
        let result = relay(&form(), &ContactConfig::default(), &FailingTransport).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_submission_sends_nothing() {
        let outbox = MemoryTransport::default();
        let mut f = form();
        f.why = None;
        let result = relay(&f, &ContactConfig::default(), &outbox).await;
        assert_eq!(result, Err(ContactError::MissingFields));
        assert!(outbox.sent().is_empty());
    }
}

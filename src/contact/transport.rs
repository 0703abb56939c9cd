use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::catalog::http::HTTP_CLIENT;
use crate::contact::mail::MailMessage;

#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Writes the message to the log instead of delivering it.
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> Result<()> {
        info!(
            to = %message.to,
            reply_to = %message.reply_to,
            "[{}]\n{}",
            message.subject,
            message.body
        );
        Ok(())
    }
}

/// POSTs the message as JSON to an HTTP mail API.
pub struct WebhookTransport {
    client: Client,
    url: String,
}

impl WebhookTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl MailTransport for WebhookTransport {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.client
            .post(&self.url)
            .json(message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Keeps every message in memory. Handy for tests and dry runs.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl MemoryTransport {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow!("mail outbox lock poisoned"))?
            .push(message.clone());
        Ok(())
    }
}

pub fn transport_for(webhook_url: &str) -> Arc<dyn MailTransport> {
    if webhook_url.trim().is_empty() {
        Arc::new(LogTransport)
    } else {
        Arc::new(WebhookTransport::new(webhook_url.trim()))
    }
}

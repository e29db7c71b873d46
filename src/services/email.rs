use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Mail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// SMTP mailer for password-reset tokens. The token is sent as plaintext
/// body, no link and no HTML.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub async fn send_reset_token(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let from: Mailbox = self
            .config
            .username
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.config.username.clone()))?;
        let to: Mailbox = to
            .parse()
            .map_err(|_| EmailError::InvalidAddress(to.to_string()))?;

        let recipient = to.email.to_string();
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Password recovery")
            .body(format!("Your recovery token is: {token}"))?;

        let config = self.config.clone();

        // lettre's SMTP transport is blocking; keep it off the runtime.
        tokio::task::spawn_blocking(move || {
            let transport = SmtpTransport::starttls_relay(&config.host)?
                .port(config.port)
                .credentials(Credentials::new(config.username, config.password))
                .build();

            transport.send(&message).map(|_| ())
        })
        .await??;

        tracing::info!("Sent password reset email to {}", recipient);
        Ok(())
    }
}

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, Clone, thiserror::Error)]
pub enum RelayError {
    #[error("relay rejected credentials: {0}")]
    Authentication(String),

    #[error("{0}")]
    Relay(String),
}

/// Delivery seam for the contact pipeline. The production implementation
/// speaks SMTP to the configured relay; tests substitute a recording stub.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<(), RelayError>;
}

pub struct SmtpRelay {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SmtpRelay {
    pub fn new(host: String, port: u16, username: String, password: String) -> Self {
        SmtpRelay {
            host,
            port,
            username,
            password,
        }
    }
}

// 530/534/535 are the AUTH rejection replies; everything else the relay
// reports is a generic delivery failure.
fn classify(e: &lettre::transport::smtp::Error) -> RelayError {
    match e.status().map(|code| code.to_string()) {
        Some(code) if matches!(code.as_str(), "530" | "534" | "535") => {
            RelayError::Authentication(e.to_string())
        }
        _ => RelayError::Relay(e.to_string()),
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn deliver(&self, message: Message) -> Result<(), RelayError> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());

        // Plaintext connect on the configured port, STARTTLS upgrade, then
        // AUTH. A fresh transport per attempt; the connection is dropped once
        // the attempt finishes.
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| RelayError::Relay(e.to_string()))?
            .port(self.port)
            .credentials(creds)
            .build();

        mailer
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }
}

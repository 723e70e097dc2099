use crate::dto::{ContactRequest, ContactResponse};
use crate::relay::{MailRelay, RelayError};

use lettre::Message;
use lettre::address::AddressError;
use lettre::message::Mailbox;

use std::sync::Arc;

pub struct ContactService {
    sender: String,
    receiver: String,
    relay: Arc<dyn MailRelay>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Please fill in all required fields (email, subject, message).")]
    MissingFields,

    #[error("Relay rejected credentials: {0}")]
    Authentication(String),

    #[error("Relay failure: {0}")]
    Relay(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

fn mailbox(addr: &str) -> Result<Mailbox, ContactError> {
    addr.parse()
        .map_err(|e: AddressError| ContactError::Unexpected(e.to_string()))
}

impl ContactService {
    pub fn new(sender: String, receiver: String, relay: Arc<dyn MailRelay>) -> Self {
        ContactService {
            sender,
            receiver,
            relay,
        }
    }

    /// Validates the submission, composes the notification email and hands it
    /// to the relay. Exactly one delivery attempt is made; there is no retry.
    pub async fn submit(
        &self,
        request: ContactRequest,
    ) -> Result<ContactResponse, ContactError> {
        if request.email.is_empty() || request.subject.is_empty() || request.message.is_empty() {
            return Err(ContactError::MissingFields);
        }

        let email = self.compose(&request)?;

        tracing::info!(
            "Relaying contact submission from '{}' with subject '{}'",
            request.email,
            request.subject
        );

        match self.relay.deliver(email).await {
            Ok(()) => {}
            Err(RelayError::Authentication(diag)) => {
                return Err(ContactError::Authentication(diag));
            }
            Err(RelayError::Relay(diag)) => return Err(ContactError::Relay(diag)),
        }

        tracing::info!("Contact submission relayed to {}", self.receiver);

        Ok(ContactResponse {
            success: true,
            message: "Message sent successfully!".to_string(),
        })
    }

    // The submitter's address goes into the body only; the envelope recipient
    // is always the configured receiver.
    fn compose(&self, request: &ContactRequest) -> Result<Message, ContactError> {
        let body = format!(
            "New contact form submission from the portfolio website.\n\
             \n\
             ---------------------------\n\
             Sender Email: {}\n\
             Subject: {}\n\
             ---------------------------\n\
             \n\
             Message:\n\
             {}\n\
             \n\
             ---------------------------\n\
             This email was sent from the Portfolio Contact Form\n",
            request.email, request.subject, request.message
        );

        Message::builder()
            .from(mailbox(&self.sender)?)
            .to(mailbox(&self.receiver)?)
            .subject(format!("Portfolio Contact: {}", request.subject))
            .body(body)
            .map_err(|e| ContactError::Unexpected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::StubRelay;

    fn service(relay: Arc<StubRelay>) -> ContactService {
        ContactService::new(
            "portfolio@example.com".to_string(),
            "owner@example.com".to_string(),
            relay,
        )
    }

    fn request(email: &str, subject: &str, message: &str) -> ContactRequest {
        ContactRequest {
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_submission_with_any_missing_field() {
        let cases = [
            ("", "Hi", "Hello"),
            ("a@b.com", "", "Hello"),
            ("a@b.com", "Hi", ""),
            ("", "", ""),
        ];

        for (email, subject, message) in cases {
            let relay = StubRelay::accepting();
            let svc = service(relay.clone());

            let err = svc
                .submit(request(email, subject, message))
                .await
                .unwrap_err();

            assert!(matches!(err, ContactError::MissingFields));
            assert_eq!(relay.deliveries(), 0);
        }
    }

    #[tokio::test]
    async fn relays_valid_submission_to_configured_receiver() {
        let relay = StubRelay::accepting();
        let svc = service(relay.clone());

        let response = svc
            .submit(request("a@b.com", "Hi", "Hello"))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message, "Message sent successfully!");

        let sent = relay.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);

        let envelope = sent[0].envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "owner@example.com");

        let raw = String::from_utf8(sent[0].formatted()).unwrap();
        assert!(raw.contains("a@b.com"));
        assert!(raw.contains("Hi"));
        assert!(raw.contains("Hello"));
    }

    #[tokio::test]
    async fn maps_credential_rejection_to_authentication_error() {
        let relay = StubRelay::failing(RelayError::Authentication(
            "535 5.7.8 Username and Password not accepted".to_string(),
        ));
        let svc = service(relay.clone());

        let err = svc
            .submit(request("a@b.com", "Hi", "Hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::Authentication(_)));
    }

    #[tokio::test]
    async fn attempts_delivery_exactly_once_on_failure() {
        let relay = StubRelay::failing(RelayError::Relay("connection refused".to_string()));
        let svc = service(relay.clone());

        let err = svc
            .submit(request("a@b.com", "Hi", "Hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::Relay(_)));
        assert_eq!(relay.deliveries(), 1);
    }

    #[tokio::test]
    async fn invalid_submission_fails_the_same_way_every_time() {
        let relay = StubRelay::accepting();
        let svc = service(relay.clone());

        let first = svc.submit(request("", "Hi", "Hello")).await.unwrap_err();
        let second = svc.submit(request("", "Hi", "Hello")).await.unwrap_err();

        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(relay.deliveries(), 0);
    }

    #[tokio::test]
    async fn unparsable_sender_address_maps_to_unexpected() {
        let relay = StubRelay::accepting();
        let svc = ContactService::new(
            "not-an-address".to_string(),
            "owner@example.com".to_string(),
            relay.clone(),
        );

        let err = svc
            .submit(request("a@b.com", "Hi", "Hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ContactError::Unexpected(_)));
        assert_eq!(relay.deliveries(), 0);
    }

    #[tokio::test]
    async fn crlf_in_subject_never_escapes_classification() {
        let relay = StubRelay::accepting();
        let svc = service(relay.clone());

        let result = svc
            .submit(request(
                "a@b.com",
                "Hi\r\nBcc: spam@example.com",
                "Hello",
            ))
            .await;

        match result {
            Ok(_) | Err(ContactError::Unexpected(_)) => {}
            Err(e) => panic!("subject injection produced an unclassified outcome: {e}"),
        }
    }
}

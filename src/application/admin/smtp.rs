//! One-off SMTP connectivity check.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::input::FormInput;
use crate::application::messages;
use crate::application::options::{OptionStore, OptionStoreError};
use crate::application::sessions::AdminPrincipal;
use crate::domain::capabilities::Capability;
use crate::domain::settings::{ADMIN_EMAIL_OPTION, EMAIL_GENERAL_OPTION};
use crate::util::sanitize::is_blank;

pub const METRIC_SMTP_TESTS: &str = "erp_settings_smtp_tests_total";
pub const METRIC_SMTP_TEST_MS: &str = "erp_settings_smtp_test_ms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    Plain,
    /// TLS from the first byte.
    Ssl,
    /// STARTTLS, required.
    StartTls,
}

impl SmtpSecurity {
    pub fn from_authentication(value: &str) -> Self {
        match value {
            "ssl" => Self::Ssl,
            "tls" => Self::StartTls,
            _ => Self::Plain,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything needed to deliver one message through an ad-hoc server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub credentials: Option<SmtpCredentials>,
    pub from_email: String,
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MailSendError(pub String);

/// Delivers a message using the connection described by the message itself.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailSendError>;
}

#[derive(Debug, Error)]
pub enum SmtpTestError {
    #[error("{}", messages::PERMISSION_DENIED)]
    PermissionDenied,
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Send(#[from] MailSendError),
    #[error(transparent)]
    Store(#[from] OptionStoreError),
}

#[derive(Clone)]
pub struct AdminSmtpService {
    store: OptionStore,
    transport: Arc<dyn MailTransport>,
    site_admin_email: String,
}

impl AdminSmtpService {
    pub fn new(
        store: OptionStore,
        transport: Arc<dyn MailTransport>,
        site_admin_email: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            site_admin_email: site_admin_email.into(),
        }
    }

    /// Send the test message, returning the confirmation shown by the panel.
    pub async fn test_connection(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<String, SmtpTestError> {
        if !principal.can(Capability::ManageOptions) {
            return Err(SmtpTestError::PermissionDenied);
        }

        let mail = self.compose(principal, input).await?;
        let to = mail.to.clone();
        let host = mail.host.clone();

        let started_at = Instant::now();
        let result = self.transport.send(mail).await;
        histogram!(METRIC_SMTP_TEST_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(()) => {
                counter!(METRIC_SMTP_TESTS, "outcome" => "sent").increment(1);
                info!(target = "erp_settings::smtp", host = %host, to = %to, "smtp test mail sent");
                Ok(messages::smtp_test_sent(&to))
            }
            Err(err) => {
                counter!(METRIC_SMTP_TESTS, "outcome" => "failed").increment(1);
                warn!(target = "erp_settings::smtp", host = %host, error = %err, "smtp test mail failed");
                Err(err.into())
            }
        }
    }

    async fn compose(
        &self,
        principal: &AdminPrincipal,
        input: &FormInput,
    ) -> Result<OutgoingMail, SmtpTestError> {
        if !input.is_present("mail_server") {
            return Err(SmtpTestError::Invalid(messages::NO_HOST));
        }
        let host = input.text("mail_server");

        if !input.is_present("port") {
            return Err(SmtpTestError::Invalid(messages::NO_PORT));
        }
        let port = input
            .text("port")
            .parse::<u16>()
            .map_err(|_| SmtpTestError::Invalid(messages::INVALID_PORT))?;

        let authentication = input.text("authentication");
        let credentials = if authentication.is_empty() {
            None
        } else {
            if !input.is_present("username") {
                return Err(SmtpTestError::Invalid(messages::NO_USERNAME));
            }
            if !input.is_present("password") {
                return Err(SmtpTestError::Invalid(messages::NO_PASSWORD));
            }
            Some(SmtpCredentials {
                username: input.text("username"),
                password: input.raw("password").unwrap_or_default().trim().to_string(),
            })
        };

        let admin_email = match self.store.text(ADMIN_EMAIL_OPTION).await? {
            Some(email) => email,
            None => self.site_admin_email.clone(),
        };
        let to = match input.text("test_email") {
            to if !to.is_empty() => to,
            _ => admin_email.clone(),
        };
        if to.is_empty() {
            return Err(SmtpTestError::Invalid(messages::NO_RECIPIENT));
        }

        let sender = self.store.record(EMAIL_GENERAL_OPTION).await?;
        let from_email = sender
            .get_str("from_email")
            .filter(|value| !is_blank(value))
            .map(str::to_string)
            .unwrap_or(admin_email);
        let from_name = sender
            .get_str("from_name")
            .filter(|value| !is_blank(value))
            .map(str::to_string)
            .unwrap_or_else(|| principal.display_name.clone());

        Ok(OutgoingMail {
            host,
            port,
            security: SmtpSecurity::from_authentication(&authentication),
            credentials,
            from_email,
            from_name,
            to,
            subject: messages::SMTP_TEST_SUBJECT.to_string(),
            html_body: messages::SMTP_TEST_BODY.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::infra::memory::InMemoryOptionsRepo;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingMail>>,
        failure: Option<&'static str>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: OutgoingMail) -> Result<(), MailSendError> {
            if let Some(message) = self.failure {
                return Err(MailSendError(message.to_string()));
            }
            self.sent.lock().expect("transport lock").push(mail);
            Ok(())
        }
    }

    fn admin() -> AdminPrincipal {
        AdminPrincipal {
            user_id: Uuid::nil(),
            session_id: Uuid::nil(),
            display_name: "Ada Admin".into(),
            email: "ada@example.com".into(),
            capabilities: vec![Capability::ManageOptions],
        }
    }

    fn service(
        transport: Arc<RecordingTransport>,
    ) -> (AdminSmtpService, Arc<InMemoryOptionsRepo>) {
        let repo = Arc::new(InMemoryOptionsRepo::default());
        let svc = AdminSmtpService::new(
            OptionStore::new(repo.clone()),
            transport,
            "site@example.com",
        );
        (svc, repo)
    }

    async fn validation_error(fields: FormInput) -> String {
        let (svc, _) = service(Arc::new(RecordingTransport::default()));
        svc.test_connection(&admin(), &fields)
            .await
            .expect_err("validation should fail")
            .to_string()
    }

    #[tokio::test]
    async fn missing_recipient_is_reported_before_sending() {
        let transport = Arc::new(RecordingTransport::default());
        let svc = AdminSmtpService::new(
            OptionStore::new(Arc::new(InMemoryOptionsRepo::default())),
            transport.clone(),
            "",
        );

        let err = svc
            .test_connection(
                &admin(),
                &FormInput::from([("mail_server", "smtp.example.com"), ("port", "25")]),
            )
            .await
            .expect_err("no recipient");

        assert_eq!(err.to_string(), messages::NO_RECIPIENT);
        assert!(transport.sent.lock().expect("transport lock").is_empty());
    }

    #[tokio::test]
    async fn validation_reports_the_first_missing_field() {
        assert_eq!(
            validation_error(FormInput::from([("port", "25")])).await,
            messages::NO_HOST
        );
        assert_eq!(
            validation_error(FormInput::from([("mail_server", "smtp.example.com"), ("port", "0")]))
                .await,
            messages::NO_PORT
        );
        assert_eq!(
            validation_error(FormInput::from([
                ("mail_server", "smtp.example.com"),
                ("port", "70000"),
            ]))
            .await,
            messages::INVALID_PORT
        );
        assert_eq!(
            validation_error(FormInput::from([
                ("mail_server", "smtp.example.com"),
                ("port", "465"),
                ("authentication", "ssl"),
                ("password", "secret"),
            ]))
            .await,
            messages::NO_USERNAME
        );
        assert_eq!(
            validation_error(FormInput::from([
                ("mail_server", "smtp.example.com"),
                ("port", "465"),
                ("authentication", "ssl"),
                ("username", "mailer@example.com"),
            ]))
            .await,
            messages::NO_PASSWORD
        );
    }

    #[tokio::test]
    async fn sends_to_the_admin_address_with_configured_sender() {
        let transport = Arc::new(RecordingTransport::default());
        let (svc, repo) = service(transport.clone());
        repo.seed(ADMIN_EMAIL_OPTION, json!("owner@example.com"));
        repo.seed(EMAIL_GENERAL_OPTION, json!({ "from_name": "Acme HR" }));

        let message = svc
            .test_connection(
                &admin(),
                &FormInput::from([
                    ("mail_server", "smtp.example.com"),
                    ("port", "587"),
                    ("authentication", "tls"),
                    ("username", "mailer@example.com"),
                    ("password", "s3cret"),
                ]),
            )
            .await
            .expect("sent");

        assert_eq!(
            message,
            "Test email has been sent successfully to owner@example.com"
        );
        let sent = transport.sent.lock().expect("transport lock");
        let mail = &sent[0];
        assert_eq!(mail.security, SmtpSecurity::StartTls);
        assert_eq!(mail.from_email, "owner@example.com");
        assert_eq!(mail.from_name, "Acme HR");
        assert_eq!(mail.subject, messages::SMTP_TEST_SUBJECT);
        assert_eq!(
            mail.credentials,
            Some(SmtpCredentials {
                username: "mailer@example.com".into(),
                password: "s3cret".into(),
            })
        );
    }

    #[tokio::test]
    async fn plain_connection_without_authentication_uses_fallbacks() {
        let transport = Arc::new(RecordingTransport::default());
        let (svc, _) = service(transport.clone());

        svc.test_connection(
            &admin(),
            &FormInput::from([
                ("mail_server", "localhost"),
                ("port", "1025"),
                ("test_email", "qa@example.com"),
                ("username", "ignored"),
            ]),
        )
        .await
        .expect("sent");

        let sent = transport.sent.lock().expect("transport lock");
        let mail = &sent[0];
        assert_eq!(mail.to, "qa@example.com");
        assert_eq!(mail.security, SmtpSecurity::Plain);
        assert_eq!(mail.credentials, None);
        assert_eq!(mail.from_email, "site@example.com");
        assert_eq!(mail.from_name, "Ada Admin");
    }

    #[tokio::test]
    async fn transport_errors_are_returned_verbatim() {
        let transport = Arc::new(RecordingTransport {
            failure: Some("Connection refused (os error 111)"),
            ..RecordingTransport::default()
        });
        let (svc, _) = service(transport);

        let err = svc
            .test_connection(
                &admin(),
                &FormInput::from([("mail_server", "localhost"), ("port", "25")]),
            )
            .await
            .expect_err("send fails");

        assert!(matches!(err, SmtpTestError::Send(_)));
        assert_eq!(err.to_string(), "Connection refused (os error 111)");
    }
}

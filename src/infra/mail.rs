//! SMTP delivery backed by `lettre`.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use tracing::debug;

use crate::application::admin::smtp::{MailSendError, MailTransport, OutgoingMail, SmtpSecurity};

/// Builds a transport for every message and drops it once the message is sent.
#[derive(Debug, Clone, Default)]
pub struct LettreMailTransport {
    timeout: Option<Duration>,
}

impl LettreMailTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn transport(&self, mail: &OutgoingMail) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailSendError> {
        let tls = match mail.security {
            SmtpSecurity::Plain => Tls::None,
            SmtpSecurity::Ssl => Tls::Wrapper(tls_parameters(&mail.host)?),
            SmtpSecurity::StartTls => Tls::Required(tls_parameters(&mail.host)?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&mail.host)
            .port(mail.port)
            .tls(tls);
        if let Some(credentials) = &mail.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }
        if self.timeout.is_some() {
            builder = builder.timeout(self.timeout);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for LettreMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailSendError> {
        let message = build_message(&mail)?;
        let transport = self.transport(&mail)?;

        debug!(
            target = "erp_settings::mail",
            host = %mail.host,
            port = mail.port,
            security = ?mail.security,
            "sending mail"
        );
        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailSendError(err.to_string()))
    }
}

fn tls_parameters(host: &str) -> Result<TlsParameters, MailSendError> {
    TlsParameters::new(host.to_string()).map_err(|err| MailSendError(err.to_string()))
}

fn build_message(mail: &OutgoingMail) -> Result<Message, MailSendError> {
    let from = Mailbox::new(
        Some(mail.from_name.clone()),
        mail.from_email
            .parse()
            .map_err(|err| MailSendError(format!("Invalid address: {err}")))?,
    );
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|err| MailSendError(format!("Invalid address: {err}")))?;

    Message::builder()
        .from(from.clone())
        .sender(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .map_err(|err| MailSendError(err.to_string()))
}

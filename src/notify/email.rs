//! SMTP delivery for rendered messages.

use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::EmailSettings;

use super::templates::Rendered;

/// Errors that can occur when sending email.
#[derive(Debug)]
pub enum EmailError {
    /// Error building the email message.
    MessageError(String),
    /// Error sending the email.
    TransportError(String),
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailError::MessageError(e) => write!(f, "Failed to build email: {}", e),
            EmailError::TransportError(e) => write!(f, "Failed to send email: {}", e),
        }
    }
}

impl std::error::Error for EmailError {}

/// Sends rendered messages over SMTP.
#[derive(Clone)]
pub struct EmailSender {
    settings: EmailSettings,
}

impl EmailSender {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    pub async fn send(&self, to: &str, rendered: &Rendered) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.settings.from_name, self.settings.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::MessageError(format!("{}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| EmailError::MessageError(format!("{}", e)))?)
            .subject(&rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body.clone())
            .map_err(|e| EmailError::MessageError(e.to_string()))?;

        let transport = self.build_transport()?;

        transport
            .send(email)
            .await
            .map_err(|e| EmailError::TransportError(e.to_string()))?;

        Ok(())
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let mut builder = if self.settings.smtp_port == 465 {
            // SSL/TLS on port 465
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.smtp_host)
                .map_err(|e| EmailError::TransportError(e.to_string()))?
                .port(465)
        } else {
            // STARTTLS on port 587 or plain for local testing
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_host)
                .map_err(|e| EmailError::TransportError(e.to_string()))?
                .port(self.settings.smtp_port)
        };

        if let (Some(user), Some(pass)) = (&self.settings.smtp_user, &self.settings.smtp_pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

impl std::fmt::Debug for EmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSender")
            .field("smtp_host", &self.settings.smtp_host)
            .field("smtp_port", &self.settings.smtp_port)
            .field("from_email", &self.settings.from_email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_sender_new() {
        let sender = EmailSender::new(EmailSettings {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            ..EmailSettings::default()
        });

        assert_eq!(sender.settings.smtp_host, "localhost");
        assert_eq!(sender.settings.smtp_port, 1025);
    }

    #[test]
    fn test_email_error_display() {
        let err = EmailError::MessageError("invalid address".to_string());
        assert!(err.to_string().contains("invalid address"));

        let err = EmailError::TransportError("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}

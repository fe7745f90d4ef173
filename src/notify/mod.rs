//! Delivery channels for rendered messages.
//!
//! Channels are enabled per deployment. A disabled channel logs the message
//! and reports success so business operations behave the same with or
//! without real delivery wired up; an enabled channel that fails reports
//! `false`, never an error. Delivery results are advisory and must not
//! abort the operation that produced the message.

mod email;
pub mod templates;

pub use email::{EmailError, EmailSender};

use crate::config::Config;

use templates::Rendered;

/// Where a message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Messaging,
}

/// Per-channel delivery front. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationService {
    email: Option<EmailSender>,
    messaging_enabled: bool,
}

impl NotificationService {
    /// All channels disabled. Every send is a logged no-op that succeeds.
    pub fn disabled() -> Self {
        Self {
            email: None,
            messaging_enabled: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let email = config
            .email
            .enabled
            .then(|| EmailSender::new(config.email.clone()));
        Self {
            email,
            messaging_enabled: config.messaging_enabled,
        }
    }

    pub fn email_enabled(&self) -> bool {
        self.email.is_some()
    }

    /// Hands a rendered message to a channel. Returns whether delivery
    /// succeeded; a disabled channel succeeds by definition.
    pub async fn send(&self, channel: Channel, recipient: &str, rendered: &Rendered) -> bool {
        match channel {
            Channel::Email => match &self.email {
                Some(sender) => match sender.send(recipient, rendered).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!("email to {} failed: {}", recipient, e);
                        false
                    }
                },
                None => {
                    tracing::info!(
                        "[email disabled] to={} subject={}",
                        recipient,
                        rendered.subject
                    );
                    true
                }
            },
            Channel::Messaging => {
                if self.messaging_enabled {
                    // No messaging provider is wired up yet, so an enabled
                    // channel cannot actually deliver.
                    tracing::warn!("messaging channel enabled but no provider configured");
                    false
                } else {
                    tracing::info!(
                        "[messaging disabled] to={} message={}",
                        recipient,
                        rendered.body
                    );
                    true
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rendered() -> Rendered {
        templates::leave_approved(
            "Ada",
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_disabled_channels_report_success() {
        let service = NotificationService::disabled();
        assert!(service.send(Channel::Email, "ada@example.com", &rendered()).await);
        assert!(service.send(Channel::Messaging, "ada@example.com", &rendered()).await);
    }

    #[tokio::test]
    async fn test_enabled_messaging_without_provider_fails_softly() {
        let mut config = Config::default();
        config.messaging_enabled = true;

        let service = NotificationService::from_config(&config);
        assert!(!service.send(Channel::Messaging, "ada@example.com", &rendered()).await);
    }

    #[test]
    fn test_from_config_respects_email_flag() {
        let config = Config::default();
        assert!(!NotificationService::from_config(&config).email_enabled());

        let mut config = Config::default();
        config.email.enabled = true;
        assert!(NotificationService::from_config(&config).email_enabled());
    }
}

pub mod errors;
pub mod resend;

use crate::configuration::{ApiKey, DispatchMode, EmailSettings};
use crate::data_models::{ContactSubmission, EmailMessage};
use crate::templates;
use async_trait::async_trait;
pub use errors::EmailError;
pub use resend::ResendClient;
use std::sync::Arc;
use tracing::{error, info};

/// Something that can hand one email to the provider.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, credential: &ApiKey, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Turns an accepted submission into the configured set of emails and sends them in order.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn EmailTransport>,
    sender: String,
    operator_recipient: String,
    mode: DispatchMode,
}

impl Mailer {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        sender: impl Into<String>,
        operator_recipient: impl Into<String>,
        mode: DispatchMode,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            operator_recipient: operator_recipient.into(),
            mode,
        }
    }

    pub fn from_settings(transport: Arc<dyn EmailTransport>, settings: &EmailSettings) -> Self {
        Self::new(
            transport,
            settings.sender.clone(),
            settings.operator_recipient.clone(),
            settings.mode,
        )
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn notification(&self, submission: &ContactSubmission) -> EmailMessage {
        EmailMessage {
            from: self.sender.clone(),
            to: self.operator_recipient.clone(),
            reply_to: submission.email.clone(),
            subject: templates::NOTIFICATION_SUBJECT.to_string(),
            html: templates::notification_html(submission),
        }
    }

    pub fn acknowledgment(&self, submission: &ContactSubmission) -> EmailMessage {
        EmailMessage {
            from: self.sender.clone(),
            to: submission.email.clone(),
            reply_to: self.operator_recipient.clone(),
            subject: templates::ACKNOWLEDGMENT_SUBJECT.to_string(),
            html: templates::acknowledgment_html(submission),
        }
    }

    /// Sends the operator notification and, in acknowledgment mode, the auto-reply.
    /// The emails are independent: each one is attempted in order, and the
    /// first failure is reported once all of them have been tried.
    pub async fn dispatch(
        &self,
        credential: &ApiKey,
        submission: &ContactSubmission,
    ) -> Result<(), EmailError> {
        let mut messages = vec![self.notification(submission)];
        if self.mode == DispatchMode::NotifyAndAcknowledge {
            messages.push(self.acknowledgment(submission));
        }
        let mut first_failure = None;
        for message in &messages {
            match self.transport.send(credential, message).await {
                Ok(()) => info!(to = %message.to, subject = %message.subject, "email sent"),
                Err(err) => {
                    match &err {
                        EmailError::Status { status, body } => {
                            error!(to = %message.to, status, body = %body, "email provider rejected message")
                        }
                        EmailError::Transport(source) => {
                            error!(to = %message.to, error = %source, "email provider unreachable")
                        }
                    }
                    first_failure.get_or_insert(err);
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedTransport {
        fail_on: Option<usize>,
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl ScriptedTransport {
        fn new(fail_on: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                fail_on,
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().expect("poisoned mutex").clone()
        }
    }

    #[async_trait]
    impl EmailTransport for ScriptedTransport {
        async fn send(
            &self,
            _credential: &ApiKey,
            message: &EmailMessage,
        ) -> Result<(), EmailError> {
            let mut sent = self.sent.lock().expect("poisoned mutex");
            let attempt = sent.len();
            sent.push(message.clone());
            if self.fail_on == Some(attempt) {
                return Err(EmailError::Status {
                    status: 500,
                    body: "provider down".to_string(),
                });
            }
            Ok(())
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello".to_string(),
        }
    }

    fn mailer(transport: Arc<ScriptedTransport>, mode: DispatchMode) -> Mailer {
        Mailer::new(transport, "site@example.com", "owner@example.com", mode)
    }

    #[test]
    fn test_notification_addresses() {
        let mailer = mailer(ScriptedTransport::new(None), DispatchMode::Notify);
        let message = mailer.notification(&submission());
        assert_eq!(message.from, "site@example.com");
        assert_eq!(message.to, "owner@example.com");
        assert_eq!(message.reply_to, "ada@example.com");
        assert_eq!(message.subject, templates::NOTIFICATION_SUBJECT);
    }

    #[test]
    fn test_acknowledgment_addresses() {
        let mailer = mailer(ScriptedTransport::new(None), DispatchMode::Notify);
        let message = mailer.acknowledgment(&submission());
        assert_eq!(message.to, "ada@example.com");
        assert_eq!(message.reply_to, "owner@example.com");
        assert_eq!(message.subject, templates::ACKNOWLEDGMENT_SUBJECT);
    }

    #[tokio::test]
    async fn test_notify_sends_one_email() {
        let transport = ScriptedTransport::new(None);
        let mailer = mailer(transport.clone(), DispatchMode::Notify);
        mailer
            .dispatch(&ApiKey::new("re_test"), &submission())
            .await
            .unwrap();
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
    }

    #[tokio::test]
    async fn test_acknowledge_sends_notification_then_reply() {
        let transport = ScriptedTransport::new(None);
        let mailer = mailer(transport.clone(), DispatchMode::NotifyAndAcknowledge);
        mailer
            .dispatch(&ApiKey::new("re_test"), &submission())
            .await
            .unwrap();
        let recipients: Vec<_> = transport.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(recipients, vec!["owner@example.com", "ada@example.com"]);
    }

    #[tokio::test]
    async fn test_failed_notification_still_attempts_acknowledgment() {
        let transport = ScriptedTransport::new(Some(0));
        let mailer = mailer(transport.clone(), DispatchMode::NotifyAndAcknowledge);
        let result = mailer
            .dispatch(&ApiKey::new("re_test"), &submission())
            .await;
        assert!(matches!(result, Err(EmailError::Status { status: 500, .. })));
        let recipients: Vec<_> = transport.sent().into_iter().map(|m| m.to).collect();
        assert_eq!(recipients, vec!["owner@example.com", "ada@example.com"]);
    }

    #[tokio::test]
    async fn test_second_failure_fails_dispatch() {
        let transport = ScriptedTransport::new(Some(1));
        let mailer = mailer(transport.clone(), DispatchMode::NotifyAndAcknowledge);
        let result = mailer
            .dispatch(&ApiKey::new("re_test"), &submission())
            .await;
        assert!(result.is_err());
        assert_eq!(transport.sent().len(), 2);
    }
}

use crate::{
    core::traits::notifier::Mailer,
    notify::email::{Email, EmailBody},
};

/// Writes outgoing email to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct MailerStub;

#[async_trait::async_trait]
impl Mailer for MailerStub {
    async fn send(&self, email: &Email) -> Result<(), String> {
        let body = match &email.body {
            EmailBody::Lines(lines) => lines.join("\n"),
            EmailBody::Preformatted(text) => text.clone(),
        };
        tracing::info!(to = %email.to, subject = %email.subject, "Email:\n{}", body);
        Ok(())
    }
}

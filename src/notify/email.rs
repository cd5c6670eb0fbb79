use std::sync::Arc;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

use crate::core::traits::notifier::Mailer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBody {
    Lines(Vec<String>),
    /// Sent verbatim, rendered in a fixed-width block.
    Preformatted(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: EmailBody,
}

impl Email {
    pub fn new<S: Into<String>>(to: &str, subject: &str, lines: Vec<S>) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            body: EmailBody::Lines(lines.into_iter().map(Into::into).collect()),
        }
    }

    pub fn preformatted(to: &str, subject: &str, body: String) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            body: EmailBody::Preformatted(body),
        }
    }
}

/// Producer handle for outgoing email. Cloning shares the same consumer.
#[derive(Clone, Debug)]
pub struct EmailQueue {
    tx: UnboundedSender<Email>,
}

impl EmailQueue {
    pub fn channel() -> (Self, UnboundedReceiver<Email>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Never blocks. A closed consumer is logged and the email dropped.
    pub fn enqueue(&self, email: Email) {
        tracing::debug!("Enqueue email to {}: {}", email.to, email.subject);
        if let Err(e) = self.tx.send(email) {
            tracing::warn!("Email consumer is gone, dropping email to {}", e.0.to);
        }
    }
}

/// The single consumer behind an [`EmailQueue`]. Finishes once every
/// producer handle is dropped and the backlog is drained.
pub fn spawn_email_sender(
    mut rx: UnboundedReceiver<Email>,
    mailer: Arc<dyn Mailer>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(email) = rx.recv().await {
            if let Err(msg) = mailer.send(&email).await {
                tracing::error!("Failed to send email to {}: {}", email.to, msg);
            }
        }
    })
}

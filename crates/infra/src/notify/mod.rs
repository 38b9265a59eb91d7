//! Operations-mailbox notifications.
//!
//! Delivery is best effort: requests hand a [`Notification`] to the
//! [`NotificationOutbox`] and never wait for, or fail on, the result.

pub mod outbox;
pub mod sendgrid;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use outbox::{NotificationOutbox, OutboxHandle};
pub use sendgrid::SendGridNotifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Name and email of an account mentioned in a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub email: String,
}

/// Events the operations mailbox is told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SubuserAdded {
        owner: Party,
        subuser: Party,
        at: DateTime<Utc>,
    },
    SubuserRemoved {
        owner: Party,
        subuser: Party,
        at: DateTime<Utc>,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SubuserAdded { .. } => "subuser_added",
            Notification::SubuserRemoved { .. } => "subuser_removed",
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notification::SubuserAdded { owner, .. } => format!("Subuser added by {}", owner.name),
            Notification::SubuserRemoved { owner, .. } => format!("Subuser removed by {}", owner.name),
        }
    }

    pub fn html_body(&self) -> String {
        let (title, verb, owner, subuser, at) = match self {
            Notification::SubuserAdded { owner, subuser, at } => ("New subuser added", "added", owner, subuser, at),
            Notification::SubuserRemoved { owner, subuser, at } => ("Subuser removed", "removed", owner, subuser, at),
        };
        format!(
            "<h3>{title}</h3>\
             <p>Primary user: <b>{}</b> ({})</p>\
             <p>Subuser {verb}: <b>{}</b> ({})</p>\
             <p>Date: {}</p>",
            escape_html(&owner.name),
            escape_html(&owner.email),
            escape_html(&subuser.name),
            escape_html(&subuser.email),
            at.to_rfc3339(),
        )
    }
}

/// Escape text for an HTML element body or a double-quoted attribute.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Delivers a notification to a single recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that only logs. Used when no email provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            to,
            kind = notification.kind(),
            subject = %notification.subject(),
            "notification (log only)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added() -> Notification {
        Notification::SubuserAdded {
            owner: Party {
                name: "Ann".to_string(),
                email: "a@x.com".to_string(),
            },
            subuser: Party {
                name: "Carlos Ruiz".to_string(),
                email: "carlos.ruiz@lockera.com".to_string(),
            },
            at: Utc::now(),
        }
    }

    #[test]
    fn subject_names_the_owner() {
        assert_eq!(added().subject(), "Subuser added by Ann");
    }

    #[test]
    fn body_mentions_both_accounts() {
        let body = added().html_body();
        assert!(body.contains("<b>Ann</b> (a@x.com)"));
        assert!(body.contains("<b>Carlos Ruiz</b> (carlos.ruiz@lockera.com)"));
    }

    #[test]
    fn user_supplied_names_are_escaped() {
        let n = Notification::SubuserRemoved {
            owner: Party {
                name: "Ann & \"Co\"".to_string(),
                email: "a@x.com".to_string(),
            },
            subuser: Party {
                name: "<script>alert(1)</script> Ruiz".to_string(),
                email: "<script>alert(1)</script>.ruiz@lockera.com".to_string(),
            },
            at: Utc::now(),
        };

        let body = n.html_body();
        assert!(!body.contains("<script>"));
        assert!(body.contains("<b>Ann &amp; &quot;Co&quot;</b>"));
        assert!(body.contains("<b>&lt;script&gt;alert(1)&lt;/script&gt; Ruiz</b>"));
    }
}

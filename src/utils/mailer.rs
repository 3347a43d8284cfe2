use crate::model::leave::{Leave, LeaveStatus};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound channel for leave decisions. Delivery is best effort.
pub trait Notifier: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the application log instead of a mail server.
pub struct LogNotifier {
    sender: String,
}

impl LogNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Notifier for LogNotifier {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(sender = %self.sender, recipient, subject, "Outgoing notification");
        tracing::debug!(body, "Notification body");
        Ok(())
    }
}

pub fn decision_message(leave: &Leave) -> (String, String) {
    match leave.status {
        LeaveStatus::Rejected => (
            "Leave Rejected".to_string(),
            format!(
                "Hello {},\n\nYour leave request for {} day(s) has been REJECTED.\n\nReason: {}\n\nPlease contact faculty for more details.",
                leave.name, leave.days, leave.reason
            ),
        ),
        _ => (
            "Leave Approved".to_string(),
            format!(
                "Hello {},\n\nYour leave request for {} day(s) has been APPROVED.\n\nReason: {}\n\nThank you.",
                leave.name, leave.days, leave.reason
            ),
        ),
    }
}

/// Sends the decision email. Returns a warning for the user when delivery
/// failed; the decision itself stands either way.
pub fn notify_decision(notifier: &dyn Notifier, leave: &Leave) -> Option<String> {
    let (subject, body) = decision_message(leave);

    match notifier.send(&leave.email, &subject, &body) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, leave_id = leave.id, "Decision email not sent");
            let kind = match leave.status {
                LeaveStatus::Rejected => "rejection",
                _ => "approval",
            };
            Some(format!(
                "Failed to send {kind} email. Check mail configuration."
            ))
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Always fails, recording what it was asked to send
    #[derive(Default)]
    pub struct FailingNotifier {
        pub attempts: Mutex<Vec<String>>,
    }

    impl Notifier for FailingNotifier {
        fn send(&self, recipient: &str, _: &str, _: &str) -> Result<(), NotifyError> {
            self.attempts.lock().unwrap().push(recipient.to_string());
            Err(NotifyError("smtp unreachable".into()))
        }
    }

    fn leave(status: LeaveStatus) -> Leave {
        Leave {
            id: 9,
            student_id: 2,
            name: "Jane".into(),
            email: "jane@campus.edu".into(),
            days: 3,
            reason: "Conference".into(),
            document: None,
            status,
            approved_by: Some("Prof".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn message_matches_decision() {
        let (subject, body) = decision_message(&leave(LeaveStatus::Approved));
        assert_eq!(subject, "Leave Approved");
        assert!(body.contains("3 day(s) has been APPROVED"));

        let (subject, body) = decision_message(&leave(LeaveStatus::Rejected));
        assert_eq!(subject, "Leave Rejected");
        assert!(body.contains("REJECTED"));
        assert!(body.contains("Reason: Conference"));
    }

    #[test]
    fn failure_becomes_a_warning() {
        let notifier = FailingNotifier::default();
        let warning = notify_decision(&notifier, &leave(LeaveStatus::Rejected));
        assert_eq!(
            warning.as_deref(),
            Some("Failed to send rejection email. Check mail configuration.")
        );
        assert_eq!(*notifier.attempts.lock().unwrap(), vec!["jane@campus.edu"]);

        assert!(notify_decision(&LogNotifier::new("noreply@x"), &leave(LeaveStatus::Approved)).is_none());
    }
}

//! Message templates for payout account notifications.

use crate::server::model::notification::NotificationKind;

/// Default rejection text when the provider gives no reason.
pub const DEFAULT_REJECTION_REASON: &str = "No reason provided";

/// A notification rendered for every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    /// Push and in-app title.
    pub title: String,
    /// Push and in-app body.
    pub body: String,
    pub email_subject: String,
    pub email_body: String,
    /// SMS and WhatsApp text.
    pub text: String,
}

/// Renders `kind` for a contact of an academy.
///
/// # Arguments
/// - `kind` - Event to describe
/// - `contact_name` - Greeting name, the KYC contact
/// - `business_name` - Legal business name of the academy
pub fn render(kind: &NotificationKind, contact_name: &str, business_name: &str) -> RenderedNotification {
    match kind {
        NotificationKind::AccountCreated => RenderedNotification {
            title: "Payout account created".to_string(),
            body: format!(
                "Your payout account for {} has been created and is pending verification.",
                business_name
            ),
            email_subject: "Your payout account has been created".to_string(),
            email_body: format!(
                "Hi {},\n\nYour payout account for {} has been created. We'll let you know as soon as it has been verified.\n\nAdd your bank details to start receiving payouts.",
                contact_name, business_name
            ),
            text: format!(
                "Your payout account for {} has been created and is pending verification.",
                business_name
            ),
        },
        NotificationKind::BankDetailsUpdated => RenderedNotification {
            title: "Bank details updated".to_string(),
            body: "Your bank details were updated and are being submitted for verification."
                .to_string(),
            email_subject: "Your payout bank details were updated".to_string(),
            email_body: format!(
                "Hi {},\n\nThe bank details for {} were updated and are being submitted for verification.\n\nIf you didn't make this change, contact support immediately.",
                contact_name, business_name
            ),
            text: format!(
                "Bank details for {} were updated. If you didn't make this change, contact support.",
                business_name
            ),
        },
        NotificationKind::Activated => RenderedNotification {
            title: "Payout account activated".to_string(),
            body: "Your payout account is active. You can now receive payouts.".to_string(),
            email_subject: "Your payout account is active".to_string(),
            email_body: format!(
                "Hi {},\n\nGood news! The payout account for {} has been activated and can now receive payouts.",
                contact_name, business_name
            ),
            text: format!(
                "Your payout account for {} is active. You can now receive payouts.",
                business_name
            ),
        },
        NotificationKind::ActionRequired(requirements) => {
            let outstanding = requirements.join(", ");
            RenderedNotification {
                title: "Action required on your payout account".to_string(),
                body: format!("Please provide: {}", outstanding),
                email_subject: "Action required to activate your payout account".to_string(),
                email_body: format!(
                    "Hi {},\n\nTo activate the payout account for {}, please provide the following: {}.",
                    contact_name, business_name, outstanding
                ),
                text: format!(
                    "Action required for your payout account: {}",
                    outstanding
                ),
            }
        }
        NotificationKind::Rejected(reason) => {
            let reason = reason.as_deref().unwrap_or(DEFAULT_REJECTION_REASON);
            RenderedNotification {
                title: "Payout account rejected".to_string(),
                body: format!("Your payout account was rejected. Reason: {}", reason),
                email_subject: "Your payout account was rejected".to_string(),
                email_body: format!(
                    "Hi {},\n\nUnfortunately the payout account for {} was rejected.\n\nReason: {}\n\nContact support if you believe this is a mistake.",
                    contact_name, business_name, reason
                ),
                text: format!("Your payout account was rejected. Reason: {}", reason),
            }
        }
    }
}

pub use super::audit_trail::Entity as AuditTrail;
pub use super::notification::Entity as Notification;
pub use super::outbox_event::Entity as OutboxEvent;
pub use super::payout_account::Entity as PayoutAccount;
pub use super::user::Entity as User;

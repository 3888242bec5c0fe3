pub mod subscriptions;
pub mod users;

pub use subscriptions::Entity as Subscriptions;
pub use users::Entity as Users;

// Type aliases
pub type UserAccount = users::Model;
pub type SubscriptionRecord = subscriptions::Model;

pub use subscriptions::{BillingFrequency, UsageFrequency};

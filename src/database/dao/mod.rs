pub mod subscriptions;
pub mod users;

pub use subscriptions::SubscriptionsDao;
pub use users::UsersDao;

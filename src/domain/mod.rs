pub mod identity;
pub mod users;

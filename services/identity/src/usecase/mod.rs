pub mod account;
pub mod login;
pub mod passwordless;
pub mod reconcile;
pub mod session;
pub mod verify_link;

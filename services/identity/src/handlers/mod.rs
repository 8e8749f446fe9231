pub mod account;
pub mod envelope;
pub mod extract;
pub mod login;
pub mod passwordless;
pub mod token;
pub mod verify;

//! Session token and cookie contract shared by the identity service (issuer)
//! and anything that validates its tokens.

pub mod cookie;
pub mod token;

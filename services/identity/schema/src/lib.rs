//! sea-orm entities owned by the identity service.

pub mod outbox_events;
pub mod passwordless_codes;
pub mod project_roles;
pub mod project_stats;
pub mod projects;
pub mod provider_links;
pub mod users;

//! Domain aggregates exposed by the client service layer.

pub mod character;
pub mod chat;
pub mod client;
pub mod feedback;
pub mod member;
pub mod types;

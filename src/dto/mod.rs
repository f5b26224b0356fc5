//! View data shaped for the front-end panels.

pub mod chat;
pub mod feedback;
pub mod roster;

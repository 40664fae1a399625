//! Structured logging vocabulary shared by all layers.

pub mod events;
pub mod fields;

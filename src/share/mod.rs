//! Ephemeral token-based sharing of finished strips.

/// The expiring token -> image map.
pub mod store;

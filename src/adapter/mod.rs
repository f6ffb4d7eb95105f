//! Adapters around the workflow layer (hexagonal edges).

pub mod inbound;
pub mod outbound;

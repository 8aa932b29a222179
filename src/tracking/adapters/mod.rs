//! Adapter implementations for tracking ports.

pub mod json;
pub mod memory;

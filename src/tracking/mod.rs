//! Project and task time tracking.
//!
//! This module follows hexagonal architecture:
//!
//! - `domain`: projects, tasks, time periods, and the lifecycle machine
//! - `ports`: repository and issue tracker contracts
//! - `adapters`: in-memory and JSON document stores
//! - `services`: lifecycle orchestration with transition callbacks

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

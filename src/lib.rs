//! Timecard: personal command-line time tracking.
//!
//! Tasks live under projects and move through a validated lifecycle
//! (`unstarted`, `running`, `paused`, `finished`). Leaving `running` records
//! an immutable time period. Commands reach the lifecycle through a generic
//! dispatcher that separates routing mistakes from command failures.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (storage, trackers)
//!
//! # Modules
//!
//! - [`command`]: Command registry and dispatcher
//! - [`tracking`]: Projects, tasks, the lifecycle machine, and time periods
//! - [`cli`]: Session context, built-in commands, and the interactive shell
//! - [`config`]: User settings

pub mod cli;
pub mod command;
pub mod config;
pub mod tracking;

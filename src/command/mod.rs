//! Command registration and dispatch.
//!
//! Commands are registered with usage metadata and a handler. The
//! dispatcher resolves the first argument to a command, checks the
//! invocation shape, runs the handler, and reports routing mistakes as
//! structured errors distinct from handler failures.
//!
//! - `domain`: definitions, arity, errors, and argument-line splitting
//! - `ports`: the console a dispatcher writes to
//! - `registry`: the sorted help listing
//! - `services`: the dispatcher itself

pub mod domain;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
mod tests;

//! In-memory adapters.

mod state;
mod store;

pub(crate) use state::{TrackerDocument, TrackerState};
pub use store::InMemoryTrackerStore;

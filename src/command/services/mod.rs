//! Command dispatch services.

mod dispatcher;

pub use dispatcher::{DispatchOutcome, Dispatcher, Handler};

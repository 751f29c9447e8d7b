//! Console command handlers.
//!
//! These are the entry points a presentation layer invokes. Each command
//! reports its outcome through the notifier exactly once, then returns the
//! result so the caller can update its own view.

pub mod bulk;
pub mod imports;
pub mod jobs;
pub mod query;

pub use bulk::*;
pub use imports::*;
pub use jobs::*;
pub use query::*;

use crate::error::AppError;
use crate::notify::Notifier;

/// Reports `result`'s error, if any, and passes the result through.
pub(crate) fn reported<T>(notifier: &Notifier, result: Result<T, AppError>) -> Result<T, AppError> {
    if let Err(e) = &result {
        notifier.report(e);
    }
    result
}

//! The paginated job list: query reducer, debounced fetching, selection and
//! bulk actions.

mod bulk;
mod controller;
mod debounce;
mod query;
mod selection;

pub use bulk::{BulkAction, BulkCoordinator};
pub use controller::{ListController, ListSnapshot};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use query::{ListQuery, QueryPatch, SortDirection, StatusFilter, Transition};
pub use selection::Selection;

//! URL query-string state for a mounted view.

pub mod memory_router;
pub mod navigator;
pub mod query_parameter_set;
pub mod search_param_store;

pub use memory_router::MemoryRouter;
pub use navigator::{NavigateOptions, Navigator, ViewId};
pub use query_parameter_set::QueryParameterSet;
pub use search_param_store::{SearchParam, SearchParamStore};

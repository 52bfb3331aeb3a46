//! Loading and validating JSON task lists for code-range analysis.

mod loader;
mod schema;

pub use loader::{load_from_path, load_from_str, TaskError};
pub use schema::{TaskList, ValidationError, ValidationIssue};

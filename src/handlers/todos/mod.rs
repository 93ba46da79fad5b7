//! The todo request handlers: each operation resolves the acting user per
//! the scoping toggle, runs one store round-trip, and maps the outcome to a
//! response or an [`crate::error::ApiError`].

mod batch;
mod create;
mod delete;
mod list;
mod update;

pub use batch::batch;
pub use create::create;
pub use delete::delete;
pub use list::list;
pub use update::update;

/// Collection holding all todo items
pub const TODO_TABLE: &str = "todo_items";

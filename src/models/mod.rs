pub mod todo;

pub use todo::{NormalizeError, TodoCandidate, TodoPatch};

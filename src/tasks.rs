pub mod error;
pub mod task;
pub mod task_list;

pub use error::ValidationError;
pub use task::{Task, TaskId};
pub use task_list::TaskList;

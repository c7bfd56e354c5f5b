pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskView};
pub use user::{User, UserInput};

pub mod loaders;
pub mod question;
pub mod row;
pub mod submission;

pub use loaders::load_questions;
pub use question::Question;
pub use row::{ColumnLayout, WorkbookRow};
pub use submission::{Answer, SubmitRequest, Submission};

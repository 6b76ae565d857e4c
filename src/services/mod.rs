pub mod question_store;
pub mod submission_service;

pub use question_store::QuestionStore;
pub use submission_service::SubmissionService;

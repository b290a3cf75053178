pub mod assignment_service;
pub mod question_service;
pub mod submission_service;

pub use assignment_service::AssignmentService;
pub use question_service::QuestionService;
pub use submission_service::SubmissionService;

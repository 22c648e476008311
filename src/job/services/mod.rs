//! Application services for the job board.

mod board;

pub use board::{JobBoardService, JobServiceError, JobServiceResult, PostJobRequest};

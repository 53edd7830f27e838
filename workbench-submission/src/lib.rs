pub mod submission_controller;
pub mod submission_error;
pub mod submission_state;
pub mod workbench_session;

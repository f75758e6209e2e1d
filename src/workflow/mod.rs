pub mod busy;
pub mod submission;

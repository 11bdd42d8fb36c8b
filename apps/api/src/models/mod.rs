pub mod cv;
pub mod patch;

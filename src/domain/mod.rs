pub mod estimate;
pub mod project;
pub mod task;

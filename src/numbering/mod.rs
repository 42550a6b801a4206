pub mod format;
pub mod hierarchy;
pub mod write;

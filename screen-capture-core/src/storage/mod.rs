pub mod file_target;
pub mod metadata;

pub mod dir;
pub mod fd;
pub mod file;
pub mod structure_helpers;
pub mod types;

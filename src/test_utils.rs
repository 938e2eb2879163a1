use crate::fs::FileSystem;

pub fn test_fs() -> FileSystem {
    FileSystem::new_in_memory()
}

// The unique identifier of a node, which can be a file or a directory.
// Also known as inode in other file systems.
pub type Node = u64;

// An integer type for representing file sizes and offsets.
pub type FileSize = u64;

// The type of a node. A file and a directory may share a name inside the
// same parent, so the type takes part in every name lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileType {
    Directory,
    #[default]
    RegularFile,
}

// Contains metadata of a node. For regular files `size` always equals the
// byte length of the content buffer.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    pub node: Node,
    pub file_type: FileType,
    pub size: FileSize,
}

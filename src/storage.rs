use crate::{
    error::Error,
    storage::types::{FileSize, FileType, Metadata, Node},
};

pub mod transient;
pub mod types;

// Abstraction of the underlying storage layer.
pub trait Storage {
    // Get the root node ID of the storage.
    fn root_node(&self) -> Node;

    // Generate the next available node ID.
    fn new_node(&mut self) -> Node;

    // Get the metadata associated with the node.
    fn get_metadata(&self, node: Node) -> Result<Metadata, Error>;
    // Update the metadata associated with the node.
    fn put_metadata(&mut self, node: Node, metadata: Metadata);
    // Remove the metadata associated with the node.
    fn rm_metadata(&mut self, node: Node);

    // Look up a child of a directory by kind and name.
    fn get_child(&self, dir: Node, kind: FileType, name: &str) -> Result<Node, Error>;
    // Insert a child into a directory's name index, overwriting an entry
    // with the same kind and name.
    fn put_child(&mut self, dir: Node, kind: FileType, name: &str, child: Node);
    // Remove a child from a directory's name index.
    fn rm_child(&mut self, dir: Node, kind: FileType, name: &str) -> Result<Node, Error>;
    // Number of children of a directory.
    fn child_count(&self, dir: Node) -> usize;

    // Fill the buffer with file content starting at `offset`, returning the
    // number of bytes copied. Reading at or past the end yields 0 bytes.
    fn read_range(&self, node: Node, offset: FileSize, buf: &mut [u8]) -> Result<FileSize, Error>;
    // Write the buffer into the file content at `offset`, growing the file
    // as needed. A gap between the old size and `offset` reads as zeros.
    fn write_range(&mut self, node: Node, offset: FileSize, buf: &[u8]) -> Result<FileSize, Error>;
    // Reset the file content to 0 bytes and release its buffer.
    fn truncate(&mut self, node: Node);
    // Remove the content buffer of a deleted file node.
    fn rm_content(&mut self, node: Node);
}

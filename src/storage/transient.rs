use std::collections::BTreeMap;

use crate::{
    error::Error,
    name_index::NameIndex,
    storage::Storage,
    storage::types::{FileSize, FileType, Metadata, Node},
};

// The root node ID.
const ROOT_NODE: Node = 0;

// Storage backed entirely by process memory. All state is discarded when
// the instance is dropped.
#[derive(Debug)]
pub struct TransientStorage {
    // Node metadata information.
    metadata: BTreeMap<Node, Metadata>,
    // Name index for each of the directory nodes.
    children: BTreeMap<Node, NameIndex>,
    // Content buffer for each of the file nodes, created on first write.
    content: BTreeMap<Node, Vec<u8>>,
    // Next node ID.
    next_node: Node,
}

impl TransientStorage {
    // Initializes a new TransientStorage holding only the root directory.
    pub fn new() -> Self {
        let metadata = Metadata {
            node: ROOT_NODE,
            file_type: FileType::Directory,
            size: 0,
        };
        let mut result = Self {
            metadata: BTreeMap::new(),
            children: BTreeMap::new(),
            content: BTreeMap::new(),
            next_node: ROOT_NODE + 1,
        };
        result.put_metadata(ROOT_NODE, metadata);
        result
    }
}

impl Default for TransientStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for TransientStorage {
    fn root_node(&self) -> Node {
        ROOT_NODE
    }

    fn new_node(&mut self) -> Node {
        let result = self.next_node;
        self.next_node += 1;
        result
    }

    fn get_metadata(&self, node: Node) -> Result<Metadata, Error> {
        let value = self.metadata.get(&node).ok_or(Error::NotFound)?;
        Ok(value.clone())
    }

    fn put_metadata(&mut self, node: Node, metadata: Metadata) {
        self.next_node = self.next_node.max(node + 1);
        self.metadata.insert(node, metadata);
    }

    fn rm_metadata(&mut self, node: Node) {
        self.metadata.remove(&node);
        self.children.remove(&node);
    }

    fn get_child(&self, dir: Node, kind: FileType, name: &str) -> Result<Node, Error> {
        self.children
            .get(&dir)
            .and_then(|index| index.get(kind, name))
            .ok_or(Error::NotFound)
    }

    fn put_child(&mut self, dir: Node, kind: FileType, name: &str, child: Node) {
        self.children
            .entry(dir)
            .or_insert_with(NameIndex::new)
            .insert(kind, name, child);
    }

    fn rm_child(&mut self, dir: Node, kind: FileType, name: &str) -> Result<Node, Error> {
        self.children
            .get_mut(&dir)
            .and_then(|index| index.remove(kind, name))
            .ok_or(Error::NotFound)
    }

    fn child_count(&self, dir: Node) -> usize {
        self.children.get(&dir).map_or(0, NameIndex::len)
    }

    fn read_range(&self, node: Node, offset: FileSize, buf: &mut [u8]) -> Result<FileSize, Error> {
        let Some(content) = self.content.get(&node) else {
            return Ok(0);
        };
        let offset = offset as usize;
        if offset >= content.len() {
            return Ok(0);
        }
        let to_copy = (content.len() - offset).min(buf.len());
        buf[..to_copy].copy_from_slice(&content[offset..offset + to_copy]);
        Ok(to_copy as FileSize)
    }

    fn write_range(&mut self, node: Node, offset: FileSize, buf: &[u8]) -> Result<FileSize, Error> {
        let metadata = self.metadata.get_mut(&node).ok_or(Error::NotFound)?;
        let content = self.content.entry(node).or_default();

        let end = offset as usize + buf.len();
        if end > content.len() {
            // growth zero-fills, which also materializes any gap between
            // the old end and `offset`
            content.resize(end, 0);
        }
        content[offset as usize..end].copy_from_slice(buf);
        metadata.size = content.len() as FileSize;

        Ok(buf.len() as FileSize)
    }

    fn truncate(&mut self, node: Node) {
        if let Some(metadata) = self.metadata.get_mut(&node) {
            metadata.size = 0;
        }
        self.content.remove(&node);
    }

    fn rm_content(&mut self, node: Node) {
        self.content.remove(&node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_node(storage: &mut TransientStorage) -> Node {
        let node = storage.new_node();
        storage.put_metadata(
            node,
            Metadata {
                node,
                file_type: FileType::RegularFile,
                size: 0,
            },
        );
        node
    }

    #[test]
    fn write_then_read_range() {
        let mut storage = TransientStorage::new();
        let node = file_node(&mut storage);

        storage.write_range(node, 0, &[42; 10]).unwrap();
        let mut buf = [0; 10];
        let read = storage.read_range(node, 0, &mut buf).unwrap();
        assert_eq!(read, 10);
        assert_eq!(buf, [42; 10]);
        assert_eq!(storage.get_metadata(node).unwrap().size, 10);
    }

    #[test]
    fn sparse_write_zero_fills_gap() {
        let mut storage = TransientStorage::new();
        let node = file_node(&mut storage);

        storage.write_range(node, 10, &[7, 8, 9]).unwrap();
        assert_eq!(storage.get_metadata(node).unwrap().size, 13);

        let mut buf = [0xff; 13];
        let read = storage.read_range(node, 0, &mut buf).unwrap();
        assert_eq!(read, 13);
        assert_eq!(&buf[0..10], &[0; 10]);
        assert_eq!(&buf[10..13], &[7, 8, 9]);
    }

    #[test]
    fn read_past_end_yields_zero_bytes() {
        let mut storage = TransientStorage::new();
        let node = file_node(&mut storage);

        storage.write_range(node, 0, &[1, 2, 3]).unwrap();
        let mut buf = [0; 4];
        assert_eq!(storage.read_range(node, 3, &mut buf).unwrap(), 0);
        assert_eq!(storage.read_range(node, 100, &mut buf).unwrap(), 0);

        // partial read at the boundary
        assert_eq!(storage.read_range(node, 2, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
    }

    #[test]
    fn truncate_releases_content() {
        let mut storage = TransientStorage::new();
        let node = file_node(&mut storage);

        storage.write_range(node, 0, &[1; 100]).unwrap();
        storage.truncate(node);

        assert_eq!(storage.get_metadata(node).unwrap().size, 0);
        let mut buf = [0; 8];
        assert_eq!(storage.read_range(node, 0, &mut buf).unwrap(), 0);
    }

    #[test]
    fn child_index_per_directory() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();
        let node = file_node(&mut storage);

        assert_eq!(storage.child_count(root), 0);
        storage.put_child(root, FileType::RegularFile, "a", node);
        assert_eq!(storage.child_count(root), 1);
        assert_eq!(
            storage.get_child(root, FileType::RegularFile, "a").unwrap(),
            node
        );
        assert_eq!(
            storage.get_child(root, FileType::Directory, "a"),
            Err(Error::NotFound)
        );

        assert_eq!(
            storage.rm_child(root, FileType::RegularFile, "a").unwrap(),
            node
        );
        assert_eq!(storage.child_count(root), 0);
    }
}

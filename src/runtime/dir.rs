use crate::{
    error::Error,
    runtime::types::OpenFlags,
    storage::{
        Storage,
        types::{FileType, Node},
    },
};

// An opened directory. Directories carry no cursor; the entry exists so a
// descriptor can pin a directory against removal.
#[derive(Clone, Debug)]
pub struct Dir {
    pub node: Node,
    pub flags: OpenFlags,
}

impl Dir {
    // Create a new directory entry. The node must be a directory.
    pub fn new(node: Node, flags: OpenFlags, storage: &dyn Storage) -> Result<Self, Error> {
        let metadata = storage.get_metadata(node)?;
        if metadata.file_type != FileType::Directory {
            return Err(Error::NotADirectory);
        }
        Ok(Self { node, flags })
    }

    pub fn is_empty(&self, storage: &dyn Storage) -> bool {
        storage.child_count(self.node) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{transient::TransientStorage, types::Metadata};

    #[test]
    fn rejects_file_nodes() {
        let mut storage = TransientStorage::new();
        let node = storage.new_node();
        storage.put_metadata(
            node,
            Metadata {
                node,
                file_type: FileType::RegularFile,
                size: 0,
            },
        );

        let err = Dir::new(node, OpenFlags::READ_ONLY, &storage).unwrap_err();
        assert_eq!(err, Error::NotADirectory);

        let root = Dir::new(storage.root_node(), OpenFlags::READ_ONLY, &storage).unwrap();
        assert!(root.is_empty(&storage));
    }
}

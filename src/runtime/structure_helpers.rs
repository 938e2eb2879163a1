use std::collections::BTreeMap;

use crate::{
    error::Error,
    path::CanonicalPath,
    storage::{
        Storage,
        types::{FileType, Metadata, Node},
    },
};

// Resolve a canonical path to a node. Intermediate segments must resolve
// as directories; the leaf resolves as `leaf_kind`. The root path resolves
// to the root node regardless of the requested kind.
pub fn find_node(
    root: Node,
    path: &CanonicalPath,
    leaf_kind: FileType,
    storage: &dyn Storage,
) -> Result<Node, Error> {
    if path.is_root() {
        return Ok(root);
    }
    let (parent, leaf) = find_parent(root, path, storage)?;
    storage.get_child(parent, leaf_kind, leaf)
}

// Resolve all but the last path segment, returning the parent directory
// node and the leaf name. The path must not be the root.
pub fn find_parent<'a>(
    root: Node,
    path: &'a CanonicalPath,
    storage: &dyn Storage,
) -> Result<(Node, &'a str), Error> {
    let leaf = path.leaf().ok_or(Error::MalformedPath)?;
    let mut cur = root;
    for segment in path.parent_segments() {
        cur = lookup_dir(cur, segment, storage)?;
    }
    Ok((cur, leaf))
}

fn lookup_dir(dir: Node, name: &str, storage: &dyn Storage) -> Result<Node, Error> {
    match storage.get_child(dir, FileType::Directory, name) {
        Ok(node) => Ok(node),
        Err(Error::NotFound) => {
            // a file standing where a directory is needed is a type
            // mismatch, not a plain miss
            if storage.get_child(dir, FileType::RegularFile, name).is_ok() {
                Err(Error::NotADirectory)
            } else {
                Err(Error::NotFound)
            }
        }
        Err(err) => Err(err),
    }
}

// Create a new node under `parent`. The name must not already be occupied
// by an entry of the same kind. Missing intermediate directories are never
// created implicitly.
pub fn create_node(
    parent: Node,
    name: &str,
    file_type: FileType,
    storage: &mut dyn Storage,
) -> Result<Node, Error> {
    let parent_meta = storage.get_metadata(parent)?;
    if parent_meta.file_type != FileType::Directory {
        return Err(Error::NotADirectory);
    }
    match storage.get_child(parent, file_type, name) {
        Ok(_) => return Err(Error::AlreadyExists),
        Err(Error::NotFound) => {}
        Err(err) => return Err(err),
    }

    let node = storage.new_node();
    storage.put_metadata(
        node,
        Metadata {
            node,
            file_type,
            size: 0,
        },
    );
    storage.put_child(parent, file_type, name, node);
    Ok(node)
}

// Remove the child named `name` of kind `expect` from `parent`.
//
// name            The name of the entry to delete.
// expect          The entry kind the caller asked to remove; a same-named
//                 entry of the other kind yields a type-mismatch error.
// node_refcount   Live descriptor counts; a referenced node is busy and
//                 cannot be removed.
pub fn rm_node(
    parent: Node,
    name: &str,
    expect: FileType,
    node_refcount: &BTreeMap<Node, usize>,
    storage: &mut dyn Storage,
) -> Result<(), Error> {
    let node = match storage.get_child(parent, expect, name) {
        Ok(node) => node,
        Err(Error::NotFound) => {
            let (other, mismatch) = match expect {
                FileType::Directory => (FileType::RegularFile, Error::NotADirectory),
                FileType::RegularFile => (FileType::Directory, Error::IsADirectory),
            };
            return if storage.get_child(parent, other, name).is_ok() {
                Err(mismatch)
            } else {
                Err(Error::NotFound)
            };
        }
        Err(err) => return Err(err),
    };

    if expect == FileType::Directory && storage.child_count(node) > 0 {
        return Err(Error::DirectoryNotEmpty);
    }
    if node_refcount.get(&node).copied().unwrap_or(0) > 0 {
        return Err(Error::ResourceBusy);
    }

    storage.rm_child(parent, expect, name)?;
    storage.rm_content(node);
    storage.rm_metadata(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::transient::TransientStorage;

    fn path(raw: &str) -> CanonicalPath {
        CanonicalPath::new(raw).unwrap()
    }

    #[test]
    fn create_and_find_nested() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();

        let a = create_node(root, "a", FileType::Directory, &mut storage).unwrap();
        let b = create_node(a, "b", FileType::Directory, &mut storage).unwrap();
        let f = create_node(b, "f.txt", FileType::RegularFile, &mut storage).unwrap();

        assert_eq!(
            find_node(root, &path("/a"), FileType::Directory, &storage).unwrap(),
            a
        );
        assert_eq!(
            find_node(root, &path("/a/b"), FileType::Directory, &storage).unwrap(),
            b
        );
        assert_eq!(
            find_node(root, &path("/a/b/f.txt"), FileType::RegularFile, &storage).unwrap(),
            f
        );
        assert_eq!(
            find_node(root, &path("/"), FileType::Directory, &storage).unwrap(),
            root
        );
        assert_eq!(
            find_node(root, &path("/a/missing"), FileType::RegularFile, &storage),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn same_kind_duplicate_rejected() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();

        create_node(root, "a", FileType::Directory, &mut storage).unwrap();
        assert_eq!(
            create_node(root, "a", FileType::Directory, &mut storage),
            Err(Error::AlreadyExists)
        );
        // a file may coexist with a directory of the same name
        create_node(root, "a", FileType::RegularFile, &mut storage).unwrap();
        assert_eq!(
            create_node(root, "a", FileType::RegularFile, &mut storage),
            Err(Error::AlreadyExists)
        );
    }

    #[test]
    fn file_as_intermediate_segment_is_type_mismatch() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();

        create_node(root, "f", FileType::RegularFile, &mut storage).unwrap();
        assert_eq!(
            find_parent(root, &path("/f/child"), &storage),
            Err(Error::NotADirectory)
        );
        assert_eq!(
            find_parent(root, &path("/g/child"), &storage),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn remove_checks_kind_and_emptiness() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();
        let empty_refs = BTreeMap::new();

        let a = create_node(root, "a", FileType::Directory, &mut storage).unwrap();
        create_node(a, "b", FileType::Directory, &mut storage).unwrap();
        create_node(root, "f", FileType::RegularFile, &mut storage).unwrap();

        assert_eq!(
            rm_node(root, "a", FileType::RegularFile, &empty_refs, &mut storage),
            Err(Error::IsADirectory)
        );
        assert_eq!(
            rm_node(root, "f", FileType::Directory, &empty_refs, &mut storage),
            Err(Error::NotADirectory)
        );
        assert_eq!(
            rm_node(root, "a", FileType::Directory, &empty_refs, &mut storage),
            Err(Error::DirectoryNotEmpty)
        );

        rm_node(a, "b", FileType::Directory, &empty_refs, &mut storage).unwrap();
        rm_node(root, "a", FileType::Directory, &empty_refs, &mut storage).unwrap();
        rm_node(root, "f", FileType::RegularFile, &empty_refs, &mut storage).unwrap();
        assert_eq!(storage.child_count(root), 0);
    }

    #[test]
    fn referenced_node_is_busy() {
        let mut storage = TransientStorage::new();
        let root = storage.root_node();

        let f = create_node(root, "f", FileType::RegularFile, &mut storage).unwrap();
        let refs = BTreeMap::from([(f, 1usize)]);

        assert_eq!(
            rm_node(root, "f", FileType::RegularFile, &refs, &mut storage),
            Err(Error::ResourceBusy)
        );

        let refs = BTreeMap::new();
        rm_node(root, "f", FileType::RegularFile, &refs, &mut storage).unwrap();
    }
}

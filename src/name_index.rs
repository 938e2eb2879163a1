use std::collections::HashMap;

use crate::storage::types::{FileType, Node};

// Per-directory name lookup structure. Files and directories resolve
// separately, so one directory may hold a file and a subdirectory under
// the same name.
#[derive(Debug, Default, Clone)]
pub(crate) struct NameIndex {
    files: HashMap<String, Node>,
    dirs: HashMap<String, Node>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: FileType) -> &HashMap<String, Node> {
        match kind {
            FileType::RegularFile => &self.files,
            FileType::Directory => &self.dirs,
        }
    }

    fn map_mut(&mut self, kind: FileType) -> &mut HashMap<String, Node> {
        match kind {
            FileType::RegularFile => &mut self.files,
            FileType::Directory => &mut self.dirs,
        }
    }

    // Insert an entry, overwriting the previous node under the same kind
    // and name. Returns the replaced node, if any.
    pub fn insert(&mut self, kind: FileType, name: &str, node: Node) -> Option<Node> {
        self.map_mut(kind).insert(name.to_string(), node)
    }

    pub fn get(&self, kind: FileType, name: &str) -> Option<Node> {
        self.map(kind).get(name).copied()
    }

    pub fn remove(&mut self, kind: FileType, name: &str) -> Option<Node> {
        self.map_mut(kind).remove(name)
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.dirs.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::Error,
    runtime::{dir::Dir, file::File, types::Fd},
    storage::types::Node,
};

// Upper bound on simultaneously open descriptors.
pub const MAX_OPEN_FILES: usize = 65536;

pub enum FdEntry {
    File(File),
    Dir(Dir),
}

impl FdEntry {
    fn node(&self) -> Node {
        match self {
            FdEntry::File(file) => file.node,
            FdEntry::Dir(dir) => dir.node,
        }
    }
}

pub struct FdTable {
    table: BTreeMap<Fd, FdEntry>,
    node_refcount: BTreeMap<Node, usize>,
    next_fd: Fd,
    free_fds: BTreeSet<Fd>,
}

impl FdTable {
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
            node_refcount: BTreeMap::new(),
            next_fd: 0,
            free_fds: BTreeSet::new(),
        }
    }

    // Live descriptor count per node; gates deletion of open files.
    pub fn node_refcount(&self) -> &BTreeMap<Node, usize> {
        &self.node_refcount
    }

    pub fn get(&self, fd: Fd) -> Option<&FdEntry> {
        self.table.get(&fd)
    }

    pub fn is_full(&self) -> bool {
        self.table.len() >= MAX_OPEN_FILES
    }

    // Replace the entry stored under an open descriptor (cursor updates
    // after read/write/seek).
    pub fn update(&mut self, fd: Fd, entry: FdEntry) {
        self.insert(fd, entry);
    }

    fn insert(&mut self, fd: Fd, entry: FdEntry) -> Option<FdEntry> {
        self.inc_node_refcount(&entry);
        let prev_entry = self.table.insert(fd, entry);
        if let Some(prev_entry) = prev_entry.as_ref() {
            self.dec_node_refcount(prev_entry);
        }
        prev_entry
    }

    // Allocate the lowest free descriptor for the entry.
    pub fn open(&mut self, entry: FdEntry) -> Result<Fd, Error> {
        if self.is_full() {
            return Err(Error::TooManyOpenFiles);
        }
        let fd = match self.free_fds.pop_first() {
            Some(fd) => fd,
            None => {
                let fd = self.next_fd;
                self.next_fd += 1;
                fd
            }
        };
        let prev = self.insert(fd, entry);
        debug_assert!(prev.is_none());
        Ok(fd)
    }

    pub fn close(&mut self, fd: Fd) -> Result<FdEntry, Error> {
        let entry = self.table.remove(&fd).ok_or(Error::BadDescriptor)?;
        self.free_fds.insert(fd);
        self.dec_node_refcount(&entry);
        Ok(entry)
    }

    fn inc_node_refcount(&mut self, entry: &FdEntry) {
        let refcount = self.node_refcount.entry(entry.node()).or_default();
        *refcount += 1;
    }

    fn dec_node_refcount(&mut self, entry: &FdEntry) {
        let node = entry.node();
        if let Some(mut refcount) = self.node_refcount.remove(&node) {
            refcount -= 1;
            if refcount > 0 {
                self.node_refcount.insert(node, refcount);
            }
        }
    }
}

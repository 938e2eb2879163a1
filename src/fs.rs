use tracing::debug;

use crate::{
    error::Error,
    path::CanonicalPath,
    runtime::{
        dir::Dir,
        fd::{FdEntry, FdTable},
        file::File,
        structure_helpers::{create_node, find_node, find_parent, rm_node},
    },
    storage::{
        Storage,
        transient::TransientStorage,
        types::{FileSize, FileType, Metadata, Node},
    },
};

pub use crate::runtime::types::{Fd, OpenFlags, Whence};

// The main class implementing the API to work with the file system.
pub struct FileSystem {
    fd_table: FdTable,
    pub storage: Box<dyn Storage>,
}

impl FileSystem {
    // Create a new file system hosted on a given storage implementation.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            fd_table: FdTable::new(),
            storage,
        }
    }

    // Create a new file system backed by process memory.
    pub fn new_in_memory() -> Self {
        Self::new(Box::new(TransientStorage::new()))
    }

    // Get the path of the root folder.
    pub fn root_path(&self) -> &str {
        "/"
    }

    fn get_file(&self, fd: Fd) -> Result<File, Error> {
        match self.fd_table.get(fd) {
            Some(FdEntry::File(file)) => Ok(file.clone()),
            Some(FdEntry::Dir(_)) => Err(Error::IsADirectory),
            None => Err(Error::BadDescriptor),
        }
    }

    fn put_file(&mut self, fd: Fd, file: File) {
        self.fd_table.update(fd, FdEntry::File(file))
    }

    fn get_node(&self, fd: Fd) -> Result<Node, Error> {
        match self.fd_table.get(fd) {
            Some(FdEntry::File(file)) => Ok(file.node),
            Some(FdEntry::Dir(dir)) => Ok(dir.node),
            None => Err(Error::BadDescriptor),
        }
    }

    // Open a file or directory and return its new file descriptor. A
    // missing file is created when the flags say so; directories are never
    // created through open.
    pub fn open(&mut self, path: &str, flags: OpenFlags) -> Result<Fd, Error> {
        flags.check_access_mode()?;
        let path = CanonicalPath::new(path)?;
        debug!(%path, ?flags, "open");

        // checked up front so a create or truncate never happens for a
        // descriptor that cannot be allocated
        if self.fd_table.is_full() {
            return Err(Error::TooManyOpenFiles);
        }

        let root = self.storage.root_node();
        if path.is_root() {
            return self.open_dir_node(root, flags);
        }

        match find_node(root, &path, FileType::RegularFile, self.storage.as_ref()) {
            Ok(node) => self.open_file_node(node, flags),
            Err(Error::NotFound) => {
                // creation takes precedence over a same-named directory;
                // the name lookup is keyed by kind, so both may coexist
                if flags.contains(OpenFlags::CREATE) {
                    let (parent, leaf) = find_parent(root, &path, self.storage.as_ref())?;
                    let node =
                        create_node(parent, leaf, FileType::RegularFile, self.storage.as_mut())?;
                    return self.open_file_node(node, flags);
                }
                let node = find_node(root, &path, FileType::Directory, self.storage.as_ref())?;
                self.open_dir_node(node, flags)
            }
            Err(err) => Err(err),
        }
    }

    fn open_file_node(&mut self, node: Node, flags: OpenFlags) -> Result<Fd, Error> {
        // truncation requires a writable mode; otherwise the flag is inert
        if flags.contains(OpenFlags::TRUNCATE) && flags.can_write() {
            self.storage.truncate(node);
        }
        let file = File::new(node, flags, self.storage.as_ref())?;
        self.fd_table.open(FdEntry::File(file))
    }

    fn open_dir_node(&mut self, node: Node, flags: OpenFlags) -> Result<Fd, Error> {
        if flags.can_write() || flags.contains(OpenFlags::TRUNCATE) {
            return Err(Error::IsADirectory);
        }
        let dir = Dir::new(node, flags, self.storage.as_ref())?;
        self.fd_table.open(FdEntry::Dir(dir))
    }

    // Close the opened file and release the corresponding file descriptor.
    pub fn close(&mut self, fd: Fd) -> Result<(), Error> {
        debug!(fd, "close");
        self.fd_table.close(fd)?;
        Ok(())
    }

    // Read file `fd` contents into `buf` at the cursor, advancing the
    // cursor by the number of bytes read.
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<FileSize, Error> {
        let mut file = self.get_file(fd)?;
        if !file.flags.can_read() {
            return Err(Error::AccessDenied);
        }
        let read_size = file.read_with_cursor(buf, self.storage.as_ref())?;
        self.put_file(fd, file);
        Ok(read_size)
    }

    // Write `buf` contents into the file at the cursor, advancing the
    // cursor by the number of bytes written.
    pub fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<FileSize, Error> {
        let mut file = self.get_file(fd)?;
        if !file.flags.can_write() {
            return Err(Error::AccessDenied);
        }
        let written_size = file.write_with_cursor(buf, self.storage.as_mut())?;
        self.put_file(fd, file);
        Ok(written_size)
    }

    // Position the file cursor, returning the new position.
    pub fn seek(&mut self, fd: Fd, delta: i64, whence: Whence) -> Result<FileSize, Error> {
        let mut file = self.get_file(fd)?;
        let pos = file.seek(delta, whence, self.storage.as_ref())?;
        self.put_file(fd, file);
        Ok(pos)
    }

    // Get the current file cursor position.
    pub fn tell(&self, fd: Fd) -> Result<FileSize, Error> {
        let file = self.get_file(fd)?;
        Ok(file.tell())
    }

    // Get the metadata for a given file descriptor.
    pub fn metadata(&self, fd: Fd) -> Result<Metadata, Error> {
        let node = self.get_node(fd)?;
        self.storage.get_metadata(node)
    }

    // Create a new directory. The parent directory must already exist.
    pub fn create_dir(&mut self, path: &str) -> Result<(), Error> {
        let path = CanonicalPath::new(path)?;
        debug!(%path, "create_dir");
        if path.is_root() {
            return Err(Error::AlreadyExists);
        }
        let (parent, leaf) = find_parent(self.storage.root_node(), &path, self.storage.as_ref())?;
        create_node(parent, leaf, FileType::Directory, self.storage.as_mut())?;
        Ok(())
    }

    // Remove an empty, unreferenced directory.
    pub fn remove_dir(&mut self, path: &str) -> Result<(), Error> {
        let path = CanonicalPath::new(path)?;
        debug!(%path, "remove_dir");
        if path.is_root() {
            // the root is the permanently referenced entry point
            return Err(Error::ResourceBusy);
        }
        let (parent, leaf) = find_parent(self.storage.root_node(), &path, self.storage.as_ref())?;
        rm_node(
            parent,
            leaf,
            FileType::Directory,
            self.fd_table.node_refcount(),
            self.storage.as_mut(),
        )
    }

    // Remove a file with no open descriptors.
    pub fn remove_file(&mut self, path: &str) -> Result<(), Error> {
        let path = CanonicalPath::new(path)?;
        debug!(%path, "remove_file");
        if path.is_root() {
            return Err(Error::IsADirectory);
        }
        let (parent, leaf) = find_parent(self.storage.root_node(), &path, self.storage.as_ref())?;
        rm_node(
            parent,
            leaf,
            FileType::RegularFile,
            self.fd_table.node_refcount(),
            self.storage.as_mut(),
        )
    }

    #[cfg(test)]
    pub(crate) fn get_test_storage(&mut self) -> &mut dyn Storage {
        self.storage.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn get_test_file(&self, fd: Fd) -> File {
        self.get_file(fd).unwrap()
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

use crate::{
    error::Error,
    runtime::types::{OpenFlags, Whence},
    storage::{
        Storage,
        types::{FileSize, FileType, Node},
    },
};

// An opened regular file: the node it refers to, the cursor of this
// descriptor, and the flags established at open time.
#[derive(Clone, Debug)]
pub struct File {
    pub node: Node,
    pub cursor: FileSize,
    pub flags: OpenFlags,
}

impl File {
    // Create a new file entry. The node must be a regular file.
    pub fn new(node: Node, flags: OpenFlags, storage: &dyn Storage) -> Result<Self, Error> {
        let metadata = storage.get_metadata(node)?;
        if metadata.file_type != FileType::RegularFile {
            return Err(Error::IsADirectory);
        }
        let cursor = if flags.contains(OpenFlags::APPEND) {
            metadata.size
        } else {
            0
        };
        Ok(Self {
            node,
            cursor,
            flags,
        })
    }

    // Seek a position in the file for reading or writing. The cursor may
    // legally move past the end of the file; it may never become negative.
    pub fn seek(
        &mut self,
        delta: i64,
        whence: Whence,
        storage: &dyn Storage,
    ) -> Result<FileSize, Error> {
        let base: FileSize = match whence {
            Whence::SET => 0,
            Whence::CUR => self.cursor,
            Whence::END => storage.get_metadata(self.node)?.size,
        };
        let position = if delta < 0 {
            base.checked_sub(delta.unsigned_abs())
                .ok_or(Error::InvalidOffset)?
        } else {
            base + delta as FileSize
        };
        self.cursor = position;
        Ok(self.cursor)
    }

    // Get the file's current cursor position.
    pub fn tell(&self) -> FileSize {
        self.cursor
    }

    // Read file at the cursor position, advancing the cursor by the number
    // of bytes actually read.
    pub fn read_with_cursor(
        &mut self,
        buf: &mut [u8],
        storage: &dyn Storage,
    ) -> Result<FileSize, Error> {
        let read_size = self.read_with_offset(self.cursor, buf, storage)?;
        self.cursor += read_size;
        Ok(read_size)
    }

    // Write file at the cursor position, advancing the cursor by the number
    // of bytes written.
    pub fn write_with_cursor(
        &mut self,
        buf: &[u8],
        storage: &mut dyn Storage,
    ) -> Result<FileSize, Error> {
        let written_size = self.write_with_offset(self.cursor, buf, storage)?;
        self.cursor += written_size;
        Ok(written_size)
    }

    // Read file at the given offset, the cursor is not updated.
    pub fn read_with_offset(
        &self,
        offset: FileSize,
        buf: &mut [u8],
        storage: &dyn Storage,
    ) -> Result<FileSize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        storage.read_range(self.node, offset, buf)
    }

    // Write file at the given offset, the cursor is not updated.
    pub fn write_with_offset(
        &self,
        offset: FileSize,
        buf: &[u8],
        storage: &mut dyn Storage,
    ) -> Result<FileSize, Error> {
        storage.write_range(self.node, offset, buf)
    }

    // Truncate file to 0 size.
    pub fn truncate(&self, storage: &mut dyn Storage) {
        storage.truncate(self.node);
    }
}

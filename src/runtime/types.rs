use bitflags::bitflags;

use crate::error::Error;

// file descriptor
pub type Fd = u32;

#[derive(Clone, Copy, Debug)]
pub enum Whence {
    SET,
    CUR,
    END,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct OpenFlags: u16 {
        /// Open for reading only.
        const READ_ONLY = 1;
        /// Open for writing only.
        const WRITE_ONLY = 2;
        /// Open for reading and writing.
        const READ_WRITE = 4;
        /// Create the file if it does not exist.
        const CREATE = 8;
        /// Truncate the file to size 0 if the mode permits writing.
        const TRUNCATE = 16;
        /// Start the cursor at the end of the file.
        const APPEND = 32;
    }
}

impl OpenFlags {
    const ACCESS_MASK: u16 =
        Self::READ_ONLY.bits() | Self::WRITE_ONLY.bits() | Self::READ_WRITE.bits();

    // Exactly one of the access-mode flags must be set.
    pub fn check_access_mode(self) -> Result<(), Error> {
        if (self.bits() & Self::ACCESS_MASK).count_ones() == 1 {
            Ok(())
        } else {
            Err(Error::InvalidOpenFlags)
        }
    }

    pub fn can_read(self) -> bool {
        self.intersects(Self::READ_ONLY | Self::READ_WRITE)
    }

    pub fn can_write(self) -> bool {
        self.intersects(Self::WRITE_ONLY | Self::READ_WRITE)
    }
}

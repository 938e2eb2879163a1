use std::fmt;

use crate::error::Error;

// Limits inherited from the path grammar: the whole path is capped, and so
// is every name between separators.
pub const MAX_PATH_LEN: usize = 1024;
pub const MAX_SEGMENT_LEN: usize = 32;

// A validated absolute path with collapsed separators and no trailing
// separator (except for the root itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    path: String,
}

impl CanonicalPath {
    pub fn new(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() || !raw.starts_with('/') || raw.len() > MAX_PATH_LEN {
            return Err(Error::MalformedPath);
        }

        let mut path = String::with_capacity(raw.len());
        let mut last_segment = "";
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            validate_segment(segment)?;
            path.push('/');
            path.push_str(segment);
            last_segment = segment;
        }

        if path.is_empty() {
            // a run of slashes only, canonically the root
            path.push('/');
        } else if raw.ends_with('/') && last_segment.contains('.') {
            // "/a/b.txt/" is ambiguous: the dot marks a file, the slash a
            // directory
            return Err(Error::MalformedPath);
        }

        Ok(Self { path })
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    // All path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    // The final segment, or None for the root path.
    pub fn leaf(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.path.rfind('/').map(|cut| &self.path[cut + 1..])
        }
    }

    // Segments of the parent directory, i.e. all but the final one.
    pub fn parent_segments(&self) -> impl Iterator<Item = &str> {
        let end = if self.is_root() {
            0
        } else {
            self.path.rfind('/').unwrap_or(0)
        };
        self.path[..end].split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

fn validate_segment(segment: &str) -> Result<(), Error> {
    if segment.len() > MAX_SEGMENT_LEN {
        return Err(Error::MalformedPath);
    }
    if !segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.')
    {
        return Err(Error::MalformedPath);
    }
    Ok(())
}

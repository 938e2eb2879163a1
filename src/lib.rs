pub mod error;
pub mod fs;
pub mod path;
pub mod storage;

mod name_index;
mod runtime;

#[cfg(test)]
mod test_utils;

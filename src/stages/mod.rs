//! The migration stages, in the order they are run.

pub mod discover;
pub mod download;
pub mod extract;
pub mod images;
pub mod rewrite;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

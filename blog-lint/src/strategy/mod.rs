//! Content sources.
//!
//! Only the filesystem source exists: the linter checks a Jekyll checkout
//! on disk. The site snapshot in [`crate::site`] is the only consumer, so
//! no source trait is introduced.

pub mod fs;

//! vigil-vision: vision-side backends for the guard core.
//!
//! Frame acquisition and face-embedding extraction are external
//! collaborators; this crate provides a snapshot-directory [`WatchDirFrameSource`],
//! an HTTP [`HttpFaceReader`] against an embedding service, the
//! test-friendly [`PlaceholderFaceReader`], and the filesystem
//! [`FsEvidenceSink`].

mod evidence;
mod face;
mod frames;

pub use evidence::FsEvidenceSink;
pub use face::{HttpFaceReader, PlaceholderFaceReader};
pub use frames::WatchDirFrameSource;

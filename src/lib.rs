//! Materializes an empty project skeleton (directories and zero-byte files) from a manifest of
//! relative paths, without ever overwriting what is already on disk.

pub mod api;
pub mod entry;
pub mod errors;
pub mod manifest;
pub mod preview;
pub mod prompt;
pub mod scaffold;
pub mod source;
pub mod vfs;

pub use api::{run, HinagataError, Mode, Outcome, ScaffoldOptions};
pub use entry::ScaffoldEntry;
pub use manifest::Manifest;
pub use scaffold::{ensure, Summary};

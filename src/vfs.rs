use crate::{entry::ScaffoldEntry, errors::IoError, scaffold::stat};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// What a scaffolding run would do with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Missing, the run creates it.
    Create,
    /// Already present with the right kind, the run leaves it alone.
    Exists,
    /// Taken by the wrong kind of object, the run would stop here.
    Conflict,
}

/// Represents a directory or file the run touches, relative to the project root.
#[derive(Debug, Clone)]
pub struct VirtualEntry {
    pub destination: PathBuf,
    /// Indicates whether this entry is a file (`true`) or a directory (`false`).
    pub is_file: bool,
    pub status: EntryStatus,
}
/// Read-only forecast of a scaffolding run, composed of multiple [`VirtualEntry`] values.
///
/// Directories are listed before the first file that needs them, so walking the entries in
/// order always meets a parent before its children.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inspects the filesystem under `root` without changing anything.
    pub fn plan(root: &Path, entries: &[ScaffoldEntry]) -> Result<Self, IoError> {
        let mut vfs = VirtualFS::new();
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();

        for entry in entries {
            let segments = entry.segments();

            for depth in 1..segments.len() {
                let dir: PathBuf = segments[..depth].iter().collect();

                if !seen_dirs.insert(dir.clone()) {
                    continue;
                }

                let status = match stat(&root.join(&dir))? {
                    None => EntryStatus::Create,
                    Some(metadata) if metadata.is_dir() => EntryStatus::Exists,
                    Some(_) => EntryStatus::Conflict,
                };

                vfs.entries.push(VirtualEntry {
                    destination: dir,
                    is_file: false,
                    status,
                });
            }

            let status = match stat(&entry.resolve(root))? {
                None => EntryStatus::Create,
                Some(metadata) if metadata.is_dir() => EntryStatus::Conflict,
                Some(_) => EntryStatus::Exists,
            };

            vfs.entries.push(VirtualEntry {
                destination: entry.relative_path(),
                is_file: true,
                status,
            });
        }

        Ok(vfs)
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }
}

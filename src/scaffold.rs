use crate::{
    entry::ScaffoldEntry,
    errors::{FileOperation, IoError},
};
use miette::Diagnostic;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}
impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error("expected a {expected} at '{path}' but something else is already there")]
    #[diagnostic(
        code(hinagata::scaffold::conflict),
        help("Move the existing path out of the way, or rename the entry in the manifest")
    )]
    Conflict { path: PathBuf, expected: PathKind },
}

/// What a scaffolding run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub created_dirs: usize,
    pub created_files: usize,
    pub existing_files: usize,
}

/// Materializes every entry under `root` as an empty file, creating missing directories.
///
/// Entries are processed in order. Existing files are left untouched, so running twice is the
/// same as running once. The first failure stops the run and anything created before it stays
/// on disk.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] if:
///
/// - A directory or file cannot be created (permissions, read-only or full device).
/// - An entry path is already taken by a directory.
/// - One of an entry's parents is already taken by something that is not a directory.
pub fn ensure(root: &Path, entries: &[ScaffoldEntry]) -> Result<Summary, ScaffoldError> {
    let mut summary = Summary::default();

    for entry in entries {
        let full_path = entry.resolve(root);

        if let Some(parent) = full_path.parent() {
            summary.created_dirs += ensure_directory(parent)?;
        }

        if create_empty_file(&full_path)? {
            log::debug!("create {}", full_path.display());
            summary.created_files += 1;
        } else {
            log::debug!("exists {}", full_path.display());
            summary.existing_files += 1;
        }
    }

    log::info!(
        "{} directories created, {} files created, {} files already present",
        summary.created_dirs,
        summary.created_files,
        summary.existing_files
    );

    Ok(summary)
}

/// Creates `path` and its missing ancestors, returning how many directories were created.
fn ensure_directory(path: &Path) -> Result<usize, ScaffoldError> {
    let mut missing = 0;

    for ancestor in path.ancestors() {
        // `Path::parent` ends on "" for relative paths, which stands for the working directory
        if ancestor.as_os_str().is_empty() {
            break;
        }

        match stat(ancestor)? {
            Some(metadata) if metadata.is_dir() => break,
            Some(_) => {
                return Err(ScaffoldError::Conflict {
                    path: ancestor.to_path_buf(),
                    expected: PathKind::Directory,
                })
            }
            None => missing += 1,
        }
    }

    if missing > 0 {
        fs::create_dir_all(path)
            .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))?;

        log::debug!("mkdir {}", path.display());
    }

    Ok(missing)
}

/// Creates an empty file at `path`. Returns `false` when something was already there.
fn create_empty_file(path: &Path) -> Result<bool, ScaffoldError> {
    let created = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path);

    match created {
        Ok(_) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => match stat(path)? {
            Some(metadata) if metadata.is_dir() => Err(ScaffoldError::Conflict {
                path: path.to_path_buf(),
                expected: PathKind::File,
            }),
            _ => Ok(false),
        },
        Err(error) => Err(IoError::new(FileOperation::Create, path.to_path_buf(), error).into()),
    }
}

/// Metadata of `path`, following symlinks, or `None` when nothing is there.
pub(crate) fn stat(path: &Path) -> Result<Option<fs::Metadata>, IoError> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        // NotADirectory: a parent is a file, so this path cannot exist either
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(None)
        }
        Err(error) => Err(IoError::new(FileOperation::Stat, path.to_path_buf(), error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkdir::WalkDir;

    fn entries(raw: &[&str]) -> Vec<ScaffoldEntry> {
        raw.iter().map(|entry| entry.parse().unwrap()).collect()
    }

    /// Every path below `root` (itself included), relative, with a trailing `/` on directories.
    fn snapshot(root: &Path) -> Vec<String> {
        let base = root.parent().unwrap();
        let mut tree: Vec<String> = WalkDir::new(root)
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap();
                let relative = entry.path().strip_prefix(base).unwrap();
                let mut name = relative.to_string_lossy().replace('\\', "/");
                if entry.file_type().is_dir() {
                    name.push('/');
                }
                name
            })
            .collect();
        tree.sort();
        tree
    }

    #[test]
    fn test_ensure_creates_the_expected_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");

        let summary = ensure(&root, &entries(&["a/b.txt", "a/c/d.txt"])).unwrap();

        assert_eq!(
            snapshot(&root),
            ["demo/", "demo/a/", "demo/a/b.txt", "demo/a/c/", "demo/a/c/d.txt"]
        );
        assert_eq!(fs::metadata(root.join("a/b.txt")).unwrap().len(), 0);
        assert_eq!(fs::metadata(root.join("a/c/d.txt")).unwrap().len(), 0);
        assert_eq!(
            summary,
            Summary {
                created_dirs: 3,
                created_files: 2,
                existing_files: 0,
            }
        );
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        let list = entries(&["a/b.txt", "a/c/d.txt", "e.txt"]);

        ensure(&root, &list).unwrap();
        let first = snapshot(&root);

        let summary = ensure(&root, &list).unwrap();

        assert_eq!(snapshot(&root), first);
        assert_eq!(
            summary,
            Summary {
                created_dirs: 0,
                created_files: 0,
                existing_files: 3,
            }
        );
    }

    #[test]
    fn test_ensure_never_overwrites_content() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/b.txt"), "keep me").unwrap();

        ensure(&root, &entries(&["a/b.txt", "a/new.txt"])).unwrap();

        assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "keep me");
        assert_eq!(fs::metadata(root.join("a/new.txt")).unwrap().len(), 0);
    }

    #[test]
    fn test_entry_order_does_not_change_the_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let forward = tmp.path().join("forward").join("demo");
        let backward = tmp.path().join("backward").join("demo");
        let list = ["x/y/z.ts", "x/a.ts", "b/c.ts", "root.ts", "x/y/w.ts"];
        let mut reversed = list;
        reversed.reverse();

        ensure(&forward, &entries(&list)).unwrap();
        ensure(&backward, &entries(&reversed)).unwrap();

        assert_eq!(snapshot(&forward), snapshot(&backward));
    }

    #[test]
    fn test_directory_at_entry_path_is_a_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        fs::create_dir_all(root.join("a/b.txt")).unwrap();

        let result = ensure(&root, &entries(&["first.txt", "a/b.txt", "last.txt"]));

        match result {
            Err(ScaffoldError::Conflict { path, expected }) => {
                assert_eq!(path, root.join("a").join("b.txt"));
                assert_eq!(expected, PathKind::File);
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
        // fail fast: earlier entries stay, later ones are never reached
        assert!(root.join("first.txt").is_file());
        assert!(!root.join("last.txt").exists());
    }

    #[test]
    fn test_file_at_parent_path_is_a_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("demo");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a"), "").unwrap();

        let result = ensure(&root, &entries(&["a/c/d.txt"]));

        match result {
            Err(ScaffoldError::Conflict { path, expected }) => {
                assert_eq!(path, root.join("a"));
                assert_eq!(expected, PathKind::Directory);
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_parent_is_the_working_directory() {
        let entry: ScaffoldEntry = "only.txt".parse().unwrap();

        assert_eq!(entry.resolve(Path::new("")), PathBuf::from("only.txt"));
        assert_eq!(ensure_directory(Path::new("")).unwrap(), 0);
    }
}

use crate::manifest::{Manifest, ManifestError};
use git2::{build::RepoBuilder, FetchOptions};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest file looked up at the root of a directory or repository source.
pub const MANIFEST_FILE_NAME: &str = "hinagata.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error("unable to create a directory to clone into")]
    #[diagnostic(code(hinagata::source::tempdir))]
    TempDir(#[source] std::io::Error),

    #[error("unable to clone repo at: '{url}': {source}")]
    #[diagnostic(
        code(hinagata::source::git_clone),
        help("Make sure that username and project name are correct")
    )]
    GitClone {
        url: String,
        path: PathBuf,
        source: git2::Error,
    },

    #[error("invalid git prefix provided: {url}")]
    #[diagnostic(
        code(hinagata::source::invalid_git_prefix),
        help("Valid git prefix are: ['gh', 'gl']")
    )]
    InvalidGitPrefix { url: String },
}

/// Where the manifest was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Builtin,
    Local(PathBuf),
    Git(String),
}

/// A loaded manifest together with its origin.
#[derive(Debug, Clone)]
pub struct Source {
    pub manifest: Manifest,
    pub origin: Origin,
}
impl Source {
    pub(crate) fn is_git(source: &str) -> bool {
        lazy_static::lazy_static! {
            static ref GIT_URL_REGEX: regex::Regex = regex::Regex::new(
                r"(?x)        # Enable extended mode
                ^(?:
                    # 1) gh:account/repo
                    gh:[^/]+/[^/]+
                    |
                    # 2) gl:account/repo
                    gl:[^/]+/[^/]+
                    |
                    # 3) git@host:account/repo.git
                    git@[A-Za-z0-9._-]+:[^/]+/[^/]+\.git
                    |
                    # 4) git+http(s)://...
                    git\+https?://.*
                )$"
            ).expect("a valid regex pattern");
        }

        GIT_URL_REGEX.is_match(source)
    }

    pub(crate) fn expand_git_url(url: &str) -> Result<String, SourceError> {
        if let Some(stripped) = url.strip_prefix("gh:") {
            Ok(format!("https://github.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("gl:") {
            Ok(format!("https://gitlab.com/{}.git", stripped))
        } else if let Some(stripped) = url.strip_prefix("git+") {
            Ok(stripped.to_string())
        } else if url.starts_with("git@") {
            Ok(url.to_string())
        } else {
            Err(SourceError::InvalidGitPrefix {
                url: url.to_string(),
            })
        }
    }

    /// Resolves a manifest reference: nothing (the built-in manifest), a git repository,
    /// a directory holding a `hinagata.toml`, or a manifest file.
    pub fn build_from(reference: Option<&str>) -> Result<Self, SourceError> {
        let Some(reference) = reference else {
            log::debug!("using the built-in manifest");

            return Ok(Source {
                manifest: Manifest::builtin()?,
                origin: Origin::Builtin,
            });
        };

        if Source::is_git(reference) {
            let url = Source::expand_git_url(reference)?;

            // removed once the manifest is read
            let directory = tempfile::tempdir().map_err(SourceError::TempDir)?;

            log::debug!("cloning {} into {}", url, directory.path().display());

            let mut fetch_options = FetchOptions::new();
            fetch_options.depth(1);

            RepoBuilder::new()
                .fetch_options(fetch_options)
                .clone(&url, directory.path())
                .map_err(|error| SourceError::GitClone {
                    url: url.clone(),
                    path: directory.path().to_path_buf(),
                    source: error,
                })?;

            let manifest = Manifest::from_file(directory.path().join(MANIFEST_FILE_NAME))?;

            return Ok(Source {
                manifest,
                origin: Origin::Git(url),
            });
        }

        let path = Source::manifest_path(Path::new(reference));

        log::debug!("reading manifest from {}", path.display());

        Ok(Source {
            manifest: Manifest::from_file(&path)?,
            origin: Origin::Local(path),
        })
    }

    fn manifest_path(reference: &Path) -> PathBuf {
        if reference.is_dir() {
            reference.join(MANIFEST_FILE_NAME)
        } else {
            reference.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_git_recognizes_supported_references() {
        for reference in [
            "gh:owner/skeletons",
            "gl:owner/skeletons",
            "git@github.com:owner/skeletons.git",
            "git+https://example.com/owner/skeletons.git",
        ] {
            assert!(Source::is_git(reference), "{}", reference);
        }
    }

    #[test]
    fn test_is_git_leaves_local_paths_alone() {
        for reference in ["skeleton.toml", "./blueprints", "/tmp/hinagata.toml", "gh:missing"] {
            assert!(!Source::is_git(reference), "{}", reference);
        }
    }

    #[test]
    fn test_expand_git_url() {
        assert_eq!(
            Source::expand_git_url("gh:owner/repo").unwrap(),
            "https://github.com/owner/repo.git"
        );
        assert_eq!(
            Source::expand_git_url("gl:owner/repo").unwrap(),
            "https://gitlab.com/owner/repo.git"
        );
        assert_eq!(
            Source::expand_git_url("git+https://example.com/r.git").unwrap(),
            "https://example.com/r.git"
        );
        assert!(matches!(
            Source::expand_git_url("bb:owner/repo"),
            Err(SourceError::InvalidGitPrefix { .. })
        ));
    }

    #[test]
    fn test_build_from_nothing_uses_builtin() {
        let source = Source::build_from(None).unwrap();

        assert_eq!(source.origin, Origin::Builtin);
        assert_eq!(source.manifest.name, "medical-devices-website");
    }

    #[test]
    fn test_build_from_directory_reads_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            "name = \"demo\"\n[[section]]\npaths = [\"a/b.txt\"]\n",
        )
        .unwrap();

        let source = Source::build_from(dir.path().to_str()).unwrap();

        assert_eq!(source.manifest.name, "demo");
        assert_eq!(
            source.origin,
            Origin::Local(dir.path().join(MANIFEST_FILE_NAME))
        );
    }

    #[test]
    fn test_build_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = Source::build_from(missing.to_str());

        assert!(matches!(
            result,
            Err(SourceError::Manifest(ManifestError::Io(_)))
        ));
    }
}

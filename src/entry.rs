use miette::Diagnostic;
use std::{
    fmt,
    path::{Component, Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry '{raw}' does not name a file")]
    #[diagnostic(
        code(hinagata::entry::empty),
        help("Every entry must name a file relative to the project root, e.g. `src/main.rs`")
    )]
    Empty { raw: String },

    #[error("entry '{raw}' is an absolute path")]
    #[diagnostic(
        code(hinagata::entry::absolute),
        help("Entries are resolved against the project root, drop the leading separator")
    )]
    Absolute { raw: String },

    #[error("entry '{raw}' climbs out of the project root")]
    #[diagnostic(
        code(hinagata::entry::parent_segment),
        help("Remove the `..` segments from the entry")
    )]
    ParentSegment { raw: String },
}

/// A file to materialize, stored as the ordered path segments below the project root.
///
/// Entries are always relative and never contain `.` or `..` segments, so joining one onto a
/// root can never resolve outside of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScaffoldEntry {
    segments: Vec<String>,
}
impl ScaffoldEntry {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }
}
impl FromStr for ScaffoldEntry {
    type Err = EntryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();

        for component in Path::new(raw).components() {
            match component {
                // "./a" and "a/./b" are the same file as "a" and "a/b"
                Component::CurDir => {}

                Component::ParentDir => {
                    return Err(EntryError::ParentSegment {
                        raw: raw.to_string(),
                    })
                }

                Component::RootDir | Component::Prefix(_) => {
                    return Err(EntryError::Absolute {
                        raw: raw.to_string(),
                    })
                }

                Component::Normal(segment) => {
                    segments.push(segment.to_string_lossy().into_owned());
                }
            }
        }

        if segments.is_empty() {
            return Err(EntryError::Empty {
                raw: raw.to_string(),
            });
        }

        Ok(Self { segments })
    }
}
impl fmt::Display for ScaffoldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_segments_in_order() {
        let entry: ScaffoldEntry = "src/app/brands/[brandSlug]/page.tsx".parse().unwrap();

        assert_eq!(
            entry.segments(),
            ["src", "app", "brands", "[brandSlug]", "page.tsx"]
        );
        assert_eq!(entry.to_string(), "src/app/brands/[brandSlug]/page.tsx");
    }

    #[test]
    fn test_parse_drops_current_dir_and_repeated_separators() {
        let entry: ScaffoldEntry = "./src//lib/./prisma.ts".parse().unwrap();

        assert_eq!(entry.to_string(), "src/lib/prisma.ts");
    }

    #[test]
    fn test_parse_accepts_dotfiles() {
        let entry: ScaffoldEntry = ".env.local".parse().unwrap();

        assert_eq!(entry.segments(), [".env.local"]);
    }

    #[test]
    fn test_parse_rejects_empty_entries() {
        for raw in ["", ".", "./", "./."] {
            assert_eq!(
                raw.parse::<ScaffoldEntry>(),
                Err(EntryError::Empty {
                    raw: raw.to_string()
                })
            );
        }
    }

    #[test]
    fn test_parse_rejects_absolute_entries() {
        assert!(matches!(
            "/etc/passwd".parse::<ScaffoldEntry>(),
            Err(EntryError::Absolute { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_parent_segments() {
        assert!(matches!(
            "src/../../outside.txt".parse::<ScaffoldEntry>(),
            Err(EntryError::ParentSegment { .. })
        ));
    }

    #[test]
    fn test_resolve_joins_root() {
        let entry: ScaffoldEntry = "a/c/d.txt".parse().unwrap();

        assert_eq!(
            entry.resolve(Path::new("demo")),
            Path::new("demo").join("a").join("c").join("d.txt")
        );
    }
}

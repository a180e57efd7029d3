use crate::{
    entry::{EntryError, ScaffoldEntry},
    errors::{FileFormat, FileOperation, IoError, ParseError},
};
use indexmap::IndexSet;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tera::{Context, Tera};
use thiserror::Error;

const BUILTIN_MANIFEST: &str = include_str!("../blueprints/medical-devices-website.toml");

pub const BUILTIN_ORIGIN: &str = "<built-in medical-devices-website>";

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid project name: '{name}'")]
    #[diagnostic(
        code(hinagata::manifest::invalid_name),
        help("The project name doubles as the root directory, use a relative path such as `my-site`")
    )]
    InvalidName {
        name: String,
        #[source]
        source: EntryError,
    },

    #[error("invalid entry in section #{section}")]
    #[diagnostic(code(hinagata::manifest::invalid_entry))]
    InvalidEntry {
        section: usize,
        #[source]
        #[diagnostic_source]
        source: EntryError,
    },

    #[error("unable to expand '{path}' in section #{section}")]
    #[diagnostic(
        code(hinagata::manifest::render),
        help("Sections with `each` render paths as tera templates, `{{{{ item }}}}` and `{{{{ project }}}}` are available")
    )]
    Render {
        section: usize,
        path: String,
        #[source]
        source: tera::Error,
    },

    #[error("'{file}' is listed as a file but '{descendant}' needs it to be a directory")]
    #[diagnostic(
        code(hinagata::manifest::path_collision),
        help("A path cannot be both a file and the parent of another entry, rename one of them")
    )]
    PathCollision { file: String, descendant: String },
}

/// A group of entries sharing an optional prefix, optionally repeated once per item of `each`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub each: Option<Vec<String>>,
    pub paths: Vec<String>,
}

/// Description of a project skeleton: its name (the default root directory) and the files
/// that make it up.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub name: String,
    #[serde(default, rename = "section")]
    pub sections: Vec<Section>,
}
impl Manifest {
    /// Parses a manifest from TOML. `origin` names where the content came from in diagnostics.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(content)
            .map_err(|error| ParseError::new(FileFormat::Toml, origin.to_string(), error))?;

        manifest
            .name
            .parse::<ScaffoldEntry>()
            .map_err(|error| ManifestError::InvalidName {
                name: manifest.name.clone(),
                source: error,
            })?;

        Ok(manifest)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        Self::parse(&content, &path.display().to_string())
    }

    /// The medical devices catalog skeleton shipped with the binary.
    pub fn builtin() -> Result<Self, ManifestError> {
        Self::parse(BUILTIN_MANIFEST, BUILTIN_ORIGIN)
    }

    /// Directory the skeleton lands in when no explicit root is given.
    pub fn default_root(&self) -> PathBuf {
        PathBuf::from(&self.name)
    }

    /// Expands every section, in file order, into the validated list of entries.
    ///
    /// Duplicates keep their first position. The list is rejected when one entry would have
    /// to be a file and a directory at the same time.
    pub fn entries(&self) -> Result<Vec<ScaffoldEntry>, ManifestError> {
        let mut tera = Tera::default();
        let mut entries: IndexSet<ScaffoldEntry> = IndexSet::new();

        for (index, section) in self.sections.iter().enumerate() {
            // sections are numbered from 1 in diagnostics, like the tables in the file
            let number = index + 1;

            for raw in self.expand_section(number, section, &mut tera)? {
                let entry = raw
                    .parse::<ScaffoldEntry>()
                    .map_err(|error| ManifestError::InvalidEntry {
                        section: number,
                        source: error,
                    })?;

                if !entries.insert(entry) {
                    log::debug!("skipping duplicate entry: {}", raw);
                }
            }
        }

        let entries: Vec<ScaffoldEntry> = entries.into_iter().collect();

        check_collisions(&entries)?;

        if entries.is_empty() {
            log::warn!("manifest '{}' does not list any entry", self.name);
        }

        Ok(entries)
    }

    fn expand_section(
        &self,
        number: usize,
        section: &Section,
        tera: &mut Tera,
    ) -> Result<Vec<String>, ManifestError> {
        let paths = match &section.each {
            None => section.paths.clone(),
            Some(items) => {
                let mut rendered = Vec::with_capacity(items.len() * section.paths.len());

                for item in items {
                    let mut ctx = Context::new();
                    ctx.insert("item", item);
                    ctx.insert("project", &self.name);

                    for path in &section.paths {
                        let out =
                            tera.render_str(path, &ctx)
                                .map_err(|error| ManifestError::Render {
                                    section: number,
                                    path: path.clone(),
                                    source: error,
                                })?;

                        rendered.push(out.trim().to_string());
                    }
                }

                rendered
            }
        };

        let Some(prefix) = &section.prefix else {
            return Ok(paths);
        };

        let prefix = prefix.trim_end_matches('/');

        Ok(paths
            .into_iter()
            .map(|path| format!("{}/{}", prefix, path))
            .collect())
    }
}

fn check_collisions(entries: &[ScaffoldEntry]) -> Result<(), ManifestError> {
    let files: HashSet<&[String]> = entries.iter().map(|entry| entry.segments()).collect();

    for entry in entries {
        let segments = entry.segments();

        for depth in 1..segments.len() {
            if files.contains(&segments[..depth]) {
                return Err(ManifestError::PathCollision {
                    file: segments[..depth].join("/"),
                    descendant: entry.to_string(),
                });
            }
        }
    }

    Ok(())
}

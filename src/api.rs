use crate::{
    errors::IoError,
    manifest::ManifestError,
    preview::preview_as_tree,
    prompt::{self, PromptError},
    scaffold::{self, ScaffoldError, Summary},
    source::{Source, SourceError},
    vfs::VirtualFS,
};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HinagataError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write the skeleton straight away.
    #[default]
    Apply,
    /// Print the preview tree and stop.
    DryRun,
    /// Print the preview tree and ask before writing.
    Interactive,
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Overrides the root directory, which defaults to the manifest's project name.
    pub root: Option<PathBuf>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        name: String,
        root: PathBuf,
        summary: Summary,
    },
    Previewed {
        name: String,
    },
    Aborted {
        name: String,
    },
}

/// Loads the manifest named by `reference` (the built-in one when `None`) and materializes its
/// skeleton on disk.
///
/// # Errors
///
/// Returns a [`HinagataError`] if:
///
/// - The manifest cannot be fetched, read, parsed or expanded.
/// - The filesystem cannot be inspected for the preview.
/// - The confirmation prompt fails or is interrupted.
/// - A directory or file cannot be created, or a path is taken by the wrong kind of object.
pub fn run(reference: Option<&str>, options: &ScaffoldOptions) -> Result<Outcome, HinagataError> {
    let source = Source::build_from(reference)?;

    log::debug!("manifest loaded from {:?}", source.origin);

    let name = source.manifest.name.clone();

    let entries = source.manifest.entries()?;

    let root = options
        .root
        .clone()
        .unwrap_or_else(|| source.manifest.default_root());

    log::debug!("{} entries to materialize under {}", entries.len(), root.display());

    if options.mode != Mode::Apply {
        let vfs = VirtualFS::plan(&root, &entries)?;

        preview_as_tree(&vfs, &root);

        if options.mode == Mode::DryRun {
            return Ok(Outcome::Previewed { name });
        }

        if !prompt::apply_changes()? {
            return Ok(Outcome::Aborted { name });
        }
    }

    let summary = scaffold::ensure(&root, &entries)?;

    Ok(Outcome::Created {
        name,
        root,
        summary,
    })
}

use inquire::{Confirm, InquireError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("confirmation was interrupted")]
    #[diagnostic(
        code(hinagata::prompt::interrupted),
        help("Nothing was created, run again without --interactive to skip the confirmation")
    )]
    Interrupted,

    #[error("unable to prompt for confirmation")]
    #[diagnostic(
        code(hinagata::prompt::inquire),
        help("--interactive needs a terminal on stdin")
    )]
    Inquire(#[source] InquireError),
}
impl From<InquireError> for PromptError {
    fn from(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                Self::Interrupted
            }
            other => Self::Inquire(other),
        }
    }
}

/// Asks whether the previewed skeleton should be written to disk.
pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new("Create these paths?")
        .with_default(true)
        .with_help_message("Existing files are never modified")
        .prompt()?;

    Ok(answer)
}

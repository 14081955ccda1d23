use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{Confirm, InquireError, Select};

/// User decision for a push that would overwrite newer remote work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushConflictChoice {
    /// Push anyway, replacing the newer remote content.
    OverwriteRemote,
    /// Abort the push and show a remote-vs-local comparison instead.
    ShowDiff,
    Cancel,
}

impl std::fmt::Display for PushConflictChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushConflictChoice::OverwriteRemote => write!(f, "Overwrite Remote"),
            PushConflictChoice::ShowDiff => write!(f, "Show Diff"),
            PushConflictChoice::Cancel => write!(f, "Cancel"),
        }
    }
}

/// User decision when the published (live) version differs from local
/// content before a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveDiffChoice {
    /// Print the diff, then continue to the final confirmation.
    ShowDiff,
    Continue,
    Cancel,
}

impl std::fmt::Display for LiveDiffChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiveDiffChoice::ShowDiff => write!(f, "Show Diff"),
            LiveDiffChoice::Continue => write!(f, "Continue"),
            LiveDiffChoice::Cancel => write!(f, "Cancel"),
        }
    }
}

/// Decision points where a sync operation suspends and waits for the user.
///
/// The orchestrator only talks to this trait; the CLI installs the terminal
/// implementation and tests install a scripted one.
pub trait UserPrompt {
    /// Three-way choice when remote has newer changes than the last sync.
    fn push_conflict(&self, filename: &str) -> Result<PushConflictChoice>;

    /// Destructive-overwrite confirmation before any pull.
    fn confirm_pull(&self, filename: &str, published: bool, dirty: bool) -> Result<bool>;

    /// Live content differs from local right before a publish.
    fn live_differs(&self, filename: &str) -> Result<LiveDiffChoice>;

    /// The live snapshot could not be fetched for the pre-publish diff.
    fn publish_without_live(&self, filename: &str) -> Result<bool>;

    /// Final modal confirmation for a publish.
    fn confirm_publish(&self, filename: &str) -> Result<bool>;
}

/// Check if we're running in an interactive terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Terminal implementation of [`UserPrompt`] using inquire.
pub struct TerminalPrompt;

/// A cancelled prompt (Esc) is a Cancel answer, not an error.
fn select_or_cancel<T>(select: Select<'_, T>, cancel: T) -> Result<T>
where
    T: std::fmt::Display,
{
    match select.prompt() {
        Ok(choice) => Ok(choice),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(cancel)
        }
        Err(e) => Err(e).context("Failed to read prompt response"),
    }
}

fn confirm_or_false(confirm: Confirm<'_>) -> Result<bool> {
    match confirm.prompt() {
        Ok(choice) => Ok(choice),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e).context("Failed to read prompt response"),
    }
}

impl UserPrompt for TerminalPrompt {
    fn push_conflict(&self, filename: &str) -> Result<PushConflictChoice> {
        println!(
            "\n{} {}",
            "Remote file has newer changes:".yellow().bold(),
            filename.cyan()
        );
        let options = vec![
            PushConflictChoice::OverwriteRemote,
            PushConflictChoice::ShowDiff,
            PushConflictChoice::Cancel,
        ];
        select_or_cancel(
            Select::new("Overwrite with local version?", options)
                .with_help_message("Use arrow keys to navigate, Enter to select"),
            PushConflictChoice::Cancel,
        )
    }

    fn confirm_pull(&self, filename: &str, published: bool, dirty: bool) -> Result<bool> {
        let message = match (published, dirty) {
            (true, true) => {
                "This will overwrite local changes with the published (live) version. Unsaved edits will be lost. Continue?"
            }
            (true, false) => {
                "This will overwrite the local file with the published (live) version. Continue?"
            }
            (false, true) => {
                "This will overwrite local changes (unsaved edits will be lost). Continue?"
            }
            (false, false) => {
                "This will overwrite the local file with the instance version. Continue?"
            }
        };
        println!("  {}", filename.cyan());
        confirm_or_false(Confirm::new(message).with_default(false))
    }

    fn live_differs(&self, filename: &str) -> Result<LiveDiffChoice> {
        println!(
            "\n{} {}",
            "Published (live) version differs from local:".yellow().bold(),
            filename.cyan()
        );
        let options = vec![
            LiveDiffChoice::ShowDiff,
            LiveDiffChoice::Continue,
            LiveDiffChoice::Cancel,
        ];
        select_or_cancel(
            Select::new("Review diff before publishing?", options),
            LiveDiffChoice::Cancel,
        )
    }

    fn publish_without_live(&self, filename: &str) -> Result<bool> {
        println!("  {}", filename.cyan());
        confirm_or_false(
            Confirm::new("Unable to fetch published version for diff. Publish anyway?")
                .with_default(false),
        )
    }

    fn confirm_publish(&self, filename: &str) -> Result<bool> {
        println!("  {}", filename.cyan());
        confirm_or_false(
            Confirm::new("This will publish the file. Are you sure?").with_default(false),
        )
    }
}

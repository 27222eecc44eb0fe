//! Formatting functions for operator output.
//!
//! Resolved versions are the only thing written to stdout, one line per
//! scope, so the output can be captured by scripts. Everything else goes to
//! stderr.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::Version;
use crate::resolver::TagOutcome;

/// Format the line printed for a resolved scope.
///
/// A bare version is printed when a single scope was requested, otherwise
/// the version is prefixed with the scope name.
pub fn format_version_line(scope: Option<&str>, version: &Version) -> String {
    match scope {
        Some(scope) => format!("{}: {}", scope, version),
        None => version.to_string(),
    }
}

/// Print a resolved version to stdout.
pub fn display_version(scope: Option<&str>, version: &Version) {
    println!("{}", format_version_line(scope, version));
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Describe what happened when tagging a scope, or `None` when nothing
/// worth reporting happened.
pub fn format_tag_outcome(outcome: &TagOutcome) -> Option<String> {
    match outcome {
        TagOutcome::AutoTagDisabled => None,
        TagOutcome::AlreadyTagged { tag } => Some(format!("Current commit already tagged as {}", tag)),
        TagOutcome::Planned { tag } => Some(format!("Dry run: would create tag {}", tag)),
        TagOutcome::Created { tag, pushed: true } => Some(format!("Created and pushed tag {}", tag)),
        TagOutcome::Created { tag, pushed: false } => Some(format!("Created tag {}", tag)),
    }
}

/// Report a tagging outcome on stderr.
pub fn display_tag_outcome(outcome: &TagOutcome) {
    match (outcome, format_tag_outcome(outcome)) {
        (TagOutcome::Created { .. }, Some(message)) => display_success(&message),
        (_, Some(message)) => display_status(&message),
        (_, None) => {}
    }
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    eprintln!(
        "{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

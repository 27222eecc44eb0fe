//! User interface module - operator-facing output.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction, display_status,
    display_success, display_tag_outcome, display_version, format_tag_outcome,
    format_version_line,
};

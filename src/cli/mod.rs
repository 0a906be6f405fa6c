//! CLI front ends
//!
//! The interactive numbered menu, its prompt helpers, and the handlers for
//! one-shot subcommands.

pub mod commands;
pub mod menu;
pub mod prompt;

pub use commands::{
    handle_backup_command, handle_config_command, handle_export_command, handle_list_command,
    handle_log_command, handle_summary_command,
};
pub use menu::{Menu, CLEAR_CONFIRMATION};
pub use prompt::{PromptError, PromptResult, Prompter};

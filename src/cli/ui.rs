//! Shared UI primitives for birthdaycmd
//!
//! Conventions:
//! - Feedback: single word when possible: `Saved.`
//! - Empty results get one plain sentence, never an error

use anyhow::Result;
use inquire::{ui::RenderConfig, Confirm};
use serde::Serialize;
use std::io::IsTerminal;

pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Ask a yes/no question, defaulting to no. Non-interactive input counts as no.
pub fn confirm(prompt: &str) -> bool {
    Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

/// Pretty-print any operation result as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Whether styling escape codes should be written to stdout.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

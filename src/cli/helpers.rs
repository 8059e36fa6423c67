//! Shared helper functions for CLI commands

use console::Term;
use dialoguer::Password;
use miette::{IntoDiagnostic, Result};

use crate::sources::SourceError;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters, not bytes, so multi-byte text never splits mid-char.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Resolve a secret from configuration, prompting on an interactive terminal
///
/// Fails with [`SourceError::MissingSetting`] when the value is unset and
/// there is no terminal to ask on.
pub fn require_secret(
    value: Option<String>,
    prompt: &str,
    key: &'static str,
    env: &'static str,
) -> Result<String> {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    if !Term::stderr().is_term() {
        return Err(SourceError::MissingSetting { key, env }.into());
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .into_diagnostic()
}

/// Resolve a required, non-secret setting
pub fn require_setting<T>(value: Option<T>, key: &'static str, env: &'static str) -> Result<T> {
    value.ok_or_else(|| SourceError::MissingSetting { key, env }.into())
}

//! API key resolution: environment, stored key file, or interactive prompt.
//!
//! The stored key lives in a dedicated file with restrictive permissions (0o600 on Unix).

use std::env;
use std::fmt;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::core::paths;

/// Environment variables checked for the key, in priority order.
pub const ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Errors when storing the API key.
#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("No config directory available")]
    NoConfigDir,
    #[error("Failed to store API key: {0}")]
    Io(#[from] io::Error),
}

/// Where the API key in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Env(&'static str),
    File,
    Prompt,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Env(var) => write!(f, "from {}", var),
            CredentialSource::File => write!(f, "from stored key file"),
            CredentialSource::Prompt => write!(f, "entered interactively"),
        }
    }
}

/// Path to the API key file in the config directory.
pub fn credentials_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("api-key"))
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Load the API key from the config directory.
/// Returns `None` if the file is absent, empty, or unreadable.
pub fn load_api_key() -> Option<String> {
    let path = credentials_path()?;
    fs::read_to_string(&path).ok().and_then(non_empty)
}

/// Store the API key in the config directory.
/// Creates the config dir if needed. On Unix, sets file permissions to 0o600.
pub fn store_api_key(key: &str) -> Result<(), ApiKeyError> {
    let path = credentials_path().ok_or(ApiKeyError::NoConfigDir)?;
    let dir = path.parent().ok_or_else(|| {
        ApiKeyError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid credentials path",
        ))
    })?;
    fs::create_dir_all(dir)?;

    let mut file = fs::File::create(&path)?;
    file.write_all(key.trim().as_bytes())?;
    file.write_all(b"\n")?;

    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Pick the first usable key from the environment lookup, then the stored file.
fn resolve_from<F>(lookup: F, stored: Option<String>) -> Option<(String, CredentialSource)>
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VARS
        .iter()
        .copied()
        .find_map(|var| {
            lookup(var)
                .and_then(non_empty)
                .map(|k| (k, CredentialSource::Env(var)))
        })
        .or_else(|| stored.and_then(non_empty).map(|k| (k, CredentialSource::File)))
}

/// Resolve the key without user interaction (environment, then stored file).
pub fn resolve_non_interactive() -> Option<(String, CredentialSource)> {
    resolve_from(|var| env::var(var).ok(), load_api_key())
}

/// Ask for the key on stderr and read one line from stdin.
/// Returns `None` when stdin is not a terminal or the answer is empty.
pub fn prompt_api_key() -> Option<String> {
    if !io::stdin().is_terminal() {
        return None;
    }
    eprintln!("{} is not set.", ENV_VARS[0]);
    eprint!("Paste your API key: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    non_empty(line)
}

/// Resolve the key, falling back to an interactive prompt when allowed.
pub fn resolve(allow_prompt: bool) -> Option<(String, CredentialSource)> {
    resolve_non_interactive().or_else(|| {
        if allow_prompt {
            prompt_api_key().map(|k| (k, CredentialSource::Prompt))
        } else {
            None
        }
    })
}

/// Mask a key for display, keeping only the last four characters.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

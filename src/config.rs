use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    /// `ACTION=KEY` overrides, applied in order.
    pub binds: Vec<String>,
    pub log_file: Option<PathBuf>,
    /// `--` tokens that were not recognised. Reported once logging is up.
    pub ignored: Vec<String>,
}

impl ConfigFlags {
    /// Merge `other` on top of `self`. Bindings accumulate so later ones win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            binds: self.binds.iter().chain(&other.binds).cloned().collect(),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            ignored: self.ignored.iter().chain(&other.ignored).cloned().collect(),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("discview").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("discview")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("discview").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("discview")
                .join("config");
        }
    }

    PathBuf::from(".discviewrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".discviewrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# discview defaults (saved with --save)".to_string());
    for bind in &flags.binds {
        lines.push(format!("--bind {bind}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of raw argument tokens.
///
/// Positional tokens are skipped, so the full `std::env::args()` can be
/// passed. Unknown `--` flags land in [`ConfigFlags::ignored`].
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--bind" {
            if let Some(next) = tokens.get(i + 1) {
                flags.binds.push(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--bind=") {
            flags.binds.push(value.to_string());
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        } else if token.starts_with("--") && !matches!(token.as_str(), "--save" | "--clear") {
            flags.ignored.push(token.clone());
        }
        i += 1;
    }
    flags
}

//! Saved command-line defaults.
//!
//! A config file is a list of the same flags the CLI accepts, one or more
//! per line, with `#` comments. The global file is read first, then a local
//! `.tabpressrc`, then the command line; later sources win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub storage_dir: Option<PathBuf>,
    pub defaults: Option<PathBuf>,
    pub width: Option<usize>,
    pub plain: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            storage_dir: other
                .storage_dir
                .clone()
                .or_else(|| self.storage_dir.clone()),
            defaults: other.defaults.clone().or_else(|| self.defaults.clone()),
            width: other.width.or(self.width),
            plain: self.plain || other.plain,
        }
    }

    /// Storage directory to use, falling back to the platform default.
    pub fn storage_dir_or_default(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("tabpress").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tabpress")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("tabpress").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("tabpress")
                .join("config");
        }
    }

    PathBuf::from(".tabpressrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".tabpressrc")
}

/// Where stored overrides live when no `--storage-dir` is given.
pub fn default_storage_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(appdata).join("tabpress").join("storage");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tabpress")
                .join("storage");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("tabpress");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("tabpress");
        }
    }

    PathBuf::from(".tabpress")
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
    lines.push("# tabpress defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.storage_dir {
        lines.push(format!("--storage-dir {}", dir.display()));
    }
    if let Some(defaults) = &flags.defaults {
        lines.push(format!("--defaults {}", defaults.display()));
    }
    if let Some(width) = flags.width {
        lines.push(format!("--width {width}"));
    }
    if flags.plain {
        lines.push("--plain".to_string());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
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

/// Extract the saveable flags from a token list (e.g. `std::env::args`).
///
/// Unknown tokens, including subcommands and their arguments, are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--plain" {
            flags.plain = true;
        } else if token == "--storage-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.storage_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--storage-dir=") {
            flags.storage_dir = Some(PathBuf::from(value));
        } else if token == "--defaults" {
            if let Some(next) = tokens.get(i + 1) {
                flags.defaults = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--defaults=") {
            flags.defaults = Some(PathBuf::from(value));
        } else if token == "--width" {
            if let Some(next) = tokens.get(i + 1) {
                flags.width = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--width=") {
            flags.width = value.parse().ok();
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "tabpress".to_string(),
            "--storage-dir".to_string(),
            "/tmp/site".to_string(),
            "--defaults=content.js".to_string(),
            "--width".to_string(),
            "72".to_string(),
            "--plain".to_string(),
            "show".to_string(),
            "contact".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.storage_dir, Some(PathBuf::from("/tmp/site")));
        assert_eq!(flags.defaults, Some(PathBuf::from("content.js")));
        assert_eq!(flags.width, Some(72));
        assert!(flags.plain);
    }

    #[test]
    fn test_invalid_width_is_ignored() {
        let args = vec!["--width".to_string(), "wide".to_string()];
        assert_eq!(parse_flag_tokens(&args).width, None);
    }

    #[test]
    fn test_config_union_prefers_later_values() {
        let file = ConfigFlags {
            storage_dir: Some(PathBuf::from("file-dir")),
            width: Some(100),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            width: Some(60),
            plain: true,
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.storage_dir, Some(PathBuf::from("file-dir")));
        assert_eq!(merged.width, Some(60));
        assert!(merged.plain);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".tabpressrc");
        let flags = ConfigFlags {
            storage_dir: Some(PathBuf::from("/srv/site-storage")),
            defaults: Some(PathBuf::from("tab-content.js")),
            width: Some(72),
            plain: true,
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_storage_dir_falls_back_to_platform_default() {
        assert_eq!(
            ConfigFlags::default().storage_dir_or_default(),
            default_storage_dir()
        );
    }
}

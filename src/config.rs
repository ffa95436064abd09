use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that may be set from rc files as well as the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub download: bool,
    pub static_commands: bool,
    pub download_dir: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Booleans are or-ed; for paths `other` wins when it sets one.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            download: self.download || other.download,
            static_commands: self.static_commands || other.static_commands,
            download_dir: other
                .download_dir
                .clone()
                .or_else(|| self.download_dir.clone()),
            settings: other.settings.clone().or_else(|| self.settings.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

/// Per-user configuration directory for mdpad.
pub fn global_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("mdpad"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("mdpad"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("mdpad"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join("mdpad"));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    global_config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdpadrc")
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
    let mut lines = vec!["# mdpad defaults (saved with --save)".to_string()];
    if flags.download {
        lines.push("--download".to_string());
    }
    if flags.static_commands {
        lines.push("--static-commands".to_string());
    }
    let paths = [
        ("--download-dir", &flags.download_dir),
        ("--settings", &flags.settings),
        ("--log-file", &flags.log_file),
    ];
    for (flag, value) in paths {
        if let Some(value) = value {
            lines.push(format!("{flag} {}", value.display()));
        }
    }
    if let Some(parent) = path.parent() {
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

/// Pick known flags out of a token list. Unknown tokens are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--download" => flags.download = true,
            "--static-commands" => flags.static_commands = true,
            "--download-dir" | "--settings" | "--log-file" => {
                if let Some(next) = tokens.get(i + 1) {
                    *path_slot(&mut flags, token) = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some((flag, value)) = token.split_once('=') {
                    if matches!(flag, "--download-dir" | "--settings" | "--log-file") {
                        *path_slot(&mut flags, flag) = Some(PathBuf::from(value));
                    }
                }
            }
        }
        i += 1;
    }
    flags
}

fn path_slot<'a>(flags: &'a mut ConfigFlags, flag: &str) -> &'a mut Option<PathBuf> {
    match flag {
        "--download-dir" => &mut flags.download_dir,
        "--settings" => &mut flags.settings,
        _ => &mut flags.log_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "mdpad".to_string(),
            "--download".to_string(),
            "--static-commands".to_string(),
            "--download-dir".to_string(),
            "out".to_string(),
            "--log-file=mdpad.log".to_string(),
            "notes.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.download);
        assert!(flags.static_commands);
        assert_eq!(flags.download_dir, Some(PathBuf::from("out")));
        assert_eq!(flags.log_file, Some(PathBuf::from("mdpad.log")));
        assert_eq!(flags.settings, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_paths() {
        let file = ConfigFlags {
            download: true,
            download_dir: Some(PathBuf::from("from-file")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            static_commands: true,
            download_dir: Some(PathBuf::from("from-cli")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.download);
        assert!(merged.static_commands);
        assert_eq!(merged.download_dir, Some(PathBuf::from("from-cli")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".mdpadrc");
        let flags = ConfigFlags {
            download: true,
            static_commands: true,
            download_dir: Some(PathBuf::from("downloads")),
            settings: Some(PathBuf::from("settings.json")),
            log_file: Some(PathBuf::from("mdpad.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}

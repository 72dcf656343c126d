//! Loader for `.firewall.toml` configuration files.

use crate::error::Result;
use crate::models::FirewallConfig;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = ".firewall.toml";

/// Walks up from `start_dir` (or the current directory) looking for a
/// `.firewall.toml`, returning the first one found.
pub fn find_config_file(start_dir: Option<&Path>) -> Option<PathBuf> {
    let current = start_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;

    std::iter::successors(Some(current.as_path()), |p| p.parent())
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.exists())
}

/// Loads configuration from `config_path`, or from the nearest discovered
/// `.firewall.toml`, or falls back to [`FirewallConfig::default`] if
/// neither exists.
///
/// `.firewall.toml` may nest its fields under a `[firewall]` table or
/// place them at the document root; both are accepted.
pub fn load_config(config_path: Option<&Path>) -> Result<FirewallConfig> {
    let resolved = match config_path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file(None),
    };

    let Some(path) = resolved else {
        let mut config = FirewallConfig::default();
        apply_env_overrides(&mut config);
        return Ok(config);
    };

    if !path.exists() {
        let mut config = FirewallConfig::default();
        apply_env_overrides(&mut config);
        return Ok(config);
    }

    let raw = std::fs::read_to_string(&path)?;
    let document: toml::Value = toml::from_str(&raw)?;

    let section = document
        .get("firewall")
        .cloned()
        .unwrap_or(document);

    let mut config: FirewallConfig = section.try_into()?;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Applies `FIREWALL_CI=1` / `CI=true` environment overrides on top of a
/// loaded or default config. Environment always wins over the file.
fn apply_env_overrides(config: &mut FirewallConfig) {
    let ci_env = std::env::var("FIREWALL_CI")
        .or_else(|_| std::env::var("CI"))
        .unwrap_or_default();
    if ci_env.eq_ignore_ascii_case("1") || ci_env.eq_ignore_ascii_case("true") {
        config.ci_mode = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_config_file_walks_up() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(CONFIG_FILENAME), "").unwrap();

        let found = find_config_file(Some(&nested)).unwrap();
        assert_eq!(found, root.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_find_config_file_absent() {
        let root = tempdir().unwrap();
        assert!(find_config_file(Some(root.path())).is_none());
    }

    #[test]
    fn test_load_config_missing_file_returns_defaults() {
        let root = tempdir().unwrap();
        let config = load_config(Some(&root.path().join("missing.toml"))).unwrap();
        assert_eq!(config.cache_ttl_seconds, 3600);
    }

    #[test]
    fn test_load_config_nested_under_firewall_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
            [firewall]
            cache_ttl_seconds = 60
            fail_on_network_error = true
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cache_ttl_seconds, 60);
        assert!(config.fail_on_network_error);
    }

    #[test]
    fn test_load_config_root_level_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "cache_ttl_seconds = 120\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cache_ttl_seconds, 120);
    }
}

//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request; never overwrites an existing file.
//!
//! Unknown elements are rejected so typos surface instead of being ignored.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::STRATEGY_ENV;

use crate::fs_ops::io_error_with_help;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};
use crate::strategy::Strategy;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "strategy")]
    strategy: Option<String>,
    #[serde(rename = "trash_dir")]
    trash_dir: Option<String>,
    #[serde(rename = "macos_trash_dir")]
    macos_trash_dir: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "preserve_metadata", default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_metadata: Option<bool>,
}

// Tolerate surrounding whitespace around true/false.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") | Some("yes") => Ok(Some(true)),
        Some("false") | Some("0") | Some("no") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig onto an existing Config; empty elements leave the field alone.
fn apply_xml(cfg: &mut Config, parsed: XmlConfig) -> Result<()> {
    if let Some(s) = non_empty(parsed.strategy.as_deref()) {
        cfg.strategy = s.to_string();
    }
    if let Some(s) = non_empty(parsed.trash_dir.as_deref()) {
        cfg.trash_dir = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.macos_trash_dir.as_deref()) {
        cfg.macos_trash_dir = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(b) = parsed.preserve_metadata {
        cfg.preserve_metadata = b;
    }
    Ok(())
}

/// Load a Config from a specific XML file, starting from defaults.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let mut cfg = Config::default();
    if contents.trim().is_empty() {
        return Ok(cfg);
    }
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    apply_xml(&mut cfg, parsed).with_context(|| format!("invalid value in '{}'", path.display()))?;
    Ok(cfg)
}

/// Overlay `TRASH_STRATEGY` (when set and non-empty).
pub fn apply_env(cfg: &mut Config) {
    if let Ok(s) = env::var(STRATEGY_ENV) {
        if !s.is_empty() {
            debug!(strategy = %s, "strategy taken from {STRATEGY_ENV}");
            cfg.strategy = s;
        }
    }
}

/// Defaults, then the config file if it exists, then the environment.
/// Returns the config and the file it was read from, if any.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let path = default_config_path();
    let (mut cfg, used) = match path {
        Some(p) if p.is_file() => {
            let cfg = load_config_from_xml_path(&p)?;
            debug!(path = %p.display(), "loaded config");
            (cfg, Some(p))
        }
        Some(p) if p.exists() => bail!("config path '{}' is not a regular file", p.display()),
        _ => (Config::default(), None),
    };
    apply_env(&mut cfg);
    Ok((cfg, used))
}

/// Write a commented template config at `path` (mode 0600).
/// Refuses when the file exists or an existing ancestor is a symlink.
pub fn create_template_config(path: &Path) -> Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        bail!("Refusing to overwrite existing config at {}", path.display());
    }
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(io_error_with_help("create config directory", parent))?;
            let _ = set_dir_mode_0700(parent);
        }
    }

    let content = format!(
        "<!--\n  trashcan configuration (XML)\n\n  strategy           -> {known}\n  trash_dir          -> FreeDesktop trash root (default: $XDG_DATA_HOME/Trash)\n  macos_trash_dir    -> destination for macos_mv (default: ~/.Trash)\n  log_level          -> quiet | normal | info | debug\n  log_file           -> optional log file (diagnostics also go to stderr)\n  preserve_metadata  -> keep mode/timestamps when a move has to copy (true/false)\n\n  Empty elements keep the default. TRASH_STRATEGY and CLI flags override this file.\n-->\n<config>\n  <strategy>{default}</strategy>\n  <trash_dir></trash_dir>\n  <macos_trash_dir></macos_trash_dir>\n  <log_level>quiet</log_level>\n  <log_file></log_file>\n  <preserve_metadata>true</preserve_metadata>\n</config>\n",
        known = Strategy::known_names().replace(", ", " | "),
        default = Strategy::platform_default(),
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let p = dir.join("config.xml");
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn reads_every_field() {
        let td = tempdir().unwrap();
        let p = write(
            td.path(),
            "<config>\n  <strategy> gio </strategy>\n  <trash_dir>/srv/Trash</trash_dir>\n  <macos_trash_dir>/Users/x/.Trash</macos_trash_dir>\n  <log_level>Debug</log_level>\n  <log_file>/tmp/t.log</log_file>\n  <preserve_metadata> false </preserve_metadata>\n</config>\n",
        );
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.strategy, "gio");
        assert_eq!(cfg.trash_dir, Some(PathBuf::from("/srv/Trash")));
        assert_eq!(cfg.macos_trash_dir, Some(PathBuf::from("/Users/x/.Trash")));
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/t.log")));
        assert!(!cfg.preserve_metadata);
    }

    #[test]
    fn missing_and_empty_elements_keep_defaults() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><log_file>  </log_file></config>");
        assert_eq!(load_config_from_xml_path(&p).unwrap(), Config::default());

        let p = write(td.path(), "   \n");
        assert_eq!(load_config_from_xml_path(&p).unwrap(), Config::default());
    }

    #[test]
    fn unknown_elements_and_bad_values_fail() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><colour>red</colour></config>");
        assert!(load_config_from_xml_path(&p).is_err());

        let p = write(td.path(), "<config><log_level>shouty</log_level></config>");
        assert!(load_config_from_xml_path(&p).is_err());

        let p = write(td.path(), "<config><preserve_metadata>maybe</preserve_metadata></config>");
        assert!(load_config_from_xml_path(&p).is_err());

        let p = write(td.path(), "<config><strategy>gio</config>");
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    #[serial]
    fn env_strategy_overrides_file() {
        let prev = env::var_os(STRATEGY_ENV);
        let mut cfg = Config {
            strategy: "gio".into(),
            ..Config::default()
        };

        unsafe { env::set_var(STRATEGY_ENV, "") };
        apply_env(&mut cfg);
        assert_eq!(cfg.strategy, "gio");

        unsafe { env::set_var(STRATEGY_ENV, "trash_cli") };
        apply_env(&mut cfg);
        assert_eq!(cfg.strategy, "trash_cli");

        unsafe {
            match prev {
                Some(v) => env::set_var(STRATEGY_ENV, v),
                None => env::remove_var(STRATEGY_ENV),
            }
        }
    }

    #[test]
    fn template_round_trips_and_is_never_overwritten() {
        let td = tempdir().unwrap();
        let p = td.path().join("nested/config.xml");
        create_template_config(&p).unwrap();

        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg, Config::default());

        fs::write(&p, "<config><strategy>gio</strategy></config>").unwrap();
        assert!(create_template_config(&p).is_err());
        assert!(fs::read_to_string(&p).unwrap().contains("gio"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let q = td.path().join("fresh.xml");
            create_template_config(&q).unwrap();
            assert_eq!(fs::metadata(&q).unwrap().permissions().mode() & 0o777, 0o600);
        }
    }
}

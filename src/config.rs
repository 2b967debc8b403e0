use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::Deserialize;

use crate::paths;
use crate::reminder::ReminderPolicy;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemindersConfig {
    pub deadline_lead_minutes: Option<i64>,
    pub start_lead_minutes: Option<i64>,
}

impl Config {
    /// Load config from `TASKLENS_CONFIG` or `~/.tasklens/config.toml`.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(&paths::config_path()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let leads = [
            ("deadline_lead_minutes", self.reminders.deadline_lead_minutes),
            ("start_lead_minutes", self.reminders.start_lead_minutes),
        ];
        for (name, value) in leads {
            if let Some(v) = value {
                if v < 0 {
                    bail!(
                        "failed to parse {}: reminders.{name} must not be negative",
                        path.display()
                    );
                }
                if Duration::try_minutes(v).is_none() {
                    bail!(
                        "failed to parse {}: reminders.{name} is out of range",
                        path.display()
                    );
                }
            }
        }
        Ok(())
    }

    pub fn reminder_policy(&self) -> ReminderPolicy {
        let defaults = ReminderPolicy::default();
        ReminderPolicy {
            deadline_lead: self
                .reminders
                .deadline_lead_minutes
                .and_then(Duration::try_minutes)
                .unwrap_or(defaults.deadline_lead),
            start_lead: self
                .reminders
                .start_lead_minutes
                .and_then(Duration::try_minutes)
                .unwrap_or(defaults.start_lead),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.reminders.deadline_lead_minutes.is_none());
        assert_eq!(config.reminder_policy(), ReminderPolicy::default());
    }

    #[test]
    fn empty_file_returns_default() {
        let f = write_config("");
        let config = Config::load_from(f.path()).unwrap();
        assert_eq!(config.reminder_policy(), ReminderPolicy::default());
    }

    #[test]
    fn parse_full_config() {
        let f = write_config(
            r#"
[reminders]
deadline_lead_minutes = 30
start_lead_minutes = 5
"#,
        );
        let policy = Config::load_from(f.path()).unwrap().reminder_policy();
        assert_eq!(policy.deadline_lead, Duration::minutes(30));
        assert_eq!(policy.start_lead, Duration::minutes(5));
    }

    #[test]
    fn partial_config_keeps_other_default() {
        let f = write_config("[reminders]\nstart_lead_minutes = 0\n");
        let policy = Config::load_from(f.path()).unwrap().reminder_policy();
        assert_eq!(policy.deadline_lead, Duration::hours(1));
        assert_eq!(policy.start_lead, Duration::zero());
    }

    #[test]
    fn invalid_toml_returns_error() {
        let f = write_config("not valid toml [[[");
        assert!(Config::load_from(f.path()).is_err());
    }

    #[test]
    fn misspelled_field_rejected() {
        let f = write_config("[reminders]\ndeadline_lead_minute = 10\n");
        assert!(Config::load_from(f.path()).is_err());
    }

    #[test]
    fn huge_lead_rejected() {
        let f = write_config("[reminders]\ndeadline_lead_minutes = 9223372036854775807\n");
        let err = Config::load_from(f.path()).unwrap_err().to_string();
        assert!(err.contains("out of range"), "unexpected error: {err}");
    }

    #[test]
    fn unvalidated_huge_lead_falls_back_to_default() {
        let config = Config {
            reminders: RemindersConfig {
                deadline_lead_minutes: Some(i64::MAX),
                start_lead_minutes: None,
            },
        };
        assert_eq!(config.reminder_policy(), ReminderPolicy::default());
    }

    #[test]
    fn negative_lead_rejected() {
        let f = write_config("[reminders]\ndeadline_lead_minutes = -5\n");
        let err = Config::load_from(f.path()).unwrap_err().to_string();
        assert!(err.contains("must not be negative"), "unexpected error: {err}");
    }
}

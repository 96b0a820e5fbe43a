//! Onboardbot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{OnboardError, Result};
use crate::types::SurveyFrequency;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sharepoint: SharePointConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl OnboardConfig {
    /// Load config from the default path (~/.onboardbot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OnboardError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| OnboardError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| OnboardError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Onboardbot home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".onboardbot")
    }
}

/// Bot Framework app registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_password: String,
    /// Base URI serving bundled card artifacts (fallback icons/images).
    #[serde(default = "default_app_base_uri")]
    pub app_base_uri: String,
}

fn default_app_base_uri() -> String {
    "https://onboardbot.example.com".into()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_password: String::new(),
            app_base_uri: default_app_base_uri(),
        }
    }
}

/// User store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    OnboardConfig::home_dir().join("users.db").display().to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// SharePoint learning-plan source, reached through Microsoft Graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePointConfig {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Graph site id hosting the learning-plan list.
    #[serde(default)]
    pub site_id: String,
    /// List id of the "New Hire Checklist" list.
    #[serde(default)]
    pub list_id: String,
}

impl Default for SharePointConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            site_id: String::new(),
            list_id: String::new(),
        }
    }
}

/// Background notifier cadences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between scheduler wake-ups. One day by default.
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Length of the learning plan in weeks.
    #[serde(default = "default_plan_weeks")]
    pub plan_weeks: u32,
    /// Days between pair-up matching rounds.
    #[serde(default = "default_pair_up_interval_days")]
    pub pair_up_interval_days: u32,
    /// Feedback-survey cadence: weekly or monthly.
    #[serde(default)]
    pub survey_frequency: SurveyFrequency,
    /// Months after install during which monthly surveys are sent.
    #[serde(default = "default_survey_window_months")]
    pub survey_window_months: u32,
}

fn default_check_interval_secs() -> u64 {
    86_400
}
fn default_plan_weeks() -> u32 {
    4
}
fn default_pair_up_interval_days() -> u32 {
    14
}
fn default_survey_window_months() -> u32 {
    3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            plan_weeks: default_plan_weeks(),
            pair_up_interval_days: default_pair_up_interval_days(),
            survey_frequency: SurveyFrequency::default(),
            survey_window_months: default_survey_window_months(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OnboardConfig::default();
        assert_eq!(config.scheduler.check_interval_secs, 86_400);
        assert_eq!(config.scheduler.plan_weeks, 4);
        assert_eq!(config.scheduler.survey_frequency, SurveyFrequency::Weekly);
        assert!(config.bot.app_id.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            [bot]
            app_id = "11111111-2222-3333-4444-555555555555"

            [scheduler]
            plan_weeks = 6
        "#;
        let config: OnboardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.scheduler.plan_weeks, 6);
        assert_eq!(config.scheduler.check_interval_secs, 86_400);
        assert_eq!(config.bot.app_id, "11111111-2222-3333-4444-555555555555");
        assert_eq!(config.bot.app_base_uri, "https://onboardbot.example.com");
    }

    #[test]
    fn test_survey_frequency_parse() {
        let config: OnboardConfig =
            toml::from_str("[scheduler]\nsurvey_frequency = \"monthly\"\n").unwrap();
        assert_eq!(config.scheduler.survey_frequency, SurveyFrequency::Monthly);
    }
}

//! Application configuration.
//!
//! Stored as `config.json` in the application data directory. Every section
//! is optional; a missing section means "use the defaults". The store URL can
//! be overridden with the `TASKBOARD_STORE_URL` environment variable (also
//! picked up from a `.env` file).

use super::data_storage::DataStorage;
use super::date::CalendarPolicy;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const STORE_URL_ENV: &str = "TASKBOARD_STORE_URL";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite database in the data directory.
    #[default]
    Sqlite,
    /// Spreadsheet endpoint over HTTP.
    Sheets,
}

impl StoreBackend {
    pub const ALL: [StoreBackend; 2] = [StoreBackend::Sqlite, StoreBackend::Sheets];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Sheets => "sheets",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: StoreBackend::Sqlite,
            url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CalendarConfig {
    /// Whole-hour UTC offset used to decide "today". `None` uses the host timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_hours: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub client_interval_minutes: u64,
    pub daily_hour: u32,
    pub lock_timeout_secs: u64,
    pub lock_stale_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            client_interval_minutes: 60,
            daily_hour: 1,
            lock_timeout_secs: 600,
            lock_stale_secs: 3600,
        }
    }
}

impl SchedulerConfig {
    pub fn client_interval(&self) -> Duration {
        Duration::from_secs(self.client_interval_minutes.max(1) * 60)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerConfig>,
}

impl Config {
    /// Reads `config.json` from the data directory; defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(config_file_path)
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    /// Like [`Config::read`], but a broken file is reported and replaced by defaults.
    pub fn read_or_default() -> Config {
        match Self::read() {
            Ok(config) => config,
            Err(e) => {
                msg_warning!(Message::ConfigReadFailed(e.to_string()));
                Config::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(config_file_path)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Store settings with the environment override applied.
    pub fn store(&self) -> StoreConfig {
        let mut store = self.store.clone().unwrap_or_default();
        if let Ok(url) = env::var(STORE_URL_ENV) {
            if !url.trim().is_empty() {
                store.url = url.trim().to_string();
            }
        }
        store
    }

    pub fn calendar_policy(&self) -> CalendarPolicy {
        CalendarPolicy::from_offset(self.calendar.as_ref().and_then(|c| c.utc_offset_hours))
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        self.scheduler.clone().unwrap_or_default()
    }

    /// Interactive setup. Starts from the saved configuration and asks only
    /// about the sections the user selects.
    pub fn init() -> Result<Self> {
        let mut config = Self::read_or_default();

        let modules = [
            ConfigModule {
                key: "store".to_string(),
                name: "Task store".to_string(),
            },
            ConfigModule {
                key: "calendar".to_string(),
                name: "Calendar".to_string(),
            },
            ConfigModule {
                key: "scheduler".to_string(),
                name: "Scheduler".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "store" => config.store = Some(Self::prompt_store(config.store.clone().unwrap_or_default())?),
                "calendar" => config.calendar = Some(Self::prompt_calendar(config.calendar.clone().unwrap_or_default())?),
                "scheduler" => config.scheduler = Some(Self::prompt_scheduler(config.scheduler.clone().unwrap_or_default())?),
                _ => {}
            }
        }

        Ok(config)
    }

    fn prompt_store(default: StoreConfig) -> Result<StoreConfig> {
        msg_print!(Message::ConfigModuleStore);
        let current = StoreBackend::ALL.iter().position(|b| *b == default.backend).unwrap_or(0);
        let backend = StoreBackend::ALL[Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptStoreBackend.to_string())
            .items(&StoreBackend::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>())
            .default(current)
            .interact()?];

        let url = match backend {
            StoreBackend::Sheets => Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStoreUrl.to_string())
                .default(default.url)
                .interact_text()?,
            StoreBackend::Sqlite => default.url,
        };

        Ok(StoreConfig {
            backend,
            url,
            timeout_secs: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStoreTimeout.to_string())
                .default(default.timeout_secs)
                .interact_text()?,
        })
    }

    fn prompt_calendar(default: CalendarConfig) -> Result<CalendarConfig> {
        msg_print!(Message::ConfigModuleCalendar);
        let raw: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptUtcOffset.to_string())
            .default(default.utc_offset_hours.map(|h| h.to_string()).unwrap_or_default())
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                match input.trim() {
                    "" => Ok(()),
                    s => s
                        .parse::<i32>()
                        .ok()
                        .filter(|h| (-12..=14).contains(h))
                        .map(|_| ())
                        .ok_or_else(|| "expected a whole number between -12 and 14".to_string()),
                }
            })
            .interact_text()?;

        Ok(CalendarConfig {
            utc_offset_hours: raw.trim().parse().ok(),
        })
    }

    fn prompt_scheduler(default: SchedulerConfig) -> Result<SchedulerConfig> {
        msg_print!(Message::ConfigModuleScheduler);
        Ok(SchedulerConfig {
            client_interval_minutes: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptClientInterval.to_string())
                .default(default.client_interval_minutes)
                .interact_text()?,
            daily_hour: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptDailyHour.to_string())
                .default(default.daily_hour)
                .validate_with(|hour: &u32| -> Result<(), String> {
                    if *hour < 24 {
                        Ok(())
                    } else {
                        Err("expected an hour between 0 and 23".to_string())
                    }
                })
                .interact_text()?,
            lock_timeout_secs: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptLockTimeout.to_string())
                .default(default.lock_timeout_secs)
                .interact_text()?,
            lock_stale_secs: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptLockStale.to_string())
                .default(default.lock_stale_secs)
                .interact_text()?,
        })
    }
}

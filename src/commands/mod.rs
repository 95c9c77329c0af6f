pub mod client;
pub mod daily;
pub mod generate;
pub mod init;
pub mod schedule;
pub mod sync;
pub mod task;
pub mod user;
pub mod watch;

use crate::db::backend::Backend;
use crate::libs::board::{default_cache_path, Board};
use crate::libs::config::Config;
use crate::libs::date::{CalendarDate, Clock, SystemClock};
use crate::libs::messages::Message;
use crate::libs::sync_queue::SyncQueue;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create, list, update and delete tasks")]
    Task(task::TaskArgs),
    #[command(about = "Run one generation pass for recurring tasks")]
    Generate(generate::GenerateArgs),
    #[command(about = "Run the locked daily generation pass")]
    Daily(daily::DailyArgs),
    #[command(about = "Generate and sync periodically until interrupted")]
    Watch,
    #[command(about = "Run the daily pass every day at the configured hour")]
    Schedule,
    #[command(about = "Send pending changes to the task store")]
    Sync,
    #[command(about = "Manage clients")]
    Client(client::ClientArgs),
    #[command(about = "Manage team members")]
    User(user::UserArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args).await,
            Commands::Generate(args) => generate::cmd(args).await,
            Commands::Daily(args) => daily::cmd(args).await,
            Commands::Watch => watch::cmd().await,
            Commands::Schedule => schedule::cmd().await,
            Commands::Sync => sync::cmd().await,
            Commands::Client(args) => client::cmd(args),
            Commands::User(args) => user::cmd(args),
        }
    }
}

/// Configuration, store and clock shared by every task command.
pub(crate) struct Context {
    pub config: Config,
    pub store: Backend,
    pub clock: SystemClock,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::read_or_default();
        let store = Backend::from_config(&config)?;
        let clock = SystemClock::new(config.calendar_policy());
        Ok(Self { config, store, clock })
    }

    /// Board over the configured store with the persistent queue and cache.
    pub async fn board(&self) -> Result<Board> {
        Board::load(&self.store, SyncQueue::open()?, Some(default_cache_path()?)).await
    }

    /// `--date` override, or today under the configured calendar policy.
    pub fn day(&self, date: Option<&str>) -> Result<CalendarDate> {
        match date {
            Some(raw) => parse_date(raw),
            None => Ok(self.clock.today()),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<CalendarDate> {
    CalendarDate::parse(raw).map_err(|_| msg_error_anyhow!(Message::InvalidDate(raw.to_string())))
}

use super::Context;
use crate::{
    libs::{
        daily_job::{DailyJob, DailyOutcome},
        messages::Message,
    },
    msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DailyArgs {
    /// Day to generate for (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

pub async fn cmd(args: DailyArgs) -> Result<()> {
    let context = Context::load()?;
    let day = context.day(args.date.as_deref())?;
    let mut job = DailyJob::from_config(&context.config.scheduler())?;

    if let DailyOutcome::Completed(report) = job.run_for(&context.store, day).await? {
        if report.failed > 0 {
            msg_warning!(Message::ChildrenWriteFailures(report.failed));
        }
    }
    Ok(())
}

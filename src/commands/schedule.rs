use super::Context;
use crate::{
    libs::{
        daily_job::DailyJob,
        messages::Message,
        scheduler::{shutdown_signal, DailyScheduler},
    },
    msg_info,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let context = Context::load()?;
    let settings = context.config.scheduler();
    let scheduler = DailyScheduler::new(settings.daily_hour, context.clock.policy());
    let mut job = DailyJob::from_config(&settings)?;

    msg_info!(Message::DailySchedulerStarted(scheduler.hour));
    scheduler.run_until(&mut job, &context.store, &context.clock, shutdown_signal()).await;
    Ok(())
}

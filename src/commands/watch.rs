use super::Context;
use crate::{
    libs::{
        messages::Message,
        scheduler::{shutdown_signal, ClientScheduler},
    },
    msg_info,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let context = Context::load()?;
    let scheduler = ClientScheduler::new(context.config.scheduler().client_interval());
    let mut board = context.board().await?;

    msg_info!(Message::ClientSchedulerStarted(scheduler.interval.as_secs() / 60));
    scheduler.run_until(&mut board, &context.store, &context.clock, shutdown_signal()).await;
    Ok(())
}

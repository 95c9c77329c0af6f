use super::Context;
use crate::{libs::messages::Message, msg_info, msg_success, msg_warning};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let context = Context::load()?;
    let mut board = context.board().await?;

    if board.queue().is_empty() {
        msg_info!(Message::SyncQueueEmpty);
        return Ok(());
    }

    let delivered = board.sync(&context.store).await?;
    if delivered > 0 {
        msg_success!(Message::SyncDelivered(delivered));
    }
    if !board.queue().is_empty() {
        msg_warning!(Message::SyncPending(board.queue().len()));
    }
    if let Err(e) = board.save_cache() {
        msg_warning!(Message::CacheSaveFailed(e.to_string()));
    }
    Ok(())
}

use log::{error, info};

use crate::message;
use crate::{Context, Error};

/// Subscribe the requesting user to the daily price updates.
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    info!("start: invoked user_id={}", user_id);

    match ctx.data().subscribers.add(user_id).await {
        Ok(true) => info!("start: subscribed user_id={}", user_id),
        Ok(false) => info!("start: already subscribed user_id={}", user_id),
        Err(e) => {
            error!("start: store.add failed user_id={} err={:?}", user_id, e);
            ctx.say(message::STORE_FAILURE).await?;
            return Ok(());
        }
    }

    ctx.say(message::WELCOME).await?;
    Ok(())
}

use log::{error, info};

use crate::message;
use crate::{Context, Error};

/// Stop the daily price updates for the requesting user.
#[poise::command(slash_command)]
pub async fn unsubscribe(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    info!("unsubscribe: invoked user_id={}", user_id);

    match ctx.data().subscribers.remove(user_id).await {
        Ok(true) => info!("unsubscribe: removed user_id={}", user_id),
        Ok(false) => info!("unsubscribe: was not subscribed user_id={}", user_id),
        Err(e) => {
            error!(
                "unsubscribe: store.remove failed user_id={} err={:?}",
                user_id, e
            );
            ctx.say(message::STORE_FAILURE).await?;
            return Ok(());
        }
    }

    ctx.say(message::UNSUBSCRIBED).await?;
    Ok(())
}

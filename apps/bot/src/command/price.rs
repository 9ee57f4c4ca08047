use log::{info, warn};

use crate::message;
use crate::{COFFEE_SYMBOL, Context, Error};

/// Report the current coffee price.
#[poise::command(slash_command)]
pub async fn coffeeprice(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let user_id = ctx.author().id.get();
    info!("coffeeprice: invoked user_id={}", user_id);

    let result = ctx.data().price_client.fetch_latest(COFFEE_SYMBOL).await;
    if let Err(e) = &result {
        warn!("coffeeprice: fetch failed user_id={} err={:?}", user_id, e);
    }

    ctx.say(message::price_reply(&result)).await?;
    Ok(())
}

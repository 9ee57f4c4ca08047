use crate::message;
use crate::{Context, Error};

/// List the available commands.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(message::HELP).await?;
    Ok(())
}

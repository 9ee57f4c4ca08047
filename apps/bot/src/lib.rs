use std::sync::Arc;

use coffee::{PriceClient, SubscriberStore};

pub mod command;
pub mod config;
pub mod daily;
pub mod message;
pub mod notify;

/// Coffee futures, the one symbol this bot reports on.
pub const COFFEE_SYMBOL: &str = "KC=F";

pub struct Data {
    pub subscribers: Arc<SubscriberStore>,
    pub price_client: Arc<PriceClient>,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{CreateMessage, Http, UserId};

use crate::Error;

/// Outbound delivery of one message to one subscriber.
///
/// The broadcast depends only on this seam, so its body can run against a
/// recording fake in tests.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, subscriber_id: u64, text: &str) -> Result<(), Error>;
}

/// Delivers over Discord direct messages.
pub struct DirectMessage {
    http: Arc<Http>,
}

impl DirectMessage {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notify for DirectMessage {
    async fn notify(&self, subscriber_id: u64, text: &str) -> Result<(), Error> {
        let channel = UserId::new(subscriber_id)
            .create_dm_channel(&self.http)
            .await?;

        channel
            .id
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(())
    }
}

use anyhow::Result;
use coffee::{PriceClient, SubscriberStore};
use serenity::futures::{StreamExt, stream};
use tracing::{debug, info, instrument, warn};
use tracing_futures::Instrument;

use crate::COFFEE_SYMBOL;
use crate::message;
use crate::notify::Notify;

const CONCURRENCY: usize = 8;

/// One scheduled broadcast run.
///
/// The price is fetched exactly once; if that fails the whole occurrence is
/// skipped and subscribers are never sent an error message. A delivery
/// failure to one subscriber does not stop the rest of the run.
#[instrument(name = "run_daily", skip(notifier, price_client, subscribers))]
pub async fn run_daily<N: Notify>(
    notifier: &N,
    price_client: &PriceClient,
    subscribers: &SubscriberStore,
) -> Result<()> {
    let quote = price_client.fetch_latest(COFFEE_SYMBOL).await?;
    debug!(price = quote.price, as_of = %quote.as_of, "fetched quote");

    let text = message::price_message(&quote);

    let ids = subscribers.list().await;
    info!(total_subscribers = ids.len(), "loaded subscribers");

    let (delivered, failed) = deliver_to_all(notifier, &ids, &text).await;
    info!(delivered, failed, "completed daily broadcast");

    Ok(())
}

/// Send `text` to every id, isolating failures per recipient.
/// Returns delivered and failed counts.
pub async fn deliver_to_all<N: Notify>(notifier: &N, ids: &[u64], text: &str) -> (usize, usize) {
    let mut deliveries = stream::iter(ids.iter().copied())
        .map(|id| {
            let span = tracing::info_span!("deliver", subscriber_id = id);

            async move {
                match notifier.notify(id, text).await {
                    Ok(()) => {
                        debug!("delivered");
                        true
                    }
                    Err(e) => {
                        warn!(error = ?e, "delivery failed");
                        false
                    }
                }
            }
            .instrument(span)
        })
        .buffer_unordered(CONCURRENCY);

    let mut delivered = 0usize;
    let mut failed = 0usize;

    while let Some(ok) = deliveries.next().await {
        if ok {
            delivered += 1;
        } else {
            failed += 1;
        }
    }

    (delivered, failed)
}

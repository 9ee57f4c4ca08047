mod error;
mod price_client;
mod subscriber_store;

pub use error::{QuoteError, StoreError};
pub use price_client::{PriceClient, PriceQuote};
pub use subscriber_store::SubscriberStore;

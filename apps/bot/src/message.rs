//! Reply texts and price presentation, shared by the slash commands and the
//! daily broadcast.

use coffee::{PriceQuote, QuoteError};

pub const WELCOME: &str = "Welcome! You've been subscribed to daily coffee price updates. \
    Use /coffeeprice to get the latest coffee price.\n\
    Use /unsubscribe to stop receiving daily updates.";

pub const UNSUBSCRIBED: &str = "You've been unsubscribed from daily updates.";

pub const HELP: &str = "Available commands:\n\
    /start - Start the bot and subscribe to updates\n\
    /coffeeprice - Get coffee price\n\
    /unsubscribe - Stop receiving daily updates\n\
    /help - Show this help message";

pub const PRICE_UNAVAILABLE: &str = "Could not fetch coffee price. Please try again later.";

pub const STORE_FAILURE: &str = "Something went wrong on our side. Please try again later.";

// Coffee futures are quoted in US cents per pound.
const CENTS_PER_DOLLAR: f64 = 100.0;
const POUNDS_PER_KG: f64 = 2.20462;

fn usd_per_kg(cents_per_pound: f64) -> f64 {
    cents_per_pound / CENTS_PER_DOLLAR * POUNDS_PER_KG
}

/// Render a quote the way subscribers see it.
pub fn price_message(quote: &PriceQuote) -> String {
    format!(
        "☕ Coffee Price (as of {}): ${:.3} per kg",
        quote.as_of.format("%Y-%m-%d"),
        usd_per_kg(quote.price)
    )
}

/// Reply for an on-demand price check. Upstream failures are reduced to one
/// fixed user-facing line; the raw cause belongs in the logs only.
pub fn price_reply(result: &Result<PriceQuote, QuoteError>) -> String {
    match result {
        Ok(quote) => price_message(quote),
        Err(_) => PRICE_UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quote(price: f64) -> PriceQuote {
        PriceQuote {
            symbol: "KC=F".to_string(),
            price,
            as_of: Utc.with_ymd_and_hms(2024, 3, 8, 19, 0, 0).unwrap(),
        }
    }

    #[test]
    fn formats_price_per_kg() {
        // 300 cents per pound is $3.00/lb, $6.614/kg
        assert_eq!(
            price_message(&quote(300.0)),
            "☕ Coffee Price (as of 2024-03-08): $6.614 per kg"
        );
    }

    #[test]
    fn failed_lookup_gets_the_fixed_reply() {
        let reply = price_reply(&Err(QuoteError::NoData {
            symbol: "KC=F".to_string(),
        }));

        assert_eq!(reply, PRICE_UNAVAILABLE);
    }

    #[test]
    fn successful_lookup_reply_matches_the_broadcast_text() {
        let q = quote(250.0);
        assert_eq!(price_reply(&Ok(q.clone())), price_message(&q));
    }
}

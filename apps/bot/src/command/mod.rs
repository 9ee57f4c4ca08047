mod help;
mod price;
mod start;
mod unsubscribe;

pub use help::help;
pub use price::coffeeprice;
pub use start::start;
pub use unsubscribe::unsubscribe;

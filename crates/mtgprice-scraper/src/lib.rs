pub mod aggregate;
pub mod client;
pub mod error;
pub mod formats;
pub mod lookup;
mod value;

pub use aggregate::{Aggregator, CheckError};
pub use client::{RequestSpec, StoreClient};
pub use error::ScraperError;
pub use formats::StoreAdapter;
pub use lookup::{HttpLookup, PriceLookup};

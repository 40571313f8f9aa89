//! Freshness metrics: the poll loop that collects them and the text format
//! they are scraped in.

pub mod exposition;
pub mod poller;

pub use poller::Poller;

//! Search endpoint access and result session.

mod client;
mod session;
mod types;

pub use client::SearchClient;
pub use session::{DEFAULT_PAGE_SIZE, PendingSearch, SearchSession};
pub use types::{Hit, SearchResponse};

//! Link management commands

mod add;
mod list;
mod remove;
mod seed;

pub use add::add_url;
pub use list::list_urls;
pub use remove::remove_url;
pub use seed::{SAMPLE_URLS, seed_urls};

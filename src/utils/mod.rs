pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{dedup_preserving_order, is_valid_url, resolve_listing_href};

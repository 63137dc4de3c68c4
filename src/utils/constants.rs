//! Shared configuration constants for listing_watch
//!
//! Default values used by the configuration builder, the environment loader
//! and the collaborators, kept in one place to avoid magic numbers.

/// Default discovery bound: at most 10 viewport scrolls on the search page
pub const DEFAULT_MAX_SCROLLS: usize = 10;

/// Default per-run quota of confirmed notifications
pub const DEFAULT_MAX_MATCHES: usize = 10;

/// Default timeout for a single `page.goto()` (milliseconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 20_000;

/// Settle delay after the search page navigation, for initial hydration
pub const DEFAULT_SEARCH_SETTLE_MS: u64 = 5_000;

/// Settle delay after each listing page navigation
pub const DEFAULT_ITEM_SETTLE_MS: u64 = 3_000;

/// CDP request timeout for the browser connection (milliseconds)
pub const DEFAULT_PROTOCOL_TIMEOUT_MS: u64 = 60_000;

/// Marketplace origin prefixed onto relative listing hrefs
pub const DEFAULT_ORIGIN: &str = "https://poshmark.com";

/// Search page watched when `WATCH_SEARCH_URL` is not set
pub const DEFAULT_SEARCH_URL: &str = "https://poshmark.com/search?query=the%20north%20face%20dryvent&sort_by=added_desc&brand%5B%5D=The%20North%20Face&department=Women&category=Jackets_%26_Coats&price%5B%5D=-35&size%5B%5D=M&size%5B%5D=S&size%5B%5D=L";

/// Anchor selector for listing tiles on the search page
pub const DEFAULT_ANCHOR_SELECTOR: &str = "a.tile__covershot";

/// Listing detail page selectors
pub const DEFAULT_TITLE_SELECTOR: &str = "h1.listing__title-container";
pub const DEFAULT_PRICE_SELECTOR: &str = "p.h1";
pub const DEFAULT_SIZE_SELECTOR: &str = "button.size-selector__size-option";

/// Title terms that disqualify a listing (condition, defect and category exclusions)
pub const DEFAULT_EXCLUDED_TERMS: &[&str] = &[
    "flaw", "flaws", "flawed", "polartec", "vest", "stain", "damaged",
];

/// Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Header sent once per run before the first listing
pub const DEFAULT_HEADER_TEXT: &str =
    "🔔 You got new deals!\n\nHere are the latest Women DryVent Jackets:";

/// Invisible separator (U+2063) sent ahead of the header as a warm-up message
pub const WARMUP_TEXT: &str = "\u{2063}";

/// SQLite file holding the seen-listing ledger
pub const DEFAULT_DATABASE_PATH: &str = "seen_listings.sqlite";

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

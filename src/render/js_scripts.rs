//! JavaScript evaluation scripts
//!
//! Expressions evaluated in the page. Every field read in
//! [`listing_fields_script`] degrades to `null` when its element is missing.

use crate::config::ListingSelectors;

/// Scroll the window down by one viewport
pub const SCROLL_BY_VIEWPORT_SCRIPT: &str = r#"
    (() => {
        window.scrollBy(0, window.innerHeight);
        return true;
    })()
"#;

/// Total page height, used for convergence detection
pub const SCROLL_HEIGHT_SCRIPT: &str = r#"
    (() => document.body ? document.body.scrollHeight : 0)()
"#;

/// Raw `href` attributes of every anchor matching `selector`, in DOM order
#[must_use]
pub fn anchor_hrefs_script(selector: &str) -> String {
    format!(
        r#"
    (() => Array.from(document.querySelectorAll({selector}))
        .map(a => a.getAttribute('href'))
        .filter(href => typeof href === 'string'))()
"#,
        selector = js_string(selector)
    )
}

/// Title, raw price text and size of a listing detail page
#[must_use]
pub fn listing_fields_script(selectors: &ListingSelectors) -> String {
    format!(
        r#"
    (() => {{
        const text = (sel) => {{
            const el = document.querySelector(sel);
            const value = el?.innerText?.trim();
            return value ? value : null;
        }};
        return {{
            title: text({title}),
            raw_price: text({price}),
            size: text({size})
        }};
    }})()
"#,
        title = js_string(&selectors.title),
        price = js_string(&selectors.price),
        size = js_string(&selectors.size)
    )
}

/// Quote a value as a JavaScript string literal
fn js_string(value: &str) -> String {
    // JSON string literals are valid JavaScript string literals
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_quoted_into_scripts() {
        let script = anchor_hrefs_script("a.tile__covershot");
        assert!(script.contains(r#"document.querySelectorAll("a.tile__covershot")"#));
    }

    #[test]
    fn quotes_in_selectors_are_escaped() {
        let script = anchor_hrefs_script(r#"a[data-x="1"]"#);
        assert!(script.contains(r#""a[data-x=\"1\"]""#));
    }

    #[test]
    fn listing_script_reads_all_three_fields() {
        let script = listing_fields_script(&ListingSelectors::default());
        assert!(script.contains(r#"text("h1.listing__title-container")"#));
        assert!(script.contains(r#"text("p.h1")"#));
        assert!(script.contains(r#"text("button.size-selector__size-option")"#));
    }
}

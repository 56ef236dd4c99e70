//! URL and mention extraction from user bio text.
//!
//! Patterns are compile-time checked via the `lazy-regex` crate. The set
//! mirrors what link spammers actually put in Telegram bios: plain URLs,
//! bare `www.` domains, `t.me`/`telegram.me` invite links, Instagram
//! profiles and `@mention` handles.

use lazy_regex::lazy_regex;

/// Match http(s) URLs, path and query included
static RE_HTTP_URL: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)https?://(?:[A-Za-z0-9/]|[$\-_@.&+!*(),:~#?=%]|%[0-9a-fA-F]{2})+");

/// Match bare domains starting with www.
static RE_WWW_DOMAIN: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)www\.[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}");

/// Match t.me invite links without a scheme
static RE_TELEGRAM_SHORT: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)\bt\.me/[a-zA-Z0-9_]+");

/// Match telegram.me links without a scheme
static RE_TELEGRAM_LONG: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)\btelegram\.me/[a-zA-Z0-9_]+");

/// Match Instagram profile links without a scheme
static RE_INSTAGRAM: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)\binstagram\.com/[a-zA-Z0-9_.]+");

/// Match @mention handles
static RE_MENTION: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"@[a-zA-Z0-9_]{3,}");

/// Extracts all URL-like strings and mention handles from `text`.
///
/// Matches are returned in pattern order with duplicates removed, ready to be
/// listed in a warning notice.
#[must_use]
pub fn extract_links(text: &str) -> Vec<String> {
    let patterns = [
        &*RE_HTTP_URL,
        &*RE_WWW_DOMAIN,
        &*RE_TELEGRAM_SHORT,
        &*RE_TELEGRAM_LONG,
        &*RE_INSTAGRAM,
        &*RE_MENTION,
    ];

    let mut found: Vec<String> = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let link = m.as_str().to_string();
            if !found.contains(&link) {
                found.push(link);
            }
        }
    }
    found
}

/// Returns true if `text` contains at least one URL-like pattern.
#[must_use]
pub fn contains_link(text: &str) -> bool {
    !extract_links(text).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_http_url() {
        let links = extract_links("contact me at http://x.com");
        assert_eq!(links, vec!["http://x.com".to_string()]);
    }

    #[test]
    fn detects_https_and_mention() {
        let links = extract_links("DM @spam_account or visit https://example.com/promo");
        assert!(links.iter().any(|l| l == "@spam_account"));
        assert!(links.iter().any(|l| l == "https://example.com/promo"));
    }

    #[test]
    fn keeps_full_path_and_query_of_urls() {
        let links = extract_links("grab it at https://shop.example.com/deals?id=42&ref=promo");
        assert_eq!(
            links,
            vec!["https://shop.example.com/deals?id=42&ref=promo".to_string()]
        );
    }

    #[test]
    fn detects_bare_www_domain() {
        assert!(contains_link("my shop: www.cheap-stuff.example.net"));
    }

    #[test]
    fn detects_telegram_invite_without_scheme() {
        let links = extract_links("join t.me/free_crypto now");
        assert_eq!(links, vec!["t.me/free_crypto".to_string()]);
    }

    #[test]
    fn detects_instagram_profile() {
        assert!(contains_link("follow instagram.com/some.model"));
    }

    #[test]
    fn case_insensitive_matching() {
        assert!(contains_link("HTTP://SHOUTY.EXAMPLE.COM"));
        assert!(contains_link("WWW.EXAMPLE.ORG"));
    }

    #[test]
    fn clean_bio_has_no_links() {
        assert!(!contains_link("I like hiking and photography"));
        assert!(extract_links("").is_empty());
    }

    #[test]
    fn overlapping_patterns_are_deduplicated() {
        // t.me also matched inside the full URL; each distinct string once
        let links = extract_links("https://t.me/chan https://t.me/chan");
        assert_eq!(links.iter().filter(|l| *l == "https://t.me/chan").count(), 1);
    }
}

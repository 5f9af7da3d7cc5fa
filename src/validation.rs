//! Field rules for photo input.
//!
//! Each `check_*` function appends the messages of every rule the value violates, so callers
//! can report all problems at once instead of stopping at the first.

use std::net::IpAddr;
use url::{Host, Url};

pub const TITLE_OMITTED: &str = "Title cannot be omitted";
pub const TITLE_EMPTY: &str = "Title cannot be an empty string";
pub const TITLE_TOO_LONG: &str = "Title must be at most 255 characters";
pub const IMAGE_URL_OMITTED: &str = "Image URL cannot be omitted";
pub const IMAGE_URL_EMPTY: &str = "Image URL cannot be an empty string";
pub const IMAGE_URL_FORMAT: &str = "Wrong URL format";

/// Width of the `"Photos".title` column, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Schemes accepted for `image_url`.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Title: required, not blank, and short enough for its column.
pub fn check_title(title: Option<&str>, errors: &mut Vec<String>) {
    match title {
        None => errors.push(TITLE_OMITTED.to_string()),
        Some(t) if t.trim().is_empty() => errors.push(TITLE_EMPTY.to_string()),
        Some(t) if t.chars().count() > TITLE_MAX_CHARS => errors.push(TITLE_TOO_LONG.to_string()),
        Some(_) => {}
    }
}

/// Image URL: required, not blank, well-formed. A missing value only reports the
/// omission; a blank string is also not a URL and reports both rules.
pub fn check_image_url(image_url: Option<&str>, errors: &mut Vec<String>) {
    let Some(image_url) = image_url else {
        errors.push(IMAGE_URL_OMITTED.to_string());
        return;
    };

    if image_url.trim().is_empty() {
        errors.push(IMAGE_URL_EMPTY.to_string());
    }
    if !is_well_formed_url(image_url) {
        errors.push(IMAGE_URL_FORMAT.to_string());
    }
}

/// is_well_formed_url
///
/// http/https/ftp URL whose host is an IP address or a dotted domain name with a
/// top-level label of at least two characters. The scheme may be left out
/// (`image.com/pic.png`), in which case http is assumed.
pub fn is_well_formed_url(candidate: &str) -> bool {
    if candidate.trim() != candidate || candidate.is_empty() {
        return false;
    }

    let parsed = if candidate.contains("://") {
        Url::parse(candidate)
    } else if is_bare_authority(candidate) {
        Url::parse(&format!("http://{candidate}"))
    } else {
        return false;
    };
    let Ok(url) = parsed else {
        return false;
    };

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return false;
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => {
            if domain.parse::<IpAddr>().is_ok() {
                return true;
            }
            let mut labels = domain.trim_end_matches('.').split('.');
            let tld = labels.next_back().unwrap_or_default();
            let has_parent = labels.next().is_some_and(|label| !label.is_empty());
            has_parent && tld.len() >= 2 && tld.chars().all(|c| c.is_alphanumeric() || c == '-')
        }
        None => false,
    }
}

/// Whether a scheme-less candidate starts with `host[:port]`. Anything else before the
/// first `/` (`mailto:`, `javascript:`, credentials) means it is not a bare web address.
fn is_bare_authority(candidate: &str) -> bool {
    let authority = candidate
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if authority.is_empty() || authority.contains('@') {
        return false;
    }
    match authority.split_once(':') {
        Some((_, port)) => !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(title: Option<&str>, image_url: Option<&str>) -> Vec<String> {
        let mut errors = Vec::new();
        check_title(title, &mut errors);
        check_image_url(image_url, &mut errors);
        errors
    }

    #[test]
    fn accepts_common_image_urls() {
        assert!(is_well_formed_url("http://image.com/myimage.png"));
        assert!(is_well_formed_url("https://cdn.example.co.uk/a/b.jpg?size=large"));
        assert!(is_well_formed_url("http://127.0.0.1:8080/pic.png"));
        assert!(is_well_formed_url("ftp://files.example.org/pic.gif"));
    }

    #[test]
    fn accepts_urls_without_a_scheme() {
        assert!(is_well_formed_url("image.com/pic.png"));
        assert!(is_well_formed_url("cdn.example.org:8080/a/b.jpg"));
        assert!(is_well_formed_url("10.0.0.1/pic.png"));
        assert!(!is_well_formed_url("image/pic.png"));
        assert!(!is_well_formed_url("//image.com/pic.png"));
        assert!(!is_well_formed_url("user@image.com/pic.png"));
        assert!(!is_well_formed_url("image.com:http/pic.png"));
    }

    #[test]
    fn rejects_non_urls() {
        assert!(!is_well_formed_url("abc"));
        assert!(!is_well_formed_url(""));
        assert!(!is_well_formed_url("http://localhost/pic.png"));
        assert!(!is_well_formed_url("mailto:someone@example.com"));
        assert!(!is_well_formed_url("javascript:alert(1)"));
        assert!(!is_well_formed_url(" http://image.com/x.png"));
        assert!(!is_well_formed_url("http://image.c/x.png"));
    }

    #[test]
    fn missing_fields_only_report_omission() {
        assert_eq!(messages(None, None), vec![TITLE_OMITTED, IMAGE_URL_OMITTED]);
    }

    #[test]
    fn empty_image_url_reports_empty_and_format() {
        assert_eq!(
            messages(Some("t"), Some("")),
            vec![IMAGE_URL_EMPTY, IMAGE_URL_FORMAT]
        );
    }

    #[test]
    fn blank_values_count_as_empty() {
        assert_eq!(
            messages(Some("   "), Some("  ")),
            vec![TITLE_EMPTY, IMAGE_URL_EMPTY, IMAGE_URL_FORMAT]
        );
    }

    #[test]
    fn title_length_is_bounded_in_characters() {
        let longest = "é".repeat(TITLE_MAX_CHARS);
        assert!(messages(Some(&longest), Some("http://image.com/x.png")).is_empty());

        let too_long = "a".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            messages(Some(&too_long), Some("http://image.com/x.png")),
            vec![TITLE_TOO_LONG]
        );
    }

    #[test]
    fn valid_input_has_no_messages() {
        assert!(messages(Some("my Photo"), Some("http://image.com/myimage.png")).is_empty());
    }
}

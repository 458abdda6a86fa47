// URL validation and canonical id extraction

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::models::VideoId;

/// Hosts that carry the id in the `v` query parameter.
const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Hosts that carry the id as the first path segment.
const SHORT_LINK_HOSTS: &[&str] = &["youtu.be"];

lazy_static! {
    static ref WATCH_URL_RE: Regex =
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[\w-]+(&\S*)?$")
            .expect("watch url pattern is valid");
}

/// Extract the canonical video id from `input`.
///
/// Returns `None` for anything that is not a recognized host carrying a
/// well-formed, non-empty id. A missing scheme is read as `https`.
/// Never panics on malformed input.
pub fn validate(input: &str) -> Option<VideoId> {
    let input = input.trim();
    let parsed = if input.contains("://") {
        Url::parse(input)
    } else {
        Url::parse(&format!("https://{}", input))
    }
    .ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    let raw = if WATCH_HOSTS.contains(&host.as_str()) {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if SHORT_LINK_HOSTS.contains(&host.as_str()) {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string)
    } else {
        None
    }?;

    VideoId::new(raw)
}

/// Strict shape check used by the HTTP surface on top of [`validate`].
pub fn is_watch_url(input: &str) -> bool {
    WATCH_URL_RE.is_match(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<String> {
        validate(s).map(|v| v.as_str().to_string())
    }

    #[test]
    fn watch_urls_yield_query_id() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://youtube.com/watch?v=abc123&t=42").as_deref(), Some("abc123"));
        assert_eq!(id("http://m.youtube.com/watch?feature=share&v=xyz_-1").as_deref(), Some("xyz_-1"));
    }

    #[test]
    fn short_links_yield_path_id() {
        assert_eq!(id("https://youtu.be/abc123").as_deref(), Some("abc123"));
        assert_eq!(id("https://youtu.be/abc123?si=tracking").as_deref(), Some("abc123"));
        assert_eq!(id("youtu.be/abc123").as_deref(), Some("abc123"));
        assert_eq!(id("www.youtube.com/watch?v=abc123").as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(id(""), None);
        assert_eq!(id("not a url"), None);
        assert_eq!(id("https://"), None);
        assert_eq!(id("https://vimeo.com/watch?v=abc123"), None);
        assert_eq!(id("https://www.youtube.com/watch"), None);
        assert_eq!(id("https://www.youtube.com/watch?v="), None);
        assert_eq!(id("https://youtu.be/"), None);
        assert_eq!(id("https://evil-youtube.com/watch?v=abc"), None);
    }

    #[test]
    fn watch_url_pattern() {
        assert!(is_watch_url("https://www.youtube.com/watch?v=abc123"));
        assert!(is_watch_url("youtu.be/abc123"));
        assert!(is_watch_url("https://youtube.com/watch?v=abc123&list=PL1"));
        assert!(!is_watch_url("https://www.youtube.com/playlist?list=PL1"));
        assert!(!is_watch_url("https://example.com/watch?v=abc123"));
    }
}

// Filesystem-safe names from arbitrary titles

/// Characters rejected by at least one common filesystem.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Straight and typographic quotes.
const QUOTES: &[char] = &['\'', '"', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Map `title` to a name safe for use as a file name.
///
/// Idempotent. Length is not limited; callers guard path limits themselves.
pub fn sanitize(title: &str) -> String {
    title
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !QUOTES.contains(c))
        .collect::<String>()
        .replace('&', "and")
}

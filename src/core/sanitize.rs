// src/core/sanitize.rs
//
// Text and number normalization for scraped cells. Everything here is total:
// bad input gives an empty string or `None`, never a panic.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("ref regex"));
static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("number regex"));

/// Parse a locale-formatted number (dot thousands, comma decimal) out of a cell.
///
/// Markup and `[n]` reference markers are dropped, whitespace (including
/// no-break spaces) removed, thousands dots removed, a decimal comma turned
/// into a dot, and the first numeric token parsed.
///
/// ```
/// use muni_scrape::core::sanitize::clean_number;
/// assert_eq!(clean_number("1.234,56"), Some(1234.56));
/// assert_eq!(clean_number("no data"), None);
/// ```
pub fn clean_number(text: &str) -> Option<f64> {
    let text = TAG_RE.replace_all(text, "");
    let text = REF_RE.replace_all(&text, "");
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = drop_thousands_dots(&compact).replace(',', ".");

    let token = NUM_RE.find(&compact)?;
    token.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Remove every `.` that is followed by exactly three digits.
fn drop_thousands_dots(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '.' {
            let three = chars.get(i + 1..i + 4).is_some_and(|d| d.iter().all(char::is_ascii_digit));
            let fourth_digit = chars.get(i + 4).is_some_and(char::is_ascii_digit);
            if three && !fourth_digit {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Drop `[n]` reference markers and markup, then trim.
///
/// ```
/// use muni_scrape::core::sanitize::clean_text;
/// assert_eq!(clean_text("<b>Madrid</b>[1]"), "Madrid");
/// ```
pub fn clean_text(text: &str) -> String {
    let text = REF_RE.replace_all(text, "");
    let text = TAG_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// Decode the entities MediaWiki actually emits: the common named ones and
/// numeric references. Unknown entities are left as they are.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s!(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_one(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(name: &str) -> Option<char> {
    let c = match name {
        "nbsp" => '\u{a0}',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "minus" => '−',
        "ndash" => '–',
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            return char::from_u32(code);
        }
    };
    Some(c)
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File-name-safe version of a display name. Letters (including accented
/// ones) and digits survive; whitespace runs become one `_`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' { if !(last_us && ch == '_') { out.push(ch); } last_us = ch == '_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("export") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_decimal_dot_thousands() {
        assert_eq!(clean_number("1.234,56"), Some(1234.56));
        assert_eq!(clean_number("1.234.567"), Some(1_234_567.0));
        assert_eq!(clean_number("45,2"), Some(45.2));
        assert_eq!(clean_number("45.2"), Some(45.2));
    }

    #[test]
    fn whitespace_thousands_and_nbsp() {
        assert_eq!(clean_number("12 345"), Some(12345.0));
        assert_eq!(clean_number("12\u{a0}345,5"), Some(12345.5));
        assert_eq!(clean_number("1\u{202f}050"), Some(1050.0));
    }

    #[test]
    fn markup_and_references_are_ignored() {
        assert_eq!(clean_number("<span>3.021</span>[2]"), Some(3021.0));
        assert_eq!(clean_number("[12] 88"), Some(88.0));
    }

    #[test]
    fn only_exactly_three_digits_count_as_thousands() {
        assert_eq!(clean_number("12.3456"), Some(12.3456));
        assert_eq!(clean_number("3.5"), Some(3.5));
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(clean_number("1.500 (2021)"), Some(1500.0));
        assert_eq!(clean_number("approx. 7"), Some(7.0));
    }

    #[test]
    fn no_number_is_none() {
        assert_eq!(clean_number("no data"), None);
        assert_eq!(clean_number(""), None);
        assert_eq!(clean_number("—"), None);
        assert_eq!(clean_number("[1]"), None);
    }

    #[test]
    fn clean_text_strips_refs_tags_and_space() {
        assert_eq!(clean_text("<b>Madrid</b>[1]"), "Madrid");
        assert_eq!(clean_text("  Lugo [nota 3] "), "Lugo");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("[1]"), "");
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("A&nbsp;B"), "A\u{a0}B");
        assert_eq!(decode_entities("&#233;&#xE9;"), "éé");
        assert_eq!(decode_entities("R&D &unknown; & done"), "R&D &unknown; & done");
    }

    #[test]
    fn filenames_keep_accents() {
        assert_eq!(sanitize_filename("España"), "España");
        assert_eq!(sanitize_filename("Baden Württemberg!"), "Baden_Württemberg");
        assert_eq!(sanitize_filename("???"), "export");
    }
}

// src/core/html.rs
//
// Tolerant, allocation-light scanning over MediaWiki HTML. All positions are
// byte offsets into the original string; lowering is ASCII-only so offsets in
// the lowered copy line up with the original.

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Find `pat` (e.g. `"<td"`) at or after `from` where the tag name ends right
/// after the pattern, so `"<th"` does not match `"<thead"`.
fn find_tag(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut at = from;
    loop {
        let hit = lc.get(at..)?.find(pat)? + at;
        let after = lc.as_bytes().get(hit + pat.len()).copied();
        match after {
            None | Some(b'>') | Some(b'/') => return Some(hit),
            Some(c) if c.is_ascii_whitespace() => return Some(hit),
            _ => at = hit + pat.len(),
        }
    }
}

/// Next complete `<tag …>…</tag>` element starting at or after `from`,
/// honoring nested elements of the same name. Returns `(start, end)` with
/// `end` just past the closing `>`. Unclosed elements yield `None`.
pub fn next_element_ci(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    next_element_lc(&to_lower(s), &to_lower(tag), from)
}

// `lc` is the already-lowered document, `tag` a lowercase tag name.
fn next_element_lc(lc: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = join!("<", tag);
    let close = join!("</", tag);

    let start = find_tag(lc, &open, from)?;
    let mut pos = lc[start..].find('>')? + start + 1;
    let mut depth = 1usize;

    loop {
        let next_close = find_tag(lc, &close, pos)?;
        match find_tag(lc, &open, pos) {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + open.len();
            }
            _ => {
                depth -= 1;
                let end = lc[next_close..]
                    .find('>')
                    .map(|e| next_close + e + 1)
                    .unwrap_or(lc.len());
                if depth == 0 {
                    return Some((start, end));
                }
                pos = end;
            }
        }
    }
}

/// Every `tag` element directly reachable from the start of `s`, in order.
/// Nested elements of the same name stay inside their parent's block.
pub fn elements_ci<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((a, b)) = next_element_lc(&lc, &tag, pos) {
        out.push(&s[a..b]);
        pos = b;
    }
    out
}

/// `<td>` and `<th>` cells of one row, in document order.
pub fn row_cells(tr: &str) -> Vec<&str> {
    let lc = to_lower(tr);
    let mut out = Vec::new();
    let mut pos = 0usize;
    loop {
        let td = next_element_lc(&lc, "td", pos);
        let th = next_element_lc(&lc, "th", pos);
        let next = match (td, th) {
            (Some(a), Some(b)) => if a.0 <= b.0 { a } else { b },
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        out.push(&tr[next.0..next.1]);
        pos = next.1;
    }
    out
}

/// The opening tag of an element block, including `<` and `>`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(e) => &block[..=e],
        None => block,
    }
}

/// Value of attribute `name` in an opening tag. Handles `"…"`, `'…'` and bare values.
pub fn attr_value<'a>(open: &'a str, name: &str) -> Option<&'a str> {
    let lc = to_lower(open);
    let needle = join!(&to_lower(name), "=");
    let mut from = 0usize;
    let at = loop {
        let hit = lc.get(from..)?.find(&needle)? + from;
        // attribute names are preceded by whitespace
        if hit > 0 && lc.as_bytes()[hit - 1].is_ascii_whitespace() {
            break hit;
        }
        from = hit + needle.len();
    };

    let val = open[at + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => (Some('"'), 1),
        Some(b'\'') => (Some('\''), 1),
        _ => (None, 0),
    };
    let end = match quote {
        Some(q) => val[start_off..].find(q).map(|e| start_off + e),
        None => val.find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/'),
    }
    .unwrap_or(val.len());
    Some(&val[start_off..end])
}

/// Whether the element's `class` attribute lists `class` as one of its tokens.
pub fn has_class(open: &str, class: &str) -> bool {
    attr_value(open, "class")
        .map(|v| v.split_ascii_whitespace().any(|c| c.eq_ignore_ascii_case(class)))
        .unwrap_or(false)
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

/// Visible text of an element block: tags removed, then entities decoded.
pub fn cell_text(block: &str) -> String {
    super::sanitize::decode_entities(&strip_tags(inner_after_open_tag(block)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn th_does_not_match_thead() {
        let row = "<thead><tr><th>Name</th><td>12</td></tr></thead>";
        let (a, b) = next_element_ci(row, "th", 0).unwrap();
        assert_eq!(&row[a..b], "<th>Name</th>");
    }

    #[test]
    fn nested_tables_stay_inside_parent() {
        let doc = "<table class=\"wikitable\"><tr><td><table><tr><td>x</td></tr></table></td></tr></table><table id=2></table>";
        let tables = elements_ci(doc, "table");
        assert_eq!(tables.len(), 2);
        assert!(tables[0].ends_with("</td></tr></table>"));
        assert_eq!(tables[1], "<table id=2></table>");
    }

    #[test]
    fn row_cells_mixes_th_and_td_in_order() {
        let tr = "<tr><th scope=row>Ávila</th><td>1.500</td><TD>45,2</TD></tr>";
        let cells: Vec<String> = row_cells(tr).into_iter().map(cell_text).collect();
        assert_eq!(cells, ["Ávila", "1.500", "45,2"]);
    }

    #[test]
    fn class_tokens() {
        assert!(has_class(r#"<table class="wikitable sortable">"#, "wikitable"));
        assert!(has_class("<table class=wikitable>", "wikitable"));
        assert!(!has_class(r#"<table class="wikitable-like">"#, "wikitable"));
        assert!(!has_class(r#"<table data-class="wikitable">"#, "wikitable"));
    }

    #[test]
    fn cell_text_decodes_after_stripping() {
        assert_eq!(cell_text("<td><a href=\"/x\">Tom &amp; Jerry</a></td>"), "Tom & Jerry");
        assert_eq!(cell_text("<td>&lt;b&gt;</td>"), "<b>");
    }
}

//! Append rendered sale summaries into an HTML page.

use crate::error::{Result, SaleError};
use regex::Regex;
use std::path::Path;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and turn each line into a `<br/>`-terminated fragment.
pub fn to_html_fragment(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str(&escape_html(line));
        out.push_str("<br/>\n");
    }
    out
}

/// Insert `text` at the end of the element whose `id` is `element_id`.
///
/// The text is always escaped; nothing from the subgraph reaches the page as
/// markup.
pub fn append_to_element(path: &Path, element_id: &str, text: &str) -> Result<()> {
    let html = std::fs::read_to_string(path)?;
    let updated = insert_into_element(&html, element_id, &to_html_fragment(text))?;
    crate::io::atomic_write(path, updated.as_bytes())
}

fn insert_into_element(html: &str, element_id: &str, fragment: &str) -> Result<String> {
    let not_found = || SaleError::ElementNotFound(element_id.to_string());

    // `id` must be a whole attribute, so `data-id="x"` or `grid="x"` never match.
    let pattern = format!(
        r#"<([A-Za-z][A-Za-z0-9-]*)[^>]*?\sid\s*=\s*(?:"{id}"|'{id}')[^>]*>"#,
        id = regex::escape(element_id)
    );
    let re = Regex::new(&pattern).map_err(|_| not_found())?;
    let open_tag = re.captures(html).ok_or_else(not_found)?;
    let whole = open_tag.get(0).ok_or_else(not_found)?;
    if whole.as_str().ends_with("/>") {
        return Err(not_found());
    }
    let tag_name = &open_tag[1];
    let open_end = whole.end() - 1;

    let close_pos = find_matching_close(html, open_end + 1, tag_name).ok_or_else(not_found)?;

    let mut out = String::with_capacity(html.len() + fragment.len());
    out.push_str(&html[..close_pos]);
    out.push_str(fragment);
    out.push_str(&html[close_pos..]);
    Ok(out)
}

/// Byte offset of the `</tag>` that closes the element opened just before
/// `from`, skipping nested elements of the same name.
fn find_matching_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut depth = 1usize;
    let mut cursor = from;

    loop {
        let rest = &html[cursor..];
        let next_close = rest.find(&close)?;
        let next_open = rest.match_indices(&open).map(|(i, _)| i).find(|&i| {
            rest[i + open.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
        });

        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                cursor += o + open.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(cursor + next_close);
                }
                cursor += next_close + close.len();
            }
        }
    }
}

//! Text escaping helpers

/// Replace markup-significant characters with character references.
///
/// `&`, `<`, `>`, `"` and `'` get their usual references; anything outside
/// ASCII becomes a decimal reference so the output is plain ASCII.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!("&#{};", c as u32)),
        }
    }
    out
}

/// Undo [`escape_text`] for the common named references.
///
/// `&nbsp;` becomes a plain space. `&amp;` is handled last, so `&amp;lt;`
/// comes out as `&lt;`.
pub fn unescape_text(text: &str) -> String {
    const TABLE: [(&str, &str); 6] = [
        ("&quot;", "\""),
        ("&#039;", "'"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&nbsp;", " "),
        ("&amp;", "&"),
    ];
    TABLE
        .iter()
        .fold(text.to_owned(), |acc, (from, to)| acc.replace(from, to))
}

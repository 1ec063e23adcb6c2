// src/core/sanitize.rs

/// Collapse runs of whitespace (including newlines and NBSP) into one space and trim.
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

/// Remove every occurrence of each label, in the given order, then re-normalize.
/// Order matters when one label is a prefix of another ("Time format:" before "Time:").
pub fn strip_labels(s: &str, labels: &[&str]) -> String {
    let mut out = s.to_string();
    for label in labels {
        out = out.replace(label, "");
    }
    normalize_ws(&out)
}

/// Origin identifiers are the final path segment of their detail URLs.
pub fn last_segment(href: &str) -> Option<String> {
    href.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
}

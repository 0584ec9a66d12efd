//! Field cleaning for raw CSV exports.
//!
//! Exports carry HTML markup, carriage returns and non-breaking spaces in
//! free-text fields. Cleaning keeps line structure but normalizes each line.

/// Clean a raw field value.
///
/// Carriage returns are dropped, then every line has U+2002 and U+00A0
/// replaced by plain spaces, HTML tags removed, space runs collapsed and
/// surrounding whitespace trimmed. Lines are re-joined with `\n`.
pub fn clean_field(raw: &str) -> String {
    raw.replace('\r', "")
        .split('\n')
        .map(clean_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_line(line: &str) -> String {
    let spaced = line.replace(['\u{2002}', '\u{00a0}'], " ");
    let stripped = strip_tags(&spaced);
    collapse_spaces(&stripped).trim().to_string()
}

/// Remove `<...>` tags. An unmatched `<` is kept as text.
pub fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut previous_space = false;

    for ch in line.chars() {
        if ch == ' ' {
            if !previous_space {
                out.push(ch);
            }
            previous_space = true;
        } else {
            out.push(ch);
            previous_space = false;
        }
    }

    out
}

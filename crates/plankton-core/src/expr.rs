//! Small sub-parser for the expression syntax embedded in operator
//! annotations: comma lists nested in `()`/`[]`/`{}`, `@index` column
//! suffixes, `as` aliases, sort direction tokens and `name(args)` calls.
//!
//! Every layout strategy reads its properties through these helpers instead
//! of re-splitting strings ad hoc.

/// Splits `s` on `sep` at nesting depth zero, honoring `()`, `[]`, `{}` and
/// single/double quotes. Empty fragments are dropped; fragments are trimmed.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                let piece = s[start..i].trim();
                if !piece.is_empty() {
                    out.push(piece);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    let piece = s[start..].trim();
    if !piece.is_empty() {
        out.push(piece);
    }
    out
}

/// Strips a trailing `@index` column marker: `c1@0` -> `c1`.
pub fn strip_index(s: &str) -> &str {
    let s = s.trim();
    if let Some(pos) = s.rfind('@') {
        let tail = &s[pos + 1..];
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            return &s[..pos];
        }
    }
    s
}

/// Parses a bracketed list: `[a, b, c]` -> `["a", "b", "c"]`.
pub fn bracket_list(s: &str) -> Option<Vec<&str>> {
    let s = s.trim();
    let inner = s.strip_prefix('[')?.strip_suffix(']')?;
    Some(split_top_level(inner, ','))
}

/// Detects a `name(args)` call with a closing paren at the end of the
/// fragment and returns `(name, args)`.
pub fn function_call(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    let open = s.find('(')?;
    let name = &s[..open];
    if name.is_empty() || !is_identifier(name) {
        return None;
    }
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((name, inner))
}

/// Resolves the output name of a list entry: the `as` alias when present
/// (`c1@0 as total` -> `total`), otherwise the bare column with `@index` and
/// sort tokens removed.
pub fn output_name(entry: &str) -> &str {
    if let Some(alias) = top_level_alias(entry) {
        return alias;
    }
    sort_column(entry)
}

/// Extracts the column a sort expression orders by:
/// `a@0 ASC NULLS LAST` -> `a`.
pub fn sort_column(entry: &str) -> &str {
    let entry = entry.trim();
    let head = match top_level_space(entry) {
        Some(pos) => &entry[..pos],
        None => entry,
    };
    strip_index(head)
}

/// Splits a `key=value` annotation fragment. The key must be a bare
/// identifier and the `=` must not be part of a comparison operator, so
/// predicates like `a@0 != 5` stay whole fragments.
pub fn key_value(fragment: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let bytes = fragment.as_bytes();

    for (i, c) in fragment.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => {
                if i == 0 || i + 1 >= bytes.len() {
                    return None;
                }
                let prev = bytes[i - 1];
                if matches!(prev, b'!' | b'<' | b'>' | b'=') || bytes[i + 1] == b'=' {
                    return None;
                }
                let key = fragment[..i].trim();
                if !is_identifier(key) {
                    return None;
                }
                return Some((key, fragment[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn top_level_alias(entry: &str) -> Option<&str> {
    // Aliases are printed lowercase (`expr as name`); `AS` inside casts is
    // uppercase and nested in parens, so a depth-zero scan is enough.
    let mut depth = 0usize;
    let bytes = entry.as_bytes();
    let mut last = None;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && entry[i..].starts_with(" as ") => {
                last = Some(i);
            }
            _ => {}
        }
    }
    last.map(|i| entry[i + 4..].trim())
}

fn top_level_space(entry: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in entry.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

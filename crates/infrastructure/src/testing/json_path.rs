//! Minimal JSONPath lookup.
//!
//! Supports `$`, `$.field`, `$.field.nested`, `$.array[0]` and `$["odd key"]`.

use serde_json::Value;

/// Looks up `path` in `json`. `Ok(None)` means the path is well formed but
/// nothing lives there.
pub fn query<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, String> {
    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err("JSON path must start with '$'".to_string());
    };

    let mut current = json;
    for segment in parse_segments(rest)? {
        let next = match segment {
            Segment::Key(key) => current.get(key.as_str()),
            Segment::Index(index) => current.get(index),
        };
        match next {
            Some(value) => current = value,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

fn parse_segments(path: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                let mut key = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    key.push(c);
                    chars.next();
                }
                if key.is_empty() {
                    return Err("empty field name".to_string());
                }
                segments.push(Segment::Key(key));
            }
            '[' => {
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err("unclosed '['".to_string());
                }
                segments.push(parse_bracket(inner.trim())?);
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(segments)
}

fn parse_bracket(inner: &str) -> Result<Segment, String> {
    let quoted = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')));
    if let Some(key) = quoted {
        return Ok(Segment::Key(key.to_string()));
    }
    inner
        .parse::<usize>()
        .map(Segment::Index)
        .map_err(|_| format!("invalid array index: {inner}"))
}

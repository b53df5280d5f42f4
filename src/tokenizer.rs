//! Field splitting for `@Param` annotations.
//!
//! A parameter line looks like
//!
//! ```text
//! @Param	email		form	 string	true		"The email for login"
//! ```
//!
//! The first three fields (name, location, data type) are plain tokens. Everything after them
//! is either a description, or a `required` flag followed by a description. The description is
//! free text and is never split on its inner whitespace.

const QUOTES_AND_SPACE: &[char] = &[' ', '\t', '\n', '"'];

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

/// Accepts the same literals as a strict boolean parser: `1 t T TRUE true True` and their
/// false counterparts.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Splits the text following `@Param` into its fields.
///
/// Returns 4 fields (`name location type description`) or 5 fields
/// (`name location type required description`). Fewer fields come back when the input is
/// truncated; callers treat that as a malformed line.
pub fn tokenize_params(input: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut rest = "";

    for (i, c) in input.char_indices() {
        if is_separator(c) {
            if current.is_empty() {
                continue;
            }
            fields.push(std::mem::take(&mut current));
            if fields.len() == 3 {
                rest = &input[i..];
                break;
            }
            continue;
        }
        current.push(c);
    }

    if fields.len() < 3 {
        if !current.is_empty() {
            fields.push(current);
        }
        return fields;
    }

    let rest = rest.trim_start_matches(is_separator);
    if rest.is_empty() {
        return fields;
    }
    if rest.starts_with('"') {
        fields.push(rest.trim_matches(QUOTES_AND_SPACE).to_string());
        return fields;
    }

    let (token, tail) = match rest.find(is_separator) {
        Some(pos) => (&rest[..pos], rest[pos..].trim_matches(QUOTES_AND_SPACE)),
        None => (rest, ""),
    };
    if parse_bool(token).is_some() && !tail.is_empty() {
        fields.push(token.to_string());
        fields.push(tail.to_string());
    } else {
        fields.push(rest.trim_matches(QUOTES_AND_SPACE).to_string());
    }
    fields
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Replace every run of line breaks with a single space
pub fn single_line(input: &str) -> String {
    input
        .split(is_line_break)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten a string to one line, trim it and cap it at `max_chars` characters
///
/// Trailing whitespace exposed by the cut is trimmed as well, so the result
/// never changes when sanitized again.
pub fn sanitize(input: &str, max_chars: usize) -> String {
    let flattened = single_line(input);
    let trimmed = flattened.trim();

    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

//! Structural scanning over MINION value text.
//!
//! Both the top-level splitter and the closing-bracket search walk the text
//! the same way: `(` and `[` open a level, `)` and `]` close the matching one,
//! and a `"` toggles string-literal mode in which no structural character counts.
//! String literals carry no escapes, so every quote toggles.

use crate::error::{MinionError, Result};

/// Split a comma-delimited list at top-level commas only, trimming each segment.
///
/// Wholly empty input yields no segments. Empty segments elsewhere (`1,,2`)
/// are returned as-is and left to the value parser to reject.
///
/// ```
/// use minion_core::scanner::split_top_level;
/// let parts = split_top_level(r#"A(1,2), "x,y", [3,4]"#).unwrap();
/// assert_eq!(parts, vec!["A(1,2)", r#""x,y""#, "[3,4]"]);
/// ```
pub fn split_top_level(text: &str) -> Result<Vec<&str>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut start = 0;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' => stack.push(b),
            b')' | b']' => close(&mut stack, b, text)?,
            b',' if stack.is_empty() => {
                out.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    finish(&stack, in_string, text)?;
    out.push(text[start..].trim());
    Ok(out)
}

/// Byte index of the bracket that closes the opener at `open`.
///
/// `text.as_bytes()[open]` must be `(` or `[`.
pub fn find_matching_close(text: &str, open: usize) -> Result<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;

    for (i, b) in text.bytes().enumerate().skip(open) {
        if in_string {
            if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' => stack.push(b),
            b')' | b']' => {
                close(&mut stack, b, text)?;
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    finish(&stack, in_string, text)?;
    Err(MinionError::MalformedValue(format!(
        "no opening bracket at offset {open} in: {text}"
    )))
}

fn close(stack: &mut Vec<u8>, closer: u8, text: &str) -> Result<()> {
    let expected = if closer == b')' { b'(' } else { b'[' };
    match stack.pop() {
        Some(open) if open == expected => Ok(()),
        Some(open) => Err(MinionError::MalformedValue(format!(
            "'{}' closed by '{}' in: {text}",
            open as char, closer as char
        ))),
        None => Err(MinionError::MalformedValue(format!(
            "unmatched '{}' in: {text}",
            closer as char
        ))),
    }
}

fn finish(stack: &[u8], in_string: bool, text: &str) -> Result<()> {
    if in_string {
        return Err(MinionError::MalformedValue(format!(
            "unterminated string literal in: {text}"
        )));
    }
    if let Some(open) = stack.last() {
        return Err(MinionError::MalformedValue(format!(
            "unclosed '{}' in: {text}",
            *open as char
        )));
    }
    Ok(())
}

//! Fenced code block extraction from model output.
//!
//! Model responses are asked to wrap the payload in a pair of delimiters
//! (triple backticks by default, configurable per model). Only the first
//! complete pair counts; anything after it is ignored.

/// Extract the code payload between the first `start_sep`/`end_sep` pair.
///
/// Returns `None` when either delimiter is missing or when the extracted
/// region is empty - callers treat absence as "no code to run", not an
/// error. With `skip_first_line` set, the first line inside the fence is
/// dropped, which handles language-tag lines such as a bare "python" right
/// after the opening fence.
pub fn extract_code(
    text: &str,
    start_sep: &str,
    end_sep: &str,
    skip_first_line: bool,
) -> Option<String> {
    let start = text.find(start_sep)?;
    let body_start = start + start_sep.len();
    let body_len = text[body_start..].find(end_sep)?;
    let mut body = &text[body_start..body_start + body_len];

    if skip_first_line {
        body = match body.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        };
    }

    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

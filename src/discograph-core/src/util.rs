//! Small helpers shared by the query and merge code.

use std::cmp::Ordering;

use common_error::{DiscographResult, contract_err};

use crate::graph::NodeId;

/// One chunk of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyChunk {
    /// Digit run, stored as (significant digit count, digits without leading zeros).
    Number(usize, String),
    /// Non-digit run, possibly empty.
    Text(String),
}

/// Split a string into alternating text and number chunks.
///
/// The key always starts and ends with a text chunk, so two keys compare
/// text against text and number against number at every position.
/// `"tok_10"` sorts after `"tok_9"`.
pub fn natural_sort_key(s: &str) -> Vec<KeyChunk> {
    let mut key = Vec::new();
    let mut text = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            key.push(KeyChunk::Text(std::mem::take(&mut text)));
            let mut digits = String::from(c);
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                digits.push(d);
            }
            let trimmed = digits.trim_start_matches('0').to_string();
            key.push(KeyChunk::Number(trimmed.len(), trimmed));
        } else {
            text.push(c);
        }
    }
    key.push(KeyChunk::Text(text));
    key
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_sort_key(a).cmp(&natural_sort_key(b))
}

/// Sort node IDs naturally by their string form.
pub fn natural_sort(ids: &mut [NodeId]) {
    ids.sort_by_cached_key(|id| natural_sort_key(&id.to_string()));
}

/// Expand a spanstring into the list of token IDs it denotes.
///
/// `"word_1"` is a single token, `"word_1..word_3"` a range and
/// `"word_1,word_5..word_7"` a comma separated combination. All tokens of
/// the spanstring must share the same prefix.
pub fn convert_spanstring(span: &str) -> DiscographResult<Vec<String>> {
    let mut tokens = Vec::new();
    for element in span.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = element.split("..").collect();
        match parts.as_slice() {
            [single] => tokens.push((*single).to_string()),
            [start, end] => {
                let (prefix, first) = split_numbered(start)?;
                let (end_prefix, last) = split_numbered(end)?;
                if prefix != end_prefix {
                    contract_err!(
                        "range '{}' mixes the prefixes '{}' and '{}'",
                        element,
                        prefix,
                        end_prefix
                    );
                }
                if first > last {
                    contract_err!("range '{}' runs backwards", element);
                }
                tokens.extend((first..=last).map(|n| format!("{prefix}_{n}")));
            }
            _ => contract_err!("malformed spanstring element '{}'", element),
        }
    }
    if let Some(first) = tokens.first() {
        let expected = token_prefix(first);
        if let Some(other) = tokens.iter().find(|token| token_prefix(token) != expected) {
            contract_err!(
                "all tokens of '{}' must share the prefix '{}', found '{}'",
                span,
                expected,
                other
            );
        }
    }
    Ok(tokens)
}

fn token_prefix(token: &str) -> &str {
    token.rsplit_once('_').map_or(token, |(prefix, _)| prefix)
}

fn split_numbered(token: &str) -> DiscographResult<(&str, u64)> {
    let Some((prefix, number)) = token.rsplit_once('_') else {
        contract_err!("token ID '{}' has no '_<number>' suffix", token);
    };
    match number.parse::<u64>() {
        Ok(n) => Ok((prefix, n)),
        Err(_) => contract_err!("token ID '{}' has a non-numeric suffix", token),
    }
}

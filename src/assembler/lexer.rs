//! The tokenizer turns raw source text into structured line records.
//!
//! One instruction per physical line. `#` starts a comment running to the
//! end of the line. A label is a first token ending in `:`, optionally
//! followed by an instruction on the same line. Whitespace and commas both
//! separate tokens, and the whole line is folded to lower case - the source
//! language is case-insensitive.

use super::error::AsmError;

const COMMENT_MARKER: char = '#';
const LABEL_TERMINATOR: char = ':';

/// A tokenized source line: optional label, optional instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawLine {
    /// 1-based source line number.
    pub line: usize,
    /// Original text, kept for diagnostics.
    pub raw: String,
    pub label: Option<String>,
    pub op: Option<RawOp>,
}

/// The instruction part of a line, still as strings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawOp {
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// Tokenize the full source lazily, yielding one record per non-blank line.
///
/// Errors come through the same channel as items; the caller decides how
/// far to drive the iterator (pass 1 stops at the first error).
pub fn tokenize(source: &str) -> impl Iterator<Item = Result<RawLine, AsmError>> + '_ {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| tokenize_line(idx + 1, raw).transpose())
}

/// Tokenize one physical line. `Ok(None)` means the line was blank or
/// comment-only after stripping.
fn tokenize_line(line: usize, raw: &str) -> Result<Option<RawLine>, AsmError> {
    let code = match raw.find(COMMENT_MARKER) {
        Some(pos) => &raw[..pos],
        None => raw,
    };

    let words: Vec<String> = code
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    if words.is_empty() {
        return Ok(None);
    }

    let syntax_err = || AsmError::Syntax {
        line,
        text: raw.trim().to_string(),
    };

    let mut rest = &words[..];
    let label = if words[0].contains(LABEL_TERMINATOR) {
        let first = &words[0];
        if !first.ends_with(LABEL_TERMINATOR) {
            return Err(syntax_err());
        }
        let name = &first[..first.len() - 1];
        if name.is_empty() || name.contains(LABEL_TERMINATOR) {
            return Err(syntax_err());
        }
        rest = &words[1..];
        Some(name.to_string())
    } else {
        None
    };

    // A label terminator anywhere past the first token is malformed.
    if rest.iter().any(|w| w.contains(LABEL_TERMINATOR)) {
        return Err(syntax_err());
    }

    let op = rest.split_first().map(|(mnemonic, operands)| RawOp {
        mnemonic: mnemonic.clone(),
        operands: operands.to_vec(),
    });

    Ok(Some(RawLine {
        line,
        raw: raw.trim().to_string(),
        label,
        op,
    }))
}

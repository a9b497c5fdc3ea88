//! Function signature extraction.

use log::debug;

use super::skip::consume_block;
use super::{classify, Cursor};
use crate::error::ScanError;
use crate::model::Function;

/// Extract one function declaration starting at the cursor.
///
/// Lines accumulate into a single normalized signature until the parentheses
/// balance. A signature that does not end in `;` has an inline body: the
/// signature text is truncated at the member-initializer `:` or the opening
/// `{` after its matching close-paren, and the body is consumed as a balanced
/// block. Never balancing the parentheses by end of file leaves the parser
/// position undefined, which is fatal.
pub fn parse_function(cur: &mut Cursor) -> Result<Option<Function>, ScanError> {
    let mut start_paren = 0usize;
    let mut end_paren = 0usize;
    let mut signature = String::new();

    while let Some(raw) = cur.next_line() {
        let line = raw.trim();
        if line.starts_with("//") {
            continue;
        }

        start_paren += line.matches('(').count();
        end_paren += line.matches(')').count();

        let stripped = classify::strip_export_macros(line);
        let sig_line = stripped.split("//").next().unwrap_or("").trim();
        if !signature.is_empty() {
            signature.push_str("\n   ");
        }
        signature.push_str(sig_line);
        debug!("fun     {line}");

        if start_paren > 0 && start_paren == end_paren {
            if !signature.ends_with(';') {
                signature = truncate_at_body(&signature);
                // consume the inline body, re-reading the line that closed
                // the parameter list
                cur.back();
                consume_block(cur);
                signature.push(';');
            }

            let name = signature_name(&signature);
            if name == "()" {
                return Ok(None);
            }
            let func = Function {
                file: cur.doc_path(),
                signatures: [signature].into_iter().collect(),
                names: [name].into_iter().collect(),
                desc: String::new(),
            };
            return Ok(Some(func));
        }
    }

    if !signature.is_empty() {
        return Err(ScanError::UnterminatedFunction {
            signature,
            file: cur.path().to_string(),
            line: cur.lineno(),
        });
    }
    Ok(None)
}

/// Cut an inline definition down to its declaration: scan to the close-paren
/// matching the parameter list, then drop everything from the following `:`
/// or `{` on.
fn truncate_at_body(signature: &str) -> String {
    let mut start_paren = 0usize;
    let mut end_paren = 0usize;
    for (i, c) in signature.char_indices() {
        match c {
            '(' => start_paren += 1,
            ')' => end_paren += 1,
            _ => {}
        }
        if start_paren > 0 && start_paren == end_paren {
            for (k, c) in signature[i..].char_indices() {
                if c == ':' || c == '{' {
                    return signature[..i + k].trim().to_string();
                }
            }
            break;
        }
    }
    signature.to_string()
}

/// The last whitespace-delimited token before the parameter list, with `()`
/// appended.
fn signature_name(signature: &str) -> String {
    let before = signature.split('(').next().unwrap_or("");
    let name = before.rsplit(' ').next().unwrap_or("").trim();
    format!("{name}()")
}

//! Enum extraction.

use log::{debug, warn};

use super::skip::{consume_block, consume_ifdef};
use super::Cursor;
use crate::error::ScanError;
use crate::model::{Enum, EnumValue};
use crate::session::Session;

/// Extract an `enum` / `enum class` starting at the cursor.
///
/// Enumerator values auto-increment from the last `= <integer>` assignment
/// (or from 0); an assignment that does not evaluate to an integer leaves the
/// enumerator's value empty. Preceding `//` lines become the next
/// enumerator's description. Anonymous enums are skipped outside internal
/// mode; inside it they get a synthesized name.
pub fn parse_enum(cur: &mut Cursor, session: &mut Session) -> Result<Option<Enum>, ScanError> {
    let header = cur.peek().unwrap_or("").trim().to_string();
    let name = header
        .replace("enum ", "")
        .replace("class ", "")
        .split([':', '{'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let name = if name.is_empty() {
        if !session.internal {
            warn!("anonymous enum at: {}:{}", cur.path(), cur.lineno());
            consume_block(cur);
            return Ok(None);
        }
        let synthesized = format!("anonymous_enum_{}", session.anon_enum_index);
        session.anon_enum_index += 1;
        synthesized
    } else {
        name
    };

    // a header without the opening brace is consumed here; otherwise the
    // value loop below re-reads it and counts its brace
    if !header.contains('{') {
        debug!("enum  {header}");
        cur.next_line();
    }

    let mut values: Vec<EnumValue> = Vec::new();
    let mut context = String::new();
    let mut start_brace = 0usize;
    let mut end_brace = 0usize;
    let mut val: i64 = 0;

    while let Some(raw) = cur.next_line() {
        let line = raw.trim();

        if let Some(comment) = line.strip_prefix("//") {
            debug!("desc  {line}");
            context.push_str(comment.strip_prefix(' ').unwrap_or(comment));
            context.push('\n');
            continue;
        }

        if line.starts_with('#') {
            cur.back();
            consume_ifdef(cur, false);
            continue;
        }

        start_brace += line.matches('{').count();
        end_brace += line.matches('}').count();

        let mut body = line;
        if let Some((_, after)) = body.split_once('{') {
            body = after;
        }
        body = body.split('}').next().unwrap_or("");

        if !body.is_empty() {
            debug!("enumv {line}");
            for v in body.split(',') {
                let v = v.trim();
                if v.starts_with("//") {
                    break;
                }
                if v.is_empty() {
                    continue;
                }

                let mut valstr = String::new();
                let resolved = match v.split_once('=') {
                    Some((_, expr)) => match parse_int_literal(expr.trim()) {
                        Some(n) => {
                            val = n;
                            true
                        }
                        None => false,
                    },
                    None => true,
                };
                if resolved {
                    valstr = val.to_string();
                }

                let name = v.split('=').next().unwrap_or("").trim();
                if session.is_visible(&context) {
                    session.add_plain(&context);
                    values.push(EnumValue {
                        name: name.to_string(),
                        desc: std::mem::take(&mut context),
                        val: valstr,
                    });
                } else {
                    context.clear();
                }
                val += 1;
            }
        } else {
            debug!("??    {line}");
        }

        if start_brace > 0 && start_brace == end_brace {
            return Ok(Some(Enum {
                file: cur.doc_path(),
                name,
                values,
                desc: String::new(),
            }));
        }
    }

    Err(ScanError::UnterminatedEnum {
        name,
        file: cur.path().to_string(),
        line: cur.lineno(),
    })
}

/// Best-effort integer literal evaluation: decimal, hex, octal and binary
/// prefixes, optional sign.
fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(oct) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8).ok()?
    } else {
        s.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

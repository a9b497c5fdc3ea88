//! Class and struct body extraction.
//!
//! A state machine over three axes: brace depth (termination and nested-scope
//! skipping), access state, and the pending `//` comment context that becomes
//! the next member's documentation.

use log::{debug, warn};

use super::enums::parse_enum;
use super::function::parse_function;
use super::skip::{consume_block, consume_comment, consume_ifdef};
use super::{classify, Cursor};
use crate::categorize::suppress_warning;
use crate::error::ScanError;
use crate::model::{Class, ClassKind, Field, Function};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Protected,
    Private,
}

/// Kind of the most recently recorded member; undocumented declarations only
/// merge into an immediately preceding member of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    None,
    Fun,
    Field,
}

pub fn parse_class(cur: &mut Cursor, session: &mut Session) -> Result<Option<Class>, ScanError> {
    // accumulate the declaration text up to the opening brace; the brace
    // line itself is left for the body loop so its depth is counted
    let mut decl = String::new();
    while let Some(raw) = cur.peek() {
        let line = raw.trim();
        let stripped = classify::strip_export_macros(raw);
        decl.push_str(stripped.split('{').next().unwrap_or("").trim());
        if line.contains('{') {
            break;
        }
        debug!("class  {line}");
        cur.next_line();
    }

    let kind = if decl.starts_with("class") {
        ClassKind::Class
    } else {
        ClassKind::Struct
    };
    let mut access = match kind {
        ClassKind::Class => Access::Private,
        ClassKind::Struct => Access::Public,
    };

    let name = decl
        .split(':')
        .next()
        .unwrap_or("")
        .replace("class ", "")
        .replace("struct ", "")
        .replace("final", "")
        .trim()
        .to_string();

    let mut funs: Vec<Function> = Vec::new();
    let mut fields: Vec<Field> = Vec::new();
    let mut enums = Vec::new();
    let mut context = String::new();
    let mut blanks = 0usize;
    let mut start_brace = 0i64;
    let mut end_brace = 0i64;
    let mut last = Member::None;

    while let Some(raw) = cur.next_line() {
        let line = raw.trim();

        if line.is_empty() {
            blanks += 1;
            context.clear();
            continue;
        }

        if line.starts_with("/*") {
            cur.back();
            consume_comment(cur);
            continue;
        }

        if line.starts_with('#') {
            cur.back();
            consume_ifdef(cur, true);
            continue;
        }

        if line.contains("TORRENT_DEFINE_ALERT") {
            debug!("xx    {line}");
            blanks += 1;
            continue;
        }

        if line.contains("TORRENT_DEPRECATED") {
            debug!("xx    {line}");
            if (line.contains("class ") || line.contains("struct ")) && !line.contains(';') {
                cur.back();
                consume_block(cur);
            }
            blanks += 1;
            context.clear();
            continue;
        }

        if let Some(comment) = line.strip_prefix("//") {
            debug!("desc  {line}");
            context.push_str(comment.strip_prefix(' ').unwrap_or(comment));
            context.push('\n');
            continue;
        }

        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        start_brace += opens;
        end_brace += closes;

        match line {
            "private:" => access = Access::Private,
            "protected:" => access = Access::Protected,
            "public:" => access = Access::Public,
            _ => {}
        }

        if start_brace > 0 && start_brace == end_brace {
            return Ok(Some(Class {
                file: cur.doc_path(),
                kind,
                name,
                decl,
                enums,
                fields,
                funs,
                desc: String::new(),
            }));
        }

        if access != Access::Public && !session.internal {
            debug!("private {line}");
            blanks += 1;
            continue;
        }

        if start_brace - end_brace > 1 {
            debug!("scope   {line}");
            blanks += 1;
            continue;
        }

        // anonymous nested struct/union closed on the same line: opaque member
        if opens > 0
            && opens == closes
            && (line.starts_with("struct") || line.starts_with("union") || line.starts_with("class"))
        {
            debug!("scope   {line}");
            blanks += 1;
            continue;
        }

        if classify::looks_like_function(line) {
            cur.back();
            if let Some(fun) = parse_function(cur)? {
                if session.is_visible(&context) {
                    if context.is_empty() && blanks == 0 && last == Member::Fun {
                        if let Some(prev) = funs.last_mut() {
                            prev.absorb(fun);
                        }
                    } else {
                        if context.contains("TODO: ") {
                            return Err(ScanError::TodoInDoc {
                                file: cur.path().to_string(),
                                line: cur.lineno(),
                            });
                        }
                        let mut fun = fun;
                        fun.desc = context.clone();
                        session.add_plain(&context);
                        if context.is_empty() && !suppress_warning(cur.path()) {
                            warn!(
                                "member function \"{}::{}\" is not documented: {}:{}",
                                name,
                                fun.first_name(),
                                cur.path(),
                                cur.lineno()
                            );
                        }
                        funs.push(fun);
                        last = Member::Fun;
                    }
                    context.clear();
                    blanks = 0;
                }
            }
            continue;
        }

        if classify::looks_like_variable(line) {
            if line.contains("constexpr static") {
                return Err(ScanError::ConstexprStatic {
                    file: cur.path().to_string(),
                    line: cur.lineno(),
                    text: line.to_string(),
                });
            }
            debug!("var     {line}");
            if !session.is_visible(&context) {
                continue;
            }
            let signature = line.split("//").next().unwrap_or("").trim().to_string();
            let member_name = field_name(&signature);
            if context.is_empty() && blanks == 0 && last == Member::Field {
                if let Some(prev) = fields.last_mut() {
                    prev.names.push(member_name);
                    prev.signatures.push(signature);
                }
            } else {
                if context.is_empty() && !suppress_warning(cur.path()) {
                    warn!(
                        "field \"{}::{}\" is not documented: {}:{}",
                        name,
                        member_name,
                        cur.path(),
                        cur.lineno()
                    );
                }
                session.add_plain(&context);
                fields.push(Field {
                    names: vec![member_name],
                    signatures: vec![signature],
                    desc: context.clone(),
                });
                last = Member::Field;
            }
            context.clear();
            blanks = 0;
            continue;
        }

        if line.starts_with("enum ") {
            debug!("enum    {line}");
            cur.back();
            if !session.is_visible(&context) {
                consume_block(cur);
            } else {
                if let Some(mut e) = parse_enum(cur, session)? {
                    if context.contains("TODO: ") {
                        return Err(ScanError::TodoInDoc {
                            file: cur.path().to_string(),
                            line: cur.lineno(),
                        });
                    }
                    e.desc = context.clone();
                    session.add_plain(&context);
                    if context.is_empty() && !suppress_warning(cur.path()) {
                        warn!(
                            "enum \"{}::{}\" is not documented: {}:{}",
                            name,
                            e.name,
                            cur.path(),
                            cur.lineno()
                        );
                    }
                    enums.push(e);
                }
                context.clear();
            }
            continue;
        }

        context.clear();
        if classify::looks_like_forward_decl(line)
            || classify::looks_like_blank(line)
            || classify::looks_like_namespace(line)
        {
            debug!("--      {line}");
        } else {
            debug!("??      {line}");
        }
    }

    Err(ScanError::UnterminatedClass {
        kind: kind.to_string(),
        name,
        file: cur.path().to_string(),
        line: cur.lineno(),
    })
}

/// The declared name of a member variable: strip default value, brace
/// initializer, bit-field width and the trailing semicolon, then take the
/// last whitespace token.
fn field_name(signature: &str) -> String {
    let n = signature.split('=').next().unwrap_or("");
    let n = n.split('{').next().unwrap_or("").trim();
    let n = n.split(" : ").next().unwrap_or("");
    let n = n.rsplit(' ').next().unwrap_or("");
    let n = n.split(':').next().unwrap_or("");
    n.split(';').next().unwrap_or("").to_string()
}

//! Header scanning: an explicit line cursor, the file-scope scanner, and the
//! declaration extractors it dispatches into.

pub mod class;
pub mod classify;
pub mod enums;
pub mod function;
pub mod skip;

use log::{debug, warn};

use crate::error::ScanError;
use crate::model::Constant;
use crate::session::Session;

/// Position in a borrowed line buffer, threaded through every extractor.
/// Extractors consume their construct and leave the cursor on the line after
/// it.
pub struct Cursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
    path: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(lines: &'a [&'a str], path: &'a str) -> Self {
        Cursor { lines, pos: 0, path }
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        Some(line)
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Step back over the line just read, so a sub-parser can re-read it.
    pub fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// 1-based number of the most recently read line, for diagnostics.
    pub fn lineno(&self) -> usize {
        self.pos
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// The path declarations are documented under: everything after the
    /// `include/` component.
    pub fn doc_path(&self) -> String {
        doc_path(self.path)
    }
}

pub fn doc_path(path: &str) -> String {
    match path.find("include/") {
        Some(i) => path[i + "include/".len()..].to_string(),
        None => path.trim_start_matches("../").to_string(),
    }
}

/// Lines where a bare `TORRENT_EXPORT` token is legitimate without a
/// declaration following it.
fn export_token_expected(line: &str) -> bool {
    line.contains("ifndef TORRENT_EXPORT")
        || line.contains("define TORRENT_DEPRECATED_EXPORT TORRENT_EXPORT")
        || line.contains("define TORRENT_EXPORT")
        || line.contains("for TORRENT_EXPORT")
        || line.contains("TORRENT_EXPORT TORRENT_CFG")
        || line.contains("extern TORRENT_EXPORT ")
        || line.contains("struct TORRENT_EXPORT ")
}

/// Scan one header, accumulating declarations and the per-file overview into
/// the session.
pub fn parse_file(path: &str, content: &str, session: &mut Session) -> Result<(), ScanError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut cur = Cursor::new(&lines, path);

    debug!("=== {path} ===");

    let mut blanks = 0usize;
    let mut context = String::new();
    let mut orphaned_export = false;

    while let Some(raw) = cur.next_line() {
        let mut line = raw.trim();

        // armed by the previous line; a class or function extractor on that
        // line would have disarmed it
        if orphaned_export {
            return Err(ScanError::OrphanedExport {
                file: path.to_string(),
                line: cur.lineno(),
                text: line.to_string(),
            });
        }

        if line.is_empty() {
            blanks += 1;
            context.clear();
            continue;
        }

        if line.split_whitespace().any(|t| t == "TORRENT_EXPORT") && !export_token_expected(line) {
            orphaned_export = true;
            debug!("maybe orphaned: {line}");
        }

        if line.starts_with("//") && line[2..].trim() == "OVERVIEW" {
            // per-file overview block; the line ending it is classified below
            let mut overview = String::new();
            let mut terminated = false;
            while let Some(next_raw) = cur.next_line() {
                let next = next_raw.trim();
                if !next.starts_with("//") {
                    session.overviews.insert(cur.doc_path(), overview);
                    line = next;
                    terminated = true;
                    break;
                }
                let text = &next[2..];
                overview.push_str(text.strip_prefix(' ').unwrap_or(text));
                overview.push('\n');
            }
            if !terminated {
                break;
            }
        }

        if let Some(comment) = line.strip_prefix("//") {
            debug!("desc  {line}");
            context.push_str(comment.strip_prefix(' ').unwrap_or(comment));
            context.push('\n');
            continue;
        }

        if line.starts_with("/*") {
            cur.back();
            skip::consume_comment(&mut cur);
            continue;
        }

        if line.starts_with('#') {
            cur.back();
            skip::consume_ifdef(&mut cur, false);
            continue;
        }

        if (line == "namespace aux {"
            || line == "namespace ssl {"
            || line == "namespace libtorrent { namespace aux {")
            && !session.internal
        {
            cur.back();
            skip::consume_block(&mut cur);
            context.clear();
            continue;
        }

        if line.contains("namespace aux") {
            let mut parts = line.splitn(2, "namespace");
            let before = parts.next().unwrap_or("");
            let after = parts.next().unwrap_or("");
            if !before.is_empty() && !before.contains("//") && !after.contains('}') {
                return Err(ScanError::MisplacedNamespace {
                    file: path.to_string(),
                    line: cur.lineno(),
                });
            }
        }

        if line.contains("TORRENT_DEPRECATED") {
            if (line.contains("class ") || line.contains("struct ")) && !line.contains(';') {
                cur.back();
                skip::consume_block(&mut cur);
                context.clear();
            }
            blanks += 1;
            debug!("xx    {line}");
            continue;
        }

        if classify::looks_like_constant(line) {
            if line.contains("constexpr static") {
                return Err(ScanError::ConstexprStatic {
                    file: path.to_string(),
                    line: cur.lineno(),
                    text: line.to_string(),
                });
            }
            debug!("const   {line}");
            let constant = parse_constant(line, cur.doc_path());
            if session.is_visible(&context) {
                if context.contains("TODO: ") {
                    return Err(ScanError::TodoInDoc {
                        file: path.to_string(),
                        line: cur.lineno(),
                    });
                }
                if context.is_empty() {
                    warn!(
                        "constant \"{}\" is not documented: {}:{}",
                        constant.name,
                        path,
                        cur.lineno()
                    );
                }
                session.add_plain(&context);
                let constant = Constant {
                    desc: context.clone(),
                    ..constant
                };
                session
                    .constants
                    .entry(constant.ctype.clone())
                    .or_default()
                    .push(constant);
            }
            context.clear();
            continue;
        }

        if line.contains("TORRENT_EXPORT ")
            || line.starts_with("inline ")
            || line.starts_with("template")
            || session.internal
        {
            if line.starts_with("class ") || line.starts_with("struct ") {
                if !line.ends_with(';') {
                    orphaned_export = false;
                    cur.back();
                    if let Some(mut cls) = class::parse_class(&mut cur, session)? {
                        if session.is_visible(&context) {
                            if context.contains("TODO: ") {
                                return Err(ScanError::TodoInDoc {
                                    file: path.to_string(),
                                    line: cur.lineno(),
                                });
                            }
                            cls.desc = context.clone();
                            session.add_plain(&context);
                            if context.is_empty() {
                                warn!(
                                    "class \"{}\" is not documented: {}:{}",
                                    cls.name,
                                    path,
                                    cur.lineno()
                                );
                            }
                            session.classes.push(cls);
                        }
                    }
                }
                context.clear();
                blanks += 1;
                continue;
            }

            if classify::looks_like_function(line) {
                orphaned_export = false;
                cur.back();
                if let Some(fun) = function::parse_function(&mut cur)? {
                    if session.is_visible(&context) {
                        if context.is_empty() && blanks == 0 && !session.functions.is_empty() {
                            if let Some(prev) = session.functions.last_mut() {
                                prev.absorb(fun);
                            }
                        } else {
                            if context.contains("TODO: ") {
                                return Err(ScanError::TodoInDoc {
                                    file: path.to_string(),
                                    line: cur.lineno(),
                                });
                            }
                            let mut fun = fun;
                            fun.desc = context.clone();
                            session.add_plain(&context);
                            if context.is_empty() {
                                warn!(
                                    "function \"{}\" is not documented: {}:{}",
                                    fun.first_name(),
                                    path,
                                    cur.lineno()
                                );
                            }
                            session.functions.push(fun);
                        }
                        context.clear();
                        blanks = 0;
                    }
                }
                continue;
            }
        }

        // unexported class/struct definitions are opaque
        if ((!line.contains("enum class ") && line.contains("class ")) || line.contains("struct "))
            && !line.contains(';')
        {
            cur.back();
            skip::consume_block(&mut cur);
            context.clear();
            blanks += 1;
            continue;
        }

        if line.starts_with("enum ") {
            if !session.is_visible(&context) {
                cur.back();
                skip::consume_block(&mut cur);
            } else {
                cur.back();
                if let Some(mut e) = enums::parse_enum(&mut cur, session)? {
                    if context.contains("TODO: ") {
                        return Err(ScanError::TodoInDoc {
                            file: path.to_string(),
                            line: cur.lineno(),
                        });
                    }
                    e.desc = context.clone();
                    session.add_plain(&context);
                    if context.is_empty() {
                        warn!("enum \"{}\" is not documented: {}:{}", e.name, path, cur.lineno());
                    }
                    session.enums.push(e);
                }
            }
            context.clear();
            blanks += 1;
            continue;
        }

        blanks += 1;
        if classify::looks_like_forward_decl(line)
            || classify::looks_like_blank(line)
            || classify::looks_like_namespace(line)
        {
            debug!("--    {line}");
        } else {
            debug!("??    {line}");
        }
        context.clear();
    }

    Ok(())
}

/// Read a constant off a single `constexpr` line.
fn parse_constant(line: &str, file: String) -> Constant {
    let line = line.split('=').next().unwrap_or("");
    let line = match line.split_once("constexpr") {
        Some((_, rest)) => rest,
        None => line,
    };
    let line = if line.contains('{') && line.contains('}') {
        line.split('{').next().unwrap_or("")
    } else {
        line
    };
    let line = line.trim().trim_end_matches(';');
    let (ctype, name) = line.rsplit_once(' ').unwrap_or(("", line));
    Constant {
        file,
        ctype: ctype.trim().to_string(),
        name: name.to_string(),
        desc: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str) -> Result<Session, ScanError> {
        let mut session = Session::new(false, false);
        parse_file("include/libtorrent/sample.hpp", content, &mut session)?;
        Ok(session)
    }

    #[test]
    fn exported_free_function_recorded() {
        let s = scan("// makes a magnet uri\nTORRENT_EXPORT std::string make_magnet_uri(torrent_handle const& h);\n").unwrap();
        assert_eq!(s.functions.len(), 1);
        assert_eq!(s.functions[0].first_name(), "make_magnet_uri()");
        assert_eq!(s.functions[0].desc, "makes a magnet uri\n");
    }

    #[test]
    fn exported_struct_recorded() {
        let s = scan(
            "// a torrent\nstruct TORRENT_EXPORT torrent_info\n{\n   // the info hash\n   sha1_hash info_hash() const;\n};\n",
        )
        .unwrap();
        assert_eq!(s.classes.len(), 1);
        assert_eq!(s.classes[0].name, "torrent_info");
        assert_eq!(s.classes[0].funs.len(), 1);
    }

    #[test]
    fn unexported_class_skipped() {
        let s = scan("class helper\n{\n   void f();\n};\n").unwrap();
        assert!(s.classes.is_empty());
        assert!(s.functions.is_empty());
    }

    #[test]
    fn overview_captured() {
        let s = scan("// OVERVIEW\n//\n// This section describes the session.\n\nint x;\n").unwrap();
        let overview = s.overviews.get("libtorrent/sample.hpp").unwrap();
        assert_eq!(overview, "\nThis section describes the session.\n");
    }

    #[test]
    fn orphaned_export_is_fatal() {
        let err = scan("TORRENT_EXPORT session_proxy;\nint x;\n").unwrap_err();
        assert!(matches!(err, ScanError::OrphanedExport { .. }));
    }

    #[test]
    fn export_on_function_not_orphaned() {
        assert!(scan("// doc\nTORRENT_EXPORT int free_func();\nint y;\n").is_ok());
    }

    #[test]
    fn constant_grouped_by_type() {
        let s = scan(
            "// no peer wants it\nconstexpr piece_state_t piece_empty{0};\n// all peers have it\nconstexpr piece_state_t piece_full{1};\n",
        )
        .unwrap();
        let group = s.constants.get("piece_state_t").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].name, "piece_empty");
        assert_eq!(group[1].desc, "all peers have it\n");
    }

    #[test]
    fn internal_namespace_skipped() {
        let s = scan("namespace aux {\nstruct TORRENT_EXPORT leaked\n{\n};\n}\nint x;\n").unwrap();
        assert!(s.classes.is_empty());
    }

    #[test]
    fn top_level_enum_recorded() {
        let s = scan("// socket types\nenum socket_type_t\n{\n   tcp,\n   udp\n};\n").unwrap();
        assert_eq!(s.enums.len(), 1);
        assert_eq!(s.enums[0].name, "socket_type_t");
        assert_eq!(s.enums[0].desc, "socket types\n");
        assert_eq!(s.enums[0].values.len(), 2);
    }

    #[test]
    fn top_level_overload_merge() {
        let s = scan(
            "// parses bencoded data\nTORRENT_EXPORT entry bdecode(span<char const> buf);\nTORRENT_EXPORT entry bdecode(span<char const> buf, error_code& ec);\n",
        )
        .unwrap();
        assert_eq!(s.functions.len(), 1);
        assert_eq!(s.functions[0].signatures.len(), 2);
    }

    #[test]
    fn doc_relative_paths() {
        assert_eq!(
            doc_path("../include/libtorrent/session.hpp"),
            "libtorrent/session.hpp"
        );
        assert_eq!(doc_path("sample.hpp"), "sample.hpp");
    }
}

//! Cross-reference linker: rewrite prose so mentions of known symbols become
//! anonymous hyperlinks.
//!
//! Headings, table rows and literal regions pass through untouched. Link
//! targets queue up in the session and are flushed as a block after the
//! rewritten text, or just before an interrupting `.. include::` directive.

use std::sync::LazyLock;

use regex::Regex;

use crate::session::Session;

/// A full-width heading underline.
static RE_UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[=\-.]+$").unwrap());

/// Rewrite `text`, linking every word that resolves in the symbol table.
pub fn linkify_symbols(session: &mut Session, text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut ret: Vec<String> = Vec::new();
    let mut out = String::new();
    let mut in_literal = false;

    for (idx, &line) in lines.iter().enumerate() {
        // the underline following a heading title; last line never counts
        let next_line = if idx + 1 < lines.len().saturating_sub(1) {
            lines[idx + 1]
        } else {
            ""
        };

        if line.contains(".. include:: ") {
            out.push_str(&ret.join("\n"));
            ret = vec![line.to_string()];
            out.push_str(&session.dump_link_targets(""));
            out.push('\n');
            continue;
        }

        if !next_line.is_empty() && RE_UNDERLINE.is_match(next_line) {
            ret.push(line.to_string());
            continue;
        }

        if line.starts_with('|') {
            ret.push(line.to_string());
            continue;
        }

        if in_literal && !line.starts_with('\t') && !line.is_empty() {
            in_literal = false;
        }
        if in_literal {
            ret.push(line.to_string());
            continue;
        }
        if line.trim() == ".. parsed-literal::"
            || line.trim().starts_with(".. code::")
            || (!line.trim().starts_with("..") && line.ends_with("::"))
        {
            in_literal = true;
        }

        let words: Vec<String> = line
            .split(' ')
            .map(|w| link_word(session, w))
            .collect();
        ret.push(words.join(" "));
    }

    out.push_str(&ret.join("\n"));
    out
}

/// Replace a single space-delimited word if its stripped form is a known
/// symbol. Leading markup characters and trailing punctuation survive around
/// the link; a trailing reference-marker underscore is dropped from the
/// rendered text.
fn link_word(session: &mut Session, word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let mut leading = String::new();
    let mut w = word;
    while let Some(c) = w.chars().next() {
        if matches!(c, '\t' | ' ' | '(' | '[' | '{') {
            leading.push(c);
            w = &w[c.len_utf8()..];
        } else {
            break;
        }
    }

    let mut w = w.trim();
    if w.is_empty() {
        return word.to_string();
    }

    let mut trailing = String::new();
    loop {
        let last = match w.chars().next_back() {
            Some(c) => c,
            None => break,
        };
        if w.chars().count() > 1 && matches!(last, '.' | ',' | ')') && !w.ends_with("()") {
            trailing.insert(0, last);
            w = &w[..w.len() - last.len_utf8()];
        } else {
            break;
        }
    }

    let link_name = w.strip_suffix('_').unwrap_or(w);

    match session.symbols.get(w).cloned() {
        Some(target) => {
            let link_name = link_name.replace('-', " ");
            format!("{leading}{}{trailing}", session.print_link(&link_name, &target))
        }
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(symbols: &[(&str, &str)]) -> Session {
        let mut s = Session::new(false, false);
        for (name, target) in symbols {
            s.symbols.insert((*name).to_string(), (*target).to_string());
        }
        s
    }

    #[test]
    fn known_symbol_linked() {
        let mut s = session_with(&[("torrent_handle", "reference-Core.html#torrent_handle")]);
        let out = linkify_symbols(&mut s, "returns the torrent_handle for this torrent");
        assert_eq!(out, "returns the `torrent_handle`__ for this torrent");
        assert_eq!(
            s.dump_link_targets(""),
            "\n__ reference-Core.html#torrent_handle\n"
        );
    }

    #[test]
    fn idempotent_without_symbols() {
        let mut s = session_with(&[]);
        let text = "plain prose with   spacing preserved\nand a second line";
        assert_eq!(linkify_symbols(&mut s, text), text);
        assert!(s.link_targets.is_empty());
    }

    #[test]
    fn trailing_punctuation_preserved() {
        let mut s = session_with(&[("pause()", "reference-Session.html#pause()")]);
        let out = linkify_symbols(&mut s, "call pause(), then wait");
        assert_eq!(out, "call `pause()`__, then wait");
    }

    #[test]
    fn heading_lines_untouched() {
        let mut s = session_with(&[("session", "reference-Session.html#session")]);
        let text = "session\n=======\n\nthe session object\n";
        let out = linkify_symbols(&mut s, text);
        assert!(out.starts_with("session\n=======\n"));
        assert!(out.contains("the `session`__ object"));
    }

    #[test]
    fn table_rows_untouched() {
        let mut s = session_with(&[("session", "x.html#session")]);
        let out = linkify_symbols(&mut s, "| session | the session |\nplain session here\n");
        assert!(out.starts_with("| session | the session |\n"));
        assert!(out.contains("plain `session`__ here"));
    }

    #[test]
    fn literal_region_untouched() {
        let mut s = session_with(&[("session", "x.html#session")]);
        let text = "example::\n\n\tsession ses;\n\nback to session prose\n";
        let out = linkify_symbols(&mut s, text);
        assert!(out.contains("\tsession ses;"));
        assert!(out.contains("back to `session`__ prose"));
    }

    #[test]
    fn code_block_untouched() {
        let mut s = session_with(&[("session", "x.html#session")]);
        let text = ".. code:: c++\n\n\tsession ses;\n";
        let out = linkify_symbols(&mut s, text);
        assert!(out.contains("\tsession ses;"));
        assert!(s.link_targets.is_empty());
    }

    #[test]
    fn reference_marker_stripped_from_text_only() {
        let mut s = session_with(&[("fast-resume_", "manual-ref.html#fast-resume")]);
        let out = linkify_symbols(&mut s, "see the fast-resume_ section");
        assert_eq!(out, "see the `fast resume`__ section");
        assert_eq!(s.dump_link_targets(""), "\n__ manual-ref.html#fast-resume\n");
    }

    #[test]
    fn include_directive_flushes_targets() {
        let mut s = session_with(&[("session", "x.html#session")]);
        let text = "about session here\n.. include:: footer.rst\n";
        let out = linkify_symbols(&mut s, text);
        let flush = out.find("__ x.html#session").unwrap();
        let include = out.find(".. include:: footer.rst").unwrap();
        assert!(flush < include);
    }

    #[test]
    fn leading_bracket_preserved() {
        let mut s = session_with(&[("entry", "x.html#entry")]);
        let out = linkify_symbols(&mut s, "a list (entry) of items");
        assert_eq!(out, "a list (`entry`__) of items");
    }
}

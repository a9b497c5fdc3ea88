//! Block consumers: skip balanced braces, block comments and preprocessor
//! conditionals without extracting anything, leaving the cursor on the line
//! after the construct.

use log::{debug, warn};

use super::Cursor;

/// Skip a balanced `{ ... }` block starting at the current line. Counters
/// start at zero before the first line is read, so a one-line `{}` block is
/// consumed as a whole.
pub fn consume_block(cur: &mut Cursor) {
    let mut start_brace = 0usize;
    let mut end_brace = 0usize;

    while let Some(raw) = cur.next_line() {
        let line = raw.trim();
        debug!("xx    {line}");
        start_brace += line.matches('{').count();
        end_brace += line.matches('}').count();
        if start_brace > 0 && start_brace == end_brace {
            break;
        }
    }
}

/// Skip a `/* ... */` comment starting at the current line.
pub fn consume_comment(cur: &mut Cursor) {
    while let Some(raw) = cur.next_line() {
        let line = raw.trim();
        debug!("xx    {line}");
        if line.contains("*/") {
            break;
        }
    }
}

/// Conditional guards whose body is documentation-irrelevant and skipped
/// wholesale: debug/assert instrumentation and ABI back-compat sections.
fn is_skippable_guard(line: &str) -> bool {
    (line.starts_with("#if")
        && (line.contains(" TORRENT_USE_ASSERTS")
            || line.contains(" TORRENT_USE_INVARIANT_CHECKS")
            || line.contains(" TORRENT_ASIO_DEBUGGING")))
        || line == "#if TORRENT_ABI_VERSION == 1"
        || line == "#if TORRENT_ABI_VERSION <= 2"
        || line == "#if TORRENT_ABI_VERSION < 3"
        || line == "#if TORRENT_ABI_VERSION < 4"
}

/// Reduce a conditional to the macro expression it tests.
fn trim_define(line: &str) -> String {
    line.replace("#ifndef", "")
        .replace("#ifdef", "")
        .replace("#if", "")
        .replace("defined", "")
        .replace("TORRENT_ABI_VERSION == 1", "")
        .replace("TORRENT_ABI_VERSION <= 2", "")
        .replace("TORRENT_ABI_VERSION < 3", "")
        .replace("TORRENT_ABI_VERSION < 4", "")
        .replace("||", "")
        .replace("&&", "")
        .replace(['(', ')', '!', '\\'], "")
        .trim()
        .to_string()
}

/// Handle a preprocessor line at the cursor.
///
/// Backslash-continued lines are joined. With `warn_on_ifdefs`, a conditional
/// mentioning a project macro other than the ABI-version guards signals
/// possibly undocumented ABI-sensitive code and is reported. Only the fixed
/// allow-list of guards has its body skipped (stopping at the matching
/// `#else`/`#endif`); any other directive merely advances past its
/// continuation lines so the body is scanned normally.
pub fn consume_ifdef(cur: &mut Cursor, warn_on_ifdefs: bool) {
    let mut line = match cur.next_line() {
        Some(raw) => raw.trim().to_string(),
        None => return,
    };
    debug!("prep  {line}");

    if warn_on_ifdefs && line.starts_with("#if") {
        while line.ends_with('\\') {
            match cur.next_line() {
                Some(raw) => {
                    debug!("prep  {}", raw.trim());
                    line.push_str(raw.trim());
                }
                None => break,
            }
        }
        let define = trim_define(&line);
        if define.contains("TORRENT_") && !define.contains("TORRENT_ABI_VERSION") {
            warn!(
                "possible ABI breakage in public struct! \"{}\" {}:{}",
                define,
                cur.path(),
                cur.lineno()
            );
        } else if !define.is_empty() {
            warn!(
                "sensitive define in public struct: \"{}\" {}:{}",
                define,
                cur.path(),
                cur.lineno()
            );
        }
    }

    if is_skippable_guard(&line) {
        let mut start_if = 1i32;
        let mut end_if = 0i32;
        while let Some(raw) = cur.next_line() {
            let line = raw.trim();
            debug!("prep  {line}");
            if line.starts_with("#endif") {
                end_if += 1;
            }
            if line.starts_with("#if") {
                start_if += 1;
            }
            if line == "#else" && start_if - end_if == 1 {
                break;
            }
            if start_if - end_if == 0 {
                break;
            }
        }
    } else {
        while line.ends_with('\\') {
            match cur.next_line() {
                Some(raw) => {
                    debug!("prep  {}", raw.trim());
                    line = raw.trim().to_string();
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor<'a>(lines: &'a [&'a str]) -> Cursor<'a> {
        Cursor::new(lines, "test.hpp")
    }

    #[test]
    fn block_single_line() {
        let lines = ["int f() { return 1; }", "int after;"];
        let mut cur = cursor(&lines);
        consume_block(&mut cur);
        assert_eq!(cur.next_line(), Some("int after;"));
    }

    #[test]
    fn block_nested() {
        let lines = ["{", "  if (x) {", "  }", "}", "after"];
        let mut cur = cursor(&lines);
        consume_block(&mut cur);
        assert_eq!(cur.next_line(), Some("after"));
    }

    #[test]
    fn comment_multi_line() {
        let lines = ["/* copyright", " * notice", " */", "after"];
        let mut cur = cursor(&lines);
        consume_comment(&mut cur);
        assert_eq!(cur.next_line(), Some("after"));
    }

    #[test]
    fn ifdef_guard_body_skipped() {
        let lines = [
            "#if TORRENT_ABI_VERSION == 1",
            "void deprecated();",
            "#endif",
            "after",
        ];
        let mut cur = cursor(&lines);
        consume_ifdef(&mut cur, false);
        assert_eq!(cur.next_line(), Some("after"));
    }

    #[test]
    fn ifdef_guard_stops_at_else() {
        let lines = [
            "#if TORRENT_ABI_VERSION == 1",
            "old();",
            "#else",
            "current();",
            "#endif",
        ];
        let mut cur = cursor(&lines);
        consume_ifdef(&mut cur, false);
        assert_eq!(cur.next_line(), Some("current();"));
    }

    #[test]
    fn other_directive_body_left_alone() {
        let lines = ["#ifdef _WIN32", "void win_only();", "#endif"];
        let mut cur = cursor(&lines);
        consume_ifdef(&mut cur, false);
        // only the directive line is consumed; the body is scanned normally
        assert_eq!(cur.next_line(), Some("void win_only();"));
    }

    #[test]
    fn continuation_lines_consumed() {
        let lines = ["#define LONG_MACRO(x) \\", "  do_something(x)", "after"];
        let mut cur = cursor(&lines);
        consume_ifdef(&mut cur, false);
        assert_eq!(cur.next_line(), Some("after"));
    }

    #[test]
    fn trim_define_reduces_to_macro() {
        assert_eq!(
            trim_define("#if defined(TORRENT_WINDOWS) && !defined(X)"),
            "TORRENT_WINDOWS  X"
        );
        assert_eq!(trim_define("#if TORRENT_ABI_VERSION == 1"), "");
    }
}

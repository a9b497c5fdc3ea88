//! Line classification predicates.
//!
//! These are heuristics over a single trimmed line, not a grammar. Absence of
//! a match is a normal `false`; none of them can fail.

/// Export and ABI annotation macros stripped from signature text.
pub fn strip_export_macros(line: &str) -> String {
    line.replace("TORRENT_EXPORT ", "")
        .replace("TORRENT_EXTRA_EXPORT", "")
        .replace("TORRENT_V3_EXPLICIT", "")
        .replace("TORRENT_COUNTER_NOEXCEPT", "")
}

pub fn looks_like_namespace(line: &str) -> bool {
    line.trim().starts_with("namespace")
}

/// Nothing left after dropping a trailing comment and scope punctuation.
pub fn looks_like_blank(line: &str) -> bool {
    let line = line.split("//").next().unwrap_or("");
    line.replace(['{', '}', '[', ']', ';'], "").trim().is_empty()
}

pub fn looks_like_variable(line: &str) -> bool {
    let line = line.split("//").next().unwrap_or("").trim();
    if !line.contains(' ') && !line.contains('\t') {
        return false;
    }
    if line.starts_with("friend ")
        || line.starts_with("enum ")
        || line.starts_with(',')
        || line.starts_with(':')
        || line.starts_with("typedef")
        || line.starts_with("using")
    {
        return false;
    }
    line.contains(" = ") || line.ends_with(';')
}

/// A `constexpr` (optionally `inline constexpr`) variable declaration.
pub fn looks_like_constant(line: &str) -> bool {
    let mut line = line.trim();
    if let Some(rest) = line.strip_prefix("inline") {
        line = rest.trim();
    }
    match line.strip_prefix("constexpr") {
        Some(rest) => looks_like_variable(rest),
        None => false,
    }
}

pub fn looks_like_forward_decl(line: &str) -> bool {
    let line = line.split("//").next().unwrap_or("").trim();
    if !line.ends_with(';') || line.contains('{') || line.contains('}') {
        return false;
    }
    line.starts_with("friend ") || line.starts_with("struct ") || line.starts_with("class ")
}

/// A function declaration or definition opening on this line. Out-of-line
/// qualified definitions (`foo::bar(...)`) are excluded so they are not
/// mistaken for in-class declarations.
pub fn looks_like_function(line: &str) -> bool {
    let line = line.split("//").next().unwrap_or("");
    if line.starts_with("friend class ") || line.starts_with("friend struct ") {
        return false;
    }
    let before_paren = line.split('(').next().unwrap_or("");
    if before_paren
        .rsplit(' ')
        .next()
        .unwrap_or("")
        .contains("::")
    {
        return false;
    }
    if line.starts_with(',') || line.starts_with(':') {
        return false;
    }
    line.contains('(')
}

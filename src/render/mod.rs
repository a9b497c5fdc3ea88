//! reStructuredText rendering of categorized declarations.
//!
//! Mechanical string assembly: anchors, headings, parsed-literal declaration
//! blocks with bolded names, and computed-width enum tables. All prose passes
//! through the cross-reference linker exactly once on its way out.

pub mod dump;
pub mod plain;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::categorize::STATIC_LINKS;
use crate::linkify::linkify_symbols;
use crate::model::{Category, Enum};
use crate::session::Session;

const REPORT_ISSUE_URL: &str = "http://github.com/arvidn/libtorrent/issues/new";

/// Characters kept verbatim in issue-link query parameters.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

fn quote_plus(s: &str) -> String {
    utf8_percent_encode(s, QUERY).to_string().replace("%20", "+")
}

fn putln(out: &mut String, s: &str) {
    out.push_str(s);
    out.push('\n');
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

/// An RST heading: the text underlined with `col` at full width.
pub fn heading(text: &str, col: char) -> String {
    let text = text.trim();
    format!(
        "\n{}\n{}\n",
        text,
        col.to_string().repeat(text.chars().count())
    )
}

/// Bold the function name in a signature and escape the characters RST would
/// otherwise interpret inside a parsed literal; comments in the parameter
/// list become italic.
pub fn highlight_signature(s: &str) -> String {
    let (head, tail) = match s.split_once('(') {
        Some(parts) => parts,
        None => return s.to_string(),
    };
    let mut tokens: Vec<String> = head.split(' ').map(str::to_string).collect();
    let last = tokens.len() - 1;
    if tokens[last].is_empty() {
        return s.to_string();
    }
    tokens[last] = format!("**{}** ", tokens[last]);
    if tokens.len() > 1 {
        tokens[0] = tokens[0].replace('*', "\\*");
    }
    let tail = tail
        .replace('*', "\\*")
        .replace(':', "\\:")
        .replace('_', "\\_")
        .replace("/\\*", "*/\\*")
        .replace("\\*/", "\\*/*");
    format!("{}({}", tokens.join(" "), tail)
}

/// Bold the declared name in a field signature, splitting on the default
/// value or brace initializer.
pub fn highlight_name(s: &str) -> String {
    let splitter = if s.contains('=') {
        " = "
    } else if s.contains('{') {
        "{"
    } else {
        return s.to_string();
    };
    let (head, rest) = match s.split_once(splitter) {
        Some((head, rest)) => (head, Some(rest)),
        None => (s, None),
    };
    let mut tokens: Vec<String> = head.split(' ').map(str::to_string).collect();
    let last = tokens.len() - 1;
    if tokens[last].is_empty() {
        return s.to_string();
    }
    tokens[last] = format!("**{}** ", tokens[last]);
    match rest {
        Some(rest) => format!("{}{}{}", tokens.join(" "), splitter, rest),
        None => tokens.join(" "),
    }
}

/// A "report issue" tracker link for the heading `h`.
fn dump_report_issue(out: &mut String, h: &str) {
    putln(
        out,
        &format!(
            ".. raw:: html\n\n\t<span class=\"report-issue\">[<a \
             href=\"{}?title=docs:{}&labels=documentation&body={}\">report issue</a>]</span>\n\n",
            REPORT_ISSUE_URL,
            quote_plus(h),
            quote_plus(&format!("Documentation under heading \"{h}\" could be improved")),
        ),
    );
}

fn print_declared_in(out: &mut String, session: &mut Session, file: &str) {
    let link = session.print_link(file, &format!("include/{file}"));
    out.push_str(&format!("Declared in \"{link}\"\n\n"));
    putln(out, &session.dump_link_targets(""));
}

/// Render enums as three-column tables; column widths fit the widest cell,
/// multi-line descriptions continue in borderless rows.
fn render_enums(out: &mut String, session: &mut Session, enums: &mut [Enum], header_level: char) {
    for e in enums {
        putln(out, ".. raw:: html\n");
        putln(out, &format!("\t<a name=\"{}\"></a>", e.name));
        putln(out, "");
        dump_report_issue(out, &format!("enum {}", e.name));
        putln(out, &heading(&format!("enum {}", e.name), header_level));

        print_declared_in(out, session, &e.file);

        for v in e.values.iter_mut() {
            v.desc = linkify_symbols(session, &v.desc);
        }

        let mut width = ["name".len(), "value".len(), "description".len()];
        for v in &e.values {
            width[0] = width[0].max(v.name.chars().count());
            width[1] = width[1].max(v.val.chars().count());
            for d in v.desc.split('\n') {
                width[2] = width[2].max(d.chars().count());
            }
        }

        let sep = format!(
            "+-{}-+-{}-+-{}-+",
            "-".repeat(width[0]),
            "-".repeat(width[1]),
            "-".repeat(width[2])
        );
        putln(out, &sep);
        putln(
            out,
            &format!(
                "| {} | {} | {} |",
                pad("name", width[0]),
                pad("value", width[1]),
                pad("description", width[2])
            ),
        );
        putln(
            out,
            &format!(
                "+={}=+={}=+={}=+",
                "=".repeat(width[0]),
                "=".repeat(width[1]),
                "=".repeat(width[2])
            ),
        );
        for v in &e.values {
            let parts: Vec<&str> = v.desc.split('\n').collect();
            putln(
                out,
                &format!(
                    "| {} | {} | {} |",
                    pad(&v.name, width[0]),
                    pad(&v.val, width[1]),
                    pad(parts[0], width[2])
                ),
            );
            for part in &parts[1..] {
                putln(
                    out,
                    &format!(
                        "| {} | {} | {} |",
                        " ".repeat(width[0]),
                        " ".repeat(width[1]),
                        pad(part, width[2])
                    ),
                );
            }
            putln(out, &sep);
        }
        putln(out, "");

        putln(out, &session.dump_link_targets(""));
    }
}

/// Render one category's classes, free functions, enums and constants.
pub fn render_category(out: &mut String, session: &mut Session, category: &mut Category) {
    if let Some(overview) = category.overview.clone() {
        out.push_str(&linkify_symbols(session, &overview));
        out.push('\n');
    }

    for cls in &mut category.classes {
        putln(out, ".. raw:: html\n");
        putln(out, &format!("\t<a name=\"{}\"></a>", cls.name));
        putln(out, "");

        dump_report_issue(out, &format!("class {}", cls.name));
        out.push_str(&heading(&cls.name, '-'));
        out.push('\n');
        print_declared_in(out, session, &cls.file);
        cls.desc = linkify_symbols(session, &cls.desc);
        out.push_str(&cls.desc);
        out.push('\n');
        putln(out, &session.dump_link_targets(""));

        putln(out, "\n.. parsed-literal::\n\t");

        let mut block = format!("\n{}\n{{\n", cls.decl);
        for fun in &cls.funs {
            for s in &fun.signatures {
                block.push_str(&format!(
                    "   {}\n",
                    highlight_signature(&s.replace('\n', "\n   "))
                ));
            }
        }

        if !cls.funs.is_empty() && !cls.enums.is_empty() {
            block.push('\n');
        }

        let mut first = true;
        for e in &cls.enums {
            if !first {
                block.push('\n');
            }
            first = false;
            block.push_str(&format!("   enum {}\n   {{\n", e.name));
            for v in &e.values {
                block.push_str(&format!("      {},\n", v.name));
            }
            block.push_str("   };\n");
        }

        if cls.funs.len() + cls.enums.len() > 0 && !cls.fields.is_empty() {
            block.push('\n');
        }

        for field in &cls.fields {
            for s in &field.signatures {
                block.push_str(&format!("   {}\n", highlight_name(s)));
            }
        }

        block.push_str("};");
        putln(out, &format!("{}\n", block.replace('\n', "\n\t")));

        for fun in &mut cls.funs {
            if fun.desc.is_empty() {
                continue;
            }
            putln(out, ".. raw:: html\n");
            for n in &fun.names {
                putln(out, &format!("\t<a name=\"{n}\"></a>"));
            }
            putln(out, "");
            let h = fun.names.iter().cloned().collect::<Vec<_>>().join(" ");
            dump_report_issue(out, &format!("{}::[{}]", cls.name, h));
            putln(out, &heading(&h, '.'));

            let mut block = String::from(".. parsed-literal::\n\n");
            for s in &fun.signatures {
                block.push_str(&highlight_signature(&s.replace('\n', "\n   ")));
                block.push('\n');
            }
            putln(out, &format!("{}\n", block.replace('\n', "\n\t")));
            fun.desc = linkify_symbols(session, &fun.desc);
            putln(out, &fun.desc);

            putln(out, &session.dump_link_targets(""));
        }

        render_enums(out, session, &mut cls.enums, '.');

        for field in &mut cls.fields {
            if field.desc.is_empty() {
                continue;
            }
            putln(out, ".. raw:: html\n");
            for n in &field.names {
                putln(out, &format!("\t<a name=\"{n}\"></a>"));
            }
            putln(out, "");
            let h = field.names.join(" ");
            dump_report_issue(out, &format!("{}::[{}]", cls.name, h));
            putln(out, &h);
            field.desc = linkify_symbols(session, &field.desc);
            putln(out, &format!("\t{}", field.desc.replace('\n', "\n\t")));

            putln(out, &session.dump_link_targets(""));
        }
    }

    for fun in &mut category.functions {
        putln(out, ".. raw:: html\n");
        for n in &fun.names {
            putln(out, &format!("\t<a name=\"{n}\"></a>"));
        }
        putln(out, "");
        let h = fun.names.iter().cloned().collect::<Vec<_>>().join(" ");
        dump_report_issue(out, &h);
        putln(out, &heading(&h, '-'));
        print_declared_in(out, session, &fun.file);

        let mut block = String::from(".. parsed-literal::\n\n");
        for s in &fun.signatures {
            block.push_str(&highlight_signature(s));
            block.push('\n');
        }

        putln(out, &format!("{}\n", block.replace('\n', "\n\t")));
        let desc = linkify_symbols(session, &fun.desc);
        putln(out, &desc);

        putln(out, &session.dump_link_targets(""));
    }

    render_enums(out, session, &mut category.enums, '-');

    for (ctype, constants) in &mut category.constants {
        putln(out, ".. raw:: html\n");
        putln(out, &format!("\t<a name=\"{ctype}\"></a>\n"));
        dump_report_issue(out, ctype);
        putln(out, &heading(ctype, '-'));
        if let Some(first) = constants.first() {
            let file = first.file.clone();
            print_declared_in(out, session, &file);
        }

        for constant in constants.iter_mut() {
            putln(out, ".. raw:: html\n");
            putln(out, &format!("\t<a name=\"{ctype}::{}\"></a>\n", constant.name));
            putln(out, &constant.name);
            constant.desc = linkify_symbols(session, &constant.desc);
            putln(out, &format!("\t{}", constant.desc.replace('\n', "\n\t")));
            putln(out, &session.dump_link_targets("\t"));
        }

        putln(out, "");
    }

    putln(out, &session.dump_link_targets(""));

    for link in STATIC_LINKS {
        putln(out, link);
    }
}

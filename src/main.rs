//! refdoc — generate cross-linked reference documentation from annotated C++
//! headers.
//!
//! A heuristic line scanner slices each header into documented declarations
//! (classes, member functions, fields, enums, free functions, constants),
//! which are categorized into reStructuredText pages with prose mentions of
//! known symbols rewritten into hyperlinks.

mod categorize;
mod error;
mod linkify;
mod model;
mod parser;
mod render;
mod session;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use session::Session;

#[derive(Parser)]
#[command(
    name = "refdoc",
    about = "Generate cross-linked reference documentation from annotated C++ headers"
)]
struct Cli {
    /// Input header files (glob patterns supported)
    files: Vec<String>,

    /// Output directory for the rendered documents
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// Include internal and non-public declarations
    #[arg(long)]
    internal: bool,

    /// Print a plain outline of all extracted declarations
    #[arg(long)]
    dump: bool,

    /// Write prose-only plain_text_out.txt alongside the rendered documents
    #[arg(long)]
    plain_output: bool,

    /// Emit one concatenated document instead of per-category documents
    #[arg(long)]
    single_page: bool,

    /// Trace every line classification decision
    #[arg(long)]
    verbose: bool,

    /// Extra .rst documents to cross-link; each FILE.rst is rewritten to
    /// FILE-ref.rst in the output directory
    #[arg(long = "link-doc")]
    link_docs: Vec<PathBuf>,
}

/// Fixed preamble of every reference page.
const PAGE_HEADER: &str = ".. include:: header.rst

`home`__

__ reference.html

.. contents:: Table of contents
  :depth: 2
  :backlinks: none

";

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .format_timestamp(None)
    .init();

    let files = expand_globs(&cli.files)?;
    if files.is_empty() {
        anyhow::bail!("no input files");
    }

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output directory: {}", cli.output.display()))?;

    let mut session = Session::new(cli.internal, cli.plain_output);

    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parser::parse_file(&path.to_string_lossy(), &content, &mut session)?;
    }

    if cli.dump {
        render::dump::dump_outline(&session);
    }

    let mut categories = categorize::build_categories(&mut session);

    if cli.single_page {
        let mut out = String::from(PAGE_HEADER);
        for category in categories.values_mut() {
            render::render_category(&mut out, &mut session, category);
        }
        write_doc(&cli.output.join("single-page-ref.rst"), &out)?;
    } else {
        let mut toc_out = String::from(
            "=======================\nreference documentation\n=======================\n\n",
        );
        toc_out.push_str("`single-page version`__\n\n__ single-page-ref.html\n\n");
        for section in 0..toc::SECTION_COUNT {
            toc::print_toc(&mut toc_out, &mut session, &categories, section);
        }
        write_doc(&cli.output.join("reference.rst"), &toc_out)?;

        for category in categories.values_mut() {
            let filename = category.filename.clone();
            let mut out = String::from(PAGE_HEADER);
            render::render_category(&mut out, &mut session, category);
            write_doc(&cli.output.join(filename), &out)?;
        }
    }

    for doc in &cli.link_docs {
        preprocess_doc(&mut session, doc, &cli.output)?;
    }

    if let Some(plain) = session.plain.take() {
        write_doc(&cli.output.join("plain_text_out.txt"), &plain.into_text())?;
    }

    Ok(())
}

fn write_doc(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Cross-link a prose document against the finished symbol table, writing
/// `<stem>-ref.rst` into the output directory.
fn preprocess_doc(session: &mut Session, input: &Path, output_dir: &Path) -> Result<()> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid document name: {}", input.display()))?;
    let out_path = output_dir.join(format!("{stem}-ref.rst"));
    log::info!("processing {} -> {}", input.display(), out_path.display());

    let content =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let mut linked = linkify::linkify_symbols(session, &content);
    linked.push(' ');
    linked.push_str(&session.dump_link_targets(""));
    linked.push('\n');
    write_doc(&out_path, &linked)
}

/// File extensions recognized when a bare directory is given.
const SUPPORTED_EXTENSIONS: &[&str] = &["hpp", "h"];

/// Expand glob patterns into a sorted, deduplicated list of files. Sorting
/// keeps output (and symbol-table collision order) independent of filesystem
/// enumeration order.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            log::warn!("no files matched: {pattern}");
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

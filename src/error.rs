//! Fatal structural violations.
//!
//! The scanner only produces a trustworthy symbol table when the input obeys
//! the documentation convention it was written for. Each violation of that
//! convention is a distinct variant so callers (and tests) can tell them
//! apart; all of them abort the run with no output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to parse function signature\n{signature}\nline: {line}\nfile: {file}")]
    UnterminatedFunction {
        signature: String,
        file: String,
        line: usize,
    },

    #[error("failed to parse {kind} {name}\nfile: {file}:{line}")]
    UnterminatedClass {
        kind: String,
        name: String,
        file: String,
        line: usize,
    },

    #[error("failed to parse enum {name}\nline: {line}\nfile: {file}")]
    UnterminatedEnum {
        name: String,
        file: String,
        line: usize,
    },

    /// An unfinished doc comment was about to be published.
    #[error("TODO comment in public documentation: {file}:{line}")]
    TodoInDoc { file: String, line: usize },

    /// An export macro with no recognizable declaration following it.
    #[error("export macro without function or class!\n{file}:{line}\n{text}")]
    OrphanedExport {
        file: String,
        line: usize,
        text: String,
    },

    #[error(
        "found \"constexpr static\", use \"static constexpr\" instead for consistency!\n{file}:{line}\n{text}"
    )]
    ConstexprStatic {
        file: String,
        line: usize,
        text: String,
    },

    #[error("whitespace preceding namespace declaration: {file}:{line}")]
    MisplacedNamespace { file: String, line: usize },
}

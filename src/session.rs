//! Per-run extraction state.
//!
//! Everything the pipeline mutates lives here — the accumulated declaration
//! lists, the per-file overviews, the symbol table the linker resolves
//! against, and the pending anonymous-link targets — so independent runs
//! (including tests) never share state.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Class, Constant, Enum, Function};
use crate::render::plain::PlainText;

#[derive(Debug)]
pub struct Session {
    /// Include non-public and internal-marked declarations.
    pub internal: bool,

    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub enums: Vec<Enum>,
    /// Constants grouped by their type token.
    pub constants: BTreeMap<String, Vec<Constant>>,
    /// Per-file overview prose, keyed by documentation-relative path.
    pub overviews: BTreeMap<String, String>,

    /// Qualified name → `<page>.html#<anchor>`. Inserts overwrite on
    /// collision; the last categorized declaration wins.
    pub symbols: HashMap<String, String>,
    /// Targets of anonymous links emitted since the last flush.
    pub link_targets: Vec<String>,

    /// Counter for synthesized anonymous-enum names.
    pub anon_enum_index: usize,

    /// Prose-only side output, when requested.
    pub plain: Option<PlainText>,
}

impl Session {
    pub fn new(internal: bool, plain_output: bool) -> Self {
        Session {
            internal,
            classes: Vec::new(),
            functions: Vec::new(),
            enums: Vec::new(),
            constants: BTreeMap::new(),
            overviews: BTreeMap::new(),
            symbols: HashMap::new(),
            link_targets: Vec::new(),
            anon_enum_index: 0,
            plain: plain_output.then(PlainText::default),
        }
    }

    /// Whether a declaration carrying this doc context should be kept.
    /// `hidden` always drops it; `internal` drops it outside internal mode.
    pub fn is_visible(&self, desc: &str) -> bool {
        let desc = desc.trim_start();
        if desc.starts_with("hidden") {
            return false;
        }
        if self.internal {
            return true;
        }
        !desc.starts_with("internal")
    }

    /// Feed a description to the prose-only output, if enabled.
    pub fn add_plain(&mut self, desc: &str) {
        if let Some(plain) = self.plain.as_mut() {
            plain.push_desc(desc);
        }
    }

    /// Emit an anonymous reference and queue its target for the next flush.
    pub fn print_link(&mut self, name: &str, target: &str) -> String {
        self.link_targets.push(target.to_string());
        format!("`{name}`__")
    }

    /// Flush queued anonymous-link targets as `__ <target>` lines.
    pub fn dump_link_targets(&mut self, indent: &str) -> String {
        let mut out = String::from("\n");
        for target in self.link_targets.drain(..) {
            out.push_str(indent);
            out.push_str("__ ");
            out.push_str(&target);
            out.push('\n');
        }
        out
    }
}

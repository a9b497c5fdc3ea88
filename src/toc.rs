//! Table-of-contents rendering.
//!
//! Categories are displayed in four fixed sections; a category missing from
//! the partition table lands in section 2.

use std::collections::BTreeMap;

use crate::model::Category;
use crate::session::Session;

const SECTION_OF: &[(&str, usize)] = &[
    ("Core", 0),
    ("DHT", 0),
    ("Session", 0),
    ("Torrent Handle", 0),
    ("Torrent Info", 0),
    ("Trackers", 0),
    ("Settings", 0),
    ("Torrent Status", 0),
    ("Stats", 0),
    ("Resume Data", 0),
    ("Add Torrent", 0),
    ("Bencoding", 1),
    ("Bdecoding", 1),
    ("Filter", 1),
    ("Error Codes", 1),
    ("Create Torrents", 1),
    ("PeerClass", 2),
    ("ed25519", 2),
    ("Utility", 2),
    ("Storage", 2),
    ("Custom Storage", 2),
    ("Plugins", 2),
    ("Alerts", 3),
];

pub const SECTION_COUNT: usize = 4;

fn section_of(category: &str) -> Option<usize> {
    SECTION_OF
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, s)| *s)
}

/// Append the table of contents for display section `section`.
pub fn print_toc(
    out: &mut String,
    session: &mut Session,
    categories: &BTreeMap<String, Category>,
    section: usize,
) {
    let mut main_toc = false;

    for (name, category) in categories {
        match section_of(name) {
            Some(s) if s == section => {}
            None if section == 2 => {}
            _ => continue,
        }

        if !main_toc {
            out.push_str(".. container:: main-toc\n\n");
            main_toc = true;
        }

        out.push_str(&format!("\t.. rubric:: {name}\n\n"));

        if category.overview.is_some() {
            out.push_str("\t| overview__\n");
        }

        for cls in &category.classes {
            let target = session.symbols.get(&cls.name).cloned().unwrap_or_default();
            let link = session.print_link(&cls.name, &target);
            out.push_str(&format!("\t| {link}\n"));
        }
        for fun in &category.functions {
            for n in &fun.names {
                let target = session.symbols.get(n).cloned().unwrap_or_default();
                let link = session.print_link(n, &target);
                out.push_str(&format!("\t| {link}\n"));
            }
        }
        for e in &category.enums {
            let target = session.symbols.get(&e.name).cloned().unwrap_or_default();
            let link = session.print_link(&e.name, &target);
            out.push_str(&format!("\t| {link}\n"));
        }
        for ctype in category.constants.keys() {
            let target = session.symbols.get(ctype).cloned().unwrap_or_default();
            let link = session.print_link(ctype, &target);
            out.push_str(&format!("\t| {link}\n"));
        }
        out.push('\n');

        if category.overview.is_some() {
            out.push_str(&format!("\t__ {}#overview\n", category.html_name()));
        }
        let targets = session.dump_link_targets("\t");
        out.push_str(&targets);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Class;
    use crate::model::ClassKind;

    fn category_with_class(name: &str, cls_name: &str) -> (String, Category) {
        let mut cat = Category::new(name);
        cat.classes.push(Class {
            file: "libtorrent/x.hpp".into(),
            kind: ClassKind::Struct,
            name: cls_name.into(),
            decl: format!("struct {cls_name}"),
            enums: Vec::new(),
            fields: Vec::new(),
            funs: Vec::new(),
            desc: String::new(),
        });
        (name.to_string(), cat)
    }

    #[test]
    fn known_category_lands_in_its_section() {
        let mut session = Session::new(false, false);
        session
            .symbols
            .insert("session".into(), "reference-Session.html#session".into());
        let categories: BTreeMap<String, Category> =
            [category_with_class("Session", "session")].into_iter().collect();

        let mut section0 = String::new();
        print_toc(&mut section0, &mut session, &categories, 0);
        assert!(section0.contains(".. rubric:: Session"));
        assert!(section0.contains("\t| `session`__"));
        assert!(section0.contains("\t__ reference-Session.html#session"));

        let mut section1 = String::new();
        print_toc(&mut section1, &mut session, &categories, 1);
        assert!(section1.is_empty());
    }

    #[test]
    fn unknown_category_falls_into_section_two() {
        let mut session = Session::new(false, false);
        session.symbols.insert("thing".into(), "reference-Time.html#thing".into());
        let categories: BTreeMap<String, Category> =
            [category_with_class("Time", "thing")].into_iter().collect();

        let mut section2 = String::new();
        print_toc(&mut section2, &mut session, &categories, 2);
        assert!(section2.contains(".. rubric:: Time"));

        let mut section0 = String::new();
        print_toc(&mut section0, &mut session, &categories, 0);
        assert!(section0.is_empty());
    }
}

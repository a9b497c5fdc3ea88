//! Categorization: assign every declaration a documentation page and build
//! the symbol table the cross-reference linker resolves against.
//!
//! The lookup tables are configuration data, not logic: which header lands in
//! which page, which symbol names override that, and the fixed set of
//! manual sections and external references prose may link to.

use std::collections::BTreeMap;
use std::mem;

use crate::model::Category;
use crate::session::Session;

/// Header file name → category.
const CATEGORY_BY_FILE: &[(&str, &str)] = &[
    ("ed25519.hpp", "ed25519"),
    ("session.hpp", "Session"),
    ("session_handle.hpp", "Session"),
    ("torrent_handle.hpp", "Torrent Handle"),
    ("torrent_info.hpp", "Torrent Info"),
    ("announce_entry.hpp", "Trackers"),
    ("peer_class_type_filter.hpp", "PeerClass"),
    ("peer_class.hpp", "PeerClass"),
    ("torrent_status.hpp", "Torrent Status"),
    ("session_stats.hpp", "Stats"),
    ("performance_counters.hpp", "Stats"),
    ("read_resume_data.hpp", "Resume Data"),
    ("write_resume_data.hpp", "Resume Data"),
    ("add_torrent_params.hpp", "Add Torrent"),
    ("client_data.hpp", "Add Torrent"),
    ("session_status.hpp", "Session"),
    ("session_params.hpp", "Session"),
    ("error_code.hpp", "Error Codes"),
    ("storage_defs.hpp", "Storage"),
    ("file_storage.hpp", "Storage"),
    ("disk_interface.hpp", "Custom Storage"),
    ("disk_observer.hpp", "Custom Storage"),
    ("mmap_disk_io.hpp", "Storage"),
    ("disabled_disk_io.hpp", "Storage"),
    ("posix_disk_io.hpp", "Storage"),
    ("extensions.hpp", "Plugins"),
    ("ut_metadata.hpp", "Plugins"),
    ("ut_pex.hpp", "Plugins"),
    ("ut_trackers.hpp", "Plugins"),
    ("smart_ban.hpp", "Plugins"),
    ("peer_connection_handle.hpp", "Plugins"),
    ("create_torrent.hpp", "Create Torrents"),
    ("alert.hpp", "Alerts"),
    ("alert_types.hpp", "Alerts"),
    ("bencode.hpp", "Bencoding"),
    ("bdecode.hpp", "Bdecoding"),
    ("entry.hpp", "Bencoding"),
    ("time.hpp", "Time"),
    ("escape_string.hpp", "Utility"),
    ("enum_net.hpp", "Network"),
    ("socket.hpp", "Network"),
    ("address.hpp", "Network"),
    ("socket_io.hpp", "Network"),
    ("bitfield.hpp", "Utility"),
    ("sha1_hash.hpp", "Utility"),
    ("hasher.hpp", "Utility"),
    ("identify_client.hpp", "Utility"),
    ("ip_filter.hpp", "Filter"),
    ("session_settings.hpp", "Settings"),
    ("settings_pack.hpp", "Settings"),
    ("fingerprint.hpp", "Settings"),
    ("operations.hpp", "Alerts"),
    ("disk_buffer_holder.hpp", "Custom Storage"),
    ("alert_dispatcher.hpp", "Alerts"),
];

/// Symbol name → category, overriding the filename rule.
const CATEGORY_BY_NAME: &[(&str, &str)] = &[
    ("min_memory_usage()", "Settings"),
    ("high_performance_seed()", "Settings"),
    ("default_disk_io_constructor()", "Storage"),
    ("settings_interface", "Custom Storage"),
];

/// Sections of the main manual that prose may reference by name.
const PREDEFINED_SYMBOLS: &[(&str, &str)] = &[
    ("queuing_", "manual-ref.html#queuing"),
    ("fast-resume_", "manual-ref.html#fast-resume"),
    ("storage-allocation_", "manual-ref.html#storage-allocation"),
    ("alerts_", "manual-ref.html#alerts"),
    ("upnp-and-nat-pmp_", "manual-ref.html#upnp-and-nat-pmp"),
    ("http-seeding_", "manual-ref.html#http-seeding"),
    ("metadata-from-peers_", "manual-ref.html#metadata-from-peers"),
    ("magnet-links_", "manual-ref.html#magnet-links"),
    ("ssl-torrents_", "manual-ref.html#ssl-torrents"),
    (
        "dynamic-loading-of-torrent-files_",
        "manual-ref.html#dynamic-loading-of-torrent-files",
    ),
    ("session-statistics_", "manual-ref.html#session-statistics"),
    ("peer-classes_", "manual-ref.html#peer-classes"),
];

/// External reference targets appended to every rendered page.
pub const STATIC_LINKS: &[&str] = &[
    ".. _`BEP 3`: https://www.bittorrent.org/beps/bep_0003.html",
    ".. _`BEP 17`: https://www.bittorrent.org/beps/bep_0017.html",
    ".. _`BEP 19`: https://www.bittorrent.org/beps/bep_0019.html",
    ".. _`BEP 38`: https://www.bittorrent.org/beps/bep_0038.html",
    ".. _`BEP 42`: https://www.bittorrent.org/beps/bep_0042.html",
    ".. _`rate based choking`: manual-ref.html#rate-based-choking",
    ".. _extensions: manual-ref.html#extensions",
];

fn file_part(filename: &str) -> &str {
    filename.rsplit('/').next().unwrap_or(filename)
}

/// Category for a symbol, by suffix rules, then the name table, then the
/// filename table, then the DHT subsystem path, else the default.
pub fn categorize_symbol(name: &str, filename: &str) -> &'static str {
    if name.ends_with("_category()")
        || name.ends_with("_error_code")
        || name.ends_with("error_code_enum")
        || name.ends_with("errors")
    {
        return "Error Codes";
    }

    if let Some((_, cat)) = CATEGORY_BY_NAME.iter().find(|(n, _)| *n == name) {
        return cat;
    }

    let part = file_part(filename);
    if let Some((_, cat)) = CATEGORY_BY_FILE.iter().find(|(f, _)| *f == part) {
        return cat;
    }

    if filename.starts_with("libtorrent/kademlia/") {
        return "DHT";
    }

    "Core"
}

/// Files whose undocumented declarations are expected and not warned about.
pub fn suppress_warning(filename: &str) -> bool {
    file_part(filename) == "alert_types.hpp"
}

/// Partition the session's declarations into categories and populate the
/// symbol table. Entries are written classes first, then free functions,
/// enums and constants; on a name collision the last write wins.
pub fn build_categories(session: &mut Session) -> BTreeMap<String, Category> {
    let mut categories: BTreeMap<String, Category> = BTreeMap::new();

    for (name, target) in PREDEFINED_SYMBOLS {
        session.symbols.insert((*name).to_string(), (*target).to_string());
    }

    for cls in mem::take(&mut session.classes) {
        let cat = categorize_symbol(&cls.name, &cls.file);
        let category = categories
            .entry(cat.to_string())
            .or_insert_with(|| Category::new(cat));
        if let Some(overview) = session.overviews.get(&cls.file) {
            category.overview = Some(overview.clone());
        }
        let anchor = category.html_name() + "#";

        session
            .symbols
            .insert(cls.name.clone(), format!("{anchor}{}", cls.name));
        for fun in &cls.funs {
            for n in &fun.names {
                session.symbols.insert(n.clone(), format!("{anchor}{n}"));
                session
                    .symbols
                    .insert(format!("{}::{n}", cls.name), format!("{anchor}{n}"));
            }
        }
        for field in &cls.fields {
            for n in &field.names {
                session
                    .symbols
                    .insert(format!("{}::{n}", cls.name), format!("{anchor}{n}"));
            }
        }
        for e in &cls.enums {
            session
                .symbols
                .insert(e.name.clone(), format!("{anchor}{}", e.name));
            session
                .symbols
                .insert(format!("{}::{}", cls.name, e.name), format!("{anchor}{}", e.name));
            for v in &e.values {
                session
                    .symbols
                    .insert(format!("{}::{}", e.name, v.name), format!("{anchor}{}", v.name));
                session
                    .symbols
                    .insert(format!("{}::{}", cls.name, v.name), format!("{anchor}{}", v.name));
            }
        }

        category.classes.push(cls);
    }

    for fun in mem::take(&mut session.functions) {
        let cat = categorize_symbol(fun.first_name(), &fun.file);
        let category = categories
            .entry(cat.to_string())
            .or_insert_with(|| Category::new(cat));
        if let Some(overview) = session.overviews.get(&fun.file) {
            category.overview = Some(overview.clone());
        }
        let anchor = category.html_name() + "#";
        for n in &fun.names {
            session.symbols.insert(n.clone(), format!("{anchor}{n}"));
        }
        category.functions.push(fun);
    }

    for e in mem::take(&mut session.enums) {
        let cat = categorize_symbol(&e.name, &e.file);
        let category = categories
            .entry(cat.to_string())
            .or_insert_with(|| Category::new(cat));
        let anchor = category.html_name() + "#";
        session
            .symbols
            .insert(e.name.clone(), format!("{anchor}{}", e.name));
        for v in &e.values {
            session
                .symbols
                .insert(format!("{}::{}", e.name, v.name), format!("{anchor}{}", v.name));
        }
        category.enums.push(e);
    }

    for (ctype, constants) in mem::take(&mut session.constants) {
        let mut anchor = String::new();
        for constant in constants {
            let cat = categorize_symbol(&ctype, &constant.file);
            let category = categories
                .entry(cat.to_string())
                .or_insert_with(|| Category::new(cat));
            anchor = category.html_name() + "#";
            session.symbols.insert(
                format!("{ctype}::{}", constant.name),
                format!("{anchor}{ctype}::{}", constant.name),
            );
            category
                .constants
                .entry(ctype.clone())
                .or_default()
                .push(constant);
        }
        session.symbols.insert(ctype.clone(), format!("{anchor}{ctype}"));
    }

    categories
}

//! Plain textual outline of everything the scanner extracted, for
//! inspection independent of the rendered documents.

use crate::session::Session;

const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

pub fn dump_outline(session: &Session) {
    for cls in &session.classes {
        println!("{UNDERLINE}{}{RESET} {}\n{{", cls.kind, cls.name);
        for fun in &cls.funs {
            for s in &fun.signatures {
                println!("   {}", s.replace('\n', "\n   "));
            }
        }

        if !cls.funs.is_empty() && !cls.fields.is_empty() {
            println!();
        }

        for field in &cls.fields {
            for s in &field.signatures {
                println!("   {s}");
            }
        }

        if !cls.fields.is_empty() && !cls.enums.is_empty() {
            println!();
        }

        for e in &cls.enums {
            println!("   {UNDERLINE}enum{RESET} {}\n   {{", e.name);
            for v in &e.values {
                println!("      {}", v.name);
            }
            println!("   }};");
        }
        println!("}};\n");
    }

    for fun in &session.functions {
        for s in &fun.signatures {
            println!("{s}");
        }
    }

    for e in &session.enums {
        println!("{UNDERLINE}enum{RESET} {}\n{{", e.name);
        for v in &e.values {
            println!("   {}", v.name);
        }
        println!("}};");
    }

    for constants in session.constants.values() {
        for constant in constants {
            println!("{UNDERLINE}constant{RESET} {} {}\n", constant.ctype, constant.name);
        }
    }
}

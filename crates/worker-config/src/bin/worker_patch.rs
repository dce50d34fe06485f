//! `worker-patch` — apply one config patch operation to JSONC from stdin.
//!
//! Usage:
//!   worker-patch ensure-flag <flag>
//!   worker-patch ensure-migrations <class>...
//!   worker-patch append-binding <section> <object-json>
//!   worker-patch remove-binding <section> <field> <value>
//!
//! The config text is read from stdin; the patched text goes to stdout.

use std::io::{self, Read, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let snapshot = match jsonc_splice::parse_snapshot(&text) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let result = match args.get(1).map(String::as_str) {
        Some("ensure-flag") => match args.get(2) {
            Some(flag) => worker_config::ensure_compat_flag(&text, &snapshot, flag),
            None => usage(),
        },
        Some("ensure-migrations") if args.len() > 2 => {
            worker_config::ensure_migration_step(&text, &snapshot, &args[2..])
        }
        Some("append-binding") => match (args.get(2), args.get(3)) {
            (Some(section), Some(json)) => {
                worker_config::append_binding(&text, &snapshot, section, json)
            }
            _ => usage(),
        },
        Some("remove-binding") => match (args.get(2), args.get(3), args.get(4)) {
            (Some(section), Some(field), Some(value)) => {
                worker_config::remove_binding(&text, section, field, value)
            }
            _ => usage(),
        },
        _ => usage(),
    };

    match result {
        Ok(out) => {
            io::stdout().write_all(out.as_bytes()).unwrap();
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn usage() -> ! {
    eprintln!("usage: worker-patch ensure-flag <flag>");
    eprintln!("       worker-patch ensure-migrations <class>...");
    eprintln!("       worker-patch append-binding <section> <object-json>");
    eprintln!("       worker-patch remove-binding <section> <field> <value>");
    std::process::exit(2);
}

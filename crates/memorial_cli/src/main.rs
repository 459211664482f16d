//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memorial_core` linkage.
//! - Given a database path, print the memorial export text.

use memorial_core::db::open_db;
use memorial_core::{render_export_text, MemorialStore, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("memorial_core ping={}", memorial_core::ping());
    println!("memorial_core version={}", memorial_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match export_text(&db_path) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn export_text(db_path: &str) -> Result<String, String> {
    let conn = open_db(db_path).map_err(|err| format!("failed to open `{db_path}`: {err}"))?;
    let store = MemorialStore::open(SqliteKeyValueStore::new(&conn))
        .map_err(|err| format!("failed to load memorial: {err}"))?;
    let memorial = store.memorial().map_err(|err| err.to_string())?;
    Ok(render_export_text(&memorial))
}

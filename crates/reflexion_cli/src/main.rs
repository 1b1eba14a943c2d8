//! CLI driver for the journal store.
//!
//! # Responsibility
//! - Exercise `reflexion_core` against a journal database file.
//! - Keep output line-oriented for quick local checks.

mod cli;

use clap::Parser;
use cli::{CliArgs, Command};
use reflexion_core::{
    core_version, default_log_level, init_logging, EntryDraft, EntryStore, JournalEntry,
    JournalService, SqliteBlobStore, StoreConfig,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), String> {
    match args.command {
        Command::Version => {
            println!("reflexion_core version={}", core_version());
            Ok(())
        }
        Command::List { tag } => {
            let store = open_store(args.db.as_deref())?;
            let entries = store.filter_by_tag(tag.as_deref());
            for entry in &entries {
                print_entry(entry);
            }
            println!("count={}", entries.len());
            Ok(())
        }
        Command::Add {
            kind,
            content,
            file_url,
            tag,
        } => {
            let mut draft = EntryDraft::new(kind, content);
            draft.file_url = file_url;
            draft.emotion_tag = tag;

            let service = JournalService::new(Arc::new(open_store(args.db.as_deref())?));
            let entry = service
                .record(draft)
                .map_err(|err| format!("add failed: {err}"))?;
            println!("saved id={}", entry.id);
            Ok(())
        }
    }
}

fn open_store(db: Option<&Path>) -> Result<EntryStore<SqliteBlobStore>, String> {
    let db = db.ok_or("no journal database; pass --db or set REFLEXION_DB")?;
    EntryStore::open_sqlite(db, StoreConfig::default())
        .map_err(|err| format!("cannot open journal `{}`: {err}", db.display()))
}

fn print_entry(entry: &JournalEntry) {
    println!(
        "{} {} {} tag={} file={}",
        entry.date.to_rfc3339(),
        entry.id,
        entry.kind.label(),
        entry.emotion_tag.as_deref().unwrap_or("-"),
        entry.file_url.as_deref().unwrap_or("-"),
    );
}

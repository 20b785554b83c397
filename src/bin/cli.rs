//! logcask shell
//!
//! Opens an engine and executes commands read from stdin, one per line,
//! until EOF. See `logcask::command` for the syntax.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use logcask::command::Command;
use logcask::config::{DEFAULT_DIR, DEFAULT_MAX_FILE_SIZE};
use logcask::index::IndexKind;
use logcask::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// logcask shell
#[derive(Parser, Debug)]
#[command(name = "logcask")]
#[command(about = "Embedded Bitcask-style key-value store shell")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// Size limit of a single data file in bytes
    #[arg(short = 's', long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// fsync after every append
    #[arg(long)]
    always_sync: bool,

    /// In-memory index implementation
    #[arg(short, long, value_enum, default_value_t = IndexArg::Btree)]
    index: IndexArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexArg {
    Btree,
    Hash,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Btree => IndexKind::BTree,
            IndexArg::Hash => IndexKind::Hash,
        }
    }
}

fn main() {
    // Logs go to stderr so command output stays clean on stdout
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,logcask=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("logcask v{}", logcask::VERSION);

    let config = Config::builder()
        .dir(&args.dir)
        .max_file_size(args.max_file_size)
        .always_sync(args.always_sync)
        .index_kind(args.index.into())
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("ERR {}", e);
                continue;
            }
        };

        let is_read = command.is_read();
        match engine.execute(command) {
            Ok(Some(value)) => {
                println!("{}", String::from_utf8_lossy(&value).trim_end_matches('\n'))
            }
            Ok(None) if is_read => println!("(nil)"),
            Ok(None) => println!("OK"),
            Err(e) => println!("ERR {}", e),
        }
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}

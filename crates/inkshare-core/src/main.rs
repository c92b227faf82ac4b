//! Command-line entry point for preparing snapshots offline.

use clap::{Parser, Subcommand};
use inkshare_core::{
    AssetResolver, Extraction, FileBlobStore, IdentityResolver, MAX_SNAPSHOT_BYTES,
    ShareAssetResolver, SizeGate, Snapshot, StoreDump, extract_snapshot,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "inkshare", version, about = "Prepare shareable InkShare snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prune a store dump into a shareable snapshot
    Extract {
        /// Store dump (JSON object of id -> record)
        dump: PathBuf,
        /// Upload inline and session assets into this directory
        #[arg(long)]
        blobs: Option<PathBuf>,
        /// URL the blob directory is served at
        #[arg(long, default_value = "http://localhost:3030/uploads")]
        public_url: String,
        /// Size ceiling in bytes
        #[arg(long, default_value_t = MAX_SNAPSHOT_BYTES)]
        max_bytes: usize,
        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the serialized size of a snapshot file
    Measure {
        snapshot: PathBuf,
        /// Size ceiling in bytes
        #[arg(long, default_value_t = MAX_SNAPSHOT_BYTES)]
        max_bytes: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Command::Extract {
            dump,
            blobs,
            public_url,
            max_bytes,
            output,
        } => {
            let dump: StoreDump = serde_json::from_str(&fs::read_to_string(&dump)?)?;
            let resolver: Box<dyn AssetResolver> = match blobs {
                Some(dir) => Box::new(ShareAssetResolver::new(Arc::new(FileBlobStore::new(
                    dir, public_url,
                )?))),
                None => Box::new(IdentityResolver),
            };
            let gate = SizeGate::new(max_bytes);

            match pollster::block_on(extract_snapshot(dump, resolver.as_ref(), &gate))? {
                Extraction::Accepted(snapshot) => {
                    let json = serde_json::to_string_pretty(&snapshot)?;
                    match output {
                        Some(path) => fs::write(path, json)?,
                        None => println!("{}", json),
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Extraction::Rejected { size } => {
                    eprintln!("snapshot too large: {} bytes (limit {})", size, max_bytes);
                    Ok(ExitCode::from(2))
                }
            }
        }
        Command::Measure {
            snapshot,
            max_bytes,
        } => {
            let snapshot: Snapshot = serde_json::from_str(&fs::read_to_string(&snapshot)?)?;
            match SizeGate::new(max_bytes).check(snapshot)? {
                Extraction::Accepted(snapshot) => {
                    println!("{} bytes, ok", SizeGate::measure(&snapshot)?);
                    Ok(ExitCode::SUCCESS)
                }
                Extraction::Rejected { size } => {
                    println!("{} bytes, over the {} byte limit", size, max_bytes);
                    Ok(ExitCode::from(2))
                }
            }
        }
    }
}

use clap::{Parser, Subcommand};
use ota_core::format::{format_file_size, format_upload_time};
use ota_core::{ArtifactMeta, ArtifactStore, DEFAULT_UPLOAD_DIR};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ota")]
#[command(about = "OTA firmware repository CLI")]
struct Cli {
    /// Artifact directory
    #[arg(long, global = true, env = "UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    upload_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored firmware, most recent first
    List,
    /// Store a firmware image
    Upload {
        /// Path to a .bin file
        path: PathBuf,
        /// Version label (defaults to v1.0.0)
        #[arg(long, default_value = "")]
        version: String,
    },
    /// Show one stored firmware image
    Info {
        /// Stored firmware filename
        id: String,
    },
    /// Write a stored firmware image to disk
    Get {
        /// Stored firmware filename
        id: String,
        /// Destination path (defaults to the filename in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete a stored firmware image
    Delete {
        /// Stored firmware filename
        id: String,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn describe(meta: &ArtifactMeta) -> String {
    format!(
        "{}  version: {}, size: {}, uploaded: {}",
        meta.id,
        meta.version,
        format_file_size(meta.size_bytes),
        format_upload_time(meta.uploaded_at_millis)
    )
}

fn list(store: &ArtifactStore) -> CliResult<()> {
    let artifacts = store.list()?;
    if artifacts.is_empty() {
        println!("No firmware found.");
        return Ok(());
    }
    for meta in artifacts {
        println!("{}", describe(&meta));
    }
    Ok(())
}

fn upload(store: &ArtifactStore, path: &Path, version: &str) -> CliResult<String> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("not a file path: {}", path.display()))?;
    let file = File::open(path)?;
    let meta = store.put(version, filename, file)?;
    Ok(meta.id.to_string())
}

fn get(store: &ArtifactStore, id: &str, output: Option<PathBuf>) -> CliResult<PathBuf> {
    let bytes = store.get(id)?;
    let output = output.unwrap_or_else(|| PathBuf::from(id));
    std::fs::write(&output, bytes)?;
    Ok(output)
}

fn run(cli: Cli) -> CliResult<()> {
    let Some(command) = cli.command else {
        println!("Use 'ota --help' for commands");
        return Ok(());
    };

    let store = ArtifactStore::open(&cli.upload_dir)?;
    match command {
        Commands::List => list(&store)?,
        Commands::Upload { path, version } => {
            let id = upload(&store, &path, &version)?;
            println!("Stored {} as {}", path.display(), id);
        }
        Commands::Info { id } => println!("{}", describe(&store.meta(&id)?)),
        Commands::Get { id, output } => {
            let output = get(&store, &id, output)?;
            println!("Wrote {} to {}", id, output.display());
        }
        Commands::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

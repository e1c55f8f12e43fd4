//! SBVJ CLI - Command-line tool for SBVJ01 save files
//!
//! This binary provides command-line interfaces for:
//! - info: print the header and a summary of the content
//! - dump: save file → JSON envelope
//! - pack: JSON envelope → save file
//! - verify: decode, re-encode and compare bytes
//! - diff: compare the content of two save files

use clap::{Parser, Subcommand};
use sbvj_format::constants::{FLAGS_LEN, FORMAT_LEN, FORMAT_SBVJ01};
use sbvj_io::{diff, read_save_file, write_save_file, Config, Header, SaveFile, Value};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sbvj")]
#[command(about = "SBVJ01 save file tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Decode strings that are not ASCII as UTF-8
    #[arg(long, global = true)]
    utf8: bool,
    /// Accept fixed layouts with more than one non-byte field
    #[arg(long, global = true)]
    byte_struct: bool,
    /// Write and read maps in canonical key order
    #[arg(long, global = true)]
    unordered_maps: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header and a summary of the content
    Info {
        /// Input save file
        input: PathBuf,
    },
    /// Dump a save file as a JSON envelope
    ///
    /// Examples:
    ///   sbvj dump hero.player
    ///   sbvj dump hero.player -o hero.json --compact
    Dump {
        /// Input save file
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit JSON on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Build a save file from a JSON envelope
    Pack {
        /// Input JSON envelope
        input: PathBuf,
        /// Output save file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check that a save file re-encodes to identical bytes
    Verify {
        /// Input save file
        input: PathBuf,
    },
    /// Compare the content of two save files
    Diff {
        /// Left save file
        a: PathBuf,
        /// Right save file
        b: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("format marker must be {FORMAT_LEN} bytes, got {0:?}")]
    FormatMarker(String),
}

/// JSON form of a save file
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(default = "default_format")]
    format: String,
    entity: String,
    #[serde(default)]
    flags: [u8; FLAGS_LEN],
    content: serde_json::Value,
}

fn default_format() -> String {
    String::from_utf8_lossy(&FORMAT_SBVJ01).into_owned()
}

impl Envelope {
    fn from_save(save: &SaveFile) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            format: save.header.format_lossy(),
            entity: save.header.entity.clone(),
            flags: save.header.flags,
            content: save.content.to_json()?,
        })
    }

    fn into_save(self) -> Result<SaveFile, Box<dyn Error>> {
        let format: [u8; FORMAT_LEN] = self
            .format
            .as_bytes()
            .try_into()
            .map_err(|_| CliError::FormatMarker(self.format.clone()))?;
        Ok(SaveFile {
            header: Header {
                format,
                entity: self.entity,
                flags: self.flags,
            },
            content: Value::from_json(&self.content)?,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = resolve_config(&cli);

    match cli.command {
        Commands::Info { input } => handle_info(&input, &config),
        Commands::Dump {
            input,
            output,
            compact,
        } => handle_dump(&input, output.as_deref(), compact, &config),
        Commands::Pack { input, output } => handle_pack(&input, &output, &config),
        Commands::Verify { input } => handle_verify(&input, &config),
        Commands::Diff { a, b } => handle_diff(&a, &b, &config),
    }
}

/// Environment first, then flags; a flag only ever switches its behaviour on
fn resolve_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if cli.utf8 {
        config = config.with_utf8_fallback(true);
    }
    if cli.byte_struct {
        config = config.with_tolerate_multi_byte_struct(true);
    }
    if cli.unordered_maps {
        config = config.with_preserve_map_order(false);
    }
    config
}

fn handle_info(input: &Path, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let save = read_save_file(input, config)?;
    let flags: Vec<String> = save
        .header
        .flags
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    println!("File: {}", input.display());
    println!("Format: {}", save.header.format_lossy());
    println!("Entity: {}", save.header.entity);
    println!("Flags: {}", flags.join(" "));
    match &save.content {
        Value::List(items) => println!("Content: list ({} items)", items.len()),
        Value::Map(map) => println!("Content: map ({} keys)", map.len()),
        other => println!("Content: {}", other.type_name()),
    }
    println!("Depth: {}", save.content.depth());
    Ok(ExitCode::SUCCESS)
}

fn handle_dump(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: &Config,
) -> Result<ExitCode, Box<dyn Error>> {
    let save = read_save_file(input, config)?;
    let envelope = Envelope::from_save(&save)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if compact {
        serde_json::to_writer(&mut writer, &envelope)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, &envelope)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn handle_pack(input: &Path, output: &Path, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let reader = BufReader::new(File::open(input)?);
    let envelope: Envelope = serde_json::from_reader(reader)?;
    let save = envelope.into_save()?;
    let written = write_save_file(output, &save, config)?;
    info!(entity = %save.header.entity, bytes = written, "packed save file");
    println!("Wrote {} bytes to {}", written, output.display());
    Ok(ExitCode::SUCCESS)
}

fn handle_verify(input: &Path, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let original = fs::read(input)?;
    let save = SaveFile::decode(&original, config)?;
    let encoded = save.encode(config)?;

    if encoded == original {
        println!("OK: {} bytes re-encode identically", original.len());
        return Ok(ExitCode::SUCCESS);
    }

    let first = original
        .iter()
        .zip(&encoded)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| original.len().min(encoded.len()));
    println!(
        "MISMATCH: first difference at offset {} ({} bytes read, {} bytes re-encoded)",
        first,
        original.len(),
        encoded.len()
    );
    Ok(ExitCode::FAILURE)
}

fn handle_diff(a: &Path, b: &Path, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let left = read_save_file(a, config)?;
    let right = read_save_file(b, config)?;

    let report = diff(&left.content, &right.content);
    println!("{report}");
    if report.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

//! charcard CLI - command-line tool for role-play character cards.
//!
//! This is the main entry point for the charcard command-line application.

mod library;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use charcard::prelude::*;

use crate::library::Library;

/// charcard - character card import and embedding tool
#[derive(Parser)]
#[command(name = "charcard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the character from a card file and print it as JSON
    Extract {
        /// Card file (PNG or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List the chunks and tEXt candidates of an image
    Inspect {
        /// Image file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Embed a character into a PNG
    Embed {
        /// Base PNG image
        #[arg(short, long)]
        input: PathBuf,

        /// Card to embed (JSON or another card PNG)
        #[arg(short, long)]
        card: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// tEXt keyword
        #[arg(short, long, default_value = DEFAULT_KEYWORD)]
        keyword: String,

        /// Store the JSON base64-encoded, as other card tools do
        #[arg(long)]
        base64: bool,
    },

    /// Import card files or directories into a library
    Import {
        /// Library file
        #[arg(short, long, env = "CHARCARD_LIBRARY")]
        library: PathBuf,

        /// Card files or directories to search
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Replace the world book of a library
    WorldBook {
        /// Library file
        #[arg(short, long, env = "CHARCARD_LIBRARY")]
        library: PathBuf,

        /// World book JSON export
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the characters in a library
    List {
        /// Library file
        #[arg(short, long, env = "CHARCARD_LIBRARY")]
        library: PathBuf,
    },
}

/// Extraction settings shared by several commands.
#[derive(clap::Args)]
struct ScanArgs {
    /// How to treat tEXt hits that fail to decode
    #[arg(long, value_enum, default_value_t = ScanMode::Resilient)]
    scan: ScanMode,

    /// Only accept tEXt chunks with this keyword
    #[arg(long)]
    require_keyword: Option<String>,

    /// Also accept base64 payloads and fields nested under `data`
    #[arg(long)]
    lenient: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScanMode {
    /// Use the first hit and report its error
    First,
    /// Skip undecodable hits and keep scanning
    Resilient,
}

impl ScanArgs {
    fn options(&self) -> ExtractOptions {
        let strategy = match self.scan {
            ScanMode::First => ScanStrategy::FirstMatch,
            ScanMode::Resilient => ScanStrategy::Resilient,
        };
        let mode = if self.lenient {
            PayloadMode::Lenient
        } else {
            PayloadMode::Strict
        };
        let options = ExtractOptions::default()
            .with_strategy(strategy)
            .with_mode(mode);
        match &self.require_keyword {
            Some(keyword) => options.require_keyword(keyword.clone()),
            None => options,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            input,
            output,
            scan,
        } => {
            cmd_extract(&input, output.as_deref(), &scan.options())?;
        }
        Commands::Inspect { input } => {
            cmd_inspect(&input)?;
        }
        Commands::Embed {
            input,
            card,
            output,
            keyword,
            base64,
        } => {
            cmd_embed(&input, &card, &output, &keyword, base64)?;
        }
        Commands::Import {
            library,
            inputs,
            scan,
        } => {
            cmd_import(&library, &inputs, &scan.options())?;
        }
        Commands::WorldBook { library, input } => {
            cmd_world_book(&library, &input)?;
        }
        Commands::List { library } => {
            cmd_list(&library)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_extract(input: &Path, output: Option<&Path>, options: &ExtractOptions) -> Result<()> {
    let record = import_file(input, options)
        .with_context(|| format!("Failed to extract character from {}", input.display()))?;
    let json = serde_json::to_string_pretty(&record)?;

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            eprintln!("Extracted {} -> {}", record.name(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    println!("{}: {} bytes", input.display(), data.len());

    if is_png(&data) {
        println!("{:>10} {:>10}  {:<4}  crc", "offset", "length", "tag");

        for chunk in Chunks::new(&data)? {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    println!("Chunk walk stopped: {}", e);
                    break;
                }
            };

            println!(
                "{:>10} {:>10}  {:<4}  {}",
                chunk.offset,
                chunk.length(),
                chunk.tag.to_string(),
                if chunk.crc_valid() { "ok" } else { "BAD" }
            );

            if chunk.tag == ChunkTag::IHDR {
                if let Ok(ihdr) = Ihdr::parse(chunk.data) {
                    println!(
                        "{:>23}  {}x{}, depth {}, color type {}",
                        "",
                        ihdr.width(),
                        ihdr.height(),
                        ihdr.bit_depth,
                        ihdr.color_type
                    );
                }
            }
            if let Some(text) = chunk.as_text() {
                println!(
                    "{:>23}  keyword {:?}, {} bytes of text",
                    "",
                    text.keyword_lossy().unwrap_or_default(),
                    text.text.len()
                );
            }
        }
    } else {
        println!("Not a PNG, only scanning for tags");
    }

    println!("\ntEXt candidates:");
    let mut count = 0;
    for candidate in TagScanner::text(&data) {
        let status = match candidate.data() {
            Ok(_) => "fits".to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            "  tag at {:>10}, declared length {:>10}: {}",
            candidate.tag_offset, candidate.declared_length, status
        );
        count += 1;
    }
    println!("Total: {} candidates", count);

    Ok(())
}

fn cmd_embed(input: &Path, card: &Path, output: &Path, keyword: &str, base64: bool) -> Result<()> {
    println!("Embedding: {} + {} -> {}", input.display(), card.display(), output.display());

    let png = fs::read(input).context("Failed to read base image")?;
    let card_options = ExtractOptions::default().with_mode(PayloadMode::Lenient);
    let record = import_file(card, &card_options).context("Failed to read card")?;

    let encoding = if base64 {
        PayloadEncoding::Base64
    } else {
        PayloadEncoding::Raw
    };
    let embedded =
        embed_record(&png, &record, keyword, encoding).context("Failed to embed character")?;
    fs::write(output, embedded).context("Failed to write output file")?;

    println!("Embedded {} under keyword {:?}", record.name(), keyword);

    Ok(())
}

fn cmd_import(library_path: &Path, inputs: &[PathBuf], options: &ExtractOptions) -> Result<()> {
    let files = collect_card_files(inputs);
    if files.is_empty() {
        anyhow::bail!("No card files found");
    }

    let mut library = Library::load(library_path)?;
    println!("Importing {} files into {}...", files.len(), library_path.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = import_file(path, options);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut imported = 0;
    let mut errors = 0;
    for (path, result) in results {
        match result {
            Ok(record) => {
                let entry = library.add(record, SystemTime::now());
                println!("  {} {} ({})", entry.avatar, entry.name, entry.id);
                imported += 1;
            }
            Err(e) => {
                debug!(path = %path.display(), error = ?e, "import failed");
                eprintln!("Error importing {}: {}", path.display(), e);
                errors += 1;
            }
        }
    }

    if imported == 0 {
        anyhow::bail!("No characters imported ({} errors)", errors);
    }

    library.save(library_path)?;
    println!(
        "Imported {} characters in {:?} ({} errors)",
        imported,
        start.elapsed(),
        errors
    );

    Ok(())
}

/// Expand directories into the card files they contain. Explicit files are
/// kept regardless of extension.
fn collect_card_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        for entry in WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && CardSource::from_path(entry.path()).is_ok() {
                debug!(path = %entry.path().display(), "found card file");
                files.push(entry.into_path());
            }
        }
    }

    files
}

fn cmd_world_book(library_path: &Path, input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read world book")?;
    let book = WorldBook::from_json(&data).context("Failed to parse world book")?;
    let count = book.len();

    let mut library = Library::load(library_path)?;
    library.set_world_book(book);
    library.save(library_path)?;

    println!("World book imported: {} entries", count);

    Ok(())
}

fn cmd_list(library_path: &Path) -> Result<()> {
    let library = Library::load(library_path)?;

    for character in &library.characters {
        println!(
            "{:<24} {} {:<20} {}",
            character.id, character.avatar, character.name, character.description
        );
    }

    println!(
        "\nTotal: {} characters, {} world book entries",
        library.characters.len(),
        library.world_book.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args_options() {
        let cli = Cli::parse_from([
            "charcard",
            "extract",
            "-i",
            "card.png",
            "--scan",
            "first",
            "--require-keyword",
            "chara",
            "--lenient",
        ]);
        let Commands::Extract { scan, .. } = cli.command else {
            panic!("expected extract command");
        };
        let options = scan.options();
        assert_eq!(options.strategy, ScanStrategy::FirstMatch);
        assert_eq!(options.keyword, KeywordPolicy::Require("chara".to_string()));
        assert_eq!(options.mode, PayloadMode::Lenient);
    }

    #[test]
    fn test_scan_args_default_strict() {
        let cli = Cli::parse_from(["charcard", "import", "-l", "lib.json", "cards"]);
        let Commands::Import { scan, .. } = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(scan.options(), ExtractOptions::default());
    }

    #[test]
    fn test_collect_card_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.json"), b"{}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        let explicit = dir.path().join("explicit.bin");

        let files = collect_card_files(&[dir.path().to_path_buf(), explicit.clone()]);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.png", "explicit.bin"]);
    }
}

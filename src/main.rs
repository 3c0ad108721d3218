//! rfpdeck CLI - RFP summaries and custom decks as PowerPoint files
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rfpdeck::{config, deck, form, pptx, rfp, DeckConfig, RfpReport, Settings};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rfpdeck")]
#[command(author, version, about = "Turn RFPs and section plans into PowerPoint decks", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise an RFP PDF and generate a response deck
    Rfp {
        /// RFP document (.pdf)
        pdf: PathBuf,
        /// Output file (default: Generated_RFP_Presentation.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Sentences kept per section
        #[arg(short, long)]
        sentences: Option<usize>,
        /// Show the extracted text and exit
        #[arg(long)]
        raw: bool,
        /// Print the extracted sections and summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a custom deck from sections
    Build {
        /// Deck plan in TOML (default: built-in sections)
        #[arg(short, long)]
        plan: Option<PathBuf>,
        /// Edit the plan field by field before building
        #[arg(short, long)]
        interactive: bool,
        /// Output file (default: Custom_Presentation.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save the final plan to this file
        #[arg(long)]
        save_plan: Option<PathBuf>,
    },
    /// Print the built-in deck plan and RFP sections
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let settings = Settings::load().context("failed to load rfpdeck.toml")?;

    match cli.command {
        Commands::Rfp {
            pdf,
            output,
            sentences,
            raw,
            json,
        } => {
            if raw {
                let text = rfpdeck::pdf::extract_text_from_path(&pdf)
                    .with_context(|| format!("failed to extract text from {}", pdf.display()))?;
                println!("{}", text);
                println!("\n--- Extracted {} characters ---", text.len());
                return Ok(());
            }

            let bytes = std::fs::read(&pdf)
                .with_context(|| format!("failed to read {}", pdf.display()))?;
            let max_sentences = sentences.unwrap_or(settings.summary.max_sentences);
            let report = RfpReport::from_pdf(&bytes, &settings.markers(), max_sentences)
                .with_context(|| format!("failed to extract text from {}", pdf.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            let path = output.unwrap_or_else(|| settings.output_path(rfp::OUTPUT_FILENAME));
            write_deck(&report.to_deck(), &path)?;
        }
        Commands::Build {
            plan,
            interactive,
            output,
            save_plan,
        } => {
            let mut deck_config = match &plan {
                Some(path) => config::load_plan(path)
                    .with_context(|| format!("failed to load plan {}", path.display()))?,
                None => DeckConfig::default(),
            };

            if interactive {
                deck_config = match form::prompt_deck(&deck_config) {
                    Err(form::FormError::Cancelled) => {
                        println!("Cancelled, nothing written.");
                        return Ok(());
                    }
                    other => other?,
                };
            }

            if let Some(path) = save_plan {
                std::fs::write(&path, config::plan_to_toml(&deck_config)?)
                    .with_context(|| format!("failed to write plan {}", path.display()))?;
                println!("Plan saved to {}", path.display());
            }

            let path = output.unwrap_or_else(|| settings.output_path(deck::OUTPUT_FILENAME));
            let deck = deck::assemble(deck_config)?;
            write_deck(&deck, &path)?;
        }
        Commands::Defaults => {
            // Plain TOML so the output can be redirected into a plan file
            println!("# RFP sections:");
            for marker in settings.markers() {
                println!("#   {} (keyword: \"{}\")", marker.name, marker.keyword);
            }
            println!();
            print!("{}", config::plan_to_toml(&DeckConfig::default())?);
        }
    }

    Ok(())
}

/// Print extracted sections and their summaries
fn print_report(report: &RfpReport) {
    println!("{}", "Extracted key details".bold().underline());
    for (name, content) in report.details.iter() {
        if content.is_empty() {
            println!("{} {}", format!("{name}:").bold(), "(not found)".dimmed());
        } else {
            println!("{} {}", format!("{name}:").bold(), content.trim());
        }
    }

    println!("\n{}", "Summaries".bold().underline());
    for section in &report.summaries {
        println!("{}", section.name.cyan().bold());
        if section.is_empty() {
            println!("  {}", "(empty)".dimmed());
        } else {
            println!("  {}", section.summary);
        }
    }
    println!();
}

fn write_deck(deck: &rfpdeck::Deck, path: &Path) -> Result<()> {
    let size = pptx::write_to_path(deck, path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "{} {} ({} slides, {} bytes, {})",
        "Saved".green().bold(),
        path.display(),
        deck.len(),
        size,
        pptx::PPTX_MIME
    );
    Ok(())
}

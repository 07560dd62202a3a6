//! Biblentry CLI - annotate a styled reference from the command line

mod io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use biblentry_core::{Annotator, MarkupDocument, Selection, Surface};

#[derive(Parser, Debug)]
#[command(name = "biblentry")]
#[command(about = "Tag the parts of a bibliographic reference with TEI spans", long_about = None)]
#[command(version)]
struct Cli {
    /// Markup fragment holding the styled reference
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Engine settings (default: ./biblentry.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wrap a character range in a category span and print the markup
    Apply {
        /// Category id (author, editor, titlearticle, titlemonograph, date)
        category: String,

        #[arg(long)]
        start: usize,

        #[arg(long)]
        end: usize,
    },

    /// Remove the tagged element around a caret and print the markup
    Unmark {
        #[arg(long)]
        at: usize,
    },

    /// List the categories surrounding a caret or range
    Classify {
        #[arg(long)]
        at: usize,

        /// Other end of the range (default: a caret at --at)
        #[arg(long)]
        end: Option<usize>,
    },

    /// Print every tagged span as JSON
    Spans,

    /// Print the bibliographic entry as JSON
    Entry,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = io::load_config(cli.config.as_deref())?;
    let doc = io::load_file(&cli.file)?;
    let mut annotator = Annotator::with_config(doc, config);

    run(&mut annotator, cli.command)
}

fn run(annotator: &mut Annotator<MarkupDocument>, command: Commands) -> Result<()> {
    match command {
        Commands::Apply {
            category,
            start,
            end,
        } => {
            annotator
                .surface_mut()
                .set_selection(Selection::new(start, end));
            annotator
                .apply_tag(&category)
                .with_context(|| format!("Cannot apply {} to {}..{}", category, start, end))?;
            print_markup(annotator)
        }
        Commands::Unmark { at } => {
            annotator.surface_mut().set_selection(Selection::caret(at));
            annotator.unmark_ancestor();
            print_markup(annotator)
        }
        Commands::Classify { at, end } => {
            annotator
                .surface_mut()
                .set_selection(Selection::new(at, end.unwrap_or(at)));
            for category in annotator.classify_at_selection() {
                println!("{}", category.id);
            }
            Ok(())
        }
        Commands::Spans => {
            let json = serde_json::to_string_pretty(&annotator.spans())
                .context("Failed to serialize spans")?;
            println!("{}", json);
            Ok(())
        }
        Commands::Entry => {
            println!("{}", biblentry_core::to_json(annotator)?);
            Ok(())
        }
    }
}

fn print_markup(annotator: &Annotator<MarkupDocument>) -> Result<()> {
    let markup = annotator
        .surface()
        .to_markup()
        .context("Failed to serialize markup")?;
    println!("{}", markup);
    Ok(())
}

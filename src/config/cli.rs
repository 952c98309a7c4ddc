use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "mpl-slides")]
#[command(about = "Render the scores-by-group chart and build slide decks from percent notebooks")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Optional TOML file with figure and deck settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the chart to a PNG or SVG file
    Render {
        /// Take the chart from this notebook instead of the built-in data
        #[arg(short, long)]
        notebook: Option<PathBuf>,

        /// Output file; the extension picks the format
        #[arg(short, long, default_value = "scores.png")]
        output: PathBuf,

        /// Open the written file with the system viewer
        #[arg(long)]
        open: bool,
    },

    /// Show the chart in an interactive window
    Show {
        #[arg(short, long)]
        notebook: Option<PathBuf>,
    },

    /// Print notebook metadata and cells as JSON
    Inspect {
        #[arg(short, long)]
        notebook: PathBuf,
    },

    /// Build a PPTX deck from a notebook
    Deck {
        #[arg(short, long)]
        notebook: PathBuf,

        #[arg(short, long, default_value = "slides.pptx")]
        output: PathBuf,

        #[arg(long)]
        open: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_defaults() {
        let cli = Cli::try_parse_from(["mpl-slides", "render"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Command::Render {
                notebook,
                output,
                open,
            } => {
                assert!(notebook.is_none());
                assert_eq!(output, PathBuf::from("scores.png"));
                assert!(!open);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_deck_with_global_flags() {
        let cli = Cli::try_parse_from([
            "mpl-slides",
            "deck",
            "--notebook",
            "talk.py",
            "-o",
            "talk.pptx",
            "-v",
            "--config",
            "slides.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("slides.toml")));
        assert!(matches!(cli.command, Command::Deck { .. }));
    }

    #[test]
    fn test_inspect_requires_notebook() {
        assert!(Cli::try_parse_from(["mpl-slides", "inspect"]).is_err());
    }
}

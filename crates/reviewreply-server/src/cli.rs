use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewreply")]
#[command(
    author,
    version,
    about = "Customer review sentiment analysis with automatic replies"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Configuration file path (defaults to ./reviewreply.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address
        #[arg(long)]
        host: Option<String>,

        /// Listen port
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Try the generative model before falling back to templates
        #[arg(
            long,
            env = "ENABLE_AI_MODEL",
            num_args = 0..=1,
            default_missing_value = "true",
            value_parser = clap::builder::BoolishValueParser::new()
        )]
        enable_ai_model: Option<bool>,

        /// Expose the text debugging endpoint
        #[arg(long)]
        debug: bool,
    },

    /// Analyse a single review and print the result as JSON
    Analyse {
        /// Review text
        text: String,

        /// Optional 1-5 star rating
        #[arg(short, long)]
        rating: Option<i64>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Smoke-test a running deployment
    Check {
        /// Base URL of the deployment
        #[arg(short, long, default_value = "http://127.0.0.1:8000")]
        target: String,
    },

    /// Review dataset tooling
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// Write the built-in synthetic review dataset
    Synth {
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Build prompt/reply training pairs from a review dataset
    Prepare {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        /// Also write the `<|endoftext|>` separated text format
        #[arg(long)]
        text_out: Option<PathBuf>,
    },

    /// Print dataset statistics
    Stats {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Measure keyword classifier accuracy against rating-derived labels
    Evaluate {
        #[arg(short, long)]
        input: PathBuf,
    },
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search phrases by meaning and by keywords
    Search {
        /// Free-text query
        query: String,

        /// Rows considered by semantic search before deduplication
        #[clap(short = 'k', long)]
        top_k: Option<usize>,

        /// Minimum cosine similarity [0.0, 1.0]
        #[clap(short, long)]
        threshold: Option<f32>,

        /// Topic key, may be repeated
        #[clap(long = "topic")]
        topics: Vec<String>,

        /// Search only rows tagged with a selected topic
        #[clap(long, default_value = "false")]
        only_in_topics: bool,

        /// Drop results not tagged with a selected topic
        #[clap(long, default_value = "false")]
        filter_results: bool,
    },
    /// List known topics
    Topics {},
    /// Show every phrase tagged with the selected topics
    Browse {
        /// Topic key, may be repeated
        #[clap(long = "topic", required = true)]
        topics: Vec<String>,
    },
    /// Print every literal phrase a template expands to
    Expand {
        #[clap(allow_hyphen_values = true)]
        template: String,
    },
    /// Print the unused-topic and yes/no interpretation lists
    Reference {},
}

use clap::{ArgGroup, Parser, Subcommand};
use palimpsest::artifact::ArtifactKind;
use palimpsest::directive::{ArtifactLength, ReadingLevel};
use std::path::PathBuf;

/// `palimpsest` - versioned artifacts rewritten by an LLM, one directive at a time.
#[derive(Parser, Debug)]
#[command(name = "palimpsest")]
#[command(version)]
#[command(about = "Rewrite versioned artifacts with an LLM.", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new artifact from text or a file
    #[command(group(ArgGroup::new("source").required(true).args(["content", "file"])))]
    New {
        /// Title of the artifact
        #[arg(long)]
        title: String,

        /// Artifact kind (text, code)
        #[arg(long, default_value = "text")]
        kind: ArtifactKind,

        /// Programming language, for code artifacts
        #[arg(long)]
        language: Option<String>,

        /// Initial content
        #[arg(long)]
        content: Option<String>,

        /// Read initial content from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Apply one rewrite directive and store the result as a new version
    Rewrite {
        /// Artifact id
        id: String,

        /// Assistant whose reflections shape the rewrite
        #[arg(long)]
        assistant_id: String,

        /// Translate into this language
        #[arg(long)]
        language: Option<String>,

        /// Target reading level (child, teenager, college, phd, pirate)
        #[arg(long)]
        reading_level: Option<ReadingLevel>,

        /// Target length (shortest, short, long, longest)
        #[arg(long)]
        length: Option<ArtifactLength>,

        /// Sprinkle emojis through the artifact
        #[arg(long)]
        emojis: bool,
    },

    /// Print one version of an artifact (the current one by default)
    Show {
        /// Artifact id
        id: String,

        /// Version index to print
        #[arg(long)]
        version: Option<usize>,

        /// Print the version as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every version of an artifact
    History {
        /// Artifact id
        id: String,
    },

    /// List stored artifacts
    List,

    /// Inspect or edit an assistant's reflections
    Reflections {
        #[command(subcommand)]
        reflection_command: ReflectionCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReflectionCommands {
    /// Print the stored reflections
    Show {
        #[arg(long)]
        assistant_id: String,
    },

    /// Store reflections; given lists replace the stored ones
    Set {
        #[arg(long)]
        assistant_id: String,

        /// Style guideline (repeatable)
        #[arg(long = "style")]
        styles: Vec<String>,

        /// Fact about the user (repeatable)
        #[arg(long = "fact")]
        facts: Vec<String>,
    },

    /// Delete the stored reflections
    Clear {
        #[arg(long)]
        assistant_id: String,
    },
}

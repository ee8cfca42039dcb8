//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{Mode, NodeId};

/// Browse a hierarchical budget and redistribute sibling allocations
#[derive(Parser, Debug)]
#[command(name = "budgetctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Budget service URL (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::Url)]
    pub server: Option<String>,

    /// Additional config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one level: breadcrumbs, legend and stats
    Show {
        /// Parent category (default: configured root)
        #[arg(short, long)]
        parent: Option<NodeId>,
    },

    /// Print the category tree
    Tree {
        /// Root of the printed tree (default: configured root)
        parent: Option<NodeId>,
        /// Number of levels below the root
        #[arg(short = 'L', long, default_value_t = 2)]
        depth: usize,
    },

    /// Show participation stats
    Stats,

    /// Redistribute allocations offline and print the result
    Adjust {
        /// Position of the edited allocation
        #[arg(short, long)]
        index: usize,
        /// New value for that position (clamped to 0..=100)
        #[arg(short, long, allow_negative_numbers = true)]
        value: f64,
        /// Current allocations of the sibling group, in order
        #[arg(required = true, num_args = 2..)]
        allocations: Vec<f64>,
    },

    /// Interactive session: navigate, log in, edit and save
    Shell,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

/// Mode as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    View,
    Edit,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::View => Mode::View,
            ModeArg::Edit => Mode::Edit,
        }
    }
}

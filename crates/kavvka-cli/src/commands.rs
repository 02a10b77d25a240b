use clap::{Args, Parser, Subcommand};
use kavvka_core::config::{AppConfig, CompareRoot, PartitionRoot, SiblingFilter};

#[derive(Debug, Parser)]
#[command(name = "kavvka")]
#[command(about = "Quarantine sibling folders next to a marked folder for duplicate comparison", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Partition the given paths and print their descriptors
    Process(ProcessArgs),
    /// Show what `process` would move without touching anything
    Plan(ProcessArgs),
    /// Prompt for paths, then process them
    Interactive,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProcessArgs {
    /// Paths to process; read from stdin (one per line) when omitted
    pub paths: Vec<String>,

    /// Move folders without asking for confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Review selections and confirm moves at the terminal
    #[arg(short = 'i', long, conflicts_with = "non_interactive")]
    pub interactive: bool,

    /// Accept the default selections without prompting
    #[arg(short = 'n', long)]
    pub non_interactive: bool,

    /// Write the descriptors to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write a JSON batch report to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Write the companion text block (JSON) to this file
    #[arg(long)]
    pub companion: Option<String>,

    /// Reconciliation command to apply before prompting, e.g. "1 2" (repeatable)
    #[arg(long = "select", value_name = "PATH_NO FOLDER_NO")]
    pub select: Vec<String>,

    #[arg(long)]
    pub sibling_filter: Option<SiblingFilter>,

    #[arg(long)]
    pub partition_root: Option<PartitionRoot>,

    #[arg(long)]
    pub compare_root: Option<CompareRoot>,
}

impl ProcessArgs {
    /// CLI flags win over file and environment configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if self.force {
            config.force = true;
        }
        if self.interactive {
            config.interactive = true;
        }
        if self.non_interactive {
            config.interactive = false;
        }
        if let Some(output) = &self.output {
            config.output_path = Some(output.clone());
        }
        if let Some(report) = &self.report {
            config.report_path = Some(report.clone());
        }
        if let Some(companion) = &self.companion {
            config.companion_path = Some(companion.clone());
        }
        if let Some(filter) = self.sibling_filter {
            config.sibling_filter = filter;
        }
        if let Some(root) = self.partition_root {
            config.partition_root = root;
        }
        if let Some(root) = self.compare_root {
            config.compare_root = root;
        }
    }
}

impl Commands {
    /// Effective configuration for this command: file and environment
    /// values, then command-line flags. The `interactive` command always
    /// prompts.
    pub fn configure(&self, mut config: AppConfig) -> AppConfig {
        match self {
            Commands::Process(args) | Commands::Plan(args) => args.apply_to(&mut config),
            Commands::Interactive => config.interactive = true,
            Commands::PrintConfig => {}
        }
        config
    }
}

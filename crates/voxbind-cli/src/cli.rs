use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use voxbind::engine::config::{NegativeCount, Split};

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "voxbind",
    author = "VoxBind Developers",
    version,
    about = "VoxBind CLI - Extract protein-ligand structures, generate reproducible binding examples and voxelize them for classifier training.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads for extraction and generation.
    /// Overrides `generation.worker-count`; defaults to the number of logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse raw structure files into per-molecule feature matrices split into train/test.
    Extract(ExtractArgs),
    /// Generate positive and sampled negative examples from extracted matrices.
    Generate(GenerateArgs),
    /// Stream persisted examples through the voxelizer and report grid occupancy.
    Inspect(InspectArgs),
}

/// Configuration sources shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S generation.seed=42
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Folder of raw `{id}_pro_cg.pdb` / `{id}_lig_cg.pdb` structure files.
    #[arg(long = "original", value_name = "DIR")]
    pub original_data_folder: Option<PathBuf>,

    /// Destination root; recreated with `train/` and `test/` sub-folders.
    #[arg(long = "extracted", value_name = "DIR")]
    pub extracted_data_folder: Option<PathBuf>,

    /// Atom type treated as hydrophobic. Can be used multiple times.
    #[arg(long = "hydrophobic-type", value_name = "TYPE")]
    pub hydrophobic_types: Vec<String>,

    /// Systems whose leading index is below this value go to the training split.
    #[arg(long, value_name = "INT")]
    pub split_index: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitSelection {
    Train,
    Test,
    #[default]
    All,
}

impl SplitSelection {
    pub fn splits(self) -> &'static [Split] {
        match self {
            SplitSelection::Train => &[Split::Train],
            SplitSelection::Test => &[Split::Test],
            SplitSelection::All => &Split::ALL,
        }
    }
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Extraction root holding `train/` and `test/`.
    #[arg(long = "extracted", value_name = "DIR")]
    pub extracted_data_folder: Option<PathBuf>,

    /// Examples root; each generated split folder under it is recreated.
    #[arg(long = "examples", value_name = "DIR")]
    pub examples_folder: Option<PathBuf>,

    /// Which split(s) to generate.
    #[arg(long, value_enum, default_value_t = SplitSelection::All)]
    pub split: SplitSelection,

    /// Negative examples per positive example, or "max" for every other system.
    #[arg(short = 'n', long, value_name = "INT|max")]
    pub neg_per_pos: Option<NegativeCount>,

    /// Seed for negative sampling.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Folder of persisted examples (`{protein}_{ligand}.csv`).
    #[arg(required = true, value_name = "DIR")]
    pub examples_dir: PathBuf,

    /// Side length of the voxel grid.
    #[arg(short, long, value_name = "INT")]
    pub resolution: Option<usize>,

    /// Only inspect positive examples.
    #[arg(long)]
    pub positives_only: bool,

    /// Inspect at most this many examples.
    #[arg(long, value_name = "INT")]
    pub limit: Option<usize>,
}

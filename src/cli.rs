//! CLI argument parsing for the layer toolkit.
//!
//! The CLI is intentionally thin: it reads layer files, calls the library,
//! and writes layer files. All merge and coloring semantics live in the
//! library so they can be reused without the binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Root CLI entrypoint for the layer toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "navlayers",
    version,
    about = "Build, transform, and merge ATT&CK Navigator layers",
    after_help = "Examples:\n  navlayers merge -i oilrig.json -i muddywater.json -o union.json\n  navlayers merge --strategy heatmap -i a.json -i b.json -i c.json -o heatmap.json\n  navlayers transform -i layer.json -o clean.json --disable-deselected --drop-comments\n  navlayers summarize -i layer.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Merge(MergeArgs),
    Transform(TransformArgs),
    Summarize(SummarizeArgs),
}

/// How to combine the input layers.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    Union,
    Intersection,
    LeftDiff,
    RightDiff,
    SymmetricDiff,
    Heatmap,
}

/// Merge command inputs.
#[derive(Parser, Debug)]
#[command(about = "Merge input layers into a new layer")]
pub struct MergeArgs {
    /// Paths to input layers (binary strategies take exactly two)
    #[arg(long = "input", short = 'i', value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path to the output layer
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Merge strategy
    #[arg(long, value_enum, default_value = "union")]
    pub strategy: MergeStrategy,

    /// Color for union results (hex or named)
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,
}

/// Transform command inputs: post-processing flags over a single layer.
#[derive(Parser, Debug)]
#[command(about = "Apply post-processing steps to a layer")]
pub struct TransformArgs {
    /// Path to the input layer
    #[arg(long = "input", short = 'i', value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the output layer
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Paint every enabled technique this color (hex or named)
    #[arg(long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Disable techniques that carry no score or color
    #[arg(long)]
    pub disable_deselected: bool,

    /// Hide disabled techniques in the Navigator
    #[arg(long)]
    pub hide_disabled: bool,

    /// Show subtechnique rows
    #[arg(long, conflicts_with = "hide_subtechniques")]
    pub show_subtechniques: bool,

    /// Hide subtechnique rows
    #[arg(long)]
    pub hide_subtechniques: bool,

    /// Clear every technique score
    #[arg(long)]
    pub reset_scores: bool,

    /// Strip technique comments
    #[arg(long)]
    pub drop_comments: bool,
}

/// Summarize command inputs.
#[derive(Parser, Debug)]
#[command(about = "Print a JSON summary of a layer")]
pub struct SummarizeArgs {
    /// Path to the input layer
    #[arg(long = "input", short = 'i', value_name = "PATH")]
    pub input: PathBuf,
}

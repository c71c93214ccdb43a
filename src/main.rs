use anyhow::{bail, Result};
use clap::Parser;
use navigator_layers::algebra::{self, DiffKind};
use navigator_layers::codec::{read_layer_file, write_layer_file};
use navigator_layers::config::{apply_layer_config, LayerConfig};
use navigator_layers::layer::Layer;
use navigator_layers::scheme::{
    ColorScheme, DiffColorScheme, GradientColorScheme, IntersectionColorScheme,
    SingleColorScheme,
};
use navigator_layers::summary::summarize;

mod cli;
use cli::{Command, MergeArgs, MergeStrategy, RootArgs, SummarizeArgs, TransformArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Merge(args) => cmd_merge(args),
        Command::Transform(args) => cmd_transform(args),
        Command::Summarize(args) => cmd_summarize(args),
    }
}

fn cmd_merge(args: MergeArgs) -> Result<()> {
    let layers = args
        .inputs
        .iter()
        .map(|path| read_layer_file(path))
        .collect::<Result<Vec<Layer>>>()?;

    let merged = match args.strategy {
        MergeStrategy::Union => {
            let (a, b) = binary_operands(&layers, "union")?;
            let scheme = match &args.color {
                Some(color) => SingleColorScheme::new(color.clone()),
                None => SingleColorScheme::default(),
            };
            algebra::union(a, b, &scheme)?
        }
        MergeStrategy::Intersection => {
            let (a, b) = binary_operands(&layers, "intersection")?;
            algebra::intersection(a, b, &IntersectionColorScheme::default())?
        }
        MergeStrategy::LeftDiff => {
            let (a, b) = binary_operands(&layers, "left-diff")?;
            algebra::diff(a, b, DiffKind::Left, &DiffColorScheme::default())?
        }
        MergeStrategy::RightDiff => {
            let (a, b) = binary_operands(&layers, "right-diff")?;
            algebra::diff(a, b, DiffKind::Right, &DiffColorScheme::default())?
        }
        MergeStrategy::SymmetricDiff => {
            let (a, b) = binary_operands(&layers, "symmetric-diff")?;
            algebra::diff(a, b, DiffKind::Symmetric, &DiffColorScheme::default())?
        }
        MergeStrategy::Heatmap => algebra::heatmap(&layers, &GradientColorScheme::default())?,
    };

    write_layer_file(&args.output, &merged)?;
    println!(
        "Wrote {} ({} techniques) to {}",
        merged.name,
        merged.techniques.len(),
        args.output.display()
    );
    Ok(())
}

fn binary_operands<'a>(layers: &'a [Layer], strategy: &str) -> Result<(&'a Layer, &'a Layer)> {
    match layers {
        [a, b] => Ok((a, b)),
        _ => bail!(
            "{strategy} requires exactly two input layers - got {}",
            layers.len()
        ),
    }
}

fn cmd_transform(args: TransformArgs) -> Result<()> {
    let mut layer = read_layer_file(&args.input)?;

    let show_subtechniques = if args.show_subtechniques {
        Some(true)
    } else if args.hide_subtechniques {
        Some(false)
    } else {
        None
    };
    let config = LayerConfig {
        color_scheme: args
            .color
            .as_ref()
            .map(|color| ColorScheme::Single(SingleColorScheme::new(color.clone()))),
        disable_deselected_techniques: args.disable_deselected,
        hide_disabled_techniques: args.hide_disabled,
        show_subtechniques,
        reset_technique_scores: args.reset_scores,
        drop_comments: args.drop_comments,
    };
    apply_layer_config(&mut layer, &config)?;

    write_layer_file(&args.output, &layer)?;
    println!("Wrote {} to {}", layer.name, args.output.display());
    Ok(())
}

fn cmd_summarize(args: SummarizeArgs) -> Result<()> {
    let layer = read_layer_file(&args.input)?;
    let summary = summarize(&layer)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

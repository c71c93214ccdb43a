//! Set operations across layers: union, intersection, diffs, and heatmaps.
//!
//! Every operation derives membership from the selection predicate, requires
//! operands to share a domain, and builds a fresh result layer; operands are
//! never mutated. Result rows are ordered by technique id so merges are
//! deterministic.

use crate::color;
use crate::error::{LayerError, Result};
use crate::layer::{Gradient, Layer, LegendItem, Technique};
use crate::scheme::{
    DiffColorScheme, GradientColorScheme, IntersectionColorScheme, SingleColorScheme,
};
use std::collections::{BTreeMap, BTreeSet};

/// Which side of a diff survives into the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Left,
    Right,
    Symmetric,
}

impl DiffKind {
    fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Left => "left_diff",
            DiffKind::Right => "right_diff",
            DiffKind::Symmetric => "symmetric_diff",
        }
    }
}

/// Union of two layers: a technique is enabled iff it is selected in either
/// operand, and every enabled row receives the scheme's single color.
pub fn union(a: &Layer, b: &Layer, scheme: &SingleColorScheme) -> Result<Layer> {
    ensure_same_domain(a, b)?;
    let hex = color::normalize(&scheme.color)?;

    let selected: BTreeSet<String> = a
        .selected_technique_ids()
        .union(&b.selected_technique_ids())
        .cloned()
        .collect();
    let universe: BTreeSet<String> = a
        .technique_ids()
        .union(&b.technique_ids())
        .cloned()
        .collect();

    let mut out = merged_layer(a, b, "union");
    for id in &universe {
        let mut technique = Technique::new(id);
        if selected.contains(id) {
            technique.color = Some(hex.clone());
        } else {
            technique.enabled = false;
        }
        out.techniques.push(technique);
    }

    tracing::info!(
        total = universe.len(),
        selected = selected.len(),
        "merged layers as union"
    );
    Ok(out)
}

/// Intersection of two layers: both-selected ids get the intersection color,
/// one-sided ids keep their side's color, everything else is disabled. The
/// result carries a three-entry legend naming both operands.
pub fn intersection(a: &Layer, b: &Layer, scheme: &IntersectionColorScheme) -> Result<Layer> {
    ensure_same_domain(a, b)?;
    let left_color = color::normalize(&scheme.left_color)?;
    let right_color = color::normalize(&scheme.right_color)?;
    let intersection_color = color::normalize(&scheme.intersection_color)?;

    let left = a.selected_technique_ids();
    let right = b.selected_technique_ids();
    let universe: BTreeSet<String> = a
        .technique_ids()
        .union(&b.technique_ids())
        .cloned()
        .collect();

    let mut out = merged_layer(a, b, "intersection");
    for id in &universe {
        let mut technique = Technique::new(id);
        match (left.contains(id), right.contains(id)) {
            (true, true) => technique.color = Some(intersection_color.clone()),
            (true, false) => technique.color = Some(left_color.clone()),
            (false, true) => technique.color = Some(right_color.clone()),
            (false, false) => technique.enabled = false,
        }
        out.techniques.push(technique);
    }

    out.legend_items = vec![
        LegendItem {
            label: a.name.clone(),
            color: left_color,
        },
        LegendItem {
            label: "Intersection".to_string(),
            color: intersection_color,
        },
        LegendItem {
            label: b.name.clone(),
            color: right_color,
        },
    ];
    Ok(out)
}

/// Diff of two layers with categorical scores: ids selected only in the left
/// operand score -1, ids selected in both score 0, ids selected only in the
/// right operand score +1. `kind` picks which categories survive; ids outside
/// the surviving categories are carried as disabled, unannotated rows.
pub fn diff(a: &Layer, b: &Layer, kind: DiffKind, scheme: &DiffColorScheme) -> Result<Layer> {
    ensure_same_domain(a, b)?;
    let removed_color = color::normalize(&scheme.removed_color)?;
    let unchanged_color = color::normalize(&scheme.unchanged_color)?;
    let added_color = color::normalize(&scheme.added_color)?;

    let left = a.selected_technique_ids();
    let right = b.selected_technique_ids();
    let universe: BTreeSet<String> = a
        .technique_ids()
        .union(&b.technique_ids())
        .cloned()
        .collect();

    let mut out = merged_layer(a, b, kind.as_str());
    for id in &universe {
        let category = match (left.contains(id), right.contains(id)) {
            (true, false) => Some((-1, &removed_color)),
            (true, true) => Some((0, &unchanged_color)),
            (false, true) => Some((1, &added_color)),
            (false, false) => None,
        };
        let survives = match kind {
            DiffKind::Left => !matches!(category, Some((1, _))),
            DiffKind::Right => !matches!(category, Some((-1, _))),
            DiffKind::Symmetric => true,
        };

        let mut technique = Technique::new(id);
        match category {
            Some((score, color)) if survives => {
                technique.score = Some(score);
                technique.color = Some(color.clone());
            }
            _ => technique.enabled = false,
        }
        out.techniques.push(technique);
    }

    out.legend_items = vec![
        LegendItem {
            label: "Removed".to_string(),
            color: removed_color,
        },
        LegendItem {
            label: "Unchanged".to_string(),
            color: unchanged_color,
        },
        LegendItem {
            label: "Added".to_string(),
            color: added_color,
        },
    ];
    Ok(out)
}

/// Merge layers into a heatmap: each technique's score is the number of input
/// layers that select it, colored along the scheme's ramp over `[1, max]`.
/// Ids present somewhere but never selected are appended afterward as
/// unscored, uncolored, enabled rows.
pub fn heatmap(layers: &[Layer], scheme: &GradientColorScheme) -> Result<Layer> {
    let Some(first) = layers.first() else {
        return Err(LayerError::EmptyInput("heatmap requires at least one layer"));
    };
    for layer in layers {
        ensure_same_domain(first, layer)?;
    }

    let mut frequencies: BTreeMap<String, i32> = BTreeMap::new();
    for layer in layers {
        // Count each layer at most once per id, regardless of duplicate rows.
        for id in layer.selected_technique_ids() {
            *frequencies.entry(id).or_insert(0) += 1;
        }
    }
    if frequencies.is_empty() {
        return Err(LayerError::EmptyInput(
            "heatmap requires at least one selected technique",
        ));
    }

    let max_frequency = frequencies.values().copied().max().unwrap_or(1);
    let color_map = scheme.color_map(1, max_frequency)?;

    let mut out = Layer::new(first.domain);
    out.name = format!("heatmap({} layers)", layers.len());
    out.description = format!(
        "Technique selection frequencies across {} layers",
        layers.len()
    );
    for (id, frequency) in &frequencies {
        let mut technique = Technique::new(id);
        technique.score = Some(*frequency);
        technique.color = color_map.get(frequency).cloned();
        out.techniques.push(technique);
    }

    // A one-point ramp cannot satisfy the gradient invariant; skip the
    // metadata and keep the scored rows.
    if max_frequency >= 2 {
        out.gradient = Some(Gradient::new(
            1,
            max_frequency,
            color_map.into_values().collect(),
        )?);
    }

    let universe: BTreeSet<String> = layers
        .iter()
        .flat_map(|layer| layer.technique_ids())
        .collect();
    for id in &universe {
        if !frequencies.contains_key(id) {
            out.techniques.push(Technique::new(id));
        }
    }

    tracing::info!(
        layers = layers.len(),
        scored = frequencies.len(),
        max_frequency,
        "merged layers as heatmap"
    );
    Ok(out)
}

/// Append a default row for every universe id the layer does not already
/// carry. Existing rows are never overwritten.
pub fn add_missing_techniques(layer: &mut Layer, universe: &BTreeSet<String>, enable: bool) {
    let present = layer.technique_ids();
    let mut added = 0usize;
    for id in universe {
        if !present.contains(id) {
            let mut technique = Technique::new(id);
            technique.enabled = enable;
            layer.techniques.push(technique);
            added += 1;
        }
    }
    tracing::debug!(added, enable, "appended missing techniques");
}

fn ensure_same_domain(a: &Layer, b: &Layer) -> Result<()> {
    if a.domain != b.domain {
        return Err(LayerError::DomainMismatch {
            left: a.domain.to_string(),
            right: b.domain.to_string(),
        });
    }
    Ok(())
}

fn merged_layer(a: &Layer, b: &Layer, operation: &str) -> Layer {
    let mut out = Layer::new(a.domain);
    out.name = format!("{operation}({}, {})", a.name, b.name);
    out.description = format!("{operation} of '{}' and '{}'", a.name, b.name);
    out
}

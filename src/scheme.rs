//! Color schemes: strategies that map scores (or ids) to colors.
//!
//! Schemes are a tagged enum rather than a trait hierarchy; [`apply_color_scheme`]
//! dispatches on the variant. The intersection scheme is standalone because it
//! is only consumed by the intersection merge, never applied to a single layer.

use crate::color;
use crate::error::{LayerError, Result};
use crate::layer::{Layer, DEFAULT_COLOR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paint every enabled technique one color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleColorScheme {
    pub color: String,
}

impl Default for SingleColorScheme {
    fn default() -> Self {
        SingleColorScheme {
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl SingleColorScheme {
    pub fn new(color: impl Into<String>) -> Self {
        SingleColorScheme {
            color: color.into(),
        }
    }

    pub fn colors(&self) -> Result<Vec<String>> {
        Ok(vec![color::normalize(&self.color)?])
    }
}

/// Categorical colors for diff scores: -1 removed, 0 unchanged, +1 added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffColorScheme {
    pub removed_color: String,
    pub unchanged_color: String,
    pub added_color: String,
}

impl Default for DiffColorScheme {
    fn default() -> Self {
        DiffColorScheme {
            removed_color: "red".to_string(),
            unchanged_color: "yellow".to_string(),
            added_color: "green".to_string(),
        }
    }
}

impl DiffColorScheme {
    pub fn colors(&self) -> Result<Vec<String>> {
        Ok(vec![
            color::normalize(&self.removed_color)?,
            color::normalize(&self.unchanged_color)?,
            color::normalize(&self.added_color)?,
        ])
    }
}

/// A continuous ramp between two colors, keyed by integer score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientColorScheme {
    pub min_color: String,
    pub max_color: String,
}

impl Default for GradientColorScheme {
    fn default() -> Self {
        GradientColorScheme {
            min_color: "green".to_string(),
            max_color: "red".to_string(),
        }
    }
}

impl GradientColorScheme {
    pub fn new(min_color: impl Into<String>, max_color: impl Into<String>) -> Self {
        GradientColorScheme {
            min_color: min_color.into(),
            max_color: max_color.into(),
        }
    }

    pub fn colors(&self, steps: usize) -> Result<Vec<String>> {
        color::gradient(&self.min_color, &self.max_color, steps)
    }

    /// Map each score in `[min_score, max_score]` to a ramp color, ascending:
    /// `min_score` gets the ramp's first color.
    pub fn color_map(&self, min_score: i32, max_score: i32) -> Result<BTreeMap<i32, String>> {
        if min_score > max_score {
            return Err(LayerError::Validation(format!(
                "gradient scores out of order: {min_score} > {max_score}"
            )));
        }
        let steps = (max_score - min_score) as usize + 1;
        let colors = self.colors(steps)?;
        Ok((min_score..=max_score).zip(colors).collect())
    }
}

/// An explicit color -> label table; techniques are colored by id through a
/// caller-supplied id -> color table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabeledColorScheme {
    /// Legend rows, in display order.
    pub colors_to_labels: Vec<(String, String)>,
    /// Which color each technique id receives.
    pub colors_by_id: BTreeMap<String, String>,
}

impl LabeledColorScheme {
    pub fn colors(&self) -> Vec<String> {
        self.colors_to_labels
            .iter()
            .map(|(color, _)| color.clone())
            .collect()
    }
}

/// Colors for the three regions of an intersection merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionColorScheme {
    pub left_color: String,
    pub right_color: String,
    pub intersection_color: String,
}

impl Default for IntersectionColorScheme {
    fn default() -> Self {
        IntersectionColorScheme {
            left_color: "lightcoral".to_string(),
            right_color: "lightgreen".to_string(),
            intersection_color: "lightblue".to_string(),
        }
    }
}

/// The scheme variants that can be applied to a single layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Single(SingleColorScheme),
    Diff(DiffColorScheme),
    Gradient(GradientColorScheme),
    Labeled(LabeledColorScheme),
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Single(SingleColorScheme::default())
    }
}

/// Recolor a layer according to the scheme variant.
///
/// Single and Labeled touch only enabled techniques; Diff and Gradient touch
/// only techniques whose score is in the scheme's domain. Rows outside the
/// domain are left untouched.
pub fn apply_color_scheme(layer: &mut Layer, scheme: &ColorScheme) -> Result<()> {
    match scheme {
        ColorScheme::Single(scheme) => apply_single(layer, scheme),
        ColorScheme::Diff(scheme) => apply_diff(layer, scheme),
        ColorScheme::Gradient(scheme) => apply_gradient(layer, scheme),
        ColorScheme::Labeled(scheme) => apply_labeled(layer, scheme),
    }
}

fn apply_single(layer: &mut Layer, scheme: &SingleColorScheme) -> Result<()> {
    let hex = color::normalize(&scheme.color)?;
    for technique in &mut layer.techniques {
        if technique.enabled {
            technique.color = Some(hex.clone());
        }
    }
    Ok(())
}

fn apply_diff(layer: &mut Layer, scheme: &DiffColorScheme) -> Result<()> {
    // Whole-layer check before any mutation, so application is all-or-nothing.
    for technique in &layer.techniques {
        if let Some(score) = technique.score {
            if !(-1..=1).contains(&score) {
                return Err(LayerError::InvalidScoreDomain(score));
            }
        }
    }

    let removed = color::normalize(&scheme.removed_color)?;
    let unchanged = color::normalize(&scheme.unchanged_color)?;
    let added = color::normalize(&scheme.added_color)?;
    for technique in &mut layer.techniques {
        match technique.score {
            Some(-1) => technique.color = Some(removed.clone()),
            Some(0) => technique.color = Some(unchanged.clone()),
            Some(1) => technique.color = Some(added.clone()),
            _ => {}
        }
    }
    Ok(())
}

fn apply_gradient(layer: &mut Layer, scheme: &GradientColorScheme) -> Result<()> {
    let scores: Vec<i32> = layer.techniques.iter().filter_map(|t| t.score).collect();
    let (Some(&min_score), Some(&max_score)) = (scores.iter().min(), scores.iter().max()) else {
        // Nothing scored, nothing in the ramp's domain.
        return Ok(());
    };

    let color_map = scheme.color_map(min_score, max_score)?;
    for technique in &mut layer.techniques {
        if let Some(color) = technique.score.and_then(|score| color_map.get(&score)) {
            technique.color = Some(color.clone());
        }
    }
    Ok(())
}

fn apply_labeled(layer: &mut Layer, scheme: &LabeledColorScheme) -> Result<()> {
    for technique in &mut layer.techniques {
        if !technique.enabled {
            continue;
        }
        if let Some(token) = scheme.colors_by_id.get(&technique.technique_id) {
            technique.color = Some(color::normalize(token)?);
        }
    }
    Ok(())
}

//! Human-readable layer summaries.

use crate::color;
use crate::error::Result;
use crate::layer::{Domain, Layer, Versions};
use serde::Serialize;
use std::collections::BTreeSet;

/// A lossy digest of one layer, for reports and spot checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub description: String,
    pub domain: Domain,
    pub versions: Versions,
    pub selected_techniques: Vec<String>,
    pub hidden_techniques: Vec<String>,
    pub unique_colors: Vec<String>,
    pub unique_color_names: Vec<String>,
    pub unique_scores: Vec<i32>,
    pub total_selected_techniques: usize,
    pub total_unique_colors: usize,
    pub total_unique_scores: usize,
}

/// Summarize a layer. Color names are nearest-match lookups and fail only if
/// a technique carries a token that resolves to nothing.
pub fn summarize(layer: &Layer) -> Result<LayerSummary> {
    let mut unique_colors = BTreeSet::new();
    let mut unique_color_names = BTreeSet::new();
    let mut unique_scores = BTreeSet::new();

    for technique in &layer.techniques {
        if let Some(token) = &technique.color {
            unique_colors.insert(token.clone());
            unique_color_names.insert(color::name_of(token)?);
        }
        if let Some(score) = technique.score {
            unique_scores.insert(score);
        }
    }

    let selected: Vec<String> = layer.selected_technique_ids().into_iter().collect();
    let hidden: Vec<String> = layer.deselected_technique_ids().into_iter().collect();

    Ok(LayerSummary {
        name: layer.name.clone(),
        description: layer.description.clone(),
        domain: layer.domain,
        versions: layer.versions.clone(),
        total_selected_techniques: selected.len(),
        total_unique_colors: unique_colors.len(),
        total_unique_scores: unique_scores.len(),
        selected_techniques: selected,
        hidden_techniques: hidden,
        unique_colors: unique_colors.into_iter().collect(),
        unique_color_names: unique_color_names.into_iter().collect(),
        unique_scores: unique_scores.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;
    use crate::layer::Technique;

    fn sample_layer() -> Layer {
        let mut layer = Layer::new(Domain::Enterprise);
        layer.name = "oilrig".to_string();

        let mut a = Technique::new("T1059");
        a.color = Some("#6495ed".to_string());
        a.score = Some(2);
        let mut b = Technique::new("T1003");
        b.color = Some("#6495ed".to_string());
        let mut c = Technique::new("T1021");
        c.color = Some("firebrick".to_string());
        c.score = Some(2);
        let d = Technique::new("T1566");

        layer.techniques = vec![a, b, c, d];
        layer
    }

    #[test]
    fn summary_counts_and_partitions() {
        let summary = summarize(&sample_layer()).unwrap();

        assert_eq!(summary.total_selected_techniques, 3);
        assert_eq!(
            summary.selected_techniques,
            vec!["T1003".to_string(), "T1021".to_string(), "T1059".to_string()]
        );
        assert_eq!(summary.hidden_techniques, vec!["T1566".to_string()]);
        assert_eq!(summary.total_unique_colors, 2);
        assert_eq!(summary.total_unique_scores, 1);
        assert_eq!(summary.unique_scores, vec![2]);
    }

    #[test]
    fn summary_names_colors_via_nearest_match() {
        let summary = summarize(&sample_layer()).unwrap();
        assert_eq!(
            summary.unique_color_names,
            vec!["cornflowerblue".to_string(), "firebrick".to_string()]
        );
    }

    #[test]
    fn summary_surfaces_unresolvable_colors() {
        let mut layer = sample_layer();
        layer.techniques[0].color = Some("glitter".to_string());
        assert!(matches!(
            summarize(&layer),
            Err(LayerError::UnrecognizedColor(_))
        ));
    }
}

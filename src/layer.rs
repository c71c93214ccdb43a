//! Navigator layer document model and mutation operations.
//!
//! Field names and defaults track the ATT&CK Navigator layer format; optional
//! fields are pruned on serialization (omitted, never emitted as `null`).
//! Selection state is always derived from `enabled` + annotations, never
//! cached.

use crate::error::{LayerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const ATTACK_NAVIGATOR_VERSION: &str = "4.9.0";
pub const ATTACK_NAVIGATOR_LAYER_VERSION: &str = "4.5";
pub const DEFAULT_COLOR: &str = "cornflowerblue";
pub const DEFAULT_TACTIC_ROW_BACKGROUND: &str = "#dddddd";

/// One of the three supported ATT&CK matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[default]
    #[serde(rename = "enterprise-attack")]
    Enterprise,
    #[serde(rename = "mobile-attack")]
    Mobile,
    #[serde(rename = "ics-attack")]
    Ics,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Enterprise => "enterprise-attack",
            Domain::Mobile => "mobile-attack",
            Domain::Ics => "ics-attack",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "enterprise-attack" => Ok(Domain::Enterprise),
            "mobile-attack" => Ok(Domain::Mobile),
            "ics-attack" => Ok(Domain::Ics),
            other => Err(LayerError::Validation(format!("invalid domain: {other}"))),
        }
    }
}

/// Technique ordering inside the Navigator, encoded as an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sorting {
    #[default]
    AscendingByTechniqueName = 0,
    DescendingByTechniqueName = 1,
    AscendingByTechniqueScore = 2,
    DescendingByTechniqueScore = 3,
}

impl TryFrom<u8> for Sorting {
    type Error = LayerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Sorting::AscendingByTechniqueName),
            1 => Ok(Sorting::DescendingByTechniqueName),
            2 => Ok(Sorting::AscendingByTechniqueScore),
            3 => Ok(Sorting::DescendingByTechniqueScore),
            other => Err(LayerError::Validation(format!(
                "invalid sorting value: {other}"
            ))),
        }
    }
}

impl From<Sorting> for u8 {
    fn from(value: Sorting) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Side,
    Flat,
    Mini,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    #[default]
    Average,
    Min,
    Max,
    Sum,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandedSubtechniques {
    #[default]
    None,
    All,
    Annotated,
}

/// Display preferences; passthrough for the algebra, but enum-checked so an
/// out-of-range value fails at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub layout: LayoutKind,
    #[serde(default, rename = "showID")]
    pub show_id: bool,
    #[serde(default = "default_true")]
    pub show_name: bool,
    #[serde(default)]
    pub show_aggregate_scores: bool,
    #[serde(default)]
    pub count_unscored: bool,
    #[serde(default)]
    pub aggregate_function: AggregateFunction,
    #[serde(default)]
    pub expanded_subtechniques: ExpandedSubtechniques,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            layout: LayoutKind::default(),
            show_id: false,
            show_name: true,
            show_aggregate_scores: false,
            count_unscored: false,
            aggregate_function: AggregateFunction::default(),
            expanded_subtechniques: ExpandedSubtechniques::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(default = "default_navigator_version")]
    pub navigator: String,
    #[serde(default = "default_layer_version")]
    pub layer: String,
}

impl Default for Versions {
    fn default() -> Self {
        Versions {
            attack: None,
            navigator: default_navigator_version(),
            layer: default_layer_version(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerFilter {
    #[serde(default)]
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// A metadata row: a named value or a divider line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataEntry {
    Item { name: String, value: String },
    Divider { divider: bool },
}

/// A link row: a hoverable link or a divider line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    Link { label: String, url: String },
    Divider { divider: bool },
}

/// Score bounds plus the color ramp that spans them.
///
/// Constructed only through [`Gradient::new`]; a ramp with fewer than two
/// colors or inverted bounds is rejected there and at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GradientDoc")]
pub struct Gradient {
    colors: Vec<String>,
    min_value: i32,
    max_value: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradientDoc {
    colors: Vec<String>,
    #[serde(default = "default_gradient_min")]
    min_value: i32,
    #[serde(default = "default_gradient_max")]
    max_value: i32,
}

impl TryFrom<GradientDoc> for Gradient {
    type Error = LayerError;

    fn try_from(doc: GradientDoc) -> Result<Self> {
        Gradient::new(doc.min_value, doc.max_value, doc.colors)
    }
}

impl Gradient {
    pub fn new(min_value: i32, max_value: i32, colors: Vec<String>) -> Result<Self> {
        if colors.len() < 2 {
            return Err(LayerError::Validation(
                "gradient must have at least two colors".to_string(),
            ));
        }
        if min_value >= max_value {
            return Err(LayerError::Validation(format!(
                "gradient minValue must be less than maxValue - got {min_value} >= {max_value}"
            )));
        }
        Ok(Gradient {
            colors,
            min_value,
            max_value,
        })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }
}

/// One annotated technique row in a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    #[serde(rename = "techniqueID")]
    pub technique_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactic: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub show_subtechniques: bool,
}

impl Technique {
    pub fn new(technique_id: impl Into<String>) -> Self {
        Technique {
            technique_id: technique_id.into(),
            tactic: None,
            enabled: true,
            score: None,
            metadata: Vec::new(),
            color: None,
            comment: None,
            links: Vec::new(),
            show_subtechniques: false,
        }
    }

    /// Enabled and carrying a score or color.
    pub fn is_selected(&self) -> bool {
        self.enabled && (self.score.is_some() || self.color.is_some())
    }

    pub fn is_deselected(&self) -> bool {
        !self.is_selected()
    }
}

/// A Navigator layer: the annotated-technique aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default = "default_layer_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub versions: Versions,
    #[serde(default)]
    pub domain: Domain,
    #[serde(default, rename = "customDataURL", skip_serializing_if = "Option::is_none")]
    pub custom_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<LayerFilter>,
    #[serde(default)]
    pub hide_disabled: bool,
    #[serde(default)]
    pub sorting: Sorting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub techniques: Vec<Technique>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(default)]
    pub legend_items: Vec<LegendItem>,
    #[serde(default)]
    pub show_tactic_row_background: bool,
    #[serde(default = "default_tactic_row_background")]
    pub tactic_row_background: String,
    #[serde(default = "default_true")]
    pub select_techniques_across_tactics: bool,
    #[serde(default = "default_true")]
    pub select_subtechniques_with_parent: bool,
    #[serde(default)]
    pub select_visible_techniques: bool,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

impl Default for Layer {
    fn default() -> Self {
        Layer::new(Domain::default())
    }
}

impl Layer {
    pub fn new(domain: Domain) -> Self {
        Layer {
            name: default_layer_name(),
            description: String::new(),
            versions: Versions::default(),
            domain,
            custom_data_url: None,
            filters: None,
            hide_disabled: false,
            sorting: Sorting::default(),
            layout: None,
            techniques: Vec::new(),
            gradient: None,
            legend_items: Vec::new(),
            show_tactic_row_background: false,
            tactic_row_background: default_tactic_row_background(),
            select_techniques_across_tactics: true,
            select_subtechniques_with_parent: true,
            select_visible_techniques: false,
            metadata: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Every technique id in the layer, duplicates collapsed.
    pub fn technique_ids(&self) -> BTreeSet<String> {
        self.techniques
            .iter()
            .map(|t| t.technique_id.clone())
            .collect()
    }

    /// Ids with at least one selected row.
    pub fn selected_technique_ids(&self) -> BTreeSet<String> {
        self.techniques
            .iter()
            .filter(|t| t.is_selected())
            .map(|t| t.technique_id.clone())
            .collect()
    }

    /// Ids with no selected row.
    pub fn deselected_technique_ids(&self) -> BTreeSet<String> {
        let selected = self.selected_technique_ids();
        self.technique_ids()
            .into_iter()
            .filter(|id| !selected.contains(id))
            .collect()
    }

    /// Select the given ids: enable existing rows (every occurrence) and set
    /// their color/score, appending new enabled rows for absent ids.
    pub fn select<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        color: Option<&str>,
        score: Option<i32>,
    ) -> Result<()> {
        if ids.is_empty() {
            return Err(LayerError::EmptyInput(
                "select requires at least one technique id",
            ));
        }

        for id in ids {
            let id = id.as_ref();
            let mut found = false;
            for technique in &mut self.techniques {
                if technique.technique_id == id {
                    technique.enabled = true;
                    technique.color = color.map(str::to_string);
                    technique.score = score;
                    found = true;
                }
            }
            if !found {
                let mut technique = Technique::new(id);
                technique.color = color.map(str::to_string);
                technique.score = score;
                self.techniques.push(technique);
            }
        }
        Ok(())
    }

    /// Deselect the given ids: existing rows are disabled, rescored, or
    /// stripped of color per the flags; absent ids are appended as disabled
    /// rows carrying `score`.
    pub fn deselect<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        score: Option<i32>,
        reset_color: bool,
        disable: bool,
    ) -> Result<()> {
        if ids.is_empty() {
            return Err(LayerError::EmptyInput(
                "deselect requires at least one technique id",
            ));
        }

        for id in ids {
            let id = id.as_ref();
            let mut found = false;
            for technique in &mut self.techniques {
                if technique.technique_id == id {
                    if disable {
                        technique.enabled = false;
                    }
                    if let Some(score) = score {
                        technique.score = Some(score);
                    }
                    if reset_color {
                        technique.color = None;
                    }
                    found = true;
                }
            }
            if !found {
                let mut technique = Technique::new(id);
                technique.enabled = false;
                technique.score = score;
                self.techniques.push(technique);
            }
        }
        Ok(())
    }

    /// Force `enabled = false` on every deselected row. Idempotent.
    pub fn disable_deselected(&mut self) {
        let mut total = 0usize;
        for technique in &mut self.techniques {
            if technique.is_deselected() && technique.enabled {
                technique.enabled = false;
                total += 1;
            }
        }
        tracing::debug!(disabled = total, "disabled deselected techniques");
    }

    pub fn set_subtechnique_visibility(&mut self, visible: bool) {
        for technique in &mut self.techniques {
            technique.show_subtechniques = visible;
        }
    }

    pub fn expand_subtechniques(&mut self) {
        self.set_subtechnique_visibility(true);
    }

    pub fn collapse_subtechniques(&mut self) {
        self.set_subtechnique_visibility(false);
    }

    /// Set every technique's score to `score` (`None` clears).
    pub fn reset_scores(&mut self, score: Option<i32>) {
        for technique in &mut self.techniques {
            technique.score = score;
        }
    }

    pub fn drop_comments(&mut self) {
        for technique in &mut self.techniques {
            technique.comment = None;
        }
    }

    pub fn drop_tactic_mappings(&mut self) {
        for technique in &mut self.techniques {
            technique.tactic = None;
        }
    }

    pub fn drop_legend_items(&mut self) {
        self.legend_items.clear();
    }

    pub fn remove_colors(&mut self) {
        for technique in &mut self.techniques {
            technique.color = None;
        }
    }

    /// Replace every exact occurrence of `old_color`.
    pub fn replace_color(&mut self, old_color: &str, new_color: &str) -> Result<()> {
        let mut found = false;
        for technique in &mut self.techniques {
            if technique.color.as_deref() == Some(old_color) {
                technique.color = Some(new_color.to_string());
                found = true;
            }
        }
        if !found {
            return Err(LayerError::ColorNotFound(old_color.to_string()));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_layer_name() -> String {
    "layer".to_string()
}

fn default_navigator_version() -> String {
    ATTACK_NAVIGATOR_VERSION.to_string()
}

fn default_layer_version() -> String {
    ATTACK_NAVIGATOR_LAYER_VERSION.to_string()
}

fn default_tactic_row_background() -> String {
    DEFAULT_TACTIC_ROW_BACKGROUND.to_string()
}

fn default_gradient_min() -> i32 {
    0
}

fn default_gradient_max() -> i32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayerError;

    fn technique(id: &str, enabled: bool, score: Option<i32>, color: Option<&str>) -> Technique {
        let mut t = Technique::new(id);
        t.enabled = enabled;
        t.score = score;
        t.color = color.map(str::to_string);
        t
    }

    fn sample_layer() -> Layer {
        let mut layer = Layer::new(Domain::Enterprise);
        layer.techniques = vec![
            technique("T1001", true, Some(5), None),
            technique("T1002", true, None, Some("#ff0000")),
            technique("T1003", true, None, None),
            technique("T1004", false, Some(1), None),
        ];
        layer
    }

    #[test]
    fn selection_partitions_the_id_set() {
        let layer = sample_layer();
        let selected = layer.selected_technique_ids();
        let deselected = layer.deselected_technique_ids();

        assert!(selected.is_disjoint(&deselected));
        let union: BTreeSet<String> = selected.union(&deselected).cloned().collect();
        assert_eq!(union, layer.technique_ids());
    }

    #[test]
    fn selected_requires_enabled_and_annotation() {
        let layer = sample_layer();
        let selected = layer.selected_technique_ids();
        assert!(selected.contains("T1001"));
        assert!(selected.contains("T1002"));
        // Enabled but unannotated.
        assert!(!selected.contains("T1003"));
        // Scored but disabled.
        assert!(!selected.contains("T1004"));
    }

    #[test]
    fn select_appends_and_overwrites() {
        let mut layer = sample_layer();
        layer
            .select(&["T1004", "T1099"], Some("#00ff00"), Some(7))
            .unwrap();

        let t4 = layer
            .techniques
            .iter()
            .find(|t| t.technique_id == "T1004")
            .unwrap();
        assert!(t4.enabled);
        assert_eq!(t4.score, Some(7));
        assert_eq!(t4.color.as_deref(), Some("#00ff00"));

        let t99 = layer
            .techniques
            .iter()
            .find(|t| t.technique_id == "T1099")
            .unwrap();
        assert!(t99.enabled);
        assert_eq!(t99.score, Some(7));
    }

    #[test]
    fn select_replaces_rather_than_merges() {
        let mut layer = sample_layer();
        layer.select(&["T1001"], None, None).unwrap();
        let t1 = &layer.techniques[0];
        assert!(t1.enabled);
        assert_eq!(t1.score, None);
        assert_eq!(t1.color, None);
    }

    #[test]
    fn select_touches_every_duplicate_row() {
        let mut layer = Layer::new(Domain::Enterprise);
        layer.techniques = vec![
            technique("T1001", false, None, None),
            technique("T1001", false, None, None),
        ];
        layer.select(&["T1001"], Some("#123456"), None).unwrap();
        assert_eq!(layer.techniques.len(), 2);
        assert!(layer.techniques.iter().all(|t| t.enabled));
        assert!(layer
            .techniques
            .iter()
            .all(|t| t.color.as_deref() == Some("#123456")));
    }

    #[test]
    fn select_rejects_empty_input() {
        let mut layer = sample_layer();
        let err = layer.select::<&str>(&[], None, None).unwrap_err();
        assert!(matches!(err, LayerError::EmptyInput(_)));
        assert!(matches!(
            layer.deselect::<&str>(&[], None, false, false).unwrap_err(),
            LayerError::EmptyInput(_)
        ));
    }

    #[test]
    fn deselect_applies_flags_and_appends_absent_ids() {
        let mut layer = sample_layer();
        layer
            .deselect(&["T1001", "T1098"], Some(0), true, true)
            .unwrap();

        let t1 = &layer.techniques[0];
        assert!(!t1.enabled);
        assert_eq!(t1.score, Some(0));
        assert_eq!(t1.color, None);

        let t98 = layer
            .techniques
            .iter()
            .find(|t| t.technique_id == "T1098")
            .unwrap();
        assert!(!t98.enabled);
        assert_eq!(t98.score, Some(0));
    }

    #[test]
    fn disable_deselected_is_idempotent() {
        let mut layer = sample_layer();
        layer.disable_deselected();
        let once = layer.clone();
        layer.disable_deselected();
        assert_eq!(layer, once);

        let t3 = layer
            .techniques
            .iter()
            .find(|t| t.technique_id == "T1003")
            .unwrap();
        assert!(!t3.enabled);
    }

    #[test]
    fn bulk_resets_clear_fields() {
        let mut layer = sample_layer();
        layer.techniques[0].comment = Some("seen in the wild".to_string());
        layer.techniques[0].tactic = Some("execution".to_string());
        layer.legend_items.push(LegendItem {
            label: "hits".to_string(),
            color: "#ff0000".to_string(),
        });

        layer.reset_scores(None);
        layer.drop_comments();
        layer.drop_tactic_mappings();
        layer.drop_legend_items();
        layer.remove_colors();

        assert!(layer.techniques.iter().all(|t| t.score.is_none()));
        assert!(layer.techniques.iter().all(|t| t.comment.is_none()));
        assert!(layer.techniques.iter().all(|t| t.tactic.is_none()));
        assert!(layer.techniques.iter().all(|t| t.color.is_none()));
        assert!(layer.legend_items.is_empty());
    }

    #[test]
    fn subtechnique_visibility_toggles_every_row() {
        let mut layer = sample_layer();
        layer.expand_subtechniques();
        assert!(layer.techniques.iter().all(|t| t.show_subtechniques));
        layer.collapse_subtechniques();
        assert!(layer.techniques.iter().all(|t| !t.show_subtechniques));
    }

    #[test]
    fn replace_color_requires_a_match() {
        let mut layer = sample_layer();
        layer.replace_color("#ff0000", "#00ff00").unwrap();
        assert_eq!(layer.techniques[1].color.as_deref(), Some("#00ff00"));

        let err = layer.replace_color("#123123", "#00ff00").unwrap_err();
        assert_eq!(err, LayerError::ColorNotFound("#123123".to_string()));
    }

    #[test]
    fn domain_parsing_is_closed() {
        assert_eq!("ics-attack".parse::<Domain>().unwrap(), Domain::Ics);
        assert!(matches!(
            "cloud-attack".parse::<Domain>(),
            Err(LayerError::Validation(_))
        ));
    }

    #[test]
    fn sorting_rejects_out_of_range_values() {
        assert_eq!(Sorting::try_from(3).unwrap(), Sorting::DescendingByTechniqueScore);
        assert!(matches!(Sorting::try_from(4), Err(LayerError::Validation(_))));
    }

    #[test]
    fn gradient_construction_is_validated() {
        assert!(Gradient::new(0, 10, vec!["#000000".to_string()]).is_err());
        assert!(Gradient::new(10, 10, vec!["#000000".to_string(), "#ffffff".to_string()]).is_err());
        let gradient =
            Gradient::new(1, 3, vec!["#000000".to_string(), "#ffffff".to_string()]).unwrap();
        assert_eq!(gradient.min_value(), 1);
        assert_eq!(gradient.max_value(), 3);
        assert_eq!(gradient.colors().len(), 2);
    }
}

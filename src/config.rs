//! Declarative post-processing applied after a layer is built or loaded.

use crate::error::Result;
use crate::layer::Layer;
use crate::scheme::{apply_color_scheme, ColorScheme};
use serde::{Deserialize, Serialize};

/// The post-processing steps to run over a layer, applied in a fixed order by
/// [`apply_layer_config`]. The default config is the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub color_scheme: Option<ColorScheme>,
    pub disable_deselected_techniques: bool,
    pub hide_disabled_techniques: bool,
    /// `Some(v)` forces subtechnique visibility to `v`; `None` leaves rows
    /// as they are.
    pub show_subtechniques: Option<bool>,
    pub reset_technique_scores: bool,
    pub drop_comments: bool,
}

/// Apply the configured steps: disable-deselected, hide-disabled,
/// subtechnique visibility, color scheme, score reset, comment stripping.
pub fn apply_layer_config(layer: &mut Layer, config: &LayerConfig) -> Result<()> {
    if config.disable_deselected_techniques {
        layer.disable_deselected();
    }
    if config.hide_disabled_techniques {
        layer.hide_disabled = true;
    }
    if let Some(visible) = config.show_subtechniques {
        layer.set_subtechnique_visibility(visible);
    }
    if let Some(scheme) = &config.color_scheme {
        apply_color_scheme(layer, scheme)?;
    }
    if config.reset_technique_scores {
        layer.reset_scores(None);
    }
    if config.drop_comments {
        layer.drop_comments();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Domain, Technique};
    use crate::scheme::SingleColorScheme;

    fn sample_layer() -> Layer {
        let mut layer = Layer::new(Domain::Enterprise);
        let mut selected = Technique::new("T1059");
        selected.score = Some(10);
        selected.comment = Some("noted".to_string());
        let unannotated = Technique::new("T1003");
        layer.techniques = vec![selected, unannotated];
        layer
    }

    #[test]
    fn default_config_is_the_identity() {
        let mut layer = sample_layer();
        let before = layer.clone();
        apply_layer_config(&mut layer, &LayerConfig::default()).unwrap();
        assert_eq!(layer, before);
    }

    #[test]
    fn full_pipeline_applies_in_order() {
        let mut layer = sample_layer();
        let config = LayerConfig {
            color_scheme: Some(ColorScheme::Single(SingleColorScheme::new("red"))),
            disable_deselected_techniques: true,
            hide_disabled_techniques: true,
            show_subtechniques: Some(true),
            reset_technique_scores: true,
            drop_comments: true,
        };

        apply_layer_config(&mut layer, &config).unwrap();

        assert!(layer.hide_disabled);
        // Deselection ran before recoloring, so the unannotated row stayed
        // disabled and uncolored.
        assert!(!layer.techniques[1].enabled);
        assert_eq!(layer.techniques[1].color, None);
        // The selected row was recolored, then rescored and stripped.
        assert_eq!(layer.techniques[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(layer.techniques[0].score, None);
        assert_eq!(layer.techniques[0].comment, None);
        assert!(layer.techniques.iter().all(|t| t.show_subtechniques));
    }
}

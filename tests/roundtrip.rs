//! Integration tests over real layer documents: read, merge, write, re-read.

use navigator_layers::algebra;
use navigator_layers::codec::{read_layer_file, to_json_string, write_layer_file};
use navigator_layers::layer::{Domain, Layer};
use navigator_layers::scheme::GradientColorScheme;
use navigator_layers::summary::summarize;
use std::path::Path;

fn fixture(name: &str) -> Layer {
    let path = Path::new("tests/data").join(name);
    read_layer_file(&path).expect("fixture missing")
}

#[test]
fn fixture_parses_with_expected_shape() {
    let layer = fixture("oilrig_enterprise.json");
    assert_eq!(layer.name, "oilrig");
    assert_eq!(layer.domain, Domain::Enterprise);
    assert_eq!(layer.techniques.len(), 5);

    let selected = layer.selected_technique_ids();
    assert_eq!(selected.len(), 4);
    assert!(!selected.contains("T1566"));

    let gradient = layer.gradient.as_ref().expect("fixture carries a gradient");
    assert_eq!(gradient.min_value(), 1);
    assert_eq!(gradient.max_value(), 3);
}

#[test]
fn layers_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");

    for name in ["oilrig_enterprise.json", "muddywater_enterprise.json"] {
        let layer = fixture(name);
        let out_path = dir.path().join(name);
        write_layer_file(&out_path, &layer).expect("write layer");
        let reread = read_layer_file(&out_path).expect("re-read layer");
        assert_eq!(reread, layer);
    }
}

#[test]
fn serialized_documents_never_carry_nulls() {
    let layer = fixture("muddywater_enterprise.json");
    let json = to_json_string(&layer).expect("serialize layer");
    assert!(!json.contains("null"));
    assert!(!json.contains("\"comment\""));
}

#[test]
fn heatmap_of_fixtures_round_trips() {
    let oilrig = fixture("oilrig_enterprise.json");
    let muddywater = fixture("muddywater_enterprise.json");

    let heatmap = algebra::heatmap(
        &[oilrig, muddywater],
        &GradientColorScheme::new("PaleGoldenrod", "FireBrick"),
    )
    .expect("merge heatmap");

    // T1059 is selected by both fixtures; T1566 only by muddywater.
    let score_of = |id: &str| {
        heatmap
            .techniques
            .iter()
            .find(|t| t.technique_id == id)
            .and_then(|t| t.score)
    };
    assert_eq!(score_of("T1059"), Some(2));
    assert_eq!(score_of("T1566"), Some(1));
    assert_eq!(score_of("T1003"), Some(1));

    let dir = tempfile::tempdir().expect("create temp dir");
    let out_path = dir.path().join("heatmap.json");
    write_layer_file(&out_path, &heatmap).expect("write heatmap");
    assert_eq!(read_layer_file(&out_path).expect("re-read heatmap"), heatmap);
}

#[test]
fn summary_of_fixture_matches_annotations() {
    let summary = summarize(&fixture("oilrig_enterprise.json")).expect("summarize");
    assert_eq!(summary.total_selected_techniques, 4);
    assert_eq!(summary.hidden_techniques, vec!["T1566".to_string()]);
    assert!(summary
        .unique_color_names
        .contains(&"cornflowerblue".to_string()));
    assert_eq!(summary.unique_scores, vec![1, 2, 3]);
}

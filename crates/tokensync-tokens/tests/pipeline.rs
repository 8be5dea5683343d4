//! End-to-end extraction, validation, rendering and diffing.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokensync_tokens::builder::FULL_RADIUS_VALUE;
use tokensync_tokens::{
    detect_changes, extract, parse_ordered, validate_all, BoundVariables, Collection, Mode,
    PrimitiveKind, Rgba, TextStyle, ThemeName, TokenCategory, TokenFileId, Variable,
    VariableGraph, VariableValue,
};

const FOUNDATION: &str = "VariableCollectionId:1:0";
const THEMES: &str = "VariableCollectionId:2:0";

fn add(graph: &mut VariableGraph, id: &str, name: &str, collection: &str, values: Vec<(&str, VariableValue)>) {
    let kind = match &values[0].1 {
        VariableValue::Color(_) => PrimitiveKind::Color,
        VariableValue::Number(_) => PrimitiveKind::Number,
        VariableValue::String(_) => PrimitiveKind::String,
        VariableValue::Boolean(_) => PrimitiveKind::Boolean,
        VariableValue::Alias(_) => PrimitiveKind::Color,
    };
    graph.insert_variable(Variable {
        id: id.into(),
        name: name.into(),
        kind,
        variable_collection_id: collection.into(),
        values_by_mode: values
            .into_iter()
            .map(|(mode, value)| (mode.to_string(), value))
            .collect(),
        description: String::new(),
    });
}

fn fixture() -> VariableGraph {
    let mut graph = VariableGraph::new();
    graph.insert_collection(Collection {
        id: FOUNDATION.into(),
        name: "Foundation".into(),
        modes: vec![Mode::new("1:0", "Value")],
        default_mode_id: Some("1:0".into()),
    });
    graph.insert_collection(Collection {
        id: THEMES.into(),
        name: "Themes".into(),
        modes: vec![
            Mode::new("2:0", "Light"),
            Mode::new("2:1", "Dark"),
            Mode::new("2:2", "High Contrast Light"),
            Mode::new("2:3", "High Contrast Dark"),
            Mode::new("2:4", "Dim"),
        ],
        default_mode_id: Some("2:0".into()),
    });

    let blue = VariableValue::Color(Rgba::rgb(0.1098, 0.3451, 0.851));
    add(&mut graph, "v:blue300", "blue/300", FOUNDATION, vec![("1:0", blue)]);
    add(&mut graph, "v:blue100", "blue/100", FOUNDATION, vec![("1:0", VariableValue::Color(Rgba::rgb(0.9, 0.95, 1.0)))]);
    add(&mut graph, "v:neutral0", "neutral/0", FOUNDATION, vec![("1:0", VariableValue::Color(Rgba::rgb(1.0, 1.0, 1.0)))]);
    add(&mut graph, "v:neutral900", "neutral/900", FOUNDATION, vec![("1:0", VariableValue::Color(Rgba::rgb(0.1, 0.1, 0.1)))]);
    add(&mut graph, "v:faded", "blue/500-8", FOUNDATION, vec![("1:0", VariableValue::Color(Rgba::rgba(0.1, 0.3, 0.8, 0.08)))]);
    add(&mut graph, "v:att-blue", "attachment/blue", FOUNDATION, vec![("1:0", VariableValue::alias("v:blue300"))]);
    add(&mut graph, "v:radius-m", "radius-m", FOUNDATION, vec![("1:0", VariableValue::Number(8.0))]);
    add(&mut graph, "v:radius-xs", "radius-xs", FOUNDATION, vec![("1:0", VariableValue::Number(2.0))]);
    add(&mut graph, "v:spacing-m", "spacing-m", FOUNDATION, vec![("1:0", VariableValue::Number(16.0))]);
    add(&mut graph, "v:family", "font/family/sans", FOUNDATION, vec![("1:0", VariableValue::String("Inter, sans-serif".into()))]);
    add(&mut graph, "v:size700", "font/size/700", FOUNDATION, vec![("1:0", VariableValue::Number(32.0))]);
    add(&mut graph, "v:regular", "font/weight/regular", FOUNDATION, vec![("1:0", VariableValue::String("Regular".into()))]);
    add(&mut graph, "v:bold", "font/weight/bold", FOUNDATION, vec![("1:0", VariableValue::Number(700.0))]);
    add(&mut graph, "v:heavy", "font/weight/heavy", FOUNDATION, vec![("1:0", VariableValue::String("Heavy".into()))]);
    add(&mut graph, "v:lh", "line-height/heading/700", FOUNDATION, vec![("1:0", VariableValue::Number(40.0))]);
    add(&mut graph, "v:tight", "letter-spacing/tight", FOUNDATION, vec![("1:0", VariableValue::String("tight".into()))]);
    add(&mut graph, "v:misc", "misc/thing", FOUNDATION, vec![("1:0", VariableValue::Number(1.0))]);

    let theme = |value: VariableValue| {
        ["2:0", "2:1", "2:2", "2:3", "2:4"]
            .into_iter()
            .map(|mode| (mode, value.clone()))
            .collect::<Vec<_>>()
    };
    add(&mut graph, "v:link", "text/link", THEMES, theme(VariableValue::alias("v:blue300")));
    add(&mut graph, "v:bg", "sidebar-bg", THEMES, theme(VariableValue::Color(Rgba::rgb(1.0, 1.0, 1.0))));
    add(&mut graph, "v:bg16", "sidebar-bg-16", THEMES, theme(VariableValue::Color(Rgba::rgb(1.0, 1.0, 1.0))));

    graph.push_text_style(TextStyle {
        name: "Heading 700 - Regular".into(),
        font_family: "Inter".into(),
        font_style: "Regular".into(),
        font_size: 32.0,
        line_height: None,
        letter_spacing: None,
        bound_variables: BoundVariables {
            font_family: Some(tokensync_tokens::AliasRef::new("v:family")),
            line_height: Some(tokensync_tokens::AliasRef::new("v:lh")),
            ..Default::default()
        },
        description: "Page titles".into(),
    });
    graph
}

fn rendered(graph: &VariableGraph) -> BTreeMap<TokenFileId, String> {
    let result = extract(graph).unwrap();
    result
        .files
        .iter()
        .map(|(id, file)| (*id, file.render().unwrap()))
        .collect()
}

#[test]
fn extraction_builds_expected_files() {
    let result = extract(&fixture()).unwrap();
    let trees = result.trees();

    let expected: Vec<TokenFileId> = vec![
        TokenFileId::FoundationColor,
        TokenFileId::FoundationRadius,
        TokenFileId::FoundationSpacing,
        TokenFileId::FoundationTypography,
        TokenFileId::SemanticAttachment,
        TokenFileId::SemanticTypography,
        TokenFileId::Theme(ThemeName::Light),
        TokenFileId::Theme(ThemeName::Dark),
        TokenFileId::Theme(ThemeName::HighContrastLight),
        TokenFileId::Theme(ThemeName::HighContrastDark),
        TokenFileId::Theme(ThemeName::Dim),
    ];
    assert_eq!(trees.keys().copied().collect::<Vec<_>>(), expected);

    let color = &trees[&TokenFileId::FoundationColor];
    assert_eq!(color["color"]["foundation"]["blue"]["300"]["$value"], json!("#1C58D9"));
    assert!(color["color"]["foundation"]["blue"].get("500-8").is_none());

    let attachment = &trees[&TokenFileId::SemanticAttachment];
    assert_eq!(
        attachment["color"]["semantic"]["attachment"]["blue"]["$value"],
        json!("{color.foundation.blue.300}")
    );

    let radius = &trees[&TokenFileId::FoundationRadius];
    assert_eq!(radius["radius"]["foundation"]["full"]["$value"], json!(FULL_RADIUS_VALUE));

    let typography = &trees[&TokenFileId::FoundationTypography]["typography"]["foundation"];
    assert_eq!(typography["fontFamily"]["sans"]["$value"], json!(["Inter", "sans-serif"]));
    assert_eq!(typography["fontWeight"]["regular"]["$value"], json!(400));
    assert_eq!(typography["letterSpacing"]["tight"]["$value"], json!(-0.5));
    assert_eq!(typography["lineHeight"]["700"]["$value"], json!(40));
    assert!(typography["fontWeight"].get("heavy").is_none());
}

#[test]
fn text_style_becomes_semantic_composite() {
    let result = extract(&fixture()).unwrap();
    let tree = &result.file(TokenFileId::SemanticTypography).unwrap().tree;
    let token = &tree["typography"]["semantic"]["heading"]["700-regular"];

    assert_eq!(token["$type"], json!("typography"));
    assert_eq!(token["$description"], json!("Page titles"));
    assert_eq!(
        token["$value"],
        json!({
            "fontFamily": "{typography.foundation.fontFamily.sans}",
            "fontSize": "{typography.foundation.fontSize.700}",
            "fontWeight": "{typography.foundation.fontWeight.regular}",
            "lineHeight": "{typography.foundation.lineHeight.700}"
        })
    );
}

#[test]
fn opacity_variants_are_excluded_from_every_theme() {
    let result = extract(&fixture()).unwrap();
    for theme in ThemeName::ALL {
        let tree = &result.file(TokenFileId::Theme(theme)).unwrap().tree;
        let theme_node = &tree["color"]["theme"];
        assert!(theme_node.get("sidebar-bg-16").is_none(), "{theme}");
        assert_eq!(theme_node["text-link"]["$value"], json!("{color.foundation.blue.300}"));
        assert_eq!(theme_node["sidebar-bg"]["$value"], json!("#FFFFFF"));
    }
}

#[test]
fn stats_and_warnings_are_reported() {
    let result = extract(&fixture()).unwrap();

    // `blue/500-8` and `misc/thing`
    assert_eq!(result.stats.unclassified, 2);
    assert_eq!(result.stats.category(TokenCategory::FoundationColor).processed, 4);
    assert_eq!(result.stats.category(TokenCategory::ThemeColor).processed, 10);
    assert_eq!(result.stats.category(TokenCategory::ThemeColor).skipped, 1);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("font/weight/heavy"));
}

#[test]
fn extracted_files_validate() {
    let result = extract(&fixture()).unwrap();
    let report = validate_all(&result.trees());
    assert!(report.valid, "{:#?}", report.errors);
}

#[test]
fn rendering_uses_canonical_order() {
    let files = rendered(&fixture());
    let radius = &files[&TokenFileId::FoundationRadius];
    let xs = radius.find("\"xs\"").unwrap();
    let m = radius.find("\"m\"").unwrap();
    let full = radius.find("\"full\"").unwrap();
    assert!(xs < m && m < full, "{radius}");

    let color = &files[&TokenFileId::FoundationColor];
    assert!(color.find("\"blue\"").unwrap() < color.find("\"neutral\"").unwrap());
    assert!(color.contains("\"$type\": \"color\",\n          \"$value\": \"#1C58D9\""));
    assert!(color.ends_with("}\n"));
}

#[test]
fn second_sync_against_published_output_has_no_changes() {
    let graph = fixture();
    for _ in 0..2 {
        let result = extract(&graph).unwrap();
        let published: BTreeMap<TokenFileId, Value> = rendered(&graph)
            .into_iter()
            .map(|(id, text)| (id, parse_ordered(&text).unwrap().0))
            .collect();
        assert!(detect_changes(&result.trees(), &published).is_empty());
    }
}

#[test]
fn first_sync_against_empty_remote_changes_everything() {
    let result = extract(&fixture()).unwrap();
    let changes = detect_changes(&result.trees(), &BTreeMap::new());
    assert_eq!(changes.len(), result.files.len());
}

#[test]
fn theme_order_follows_remote_document() {
    let mut result = extract(&fixture()).unwrap();
    let file = TokenFileId::Theme(ThemeName::Light);
    let remote = r##"{ "color": { "theme": {
        "text-link": { "$type": "color", "$value": "#000000" },
        "legacy": { "$type": "color", "$value": "#000000" }
    } } }"##;
    let (_, order) = parse_ordered(remote).unwrap();
    result.apply_remote_order(&BTreeMap::from([(file, order)]));

    let text = result.file(file).unwrap().render().unwrap();
    assert!(text.find("\"text-link\"").unwrap() < text.find("\"sidebar-bg\"").unwrap());
    assert!(!text.contains("legacy"));
}

//! Variable graph fixtures.

use serde_json::{json, Map, Value};
use tokensync_tokens::{
    AliasRef, BoundVariables, Collection, Mode, PrimitiveKind, Rgba, TextStyle, Variable,
    VariableGraph, VariableValue,
};

pub const FOUNDATION: &str = "VariableCollectionId:1:0";
pub const THEMES: &str = "VariableCollectionId:2:0";

const FOUNDATION_MODE: &str = "1:0";
const THEME_MODES: [(&str, &str); 5] = [
    ("2:0", "Light"),
    ("2:1", "Dark"),
    ("2:2", "High Contrast Light"),
    ("2:3", "High Contrast Dark"),
    ("2:4", "Dim"),
];

/// Builds a graph with a single-mode foundation collection and a five-mode
/// theme collection.
pub struct GraphBuilder {
    graph: VariableGraph,
    next_id: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        let mut graph = VariableGraph::new();
        graph.insert_collection(Collection {
            id: FOUNDATION.into(),
            name: "Foundation".into(),
            modes: vec![Mode::new(FOUNDATION_MODE, "Value")],
            default_mode_id: Some(FOUNDATION_MODE.into()),
        });
        graph.insert_collection(Collection {
            id: THEMES.into(),
            name: "Themes".into(),
            modes: THEME_MODES
                .iter()
                .map(|(id, name)| Mode::new(*id, *name))
                .collect(),
            default_mode_id: Some(THEME_MODES[0].0.into()),
        });
        Self { graph, next_id: 0 }
    }

    fn id_for(&mut self, name: &str) -> String {
        self.next_id += 1;
        format!("VariableID:{}:{}", self.next_id, name.replace('/', "-"))
    }

    fn insert(
        &mut self,
        id: String,
        name: &str,
        kind: PrimitiveKind,
        collection: &str,
        values: Vec<(&str, VariableValue)>,
    ) {
        self.graph.insert_variable(Variable {
            id,
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

    /// Add a foundation variable and return its id.
    pub fn foundation(&mut self, name: &str, kind: PrimitiveKind, value: VariableValue) -> String {
        let id = self.id_for(name);
        self.insert(id.clone(), name, kind, FOUNDATION, vec![(FOUNDATION_MODE, value)]);
        id
    }

    pub fn color(&mut self, name: &str, r: f64, g: f64, b: f64) -> String {
        self.foundation(name, PrimitiveKind::Color, VariableValue::Color(Rgba::rgb(r, g, b)))
    }

    pub fn number(&mut self, name: &str, value: f64) -> String {
        self.foundation(name, PrimitiveKind::Number, VariableValue::Number(value))
    }

    pub fn string(&mut self, name: &str, value: &str) -> String {
        self.foundation(name, PrimitiveKind::String, VariableValue::String(value.into()))
    }

    /// Add a foundation color aliasing `target`.
    pub fn alias(&mut self, name: &str, target: &str) -> String {
        self.foundation(name, PrimitiveKind::Color, VariableValue::alias(target))
    }

    /// Add a theme color with the same value in every mode.
    pub fn theme(&mut self, name: &str, value: VariableValue) -> String {
        let id = self.id_for(name);
        let values = THEME_MODES
            .iter()
            .map(|(mode, _)| (*mode, value.clone()))
            .collect();
        self.insert(id.clone(), name, PrimitiveKind::Color, THEMES, values);
        id
    }

    pub fn text_style(&mut self, style: TextStyle) -> &mut Self {
        self.graph.push_text_style(style);
        self
    }

    pub fn build(self) -> VariableGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A small design system touching every token file.
pub fn sample_graph() -> VariableGraph {
    let mut builder = GraphBuilder::new();

    let blue = builder.color("blue/300", 0.1098, 0.3451, 0.851);
    builder.color("blue/100", 0.9, 0.95, 1.0);
    builder.color("neutral/0", 1.0, 1.0, 1.0);
    builder.color("neutral/900", 0.1, 0.1, 0.1);
    builder.alias("attachment/blue", &blue);

    builder.number("radius-xs", 2.0);
    builder.number("radius-m", 8.0);
    builder.number("spacing-xs", 4.0);
    builder.number("spacing-m", 16.0);

    let family = builder.string("font/family/sans", "Inter, sans-serif");
    builder.number("font/size/700", 32.0);
    builder.string("font/weight/regular", "Regular");
    builder.number("font/weight/bold", 700.0);
    let line_height = builder.number("line-height/heading/700", 40.0);

    builder.theme("text/link", VariableValue::alias(&blue));
    builder.theme("sidebar-bg", VariableValue::Color(Rgba::rgb(1.0, 1.0, 1.0)));

    builder.text_style(TextStyle {
        name: "Heading 700 - Regular".into(),
        font_family: "Inter".into(),
        font_style: "Regular".into(),
        font_size: 32.0,
        line_height: None,
        letter_spacing: None,
        bound_variables: BoundVariables {
            font_family: Some(AliasRef::new(family)),
            line_height: Some(AliasRef::new(line_height)),
            ..Default::default()
        },
        description: "Page titles".into(),
    });

    builder.build()
}

/// Render a graph in the design tool's local-variables export shape.
pub fn snapshot_json(graph: &VariableGraph) -> Value {
    let collections: Map<String, Value> = graph
        .collections()
        .map(|c| (c.id.clone(), serde_json::to_value(c).expect("collection serializes")))
        .collect();
    let variables: Map<String, Value> = graph
        .variables()
        .map(|v| (v.id.clone(), serde_json::to_value(v).expect("variable serializes")))
        .collect();

    json!({
        "status": 200,
        "error": false,
        "meta": {
            "variableCollections": collections,
            "variables": variables,
        },
        "textStyles": graph.text_styles(),
    })
}

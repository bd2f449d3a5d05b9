pub mod validate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use validate::{FieldIssue, JsonObject, ValidationError};

// --- Types ---

/// Identifier assigned to an item when an analysis response is parsed.
pub type ItemId = u32;

/// Diagram source text keyed by the item it was generated for.
/// Ordered by id so prompts built from it are stable.
pub type DiagramMapping = BTreeMap<ItemId, String>;

/// A closed set of string labels accepted on the wire.
pub trait EnumLabel: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Workflow,
    System,
    DataModel,
    Relationship,
}

impl Category {
    /// Declaration order, also the order groups appear in a summary.
    pub const ALL: [Category; 4] = [
        Category::Workflow,
        Category::System,
        Category::DataModel,
        Category::Relationship,
    ];

    /// Marker looked for in header lines of an analysis response.
    pub fn header_marker(self) -> &'static str {
        match self {
            Category::Workflow => "WORKFLOW",
            Category::System => "SYSTEM",
            Category::DataModel => "DATA MODEL",
            Category::Relationship => "RELATIONSHIP",
        }
    }

    /// Plural heading used when grouping items for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Workflow => "WORKFLOWS",
            Category::System => "SYSTEMS",
            Category::DataModel => "DATA MODELS",
            Category::Relationship => "RELATIONSHIPS",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedItem {
    pub id: ItemId,
    pub category: Category,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub items: Vec<IdentifiedItem>,
    pub summary: String,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    Er,
    State,
    C4,
}

impl EnumLabel for DiagramType {
    const ALL: &'static [Self] = &[
        DiagramType::Flowchart,
        DiagramType::Sequence,
        DiagramType::Class,
        DiagramType::Er,
        DiagramType::State,
        DiagramType::C4,
    ];

    fn as_str(self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Sequence => "sequence",
            DiagramType::Class => "class",
            DiagramType::Er => "er",
            DiagramType::State => "state",
            DiagramType::C4 => "c4",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Professional,
    Dark,
    Technical,
    Minimal,
    Creative,
}

impl EnumLabel for Theme {
    const ALL: &'static [Self] = &[
        Theme::Professional,
        Theme::Dark,
        Theme::Technical,
        Theme::Minimal,
        Theme::Creative,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Theme::Professional => "professional",
            Theme::Dark => "dark",
            Theme::Technical => "technical",
            Theme::Minimal => "minimal",
            Theme::Creative => "creative",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    #[default]
    Sidebar,
    Tabs,
    Minimal,
}

impl EnumLabel for NavigationStyle {
    const ALL: &'static [Self] = &[
        NavigationStyle::Sidebar,
        NavigationStyle::Tabs,
        NavigationStyle::Minimal,
    ];

    fn as_str(self) -> &'static str {
        match self {
            NavigationStyle::Sidebar => "sidebar",
            NavigationStyle::Tabs => "tabs",
            NavigationStyle::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub navigation_style: NavigationStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    /// The ID of the identified item
    pub id: i64,
    /// The title of the system/workflow
    pub title: String,
    /// Brief description of the item
    pub description: String,
    /// Type of Mermaid diagram to generate
    pub diagram_type: DiagramType,
}

// --- Tool arguments ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnalyzeContentArgs {
    /// The documentation or content to analyze for visualization opportunities
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVisualizationArgs {
    /// The original documentation content
    pub content: String,
    /// Array of selected systems with their preferred diagram types
    pub selected_systems: Vec<SelectedItem>,
    /// Visual theme for the HTML output
    #[serde(default)]
    pub theme: Theme,
    /// Navigation pattern to use
    #[serde(default)]
    pub navigation_style: NavigationStyle,
}

impl GenerateVisualizationArgs {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: self.theme,
            navigation_style: self.navigation_style,
        }
    }
}

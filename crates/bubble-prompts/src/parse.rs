use std::sync::LazyLock;

use bubble_core::{AnalysisResult, Category, DiagramMapping, IdentifiedItem, ItemId};
use regex::Regex;

use crate::prompt::format_analysis_summary;

/// `N. Title - Description`, with either a hyphen or an en-dash as separator.
static ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.\s+(\S.*?)\s*[-–]\s*(.+)$").expect("item line pattern")
});

/// A `### Diagram for Item N` header followed by a mermaid fence.
static DIAGRAM_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"###\s+Diagram for Item\s+([0-9]+)\s*\n```mermaid\s*\n(?s:(.+?))\n```")
        .expect("diagram block pattern")
});

/// Parse the generation service's reply to the analysis prompt into items
/// plus a summary the user can pick from.
///
/// Lines mentioning a category marker switch the current category; numbered
/// `title - description` lines become items. Ids are assigned 1..N in the
/// order items appear, ignoring the numbers written in the text. Anything
/// else is skipped, and descriptions never continue onto following lines.
pub fn parse_analysis_response(raw: &str) -> AnalysisResult {
    let items = extract_items(raw);
    tracing::debug!(items = items.len(), "parsed analysis response");
    let summary = format_analysis_summary(&items);
    AnalysisResult { items, summary }
}

pub fn extract_items(raw: &str) -> Vec<IdentifiedItem> {
    let mut items = Vec::new();
    let mut category = Category::Workflow;
    let mut next_id: ItemId = 1;

    for line in raw.lines() {
        let line = line.trim();

        if let Some(header) = header_category(line) {
            category = header;
            continue;
        }

        let Some(caps) = ITEM_LINE.captures(line) else {
            continue;
        };
        items.push(IdentifiedItem {
            id: next_id,
            category,
            title: caps[1].trim().to_string(),
            description: caps[2].trim().to_string(),
        });
        next_id += 1;
    }

    items
}

fn header_category(line: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|c| line.contains(c.header_marker()))
}

/// Collect labelled mermaid blocks from the reply to the diagram prompt.
///
/// Block bodies are trimmed. A later block for the same item replaces an
/// earlier one. Text without any matching block yields an empty mapping.
pub fn parse_diagram_blocks(raw: &str) -> DiagramMapping {
    let mut diagrams = DiagramMapping::new();

    for caps in DIAGRAM_BLOCK.captures_iter(raw) {
        let Ok(id) = caps[1].parse::<ItemId>() else {
            tracing::debug!(label = &caps[1], "skipping diagram with out-of-range item id");
            continue;
        };
        diagrams.insert(id, caps[2].trim().to_string());
    }

    tracing::debug!(diagrams = diagrams.len(), "parsed diagram response");
    diagrams
}

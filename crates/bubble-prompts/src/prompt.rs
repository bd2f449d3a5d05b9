use bubble_core::{
    Category, DiagramMapping, EnumLabel, GenerateVisualizationArgs, IdentifiedItem,
    RenderOptions, SelectedItem,
};

const ANALYSIS_TEMPLATE: &str = "\
Analyze the following content and identify visualization opportunities.

Look for:
1. **WORKFLOWS** - Processes, flows, or sequences (e.g., user registration flow, payment processing)
2. **SYSTEMS** - Architectures, services, or system components (e.g., microservices, database schemas)
3. **DATA MODELS** - Entities, objects, or data structures (e.g., User object, Order schema)
4. **RELATIONSHIPS** - Connections, integrations, or dependencies between components

For each item you identify, provide:
- A clear, descriptive title
- A brief explanation of what it represents
- Why it would benefit from visualization

Return your analysis as a structured list with categories.

CONTENT TO ANALYZE:
---
{content}
---

Format your response as a numbered list organized by category (WORKFLOWS, SYSTEMS, DATA MODELS, RELATIONSHIPS).";

const DIAGRAM_TEMPLATE: &str = "\
Generate Mermaid diagram code for the selected items.

For each selected item, choose the most appropriate diagram type:
- **flowchart** (graph TD/LR) - For processes, workflows, decision trees
- **sequence** - For interactions, API calls, communication flows
- **class** - For data models, object relationships, schemas
- **er** (Entity-Relationship) - For database schemas, data relationships
- **state** - For state machines, status transitions
- **c4** (Architecture) - For system architecture, component diagrams

Selected items:
{selectedItems}

Original content context:
---
{content}
---

For each selected item, generate clean, well-structured Mermaid diagram code.
Return each diagram under a heading of the form \"### Diagram for Item <number>\" \
followed by a ```mermaid code block, so it is clear which item each diagram represents.";

const HTML_TEMPLATE: &str = "\
You are an expert at creating beautiful, interactive HTML visualizations from documentation and structured content.

Generate a **complete, self-contained HTML file** that visualizes the following content.

# REQUIREMENTS

1. **Include everything inline** (CSS in <style>, JS in <script>)
2. **Use CDN for Mermaid only** (https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js)
3. **Works immediately** when opened in a browser
4. **Fully responsive** (mobile, tablet, desktop)
5. **Includes navigation** ({navigationStyle} style)
6. **Uses semantic HTML** (proper heading hierarchy, ARIA labels)
7. **Theme**: {theme}

# DESIGN PRINCIPLES

- **Visual Hierarchy** - Size, colour, spacing guide the eye
- **Consistency** - Uniform spacing, colours, typography
- **Progressive Disclosure** - Overview first, details on demand
- **Accessibility** - WCAG AA contrast (4.5:1), semantic HTML, keyboard navigation
- **Responsive** - Mobile-first, works on all screen sizes

# MERMAID DIAGRAMS TO INCLUDE

{diagrams}

# ORIGINAL CONTENT

---
{content}
---

# OUTPUT FORMAT

Generate a single, complete HTML file that:
- Includes all the Mermaid diagrams in appropriate sections
- Presents all other content in well-structured cards/sections
- Has smooth navigation between sections
- Looks professional and polished

Return ONLY the complete HTML code, no explanations.";

/// Both halves of the visualization workflow handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationPrompts {
    /// Prompt asking the generation service for one mermaid block per item.
    pub step1_prompt: String,
    /// How to turn the step-1 reply into the final HTML prompt.
    pub step2_instructions: String,
}

/// Substitute each `(token, value)` pair at its first occurrence in a single
/// left-to-right pass. Substituted values are never rescanned, so content
/// that happens to contain a placeholder token is emitted verbatim.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut pending = slots.to_vec();
    let mut rest = template;

    loop {
        let next = pending
            .iter()
            .enumerate()
            .filter_map(|(idx, (token, _))| rest.find(*token).map(|pos| (pos, idx)))
            .min();
        let Some((pos, idx)) = next else {
            break;
        };
        let (token, value) = pending.remove(idx);
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + token.len()..];
    }

    out.push_str(rest);
    out
}

pub fn analysis_prompt(content: &str) -> String {
    fill(ANALYSIS_TEMPLATE, &[("{content}", content)])
}

fn format_selected_items(items: &[SelectedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}. {} ({}) - Diagram type: {}",
                idx + 1,
                item.title,
                item.description,
                item.diagram_type.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn diagram_prompt(content: &str, items: &[SelectedItem]) -> String {
    let selected = format_selected_items(items);
    fill(
        DIAGRAM_TEMPLATE,
        &[("{selectedItems}", &selected), ("{content}", content)],
    )
}

pub fn step2_instructions(options: RenderOptions) -> String {
    format!(
        "After the LLM generates Mermaid diagrams, build the final HTML prompt with:\n\
- The original content\n\
- The generated Mermaid diagram code (a mapping of item IDs to diagram code, \
parsed from the \"### Diagram for Item N\" blocks)\n\
- Theme: {}\n\
- Navigation style: {}\n\n\
Pass these to the build_final_prompt helper and send its output to the LLM.",
        options.theme.as_str(),
        options.navigation_style.as_str()
    )
}

pub fn visualization_prompts(args: &GenerateVisualizationArgs) -> VisualizationPrompts {
    VisualizationPrompts {
        step1_prompt: diagram_prompt(&args.content, &args.selected_systems),
        step2_instructions: step2_instructions(args.render_options()),
    }
}

fn format_diagram_section(diagrams: &DiagramMapping) -> String {
    diagrams
        .iter()
        .map(|(id, code)| format!("### Diagram for Item {id}\n```mermaid\n{code}\n```"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the prompt that asks for the single self-contained HTML document.
pub fn build_final_prompt(
    content: &str,
    diagrams: &DiagramMapping,
    options: RenderOptions,
) -> String {
    let section = format_diagram_section(diagrams);
    fill(
        HTML_TEMPLATE,
        &[
            ("{navigationStyle}", options.navigation_style.as_str()),
            ("{theme}", options.theme.as_str()),
            ("{diagrams}", &section),
            ("{content}", content),
        ],
    )
}

/// Group items by category for display and ask the user which to visualize.
pub fn format_analysis_summary(items: &[IdentifiedItem]) -> String {
    let mut out = String::from("I've identified these visualization opportunities:\n\n");

    for category in Category::ALL {
        let mut group = items.iter().filter(|i| i.category == category).peekable();
        if group.peek().is_none() {
            continue;
        }
        out.push_str(category.display_name());
        out.push_str(":\n");
        for item in group {
            out.push_str(&format!("{}. {} - {}\n", item.id, item.title, item.description));
        }
        out.push('\n');
    }

    out.push_str("Which items would you like me to create visualizations for?\n");
    out.push_str("Respond with the numbers (e.g., '1, 3, 5' or '1-4, 7')");
    out
}

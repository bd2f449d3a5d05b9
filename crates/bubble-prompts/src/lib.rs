//! Prompt templates and reply parsing for the visualization workflow.
//!
//! Nothing here talks to a generation service. Builders produce prompt text
//! for the caller to send; parsers read the text the caller got back.

mod parse;
mod prompt;

pub use parse::{extract_items, parse_analysis_response, parse_diagram_blocks};
pub use prompt::{
    analysis_prompt, build_final_prompt, diagram_prompt, format_analysis_summary,
    step2_instructions, visualization_prompts, VisualizationPrompts,
};

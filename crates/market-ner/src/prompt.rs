//! Extraction prompt rendering
//!
//! The prompt is a single Mixtral-style `[INST] ... [/INST]` block holding
//! the role, the rules, the ticker allow-list, the few-shot examples and
//! finally the user text in the same `Input:`/`Output:` shape as the
//! examples. Every embedded user string is JSON-encoded, so quotes and
//! newlines in the input stay inside one string literal.

use crate::error::Result;
use crate::profile::ExtractionProfile;
use minijinja::{Environment, context};
use serde::Serialize;

const EXTRACTION_TEMPLATE: &str = r#"[INST] You are an expert financial entity extractor. Read the user's text and extract the company name, the stock ticker and the date range it mentions.

Rules:
1. "ticker" must end with "{{ suffix }}" and must be one of the valid tickers listed below. If the company is not in the list, "ticker" is null.
2. If a company name is ambiguous, use the context of the text to pick the listed company that is meant.
3. Any entity that is not mentioned must be null.
4. Reply with one JSON object with exactly the keys "company_name", "ticker" and "date_range". Do not add explanations, markdown or any text before or after the JSON.

Valid tickers: {{ tickers | join(", ") }}

{% for example in examples -%}
Input: {{ example.input }}
Output: {{ example.output }}

{% endfor -%}
Input: {{ input }}
[/INST]
Output:"#;

#[derive(Debug, Serialize)]
struct RenderedExample {
    input: String,
    output: String,
}

/// Render the extraction prompt for `text`
pub fn render(profile: &ExtractionProfile, text: &str) -> Result<String> {
    let examples = profile
        .examples
        .iter()
        .map(|example| {
            Ok(RenderedExample {
                input: serde_json::to_string(&example.input)?,
                output: serde_json::to_string(&example.output)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let env = Environment::new();
    let prompt = env.render_str(
        EXTRACTION_TEMPLATE,
        context! {
            suffix => profile.universe.suffix(),
            tickers => profile.universe.qualified_symbols(),
            examples => examples,
            input => serde_json::to_string(text)?,
        },
    )?;

    Ok(prompt)
}

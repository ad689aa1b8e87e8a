//! Requirement extraction from RFP text.
//!
//! The extraction strategy is fixed once at construction: model-backed when
//! a credential is configured, a deterministic fallback otherwise. Model
//! output is parsed against a rigid schema; any transport or parse failure
//! degrades to zero requirements so the document pipeline keeps going and
//! produces a zero-value quote instead of aborting.

use serde::Deserialize;
use tracing::{info, warn};

use tenderflow_core::Requirement;

use crate::llm::{ChatClient, ChatConfig};
use crate::AiError;

/// Documents are truncated to this many characters before prompting, to
/// stay inside model context limits.
pub const MAX_PROMPT_CHARS: usize = 30_000;

#[derive(Deserialize)]
struct Extraction {
    items: Vec<Requirement>,
}

/// How requirements are obtained for a document.
pub enum RequirementSource {
    /// Prompt a hosted model and parse its structured reply.
    ModelBacked(ChatClient),
    /// No credential configured: emit one fixed mock requirement so the
    /// rest of the pipeline stays exercisable.
    FixedFallback,
}

impl RequirementSource {
    /// Select the strategy from credential availability. An empty key
    /// counts as absent.
    pub fn from_credentials(
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, AiError> {
        match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                let mut config = ChatConfig::new(key);
                if let Some(model) = model {
                    config = config.with_model(model);
                }
                let client = ChatClient::new(config)?;
                info!(model = %client.model(), "requirement extraction is model-backed");
                Ok(Self::ModelBacked(client))
            }
            None => {
                warn!("no model credential configured; requirement extraction uses fixed fallback");
                Ok(Self::FixedFallback)
            }
        }
    }

    /// Extract scope-of-supply requirements from document text.
    ///
    /// Soft-fails to an empty list on any model or parse error; the caller
    /// treats zero requirements as a valid (if empty) document.
    pub async fn extract(&self, text: &str) -> Vec<Requirement> {
        match self {
            Self::FixedFallback => vec![fallback_requirement()],
            Self::ModelBacked(client) => {
                let prompt = build_prompt(text);
                let raw = match client.complete(&prompt).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(error = %e, "model call failed; continuing with zero requirements");
                        return Vec::new();
                    }
                };
                match parse_items(&raw) {
                    Ok(items) => {
                        info!(count = items.len(), "extracted requirements");
                        items
                    }
                    Err(e) => {
                        warn!(error = %e, "extraction parse failed; continuing with zero requirements");
                        Vec::new()
                    }
                }
            }
        }
    }
}

/// The single deterministic requirement used when no model is configured.
pub fn fallback_requirement() -> Requirement {
    Requirement::new("Mock AI Item")
        .with_spec("voltage", "11kV")
        .with_spec("insulation", "Mock")
}

/// Parse a model reply into requirements.
///
/// Tolerates markdown fences and surrounding prose by parsing the outermost
/// `{...}` span; everything else is a parse error.
pub fn parse_items(raw: &str) -> Result<Vec<Requirement>, AiError> {
    let json = outer_json_object(raw)
        .ok_or_else(|| AiError::Parse("no JSON object in model output".to_string()))?;
    let extraction: Extraction = serde_json::from_str(json)?;
    Ok(extraction.items)
}

fn outer_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end >= start).then(|| &raw[start..=end])
}

fn build_prompt(text: &str) -> String {
    let safe_text: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!(
        "You are an expert Technical Sales Engineer. Extract the 'Scope of Supply' from the \
         following RFP text. Identify cable requirements, specifications, AND quantities.\n\
         \n\
         RFP Text:\n\
         {safe_text}\n\
         \n\
         Respond with ONLY a JSON object of the form:\n\
         {{\"items\": [{{\"name\": \"<item name>\", \"quantity\": <number>, \
         \"specs\": {{\"voltage\": \"...\", \"insulation\": \"...\", \"cores\": \"...\", \
         \"armouring\": \"...\"}}}}]}}\n\
         Omit specs you cannot find. No prose, no markdown."
    )
}

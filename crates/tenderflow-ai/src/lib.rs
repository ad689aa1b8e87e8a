//! AI layer: text embeddings, LLM chat client, and requirement extraction.

mod embed;
mod error;
mod extract;
mod llm;
#[cfg(feature = "onnx")]
mod onnx;

pub use embed::{HashingEmbedder, TextEmbedder};
pub use error::AiError;
pub use extract::{RequirementSource, fallback_requirement, parse_items};
pub use llm::{ChatClient, ChatConfig};
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

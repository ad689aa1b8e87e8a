//! Document intake.
//!
//! Real PDF/OCR extraction is an external collaborator; the pipeline only
//! needs plain text and a page count. Bytes prefixed with the demo marker
//! bypass the reader entirely and yield a fixed scope-of-work so the full
//! pipeline can be demonstrated with zero external dependencies.

use tenderflow_core::Requirement;

use crate::PipelineError;

/// Documents starting with this marker take the demo path.
pub const DEMO_PREFIX: &[u8] = b"Simulated PDF Content";

/// Trimmed text shorter than this is treated as a failed extraction
/// (empty PDF or a scanned image needing OCR).
pub const MIN_TEXT_CHARS: usize = 50;

const DEMO_SCOPE: &str = "\nSCOPE OF WORK:\n\
    1. Supply of 11kV XLPE Power Cable, 3 Core, 300sqmm, Armoured. Quantity: 5000 meters.\n\
    2. Supply of 1.1kV PVC Control Cable, 12 Core, 1.5sqmm, Unarmoured. Quantity: 2000 meters.\n\
    3. Enterprise Cloud Hosting & Managed Services for SCADA System. Quantity: 12 months.\n";

/// Extracted document text plus page count.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub text: String,
    pub pages: usize,
}

/// Turns uploaded bytes into plain text. Implemented externally for real
/// document formats; [`PlainTextReader`] covers text payloads and tests.
pub trait DocumentReader: Send + Sync {
    fn read(&self, bytes: &[u8]) -> Result<DocumentText, PipelineError>;
}

/// Treats the payload as UTF-8 text (lossy) with a single page.
pub struct PlainTextReader;

impl DocumentReader for PlainTextReader {
    fn read(&self, bytes: &[u8]) -> Result<DocumentText, PipelineError> {
        Ok(DocumentText {
            text: String::from_utf8_lossy(bytes).into_owned(),
            pages: 1,
        })
    }
}

pub fn is_demo_document(bytes: &[u8]) -> bool {
    bytes.starts_with(DEMO_PREFIX)
}

/// Demo text: the payload itself plus the fixed scope-of-work block.
pub(crate) fn demo_document_text(bytes: &[u8]) -> DocumentText {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    text.push_str(DEMO_SCOPE);
    DocumentText { text, pages: 1 }
}

/// The fixed requirements the demo document always extracts to, keeping
/// demo runs reproducible without a model call.
pub fn demo_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new("11kV XLPE Power Cable, 3 Core, 300sqmm, Armoured")
            .with_quantity(5000.0)
            .with_spec("voltage", "11kV")
            .with_spec("insulation", "XLPE")
            .with_spec("cores", "3")
            .with_spec("armouring", "Strip"),
        Requirement::new("1.1kV PVC Control Cable, 12 Core, 1.5sqmm, Unarmoured")
            .with_quantity(2000.0)
            .with_spec("voltage", "1.1kV")
            .with_spec("insulation", "PVC")
            .with_spec("cores", "12")
            .with_spec("armouring", "Unarmoured"),
        Requirement::new("Enterprise Cloud Hosting & Managed Services")
            .with_quantity(12.0)
            .with_spec("type", "Cloud")
            .with_spec("sla", "99.9%")
            .with_spec("platform", "AWS/Azure"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_marker_detection() {
        assert!(is_demo_document(b"Simulated PDF Content: Tender 42"));
        assert!(!is_demo_document(b"%PDF-1.7 ..."));
        assert!(!is_demo_document(b""));
    }

    #[test]
    fn demo_text_appends_scope_block() {
        let doc = demo_document_text(b"Simulated PDF Content");
        assert!(doc.text.starts_with("Simulated PDF Content"));
        assert!(doc.text.contains("SCOPE OF WORK"));
        assert!(doc.text.contains("11kV XLPE Power Cable"));
        assert_eq!(doc.pages, 1);
    }

    #[test]
    fn demo_requirements_are_three_fixed_items() {
        let reqs = demo_requirements();
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].quantity, 5000.0);
        assert_eq!(reqs[0].specs["insulation"], "XLPE");
        assert_eq!(reqs[1].specs["voltage"], "1.1kV");
        assert_eq!(reqs[2].quantity, 12.0);
        assert_eq!(reqs[2].specs["type"], "Cloud");
    }

    #[test]
    fn plain_text_reader_decodes_lossy() {
        let doc = PlainTextReader.read(b"tender text \xFF here").unwrap();
        assert!(doc.text.starts_with("tender text"));
        assert_eq!(doc.pages, 1);
    }
}

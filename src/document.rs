use crate::error::{TmulError, TmulResult};
use crate::node::Node;

/// Value the root `type` attribute must carry.
pub const DOCUMENT_TYPE: &str = "tmul-1.0v";

/// Check that a decoded tree is a renderable document: its root must declare
/// `type="tmul-1.0v"`. The attribute key matches in any casing; the value
/// must match exactly.
pub fn validate(root: &Node) -> TmulResult<()> {
    match root.attr("type") {
        None => Err(TmulError::MissingDocumentType {
            root: root.kind.clone(),
        }),
        Some(DOCUMENT_TYPE) => Ok(()),
        Some(found) => Err(TmulError::UnsupportedDocumentType {
            found: found.to_string(),
            expected: DOCUMENT_TYPE.to_string(),
        }),
    }
}

pub fn is_renderable(root: &Node) -> bool {
    validate(root).is_ok()
}

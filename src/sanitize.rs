//! Cleanup of model output before it is returned to callers.
//!
//! The model is told not to use markdown, but it still wraps JSON and HTML
//! in code fences often enough that every response goes through here.

/// Fence markers, removed in this order. Bare fences last so that the
/// language-tagged ones are not split apart first.
const FENCES: [&str; 3] = ["```json", "```html", "```"];

/// Remove every markdown code-fence marker from `raw`.
///
/// Total and idempotent: after the final pass no run of three backticks
/// can remain, so a second call finds nothing to remove.
pub fn sanitize(raw: &str) -> String {
    FENCES
        .iter()
        .fold(raw.to_string(), |text, fence| text.replace(fence, ""))
}

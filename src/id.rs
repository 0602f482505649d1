use uuid::Uuid;

/// Returns a fresh random identifier in UUID v4 textual form.
///
/// Identifier generation has no fallback: an unavailable OS random source
/// aborts rather than degrading to a weaker generator.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

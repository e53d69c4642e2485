//! Reserved and derived storage keys.

/// Reserved key holding the JSON array of every indexed shipment ID.
pub const LC_KEYS: &str = "LCKeys";

/// Composite key under which a document's raw content is stored.
///
/// No escaping is applied: `("a_b", "c")` and `("a", "b_c")` collide, as
/// they always have for existing ledgers.
pub fn document_key(shipment_id: &str, document_name: &str) -> String {
    format!("{shipment_id}_{document_name}")
}

//! Opaque identifier generation.
//!
//! Panels, panel-content blocks, table rows/cells and draft content blocks
//! are keyed by process-generated tokens. They are unique within one
//! conversion and carry no meaning; nothing may depend on their values.

use uuid::Uuid;

/// A fresh opaque identifier.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}

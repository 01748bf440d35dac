//! Form payloads submitted by the catalog pages.
//!
//! Raw forms are deserialized as plain strings and turned into typed payloads
//! by `validate_with`, which trims, checks and HTML-escapes every field and
//! reports all failing fields at once.

pub mod categories;
pub mod products;
pub mod validation;

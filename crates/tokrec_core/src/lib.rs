//! Schema-driven record decoding over pull-based token cursors.

/// Schemas, token cursors, presence tracking, and the record decoder.
pub mod rec;

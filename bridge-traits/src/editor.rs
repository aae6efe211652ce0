//! Editor Insertion Abstraction
//!
//! The host editor owns the cursor/selection. The core hands it a finished
//! block of text and never touches the document directly.

use async_trait::async_trait;

use crate::error::Result;

/// Destination for enriched text
///
/// Implemented by the host document integration. `insert_text` places the text
/// at the current cursor, replacing the selection if there is one.
#[async_trait]
pub trait EditorSink: Send + Sync {
    /// Insert `text` at the caller's insertion point
    async fn insert_text(&self, text: &str) -> Result<()>;
}

//! # Flexline
//!
//! A single-level flex layout resolver.
//!
//! Given a container's flex attributes, per-item attributes, and the box
//! metrics of its children, flexline decides where every child goes and how
//! wide it is. It does not paint anything: the host reports measurements
//! through [`layout::StyleProvider`] and receives geometry through
//! [`layout::BoxMutator`].
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [style]    — Attribute model: parse + resolve container/item attributes
//!       ↓
//!   [layout]   — adapter → lines → flex → cross → justify
//!       ↓
//!   [model]    — Host boundary: box metrics in, geometry patches out
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::Serialize;

pub use error::FlexError;
use layout::{FlexLayout, FlexRequest, LayoutEngine};
use model::{Document, GeometryRecorder};
use style::{resolve_container_attributes, resolve_item_attributes};

/// The result of laying out a [`Document`]: the resolved layout and the
/// geometry patches as the host would have received them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub layout: FlexLayout,
    pub geometry: GeometryRecorder,
}

/// Lay out a document.
///
/// This is the primary entry point for in-memory hosts.
pub fn layout(document: &Document) -> Result<LayoutOutput, FlexError> {
    let attributes = resolve_container_attributes(&document.container.attributes)?;
    let items = resolve_item_attributes(&document.items, document.children.len())?;
    let children = document.child_ids();

    let request = FlexRequest {
        width: document.container.width,
        attributes: &attributes,
        items: &items,
        children: &children,
    };

    let mut geometry = GeometryRecorder::new();
    let layout = LayoutEngine::new().layout(&request, document, &mut geometry)?;
    Ok(LayoutOutput { layout, geometry })
}

/// Lay out a document described as JSON.
pub fn layout_json(json: &str) -> Result<LayoutOutput, FlexError> {
    let document: Document = serde_json::from_str(json)?;
    layout(&document)
}

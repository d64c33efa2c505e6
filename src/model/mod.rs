//! # Document Model
//!
//! Box metrics, geometry records, and an in-memory host. The layout engine
//! never touches a live tree; it asks a [`StyleProvider`] for numbers and
//! hands results to a [`BoxMutator`]. [`Document`] and [`GeometryRecorder`]
//! are the JSON-backed implementations of those two traits used by the CLI,
//! the WASM binding and the tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::{BoxMutator, MeasureContext, MeasureError, StyleProvider};
use crate::style::{RawContainerAttributes, RawItemAttributeTable};

/// Identifies a box on the host side. For [`Document`] it is the child index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxId(pub usize);

/// Edge values (top, right, bottom, left) used for margin, border and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Whether a box takes part in layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoxDisplay {
    #[default]
    Normal,
    None,
}

/// Computed metrics of one box, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    pub padding: Edges,
    pub border: Edges,
    pub margin: Edges,
    /// Declared content width; `None` when the host's width is `auto`.
    pub content_width: Option<f64>,
    pub content_height: f64,
    pub display: BoxDisplay,
}

impl BoxMetrics {
    /// Padding + border + margin along the main (horizontal) axis.
    pub fn main_extras(&self) -> f64 {
        self.padding.horizontal() + self.border.horizontal() + self.margin.horizontal()
    }

    /// Padding + border + margin along the cross (vertical) axis.
    pub fn cross_extras(&self) -> f64 {
        self.padding.vertical() + self.border.vertical() + self.margin.vertical()
    }
}

/// Positioning mode written to a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Relative,
    Absolute,
}

/// A geometry patch. Each call to [`BoxMutator::apply_geometry`] carries
/// only the properties it sets; unset fields are left as they were.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Geometry {
    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }

    /// Overlay `patch` onto `self`.
    pub fn merge(&mut self, patch: &Geometry) {
        if patch.position.is_some() {
            self.position = patch.position;
        }
        if patch.top.is_some() {
            self.top = patch.top;
        }
        // left and right are alternative anchors
        if patch.left.is_some() {
            self.left = patch.left;
            self.right = None;
        }
        if patch.right.is_some() {
            self.right = patch.right;
            self.left = None;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
    }
}

// ── JSON-backed host ───────────────────────────────────────────

/// A complete layout request: one container and its children.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub container: ContainerNode,
    /// Item attribute table (`all` and index/name overrides).
    #[serde(default)]
    pub items: RawItemAttributeTable,
    #[serde(default)]
    pub children: Vec<BoxNode>,
}

/// The flex container: its available width and raw attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNode {
    pub width: f64,
    #[serde(default)]
    pub attributes: RawContainerAttributes,
}

/// One child box with its computed metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxNode {
    /// Optional name, matched against item table keys.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display: BoxDisplay,
    #[serde(default)]
    pub padding: Edges,
    #[serde(default)]
    pub border: Edges,
    #[serde(default)]
    pub margin: Edges,
    /// Declared content width; omit for `auto`.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: f64,
    /// Natural width of the box's content, if the host measured it.
    #[serde(default)]
    pub intrinsic_width: Option<f64>,
}

impl Document {
    /// Ids of all children in document order, including non-participating ones.
    pub fn child_ids(&self) -> Vec<BoxId> {
        (0..self.children.len()).map(BoxId).collect()
    }

    fn node(&self, id: BoxId) -> Option<&BoxNode> {
        self.children.get(id.0)
    }
}

impl StyleProvider for Document {
    fn computed_box_metrics(&self, id: BoxId) -> BoxMetrics {
        match self.node(id) {
            Some(node) => BoxMetrics {
                padding: node.padding,
                border: node.border,
                margin: node.margin,
                content_width: node.width,
                content_height: node.height,
                display: node.display,
            },
            None => BoxMetrics {
                display: BoxDisplay::None,
                ..Default::default()
            },
        }
    }

    fn intrinsic_content_width(
        &self,
        id: BoxId,
        cx: &mut MeasureContext,
    ) -> Result<f64, MeasureError> {
        let node = self
            .node(id)
            .ok_or_else(|| MeasureError::new("box is not part of the document"))?;
        let natural = node
            .intrinsic_width
            .ok_or_else(|| MeasureError::new("no intrinsic width was reported for this box"))?;
        Ok(cx.constrain(natural))
    }

    fn box_name(&self, id: BoxId) -> Option<&str> {
        self.node(id).and_then(|n| n.name.as_deref())
    }
}

/// Collects geometry patches, merging them per box.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRecorder {
    /// Set once the container has been made an offset-positioning context.
    pub container: Option<Geometry>,
    pub boxes: BTreeMap<BoxId, Geometry>,
    /// Number of `apply_geometry` calls received.
    #[serde(skip)]
    pub calls: usize,
}

impl GeometryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: BoxId) -> Option<&Geometry> {
        self.boxes.get(&id)
    }
}

impl BoxMutator for GeometryRecorder {
    fn establish_containing_block(&mut self) {
        self.container = Some(Geometry {
            position: Some(Position::Relative),
            ..Default::default()
        });
    }

    fn apply_geometry(&mut self, id: BoxId, geometry: &Geometry) {
        self.calls += 1;
        self.boxes.entry(id).or_default().merge(geometry);
    }
}

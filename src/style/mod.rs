//! # Attribute Model
//!
//! Typed container and item attributes. Raw records come straight from the
//! input (CSS-like kebab-case keys, string values) and are closed: unknown
//! keys are rejected at deserialization. `resolve_*` turns them into the
//! concrete records the layout engine consumes, applying defaults explicitly.
//!
//! We implement the single-level, row-axis subset of flexbox. Column main
//! axes are rejected rather than silently laid out as rows.

pub mod shorthand;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::FlexError;
use shorthand::{parse_basis, parse_flex, parse_length, FlexShorthand};

// ── Container keywords ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignItems {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
    Baseline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignContent {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    #[default]
    Stretch,
}

/// An item's hypothetical main size before grow/shrink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum FlexBasis {
    /// Use the item's explicit width, else its content.
    #[default]
    Auto,
    /// Use the intrinsic content width reported by the host.
    Content,
    /// Fixed length in pixels.
    Length(f64),
    /// Percentage of the container width.
    Percent(f64),
}

// ── Raw records ────────────────────────────────────────────────

/// A length as written in the input: `120`, or `"120px"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLength {
    Number(f64),
    Text(String),
}

impl RawLength {
    fn resolve(&self, property: &str) -> Result<f64, FlexError> {
        let px = match self {
            RawLength::Number(n) => *n,
            RawLength::Text(s) => parse_length(property, s)?,
        };
        if px < 0.0 {
            return Err(FlexError::invalid(property, &px.to_string(), "must not be negative"));
        }
        Ok(px)
    }
}

/// Container attributes as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawContainerAttributes {
    /// Only `flex` is accepted.
    pub display: Option<String>,
    /// `<direction> [<wrap>]`, takes precedence over the longhands.
    pub flex_flow: Option<String>,
    pub flex_direction: Option<String>,
    pub flex_wrap: Option<String>,
    pub justify_content: Option<String>,
    pub align_items: Option<String>,
    pub align_content: Option<String>,
    pub height: Option<RawLength>,
}

/// Per-item attributes as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawItemAttributes {
    pub flex: Option<String>,
    pub flex_grow: Option<f64>,
    pub flex_shrink: Option<f64>,
    pub flex_basis: Option<String>,
    pub order: Option<i32>,
    pub align_self: Option<String>,
    pub width: Option<RawLength>,
    pub min_width: Option<RawLength>,
    pub max_width: Option<RawLength>,
}

/// The item table: `all` is the shared default, any other key is either a
/// child index (`"0"`, `"3"`) or a box name reported by the host.
pub type RawItemAttributeTable = BTreeMap<String, RawItemAttributes>;

// ── Resolved records ───────────────────────────────────────────

/// Container attributes after defaults. Immutable for one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerAttributes {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    /// Explicit content height of the container, if any.
    pub height: Option<f64>,
}

impl ContainerAttributes {
    pub fn is_single_line(&self) -> bool {
        self.wrap == FlexWrap::NoWrap
    }

    pub fn is_line_reverse(&self) -> bool {
        self.wrap == FlexWrap::WrapReverse
    }
}

/// Resolved per-item attributes. `grow` and `shrink` are never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAttributes {
    pub grow: f64,
    pub shrink: f64,
    pub basis: FlexBasis,
    pub order: i32,
    /// `None` means `auto`: inherit the container's `align-items`.
    pub align_self: Option<AlignItems>,
    pub width: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
}

impl Default for ItemAttributes {
    fn default() -> Self {
        Self {
            grow: FlexShorthand::INITIAL.grow,
            shrink: FlexShorthand::INITIAL.shrink,
            basis: FlexShorthand::INITIAL.basis,
            order: 0,
            align_self: None,
            width: None,
            min_width: None,
            max_width: None,
        }
    }
}

impl ItemAttributes {
    pub fn is_inflexible(&self) -> bool {
        self.grow == 0.0 && self.shrink == 0.0
    }
}

/// Resolved item table with a distinguished default.
#[derive(Debug, Clone, Default)]
pub struct ItemAttributeTable {
    pub default: ItemAttributes,
    pub by_index: HashMap<usize, ItemAttributes>,
    pub by_name: HashMap<String, ItemAttributes>,
}

impl ItemAttributeTable {
    /// Index overrides win over name overrides, which win over the default.
    pub fn lookup(&self, index: usize, name: Option<&str>) -> &ItemAttributes {
        if let Some(attrs) = self.by_index.get(&index) {
            return attrs;
        }
        name.and_then(|n| self.by_name.get(n))
            .unwrap_or(&self.default)
    }
}

// ── Resolution ─────────────────────────────────────────────────

/// Resolve raw container attributes, applying defaults.
pub fn resolve_container_attributes(
    raw: &RawContainerAttributes,
) -> Result<ContainerAttributes, FlexError> {
    if let Some(other) = raw.display.as_deref().filter(|d| *d != "flex") {
        return Err(FlexError::invalid("display", other, "expected flex"));
    }

    let (direction, wrap) = match raw.flex_flow.as_deref() {
        Some(flow) => {
            let parts: Vec<&str> = flow.split_whitespace().collect();
            match parts.as_slice() {
                [direction] => (parse_direction(direction)?, FlexWrap::NoWrap),
                [direction, wrap] => (parse_direction(direction)?, parse_wrap(wrap)?),
                _ => return Err(FlexError::invalid("flex-flow", flow, "expected `<direction> [<wrap>]`")),
            }
        }
        None => (
            raw.flex_direction.as_deref().map(parse_direction).transpose()?.unwrap_or_default(),
            raw.flex_wrap.as_deref().map(parse_wrap).transpose()?.unwrap_or_default(),
        ),
    };

    Ok(ContainerAttributes {
        direction,
        wrap,
        justify_content: raw
            .justify_content
            .as_deref()
            .map(parse_justify_content)
            .transpose()?
            .unwrap_or_default(),
        align_items: raw
            .align_items
            .as_deref()
            .map(|v| parse_align_items("align-items", v))
            .transpose()?
            .unwrap_or_default(),
        align_content: raw
            .align_content
            .as_deref()
            .map(parse_align_content)
            .transpose()?
            .unwrap_or_default(),
        height: raw.height.as_ref().map(|h| h.resolve("height")).transpose()?,
    })
}

/// Resolve a single raw item record.
pub fn resolve_item_attribute(raw: &RawItemAttributes) -> Result<ItemAttributes, FlexError> {
    let flex = match raw.flex.as_deref() {
        Some(value) => parse_flex(value)?,
        None => FlexShorthand::INITIAL,
    };

    let grow = match raw.flex_grow {
        Some(g) if g < 0.0 => return Err(FlexError::invalid("flex-grow", &g.to_string(), "must not be negative")),
        Some(g) => g,
        None => flex.grow,
    };
    let shrink = match raw.flex_shrink {
        Some(s) if s < 0.0 => return Err(FlexError::invalid("flex-shrink", &s.to_string(), "must not be negative")),
        Some(s) => s,
        None => flex.shrink,
    };
    let basis = match raw.flex_basis.as_deref() {
        Some(value) => parse_basis(value)?,
        None => flex.basis,
    };

    let align_self = match raw.align_self.as_deref() {
        None | Some("auto") => None,
        Some(value) => Some(parse_align_items("align-self", value)?),
    };

    let min_width = raw.min_width.as_ref().map(|l| l.resolve("min-width")).transpose()?;
    let max_width = raw.max_width.as_ref().map(|l| l.resolve("max-width")).transpose()?;
    if let (Some(min), Some(max)) = (min_width, max_width) {
        if min > max {
            log::warn!("min-width {} exceeds max-width {}; min-width wins", min, max);
        }
    }

    Ok(ItemAttributes {
        grow,
        shrink,
        basis,
        order: raw.order.unwrap_or(0),
        align_self,
        width: raw.width.as_ref().map(|l| l.resolve("width")).transpose()?,
        min_width,
        max_width,
    })
}

/// Resolve the whole item table. `item_count` bounds the index keys; an
/// index past the end is kept but will never match.
pub fn resolve_item_attributes(
    raw: &RawItemAttributeTable,
    item_count: usize,
) -> Result<ItemAttributeTable, FlexError> {
    let mut table = ItemAttributeTable::default();

    for (key, record) in raw {
        let attrs = resolve_item_attribute(record)?;
        if key == "all" {
            table.default = attrs;
        } else if let Ok(index) = key.parse::<usize>() {
            if index >= item_count {
                log::warn!("item attributes for index {} but only {} items", index, item_count);
            }
            table.by_index.insert(index, attrs);
        } else {
            table.by_name.insert(key.clone(), attrs);
        }
    }

    Ok(table)
}

// ── Keyword parsers ────────────────────────────────────────────

fn parse_direction(value: &str) -> Result<FlexDirection, FlexError> {
    match value {
        "row" => Ok(FlexDirection::Row),
        "row-reverse" => Ok(FlexDirection::RowReverse),
        "column" | "column-reverse" => Err(FlexError::invalid(
            "flex-direction",
            value,
            "column main axes are not supported",
        )),
        _ => Err(FlexError::invalid("flex-direction", value, "unknown direction")),
    }
}

fn parse_wrap(value: &str) -> Result<FlexWrap, FlexError> {
    match value {
        "nowrap" => Ok(FlexWrap::NoWrap),
        "wrap" => Ok(FlexWrap::Wrap),
        "wrap-reverse" => Ok(FlexWrap::WrapReverse),
        _ => Err(FlexError::invalid("flex-wrap", value, "expected nowrap, wrap or wrap-reverse")),
    }
}

fn parse_justify_content(value: &str) -> Result<JustifyContent, FlexError> {
    match value {
        "flex-start" => Ok(JustifyContent::FlexStart),
        "flex-end" => Ok(JustifyContent::FlexEnd),
        "center" => Ok(JustifyContent::Center),
        "space-between" => Ok(JustifyContent::SpaceBetween),
        "space-around" => Ok(JustifyContent::SpaceAround),
        "space-evenly" => Ok(JustifyContent::SpaceEvenly),
        _ => Err(FlexError::invalid("justify-content", value, "unknown keyword")),
    }
}

fn parse_align_items(property: &str, value: &str) -> Result<AlignItems, FlexError> {
    match value {
        "flex-start" => Ok(AlignItems::FlexStart),
        "flex-end" => Ok(AlignItems::FlexEnd),
        "center" => Ok(AlignItems::Center),
        "stretch" => Ok(AlignItems::Stretch),
        "baseline" => Ok(AlignItems::Baseline),
        _ => Err(FlexError::invalid(property, value, "unknown keyword")),
    }
}

fn parse_align_content(value: &str) -> Result<AlignContent, FlexError> {
    match value {
        "flex-start" => Ok(AlignContent::FlexStart),
        "flex-end" => Ok(AlignContent::FlexEnd),
        "center" => Ok(AlignContent::Center),
        "space-between" => Ok(AlignContent::SpaceBetween),
        "space-around" => Ok(AlignContent::SpaceAround),
        "space-evenly" => Ok(AlignContent::SpaceEvenly),
        "stretch" => Ok(AlignContent::Stretch),
        _ => Err(FlexError::invalid("align-content", value, "unknown keyword")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(json: &str) -> Result<ContainerAttributes, FlexError> {
        let raw: RawContainerAttributes = serde_json::from_str(json).unwrap();
        resolve_container_attributes(&raw)
    }

    #[test]
    fn container_defaults() {
        let attrs = container("{}").unwrap();
        assert_eq!(attrs.direction, FlexDirection::Row);
        assert_eq!(attrs.wrap, FlexWrap::NoWrap);
        assert_eq!(attrs.justify_content, JustifyContent::FlexStart);
        assert_eq!(attrs.align_items, AlignItems::Stretch);
        assert_eq!(attrs.align_content, AlignContent::Stretch);
        assert!(attrs.is_single_line());
    }

    #[test]
    fn display_must_be_flex() {
        assert!(container(r#"{"display": "flex"}"#).is_ok());
        let err = container(r#"{"display": "inline-flex"}"#).unwrap_err();
        assert!(matches!(err, FlexError::InvalidAttribute { property, .. } if property == "display"));
    }

    #[test]
    fn flex_flow_wins_over_longhands() {
        let attrs = container(
            r#"{"flex-flow": "row-reverse wrap-reverse", "flex-wrap": "nowrap"}"#,
        )
        .unwrap();
        assert_eq!(attrs.direction, FlexDirection::RowReverse);
        assert_eq!(attrs.wrap, FlexWrap::WrapReverse);
        assert!(attrs.is_line_reverse());
    }

    #[test]
    fn flex_flow_with_direction_only_does_not_wrap() {
        let attrs = container(r#"{"flex-flow": "row"}"#).unwrap();
        assert_eq!(attrs.wrap, FlexWrap::NoWrap);
    }

    #[test]
    fn longhands_are_read() {
        let attrs = container(
            r#"{"flex-wrap": "wrap", "justify-content": "space-around", "height": "80px"}"#,
        )
        .unwrap();
        assert_eq!(attrs.wrap, FlexWrap::Wrap);
        assert_eq!(attrs.justify_content, JustifyContent::SpaceAround);
        assert_eq!(attrs.height, Some(80.0));
    }

    #[test]
    fn column_direction_is_rejected() {
        assert!(container(r#"{"flex-direction": "column"}"#).is_err());
        assert!(container(r#"{"flex-flow": "column wrap"}"#).is_err());
    }

    #[test]
    fn unknown_container_key_is_rejected() {
        let parsed: Result<RawContainerAttributes, _> =
            serde_json::from_str(r#"{"flext-wrap": "wrap"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn item_longhands_override_shorthand() {
        let raw: RawItemAttributes =
            serde_json::from_str(r#"{"flex": "1 1 10px", "flex-shrink": 0, "flex-basis": "content"}"#)
                .unwrap();
        let attrs = resolve_item_attribute(&raw).unwrap();
        assert_eq!(attrs.grow, 1.0);
        assert_eq!(attrs.shrink, 0.0);
        assert_eq!(attrs.basis, FlexBasis::Content);
    }

    #[test]
    fn item_pass_through_lengths() {
        let raw: RawItemAttributes = serde_json::from_str(
            r#"{"width": 40, "min-width": "10px", "max-width": "90", "order": -2, "align-self": "center"}"#,
        )
        .unwrap();
        let attrs = resolve_item_attribute(&raw).unwrap();
        assert_eq!(attrs.width, Some(40.0));
        assert_eq!(attrs.min_width, Some(10.0));
        assert_eq!(attrs.max_width, Some(90.0));
        assert_eq!(attrs.order, -2);
        assert_eq!(attrs.align_self, Some(AlignItems::Center));
    }

    #[test]
    fn negative_longhand_factor_is_rejected() {
        let raw: RawItemAttributes = serde_json::from_str(r#"{"flex-grow": -1}"#).unwrap();
        assert!(resolve_item_attribute(&raw).is_err());
    }

    #[test]
    fn table_lookup_prefers_index_then_name_then_default() {
        let raw: RawItemAttributeTable = serde_json::from_str(
            r#"{"all": {"flex": "auto"}, "1": {"flex": "none"}, "sidebar": {"flex": "2"}}"#,
        )
        .unwrap();
        let table = resolve_item_attributes(&raw, 3).unwrap();
        assert_eq!(table.lookup(0, None).grow, 1.0);
        assert!(table.lookup(1, Some("sidebar")).is_inflexible());
        assert_eq!(table.lookup(2, Some("sidebar")).grow, 2.0);
    }

    #[test]
    fn table_without_all_uses_initial_default() {
        let raw: RawItemAttributeTable =
            serde_json::from_str(r#"{"0": {"flex": "1"}}"#).unwrap();
        let table = resolve_item_attributes(&raw, 2).unwrap();
        assert_eq!(table.lookup(1, None), &ItemAttributes::default());
    }

    #[test]
    fn malformed_item_shorthand_fails_the_table() {
        let raw: RawItemAttributeTable =
            serde_json::from_str(r#"{"all": {"flex": "grow shrink"}}"#).unwrap();
        assert!(matches!(
            resolve_item_attributes(&raw, 1),
            Err(FlexError::InvalidAttribute { .. })
        ));
    }
}

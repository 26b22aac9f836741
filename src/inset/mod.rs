// SPDX-License-Identifier: MPL-2.0
//! Inset accumulation.
//!
//! Insets are offsets the overlay surface must keep clear of, such as a fixed
//! navigation bar. Each source contributes either a fixed number of pixels or
//! a measured element. Per side, fixed contributions add up while measured
//! ones compete: the side's inset is the larger of the fixed sum and the
//! largest measured contribution.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use crate::domain::{InsetId, Side};

/// Bounding rectangle of a measured element, in viewport pixels.
///
/// `bottom` and `right` are edge coordinates, as reported by layout engines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Element whose bounding rectangle defines an inset.
pub trait MeasureInset {
    fn bounding_rect(&self) -> Rect;
}

impl MeasureInset for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}

/// What an inset source contributes.
#[derive(Clone, Default)]
pub enum InsetValue {
    /// Fixed number of pixels.
    Fixed(f64),
    /// Element measured at aggregation time.
    Measured(Rc<dyn MeasureInset>),
    /// No contribution.
    #[default]
    None,
}

impl fmt::Debug for InsetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsetValue::Fixed(px) => f.debug_tuple("Fixed").field(px).finish(),
            InsetValue::Measured(source) => f
                .debug_tuple("Measured")
                .field(&source.bounding_rect())
                .finish(),
            InsetValue::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsetRecord {
    pub id: InsetId,
    pub side: Side,
    pub value: InsetValue,
    pub extra_padding_px: f64,
}

impl InsetRecord {
    pub fn fixed(id: impl Into<InsetId>, side: Side, px: f64) -> Self {
        Self {
            id: id.into(),
            side,
            value: InsetValue::Fixed(px),
            extra_padding_px: 0.0,
        }
    }

    pub fn measured(id: impl Into<InsetId>, side: Side, source: Rc<dyn MeasureInset>) -> Self {
        Self {
            id: id.into(),
            side,
            value: InsetValue::Measured(source),
            extra_padding_px: 0.0,
        }
    }

    #[must_use]
    pub fn with_padding(mut self, px: f64) -> Self {
        self.extra_padding_px = px;
        self
    }
}

/// Aggregated inset per side, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InsetRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl InsetRect {
    fn side_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl Index<Side> for InsetRect {
    type Output = f64;

    fn index(&self, side: Side) -> &f64 {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl fmt::Display for InsetRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Contribution of a measured element to `side`.
///
/// The element's far edge along the side's axis plus its extent, with the
/// padding added only when that is positive.
#[must_use]
pub fn inset_from_measured(rect: Rect, side: Side, extra_padding_px: f64) -> f64 {
    let value = match side {
        Side::Top => rect.top + rect.height,
        Side::Bottom => rect.bottom() + rect.height,
        Side::Left => rect.left + rect.width,
        Side::Right => rect.right() + rect.width,
    };
    if value > 0.0 {
        value + extra_padding_px
    } else {
        0.0
    }
}

/// Inset sources keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InsetStore {
    records: HashMap<InsetId, InsetRecord>,
}

impl InsetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the record with the same id.
    pub fn set(&mut self, record: InsetRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn remove(&mut self, id: &InsetId) -> Option<InsetRecord> {
        self.records.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &InsetId) -> Option<&InsetRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InsetRecord> {
        self.records.values()
    }
}

/// Aggregates every record of `store` into one rectangle.
#[must_use]
pub fn aggregate(store: &InsetStore) -> InsetRect {
    let mut fixed = InsetRect::default();
    let mut measured = InsetRect::default();

    for record in store.iter() {
        match &record.value {
            InsetValue::Fixed(px) => {
                *fixed.side_mut(record.side) += px + record.extra_padding_px;
            }
            InsetValue::Measured(source) => {
                let px = inset_from_measured(
                    source.bounding_rect(),
                    record.side,
                    record.extra_padding_px,
                );
                let slot = measured.side_mut(record.side);
                *slot = slot.max(px);
            }
            InsetValue::None => {}
        }
    }

    let mut result = InsetRect::default();
    for side in Side::ALL {
        *result.side_mut(side) = fixed[side].max(measured[side]);
    }
    result
}

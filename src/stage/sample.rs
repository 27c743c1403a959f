use crate::foundation::core::Millis;
use crate::stage::tree::{Element, Stage};

/// Resolved presentation of one element at a timeline position.
#[derive(Clone, Copy, Debug)]
pub struct ElementFrame<'a> {
    /// The element.
    pub element: &'a Element,
    /// Element opacity (0 hides it entirely).
    pub opacity: f64,
    /// `(dash array, dash offset)` once primed; `None` paints the full stroke.
    pub dash: Option<(f64, f64)>,
}

impl ElementFrame<'_> {
    /// `true` when anything of the stroke would be painted.
    pub fn is_visible(&self) -> bool {
        if self.opacity <= 0.0 {
            return false;
        }
        match self.solid_dash() {
            Some((array, offset)) => offset < array,
            None => true,
        }
    }

    /// Painted fraction of the stroke length, `0..=1`.
    pub fn drawn_fraction(&self) -> f64 {
        match self.solid_dash() {
            Some((array, offset)) => (1.0 - offset / array).clamp(0.0, 1.0),
            None => 1.0,
        }
    }

    /// The dash pattern, unless it is all zeros. An all-zero dash array paints a solid stroke.
    pub fn solid_dash(&self) -> Option<(f64, f64)> {
        self.dash.filter(|&(array, _)| array > 0.0)
    }
}

impl Stage {
    /// Presentation of every element present at `t`, in paint order.
    pub fn sample(&self, t: Millis) -> Vec<ElementFrame<'_>> {
        self.elements()
            .iter()
            .filter(|e| e.inserted_at <= t)
            .map(|element| {
                let style = &element.style;
                let dash = style
                    .dash_offset_at(t)
                    .zip(style.dash_array)
                    .map(|(offset, array)| (array, offset));
                ElementFrame {
                    element,
                    opacity: style.opacity_at(t),
                    dash,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/sample.rs"]
mod tests;

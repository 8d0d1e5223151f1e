//! Deciding whether a wheel or touch gesture may scroll.

use crate::{
    ElementId,
    dom::{Axis, DeltaMode, Detail, Document, TouchPoint},
};

/// Pixels per line for line-mode wheel deltas.
const LINE_HEIGHT: f64 = 16.0;

/// A scroll gesture reduced to the axis it mostly moves along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    /// Dominant axis.
    pub axis: Axis,
    /// Signed pixel delta along `axis`; positive scrolls towards the end of
    /// the content.
    pub delta: f64,
}

impl Gesture {
    /// Reduce a two-axis delta to its dominant axis. Ties go to the vertical
    /// axis.
    pub fn dominant(delta_x: f64, delta_y: f64) -> Self {
        if delta_x.abs() > delta_y.abs() {
            Self {
                axis: Axis::X,
                delta: delta_x,
            }
        } else {
            Self {
                axis: Axis::Y,
                delta: delta_y,
            }
        }
    }

    /// The gesture of a wheel event, with deltas converted to pixels.
    /// `page_height` scales page-mode deltas.
    pub fn from_wheel(detail: &Detail, page_height: f64) -> Option<Self> {
        let Detail::Wheel {
            delta_x,
            delta_y,
            mode,
            ..
        } = detail
        else {
            return None;
        };
        let scale = match mode {
            DeltaMode::Pixel => 1.0,
            DeltaMode::Line => LINE_HEIGHT,
            DeltaMode::Page => page_height,
        };
        Some(Self::dominant(delta_x * scale, delta_y * scale))
    }

    /// The gesture of a finger moving from `last` to `current`. Dragging up
    /// scrolls down, so the delta is `last - current`.
    pub fn from_touch(last: TouchPoint, current: TouchPoint) -> Self {
        Self::dominant(last.x - current.x, last.y - current.y)
    }
}

/// Is `detail` a pinch-zoom gesture: a ctrl-wheel or a multi-finger touch?
pub fn is_pinch(detail: &Detail) -> bool {
    match detail {
        Detail::Wheel { ctrl_key, .. } => *ctrl_key,
        Detail::Touch { touches } => touches.len() > 1,
        _ => false,
    }
}

/// Could some scroll container between `target` and `boundary` (both
/// inclusive) absorb `gesture`?
fn can_scroll_within(
    document: &Document,
    target: ElementId,
    boundary: ElementId,
    gesture: Gesture,
) -> bool {
    for el in document.ancestry(target) {
        if document.is_scroll_container(el, gesture.axis)
            && document
                .scroll_metrics(el)
                .is_some_and(|m| m.can_absorb(gesture.axis, gesture.delta))
        {
            return true;
        }
        if el == boundary {
            break;
        }
    }
    false
}

/// Should a gesture over `target` be cancelled?
///
/// Everything outside `permit` is cancelled. Inside `permit`, a gesture is
/// cancelled only when no scroll container up to and including `permit` can
/// absorb it, so scrolling never chains past the permitted region.
pub fn should_cancel(
    document: &Document,
    target: ElementId,
    permit: Option<ElementId>,
    gesture: Gesture,
) -> bool {
    if gesture.delta == 0.0 {
        return false;
    }
    match permit {
        Some(permit) if document.contains(permit, target) => {
            !can_scroll_within(document, target, permit, gesture)
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom::ScrollMetrics, error::Result};

    #[test]
    fn dominant_axis() {
        assert_eq!(Gesture::dominant(3.0, -5.0).axis, Axis::Y);
        assert_eq!(Gesture::dominant(-8.0, 5.0).axis, Axis::X);
        assert_eq!(Gesture::dominant(-8.0, 5.0).delta, -8.0);
        assert_eq!(Gesture::dominant(2.0, 2.0).axis, Axis::Y);
    }

    #[test]
    fn wheel_modes() {
        let line = Detail::Wheel {
            delta_x: 0.0,
            delta_y: 3.0,
            mode: DeltaMode::Line,
            ctrl_key: false,
        };
        assert_eq!(Gesture::from_wheel(&line, 600.0).map(|g| g.delta), Some(48.0));
        let page = Detail::Wheel {
            delta_x: 0.0,
            delta_y: -1.0,
            mode: DeltaMode::Page,
            ctrl_key: true,
        };
        assert_eq!(Gesture::from_wheel(&page, 600.0).map(|g| g.delta), Some(-600.0));
        assert!(is_pinch(&page));
        assert_eq!(Gesture::from_wheel(&Detail::Key { key: "a".into() }, 1.0), None);
    }

    #[test]
    fn touch_delta_inverts_motion() {
        let g = Gesture::from_touch(TouchPoint::new(10.0, 100.0), TouchPoint::new(12.0, 60.0));
        assert_eq!(g.axis, Axis::Y);
        assert_eq!(g.delta, 40.0);
    }

    #[test]
    fn chaining_stops_at_edges() -> Result<()> {
        let doc = Document::new();
        let permit = doc.create_element("div");
        let list = doc.create_element("ul");
        let item = doc.create_element("li");
        let outside = doc.create_element("main");
        doc.append_child(doc.body(), permit)?;
        doc.append_child(permit, list)?;
        doc.append_child(list, item)?;
        doc.append_child(doc.body(), outside)?;
        doc.set_style_property(list, "overflow-y", "auto");
        doc.set_scroll_metrics(list, ScrollMetrics::vertical(100.0, 300.0, 0.0));

        let down = Gesture::dominant(0.0, 10.0);
        let up = Gesture::dominant(0.0, -10.0);
        assert!(should_cancel(&doc, outside, Some(permit), down));
        assert!(should_cancel(&doc, item, None, down));
        assert!(!should_cancel(&doc, item, Some(permit), down));
        // At the top edge, scrolling up would chain to the page.
        assert!(should_cancel(&doc, item, Some(permit), up));

        doc.set_scroll_metrics(list, ScrollMetrics::vertical(100.0, 300.0, 200.0));
        assert!(should_cancel(&doc, item, Some(permit), down));
        assert!(!should_cancel(&doc, item, Some(permit), up));
        assert!(!should_cancel(&doc, item, Some(permit), Gesture::dominant(0.0, 0.0)));
        Ok(())
    }
}

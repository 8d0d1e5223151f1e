use super::style::InlineStyle;
use crate::{ElementId, ListenerId};

/// Element namespace. Layer roots may be HTML or SVG elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// An HTML element.
    Html,
    /// An SVG element.
    Svg,
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// Scroll position and extents of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical scroll offset.
    pub scroll_top: f64,
    /// Horizontal scroll offset.
    pub scroll_left: f64,
    /// Total content height.
    pub scroll_height: f64,
    /// Total content width.
    pub scroll_width: f64,
    /// Visible height.
    pub client_height: f64,
    /// Visible width.
    pub client_width: f64,
}

impl ScrollMetrics {
    /// Metrics for a vertically scrollable box.
    pub fn vertical(client_height: f64, scroll_height: f64, scroll_top: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
            ..Self::default()
        }
    }

    /// Metrics for a horizontally scrollable box.
    pub fn horizontal(client_width: f64, scroll_width: f64, scroll_left: f64) -> Self {
        Self {
            scroll_left,
            scroll_width,
            client_width,
            ..Self::default()
        }
    }

    /// Does the content overflow the visible box along `axis`?
    pub fn overflows(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.scroll_width > self.client_width,
            Axis::Y => self.scroll_height > self.client_height,
        }
    }

    /// Could a scroll of `delta` along `axis` move this box at all?
    ///
    /// Positive deltas scroll towards the end of the content.
    pub fn can_absorb(&self, axis: Axis, delta: f64) -> bool {
        let (pos, size, client) = match axis {
            Axis::X => (self.scroll_left, self.scroll_width, self.client_width),
            Axis::Y => (self.scroll_top, self.scroll_height, self.client_height),
        };
        if delta > 0.0 {
            size - client - pos > 0.0
        } else if delta < 0.0 {
            pos > 0.0
        } else {
            false
        }
    }
}

/// Stored element state.
#[derive(Debug)]
pub(crate) struct ElementData {
    /// Tag name.
    pub(crate) tag: String,
    /// Element namespace.
    pub(crate) namespace: Namespace,
    /// Parent element, if attached.
    pub(crate) parent: Option<ElementId>,
    /// Child elements in document order.
    pub(crate) children: Vec<ElementId>,
    /// Inline style declaration.
    pub(crate) style: InlineStyle,
    /// Layout width including borders and padding.
    pub(crate) offset_width: f64,
    /// Scroll metrics.
    pub(crate) scroll: ScrollMetrics,
    /// Listeners registered on this element, in registration order.
    pub(crate) listeners: Vec<ListenerId>,
}

impl ElementData {
    /// Construct a detached element.
    pub(crate) fn new(tag: &str, namespace: Namespace) -> Self {
        Self {
            tag: tag.to_string(),
            namespace,
            parent: None,
            children: Vec::new(),
            style: InlineStyle::new(),
            offset_width: 0.0,
            scroll: ScrollMetrics::default(),
            listeners: Vec::new(),
        }
    }

    /// Does this element's inline overflow style allow scrolling along `axis`?
    pub(crate) fn is_scroll_container(&self, axis: Axis) -> bool {
        let specific = match axis {
            Axis::X => "overflow-x",
            Axis::Y => "overflow-y",
        };
        let overflow = self
            .style
            .get(specific)
            .or_else(|| self.style.get("overflow"));
        matches!(overflow, Some("auto" | "scroll" | "overlay")) && self.scroll.overflows(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_at_edges() {
        let m = ScrollMetrics::vertical(100.0, 300.0, 0.0);
        assert!(m.can_absorb(Axis::Y, 10.0));
        assert!(!m.can_absorb(Axis::Y, -10.0));
        assert!(!m.can_absorb(Axis::Y, 0.0));

        let m = ScrollMetrics::vertical(100.0, 300.0, 200.0);
        assert!(!m.can_absorb(Axis::Y, 10.0));
        assert!(m.can_absorb(Axis::Y, -10.0));
        assert!(!m.can_absorb(Axis::X, 10.0));
    }

    #[test]
    fn scroll_container_needs_overflow_style() {
        let mut e = ElementData::new("div", Namespace::Html);
        e.scroll = ScrollMetrics::vertical(100.0, 300.0, 0.0);
        assert!(!e.is_scroll_container(Axis::Y));
        e.style.set("overflow-y", "auto");
        assert!(e.is_scroll_container(Axis::Y));
        assert!(!e.is_scroll_container(Axis::X));
    }
}

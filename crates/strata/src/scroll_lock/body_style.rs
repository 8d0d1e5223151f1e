use tracing::debug;

use crate::{
    Config,
    dom::{
        Document,
        style::{parse_px, px},
    },
};

/// Body overflow property.
const OVERFLOW: &str = "overflow";

/// The body's inline style before a scroll lock, plus what the lock measured.
#[derive(Debug)]
pub(super) struct BodyStyle {
    /// Each overridden property with its previous inline value, in the order
    /// the overrides were applied.
    previous: Vec<(String, Option<String>)>,
    /// Window scroll position when the lock was taken.
    scroll: (f64, f64),
    /// Measured scrollbar width that was compensated for; zero if none.
    compensated: f64,
    /// Restore the window scroll position on unlock.
    scroll_back: bool,
}

impl BodyStyle {
    /// Snapshot the body and apply the lock styles.
    pub(super) fn lock(document: &Document, config: &Config, scroll_back: bool) -> Self {
        let body = document.body();
        let viewport = document.viewport();
        let width = (viewport.inner_width - document.offset_width(body)).max(0.0);
        document.hold_body_style();
        let mut snapshot = Self {
            previous: Vec::new(),
            scroll: (viewport.scroll_x, viewport.scroll_y),
            compensated: 0.0,
            scroll_back,
        };

        snapshot.set(document, OVERFLOW, "hidden");
        if config.prevent_scrollbar_shift {
            if width > 0.0 {
                let gutter = config.scrollbar_gutter.property();
                let existing = document
                    .style_property(body, gutter)
                    .and_then(|v| parse_px(&v))
                    .unwrap_or(0.0);
                snapshot.set(document, gutter, &px(existing + width));
                snapshot.compensated = width;
            }
            snapshot.set(document, &config.scrollbar_width_property, &px(width));
        }
        debug!(scrollbar_width = width, "body scroll locked");
        snapshot
    }

    /// Override one body property, remembering its previous value.
    fn set(&mut self, document: &Document, name: &str, value: &str) {
        let body = document.body();
        self.previous
            .push((name.to_string(), document.style_property(body, name)));
        document.set_style_property(body, name, value);
    }

    /// Width the lock compensated for.
    pub(super) fn compensated(&self) -> f64 {
        self.compensated
    }

    /// Put back every overridden property, release the body hold and restore
    /// the scroll position.
    pub(super) fn restore(self, document: &Document) {
        let body = document.body();
        for (name, value) in self.previous.iter().rev() {
            match value {
                Some(v) => document.set_style_property(body, name, v),
                None => {
                    document.remove_style_property(body, name);
                }
            }
        }
        document.release_body_style();
        if self.scroll_back && self.compensated > 0.0 {
            document.scroll_to(self.scroll.0, self.scroll.1);
        }
        debug!("body scroll restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScrollbarGutter;

    fn with_scrollbar(width: f64) -> Document {
        let doc = Document::new();
        let inner = doc.viewport().inner_width;
        doc.set_offset_width(doc.body(), inner - width);
        doc
    }

    #[test]
    fn no_scrollbar_only_hides_overflow() {
        let doc = Document::new();
        let body = doc.body();
        let s = BodyStyle::lock(&doc, &Config::default(), true);
        assert_eq!(doc.style_property(body, "overflow").as_deref(), Some("hidden"));
        assert_eq!(doc.style_property(body, "padding-right"), None);
        assert_eq!(
            doc.style_property(body, "--scrollbar-width").as_deref(),
            Some("0px")
        );
        assert_eq!(s.compensated(), 0.0);
        s.restore(&doc);
        assert!(!doc.has_style_attribute(body));
    }

    #[test]
    fn padding_adds_to_existing() {
        let doc = with_scrollbar(15.0);
        let body = doc.body();
        doc.set_style_attribute(body, "padding-right: 10px; color: blue");
        let s = BodyStyle::lock(&doc, &Config::default(), true);
        assert_eq!(
            doc.style_property(body, "padding-right").as_deref(),
            Some("25px")
        );
        assert_eq!(
            doc.style_property(body, "--scrollbar-width").as_deref(),
            Some("15px")
        );
        s.restore(&doc);
        assert_eq!(
            doc.style(body).map(|s| s.to_string()).as_deref(),
            Some("padding-right: 10px; color: blue;")
        );
    }

    #[test]
    fn margin_gutter() {
        let doc = with_scrollbar(12.0);
        let config = Config {
            scrollbar_gutter: ScrollbarGutter::Margin,
            ..Config::default()
        };
        let s = BodyStyle::lock(&doc, &config, false);
        assert_eq!(
            doc.style_property(doc.body(), "margin-right").as_deref(),
            Some("12px")
        );
        assert_eq!(doc.style_property(doc.body(), "padding-right"), None);
        s.restore(&doc);
        assert!(!doc.has_style_attribute(doc.body()));
    }

    #[test]
    fn shift_prevention_disabled() {
        let doc = with_scrollbar(12.0);
        let config = Config {
            prevent_scrollbar_shift: false,
            ..Config::default()
        };
        let s = BodyStyle::lock(&doc, &config, true);
        assert_eq!(doc.style(doc.body()).map(|s| s.len()), Some(1));
        s.restore(&doc);
    }

    #[test]
    fn scroll_back_requires_compensation() {
        let doc = with_scrollbar(15.0);
        doc.scroll_to(0.0, 300.0);
        let s = BodyStyle::lock(&doc, &Config::default(), true);
        doc.scroll_to(0.0, 0.0);
        s.restore(&doc);
        assert_eq!(doc.viewport().scroll_y, 300.0);

        let doc = Document::new();
        doc.scroll_to(0.0, 300.0);
        let s = BodyStyle::lock(&doc, &Config::default(), true);
        doc.scroll_to(0.0, 0.0);
        s.restore(&doc);
        assert_eq!(doc.viewport().scroll_y, 0.0);
    }

    #[test]
    fn empty_attribute_kept() {
        let doc = Document::new();
        let body = doc.body();
        doc.set_style_attribute(body, "");
        let s = BodyStyle::lock(&doc, &Config::default(), true);
        s.restore(&doc);
        assert!(doc.has_style_attribute(body));
        assert_eq!(doc.style(body).map(|s| s.len()), Some(0));
    }
}

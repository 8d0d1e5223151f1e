//! Integration tests for the scroll-lock stack.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strata::{
        Config, LayerOptions, ScrollLockOptions, ScrollbarGutter,
        dom::ScrollMetrics,
        error::Result,
        testing::{Harness, init_tracing},
    };

    #[test]
    fn concurrent_locks_apply_once() {
        init_tracing();
        let h = Harness::new();
        let locks = h.strata.scroll_locks();
        let a = locks.request(true, ScrollLockOptions::default());
        let b = locks.request(true, ScrollLockOptions::default());
        assert_eq!(h.body_property("overflow").as_deref(), Some("hidden"));
        assert_eq!(h.body_style().map(|s| s.matches("overflow").count()), Some(1));

        drop(a);
        assert!(locks.is_locked());
        assert_eq!(h.body_property("overflow").as_deref(), Some("hidden"));

        drop(b);
        assert!(!locks.is_locked());
        assert_eq!(h.body_style(), None);
    }

    #[test]
    fn unrelated_inline_styles_survive() {
        let h = Harness::builder().scrollbar_width(15.0).build();
        h.document
            .set_style_attribute(h.body(), "color: red; overflow: scroll");
        let before = h.body_style();
        let lock = h
            .strata
            .scroll_locks()
            .request(true, ScrollLockOptions::default());
        assert_eq!(h.body_property("overflow").as_deref(), Some("hidden"));
        assert_eq!(h.body_property("padding-right").as_deref(), Some("15px"));
        assert_eq!(h.body_property("--scrollbar-width").as_deref(), Some("15px"));
        drop(lock);
        assert_eq!(h.body_style(), before);
    }

    #[test]
    fn margin_gutter_from_config() -> Result<()> {
        let config = Config::from_json(r#"{"scrollbar_gutter": "margin"}"#)?;
        assert_eq!(config.scrollbar_gutter, ScrollbarGutter::Margin);
        let h = Harness::builder()
            .scrollbar_width(17.0)
            .config(config)
            .build();
        let lock = h
            .strata
            .scroll_locks()
            .request(true, ScrollLockOptions::default());
        assert_eq!(h.body_property("margin-right").as_deref(), Some("17px"));
        assert_eq!(h.body_property("padding-right"), None);
        drop(lock);
        assert_eq!(h.body_style(), None);
        Ok(())
    }

    #[test]
    fn scroll_position_restored() {
        let h = Harness::builder().scrollbar_width(15.0).build();
        h.document.scroll_to(0.0, 420.0);
        let lock = h
            .strata
            .scroll_locks()
            .request(true, ScrollLockOptions::default());
        h.document.scroll_to(0.0, 0.0);
        drop(lock);
        assert_eq!(h.document.viewport().scroll_y, 420.0);

        h.document.scroll_to(0.0, 420.0);
        let lock = h
            .strata
            .scroll_locks()
            .request(true, ScrollLockOptions::default().scroll_back(false));
        h.document.scroll_to(0.0, 0.0);
        drop(lock);
        assert_eq!(h.document.viewport().scroll_y, 0.0);
    }

    #[test]
    fn modal_layer_permits_its_own_scrolling() -> Result<()> {
        init_tracing();
        let h = Harness::new();
        let main = h.attach("main")?;
        let dialog = h.open_layer(LayerOptions::modal())?;
        let root = Harness::root_of(&dialog);
        let list = h.element(root, "ul")?;
        let item = h.element(list, "li")?;
        h.document.set_style_property(list, "overflow-y", "auto");
        h.document
            .set_scroll_metrics(list, ScrollMetrics::vertical(200.0, 800.0, 0.0));

        assert!(!h.wheel(main, 30.0));
        assert!(h.wheel(item, 30.0));
        // Scrolling up at the top edge would chain to the page.
        assert!(!h.wheel(item, -30.0));
        assert!(h.touch_drag(item, 300.0, 250.0));
        assert!(!h.touch_drag(main, 300.0, 250.0));

        drop(dialog);
        assert!(h.wheel(main, 30.0));
        Ok(())
    }

    #[test]
    fn nested_modal_keeps_lock_until_last_closes() -> Result<()> {
        let h = Harness::builder().scrollbar_width(15.0).build();
        let outer = h.open_layer(LayerOptions::modal())?;
        let inner = h.open_layer(LayerOptions::modal().parent(outer.context()))?;
        assert_eq!(h.strata.scroll_locks().len(), 2);
        inner.close();
        assert!(h.strata.scroll_locks().is_locked());
        assert_eq!(h.body_property("padding-right").as_deref(), Some("15px"));
        outer.close();
        assert_eq!(h.body_style(), None);
        Ok(())
    }

    #[test]
    fn empty_style_attribute_survives_mixed_close_order() -> Result<()> {
        let h = Harness::builder().scrollbar_width(15.0).build();
        h.document.set_style_attribute(h.body(), "");
        let popover = h.open_layer(LayerOptions::default().prevent_scroll(true))?;
        let modal = h.open_layer(LayerOptions::modal())?;
        popover.close();
        assert_eq!(h.body_property("pointer-events").as_deref(), Some("none"));
        modal.close();
        assert_eq!(h.body_style().as_deref(), Some(""));

        // The same layers closed the other way round.
        popover.open()?;
        modal.open()?;
        modal.close();
        popover.close();
        assert_eq!(h.body_style().as_deref(), Some(""));
        Ok(())
    }

    #[test]
    fn non_modal_scroll_prevention() -> Result<()> {
        let h = Harness::new();
        let popover = h.open_layer(LayerOptions::default().prevent_scroll(true))?;
        assert!(h.strata.scroll_locks().is_locked());
        assert_eq!(h.body_property("pointer-events"), None);
        popover.close();
        let modal = h.open_layer(LayerOptions::modal().prevent_scroll(false))?;
        assert!(!h.strata.scroll_locks().is_locked());
        modal.close();
        Ok(())
    }
}

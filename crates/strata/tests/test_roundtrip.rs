//! Property tests: any open/close/modal sequence leaves no trace.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strata::{Layer, LayerOptions, testing::Harness};

    /// One generated layer: is it modal, does it override scroll locking, and
    /// which earlier layer is its parent?
    #[derive(Debug, Clone)]
    struct Spec {
        /// Modal flag.
        modal: bool,
        /// Explicit scroll prevention; `None` follows the modal flag.
        prevent_scroll: Option<bool>,
        /// Index of an earlier layer to nest under.
        parent: Option<usize>,
    }

    /// One step applied to a generated layer.
    #[derive(Debug, Clone)]
    enum Op {
        /// Open a closed layer or close an open one.
        Toggle(prop::sample::Index),
        /// Flip the modal flag, open or not.
        SetModal(prop::sample::Index, bool),
    }

    /// Layer shapes with optional nesting under an earlier layer.
    fn specs() -> impl Strategy<Value = Vec<Spec>> {
        let item = (
            any::<bool>(),
            prop::option::of(any::<bool>()),
            any::<prop::sample::Index>(),
            any::<bool>(),
        );
        prop::collection::vec(item, 1..7).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (modal, prevent_scroll, parent, nested))| Spec {
                    modal,
                    prevent_scroll,
                    parent: (nested && i > 0).then(|| parent.index(i)),
                })
                .collect()
        })
    }

    /// Toggles, with an occasional modal flip mixed in.
    fn ops() -> impl Strategy<Value = Vec<Op>> {
        let op = prop_oneof![
            3 => any::<prop::sample::Index>().prop_map(Op::Toggle),
            1 => (any::<prop::sample::Index>(), any::<bool>())
                .prop_map(|(i, modal)| Op::SetModal(i, modal)),
        ];
        prop::collection::vec(op, 0..40)
    }

    /// Inline body styles present before any layer opens.
    fn body_css() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("")),
            Just(Some("color: red")),
            Just(Some("pointer-events: auto; padding-right: 4px")),
            Just(Some("overflow: scroll; margin: 0")),
        ]
    }

    /// Mount one closed layer per spec.
    fn build(h: &Harness, specs: &[Spec]) -> Vec<Layer> {
        let mut layers: Vec<Layer> = Vec::new();
        for spec in specs {
            let mut options = LayerOptions::default().with_modal(spec.modal);
            if let Some(prevent) = spec.prevent_scroll {
                options = options.prevent_scroll(prevent);
            }
            if let Some(p) = spec.parent {
                options = options.parent(layers[p].context());
            }
            layers.push(h.layer(options).unwrap());
        }
        layers
    }

    /// Registry, scroll-lock and body state agree with which layers are open.
    fn check_invariants(
        h: &Harness,
        specs: &[Spec],
        layers: &[Layer],
    ) -> Result<(), TestCaseError> {
        let registry = h.strata.layers();
        let visible = registry.visible_layers();
        let modal = registry.visible_modal_layers();

        let mut deduped = visible.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), visible.len());

        // Modal layers are a subsequence of visible layers.
        let mut it = visible.iter();
        for m in &modal {
            prop_assert!(it.any(|v| v == m));
        }

        let open = layers.iter().filter(|l| l.is_open()).count();
        let open_modal = layers.iter().filter(|l| l.is_open() && l.is_modal()).count();
        prop_assert_eq!(visible.len(), open);
        prop_assert_eq!(modal.len(), open_modal);
        let locking = layers
            .iter()
            .zip(specs)
            .filter(|(l, s)| l.is_open() && s.prevent_scroll.unwrap_or(l.is_modal()))
            .count();
        prop_assert_eq!(h.strata.scroll_locks().len(), locking);
        prop_assert_eq!(h.aria.outstanding(), open_modal);
        prop_assert_eq!(
            h.body_property("pointer-events").as_deref() == Some("none"),
            open_modal > 0
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn any_open_close_order_restores_everything(
            specs in specs(),
            css in body_css(),
            scrollbar in prop_oneof![Just(0.0), Just(15.0)],
            ops in ops(),
            escapes in prop::collection::vec(any::<bool>(), 0..40),
            closing in any::<prop::sample::Index>(),
        ) {
            let h = Harness::builder().scrollbar_width(scrollbar).build();
            if let Some(css) = css {
                h.document.set_style_attribute(h.body(), css);
            }
            let before = h.body_style();
            let layers = build(&h, &specs);

            for (i, op) in ops.iter().enumerate() {
                match op {
                    Op::Toggle(index) => {
                        let layer = &layers[index.index(layers.len())];
                        if layer.is_open() {
                            layer.close();
                        } else {
                            layer.open().unwrap();
                        }
                    }
                    Op::SetModal(index, modal) => {
                        layers[index.index(layers.len())].set_modal(*modal).unwrap();
                    }
                }
                if escapes.get(i).copied().unwrap_or(false) {
                    h.escape();
                }
                check_invariants(&h, &specs, &layers)?;
            }

            // Close whatever is left, starting from an arbitrary layer.
            let start = closing.index(layers.len());
            for offset in 0..layers.len() {
                layers[(start + offset) % layers.len()].close();
                check_invariants(&h, &specs, &layers)?;
            }

            prop_assert!(h.strata.layers().visible_layers().is_empty());
            prop_assert!(h.strata.layers().visible_modal_layers().is_empty());
            prop_assert!(h.strata.scroll_locks().is_empty());
            prop_assert_eq!(h.body_style(), before);
            prop_assert_eq!(h.document.listener_count(), 0);
            for layer in &layers {
                prop_assert!(layer.context().nested_layers().is_empty());
            }
        }
    }
}

//! Replay a scripted gesture sequence against a dialog with a nested menu and
//! submenu, printing the layer stack after every step.

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use strata::{
    Config, Document, ElementId, Event, Layer, LayerContext, LayerOptions, Strata,
    dom::{Button, ScrollMetrics},
};
use tracing::Level;
use tracing_subscriber::fmt;

/// CLI flags for the stack demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON service configuration.
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Width of the simulated window scrollbar.
    #[clap(long, default_value_t = 15.0)]
    scrollbar_width: f64,

    /// Open the dialog as a non-modal layer.
    #[clap(long)]
    non_modal: bool,

    /// Log registry activity to stderr.
    #[clap(short, long)]
    verbose: bool,
}

/// The demo document and its open layers.
struct Gym {
    /// The coordinating service.
    strata: Strata,
    /// Background page content.
    main: ElementId,
    /// Named layers, opened in order.
    layers: Vec<(&'static str, Layer)>,
}

impl Gym {
    /// Build the page and open every layer.
    fn new(config: Config, scrollbar_width: f64, modal: bool) -> Result<Self> {
        let doc = Document::new();
        let inner = doc.viewport().inner_width;
        doc.set_offset_width(doc.body(), inner - scrollbar_width);
        doc.set_style_attribute(doc.body(), "color: black");
        let main = doc.create_element("main");
        doc.append_child(doc.body(), main)?;

        let strata = Strata::builder(doc).config(config).build();
        let mut gym = Self {
            strata,
            main,
            layers: Vec::new(),
        };
        let dialog = gym.open("dialog", LayerOptions::default().with_modal(modal))?;
        let menu = gym.open("menu", LayerOptions::default().parent(dialog))?;
        gym.open("submenu", LayerOptions::default().parent(menu))?;
        Ok(gym)
    }

    /// Open a layer on a fresh root under the body.
    fn open(&mut self, name: &'static str, options: LayerOptions) -> Result<LayerContext> {
        let doc = self.strata.document();
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root)?;
        let list = doc.create_element("ul");
        doc.append_child(root, list)?;
        doc.set_style_property(list, "overflow-y", "auto");
        doc.set_scroll_metrics(list, ScrollMetrics::vertical(100.0, 400.0, 0.0));

        let layer = self.strata.layer(options);
        layer.mount(root)?;
        layer.open().with_context(|| format!("opening {name}"))?;
        let context = layer.context();
        self.layers.push((name, layer));
        Ok(context)
    }

    /// Root of a named layer.
    fn root(&self, name: &str) -> Option<ElementId> {
        self.layers
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, l)| l.root())
    }

    /// Print the registry state.
    fn report(&self, step: &str) {
        let open: Vec<_> = self
            .layers
            .iter()
            .filter(|(_, l)| l.is_open())
            .map(|(n, l)| {
                let pe = l.pointer_events().map_or("-", |p| p.as_str());
                format!("{n}[pe={pe}]")
            })
            .collect();
        let doc = self.strata.document();
        let body = doc
            .style(doc.body())
            .filter(|_| doc.has_style_attribute(doc.body()))
            .map_or_else(|| "<none>".to_string(), |s| s.to_string());
        println!("{step}");
        println!("  open:         {}", open.join(" "));
        println!("  modal:        {}", self.strata.layers().visible_modal_layers().len());
        println!("  scroll locks: {}", self.strata.scroll_locks().len());
        println!("  body style:   {body}");
    }

    /// Press and release the primary button on `target`.
    fn click(&self, target: ElementId) {
        let doc = self.strata.document();
        doc.dispatch(&Event::pointer_down(target, Button::Primary));
        doc.dispatch(&Event::pointer_up(target, Button::Primary));
    }

    /// Press Escape.
    fn escape(&self) {
        self.strata.document().dispatch(&Event::key_down(None, "Escape"));
    }
}

pub fn main() -> Result<()> {
    let args = Args::parse();
    if args.verbose {
        fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };

    let gym = Gym::new(config, args.scrollbar_width, !args.non_modal)?;
    gym.report("opened dialog > menu > submenu");

    if let Some(item) = gym.root("submenu") {
        gym.click(item);
        gym.report("click inside submenu (portal)");
    }

    gym.escape();
    gym.report("escape");

    let wheel_allowed = gym
        .strata
        .document()
        .dispatch(&Event::wheel(gym.main, 0.0, 40.0));
    println!("wheel over page allowed: {wheel_allowed}");

    if let Some(dialog) = gym.root("dialog") {
        gym.click(dialog);
        gym.report("click inside dialog");
    }

    gym.click(gym.main);
    gym.report("click on page");

    gym.escape();
    gym.report("escape");
    Ok(())
}

//! sunwet-render - command-line front end for the view renderer.

mod cli;
mod logging;

use anyhow::Context as _;
use clap::Parser;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use sunwet_api::{DataContext, Value, ViewConfig, WidgetSpec};
use sunwet_render::{BaseUrlFiles, LogPlayback, Page, RenderConfig, Renderer, StaticQueries};

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(base) = &args.file_base_url {
        config.file_base_url = base.clone();
    }
    if args.debug_composites {
        config.debug_composites = true;
    }

    let queries = match &args.queries {
        Some(path) => StaticQueries::load(path)?,
        None => StaticQueries::new(),
    };
    let renderer = Renderer::new(
        Arc::new(queries),
        Arc::new(BaseUrlFiles::new(&config.file_base_url)),
        Arc::new(LogPlayback),
        config,
    );

    let page = match (&args.view, &args.spec) {
        (Some(view), _) => render_view(&renderer, view, &args.params).await?,
        (None, Some(spec)) => render_spec(&renderer, spec, args.context.as_deref()).await?,
        (None, None) => anyhow::bail!("one of --spec or --view is required"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.root)?);
    } else {
        print!("{}", page.root.outline());
    }
    if page.media_controls {
        println!("playlist:");
        for (i, entry) in page.playlist.iter().enumerate() {
            let name = entry.name.as_deref().unwrap_or("-");
            println!("  #{} {} {} {}", i, entry.media_type, entry.file, name);
        }
    }
    Ok(())
}

async fn render_view(renderer: &Renderer, path: &Path, params: &str) -> anyhow::Result<Page> {
    let view = ViewConfig::from_json(&read(path)?).with_context(|| format!("loading view {}", path.display()))?;
    let params: IndexMap<String, Value> = serde_json::from_str(params).context("parsing --params")?;
    Ok(renderer.render_page(&view, &params).await)
}

/// A bare spec has no view settings, so media controls stay off.
async fn render_spec(renderer: &Renderer, path: &Path, context: Option<&Path>) -> anyhow::Result<Page> {
    let spec = WidgetSpec::from_json(&read(path)?).with_context(|| format!("loading spec {}", path.display()))?;
    let ctx = match context {
        Some(path) => {
            DataContext::from_json(&read(path)?).with_context(|| format!("loading context {}", path.display()))?
        }
        None => DataContext::empty(),
    };
    let mut view = renderer.render(&spec, &ctx)?;
    view.drive().await?;
    let playlist = view.playlist().to_vec();
    Ok(Page {
        root: view.into_root(),
        playlist,
        media_controls: false,
    })
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

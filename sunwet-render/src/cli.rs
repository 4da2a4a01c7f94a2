use clap::Parser;
use std::path::PathBuf;

/// Render a sunwet widget spec against row data and print the result.
#[derive(Parser, Debug)]
#[command(name = "sunwet-render", version)]
pub struct Args {
    /// Widget spec JSON to render against `--context`.
    #[arg(long, conflicts_with = "view", required_unless_present = "view")]
    pub spec: Option<PathBuf>,

    /// Row data JSON for `--spec` (defaults to an empty record).
    #[arg(long, requires = "spec")]
    pub context: Option<PathBuf>,

    /// View config JSON (root widget plus declared parameters).
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// Parameter values for `--view`, as a JSON object.
    #[arg(long, requires = "view", default_value = "{}")]
    pub params: String,

    /// Canned query results, `{"<query id>": [rows]}`.
    #[arg(long)]
    pub queries: Option<PathBuf>,

    /// Renderer config JSON.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides `file_base_url` from the config.
    #[arg(long)]
    pub file_base_url: Option<String>,

    /// Show composite values as JSON instead of failing.
    #[arg(long, default_value_t = false)]
    pub debug_composites: bool,

    /// Print the rendered tree as JSON instead of an outline.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// More logging (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

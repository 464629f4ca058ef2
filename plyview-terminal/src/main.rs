/// PLYView Terminal - view an ASCII PLY mesh in the terminal
///
/// Controls:
///   - Arrow keys: Rotate the camera
///   - Shift + Arrow keys: Pan the camera
///   - +/-: Zoom in/out
///   - R: Reset the camera
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plyview_core::{load_ply, Mesh, ViewerConfig, ViewerContext};
use plyview_terminal::TerminalApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plyview-terminal")]
#[command(about = "Render an ASCII PLY mesh in the terminal")]
#[command(version)]
struct Cli {
    /// PLY file to display; a cube is shown when omitted
    file: Option<PathBuf>,

    /// TOML file with `[parse]` and `[camera]` settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip elements and properties the mesh model does not use
    #[arg(long)]
    lenient: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// `RUST_LOG` when set, otherwise warnings and errors only.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    if cli.lenient {
        config.parse = plyview_core::ParseOptions::lenient();
    }

    let mesh = match &cli.file {
        Some(path) => load_ply(path, &config.parse)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Mesh::cube(2.0),
    };
    info!(
        vertices = mesh.vertices().len(),
        faces = mesh.faces().len(),
        "Starting terminal renderer"
    );

    let mut app = TerminalApp::new(ViewerContext::new(mesh, config.camera))?;
    app.run()?;
    Ok(())
}

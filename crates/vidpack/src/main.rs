//! vidpack CLI
//!
//! Thin front-end over the pipeline loader: reads an asset from disk, runs
//! it through the cache-backed transcode pipeline, writes the emitted files,
//! and prints the module source to stdout.

#![allow(clippy::print_stdout)]

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use miette::{IntoDiagnostic, WrapErr};
use std::path::{Path, PathBuf};
use tracing::debug;
use vidpack_cache::CacheStore;
use vidpack_core::{ClipOptions, Mode, SceneOptions, SceneSpec};
use vidpack_engine::Engine;
use vidpack_pipeline::{Loader, LoaderConfig, LoaderOutput};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn loader(asset_path: String) -> miette::Result<Loader> {
    let store = CacheStore::open()?;
    Ok(Loader::new(
        Engine::from_env(),
        store,
        LoaderConfig {
            asset_path,
            mode: Mode::from_env(),
        },
    ))
}

fn read_input(input: &Path) -> miette::Result<Vec<u8>> {
    std::fs::read(input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read input {}", input.display()))
}

/// The request string identifying this invocation in the cache: the input
/// path plus the canonical JSON of the processing options. Option changes
/// must change the cache key, or a `--ultrafast` run would silently reuse a
/// lossless entry (and vice versa). The options ride in the query part, so
/// published asset names still derive from the path alone.
fn request_identity(input: &Path, options_json: &str) -> String {
    format!("{}?{options_json}", input.display())
}

/// Write emitted assets and print the module source.
fn deliver(output: &LoaderOutput, out_dir: &Path) -> miette::Result<()> {
    std::fs::create_dir_all(out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {}", out_dir.display()))?;
    for asset in &output.assets {
        let dest = out_dir.join(&asset.filename);
        std::fs::write(&dest, &asset.bytes)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", dest.display()))?;
        debug!(file = %dest.display(), "asset written");
    }
    println!("{}", output.module_source);
    Ok(())
}

async fn run_clip(
    input: PathBuf,
    speed: f64,
    ultrafast: bool,
    out_dir: PathBuf,
    asset_path: String,
) -> miette::Result<()> {
    let source = read_input(&input)?;
    let options = ClipOptions { speed, ultrafast };
    let request = request_identity(&input, &serde_json::to_string(&options).into_diagnostic()?);
    let output = loader(asset_path)?
        .load_clip(&source, &request, &options)
        .await?;
    deliver(&output, &out_dir)
}

async fn run_scenes(
    input: PathBuf,
    scenes_json: String,
    ultrafast_dev: bool,
    out_dir: PathBuf,
    asset_path: String,
) -> miette::Result<()> {
    let scenes: Vec<SceneSpec> = serde_json::from_str(&scenes_json)
        .into_diagnostic()
        .wrap_err("--scenes must be a JSON array of {end?, speed?} objects")?;
    let source = read_input(&input)?;
    let options = SceneOptions {
        scenes,
        ultrafast_dev,
    };
    let request = request_identity(&input, &serde_json::to_string(&options).into_diagnostic()?);
    let output = loader(asset_path)?
        .load_scenes(&source, &request, &options)
        .await?;
    deliver(&output, &out_dir)
}

fn run_cache() -> miette::Result<()> {
    let store = CacheStore::open()?;
    let mut entries = 0u64;
    let mut bytes = 0u64;
    let dir = std::fs::read_dir(store.root())
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read cache root {}", store.root().display()))?;
    for entry in dir {
        let entry = entry.into_diagnostic()?;
        let meta = entry.metadata().into_diagnostic()?;
        if meta.is_file() {
            entries += 1;
            bytes += meta.len();
        }
    }
    println!("root:    {}", store.root().display());
    println!("entries: {entries}");
    println!("size:    {:.1} MiB", bytes as f64 / (1024.0 * 1024.0));
    Ok(())
}


#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Clip {
            input,
            speed,
            ultrafast,
            out_dir,
            asset_path,
        } => run_clip(input, speed, ultrafast, out_dir, asset_path).await,
        Command::Scenes {
            input,
            scenes,
            ultrafast_dev,
            out_dir,
            asset_path,
        } => run_scenes(input, scenes, ultrafast_dev, out_dir, asset_path).await,
        Command::Cache => run_cache(),
    }
}

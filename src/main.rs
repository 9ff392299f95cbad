//! bindery - merge a rendered documentation site into one printable document

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use bindery::{ComposeConfig, ComposeOutcome, ContentStore, NavNode, compose};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version, about = "Merge a rendered documentation site into one printable document", long_about = None)]
#[command(after_help = "EXAMPLES:
    bindery site.json                  Compose using the manifest's output path
    bindery site.json -o print.html    Override the output location")]
struct Cli {
    /// Site manifest (JSON): navigation tree, page files, composition config
    #[arg(value_name = "MANIFEST")]
    manifest: String,

    /// Output file, overriding the manifest's output path
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

/// On-disk description of a composition run.
#[derive(Deserialize)]
struct Manifest {
    /// Site name, used as the cover title when the config leaves it empty.
    #[serde(default)]
    title: String,
    #[serde(default)]
    config: ComposeConfig,
    nav: Vec<NavNode>,
    pages: Vec<ManifestPage>,
}

#[derive(Deserialize)]
struct ManifestPage {
    /// Page url as referenced from the navigation tree.
    url: String,
    /// Base location for rewriting the page's relative asset references.
    #[serde(default)]
    base: String,
    /// Rendered HTML file, relative to the manifest.
    file: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.quiet { "error" } else { "info" },
    ))
    .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> bindery::Result<ExitCode> {
    let manifest_path = Path::new(&cli.manifest);
    let manifest = load_manifest(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let mut store = ContentStore::new();
    for page in &manifest.pages {
        let body = fs::read_to_string(base_dir.join(&page.file))?;
        store.insert(&page.url, body, &page.base);
    }

    let mut config = manifest.config;
    if config.cover.title.is_empty() {
        config.cover.title = manifest.title;
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }

    match compose(&manifest.nav, &store, &config)? {
        ComposeOutcome::Document(doc) => {
            let output = resolve_output(base_dir, &config.output_path, cli.output.is_some());
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output, doc.to_html())?;
            if !cli.quiet {
                println!("wrote {}", output.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        ComposeOutcome::NotGeneratable { url } => {
            eprintln!("document not generatable: missing content for {url}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_manifest(path: &Path) -> bindery::Result<Manifest> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| bindery::Error::InvalidManifest(format!("{}: {e}", path.display())))
}

/// Manifest-relative output paths resolve against the manifest directory;
/// a `-o` override is taken as given.
fn resolve_output(base_dir: &Path, output_path: &str, overridden: bool) -> PathBuf {
    let path = Path::new(output_path);
    if overridden || path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

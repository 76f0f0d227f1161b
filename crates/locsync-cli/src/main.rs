#[macro_use]
mod ui;
mod sync;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use locsync_config::{load_config, RawConfig};
use locsync_core::Layout;
use locsync_provider_anthropic::AnthropicTranslator;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(
    name = "locsync",
    version,
    about = "Sync JSON localization files from a source language and translate missing keys"
)]
struct Cli {
    /// Only process units whose identifier matches; `a|b` lists alternatives
    selectors: Vec<String>,

    /// Rewrite every target file even when no keys changed
    #[arg(long)]
    force: bool,

    /// Report what would change without calling the provider or writing files
    #[arg(long)]
    dry_run: bool,

    /// Translation root (overrides TRANSLATE_ROOT)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Source language code (overrides SOURCE_LANG)
    #[arg(long)]
    source_lang: Option<String>,

    /// Comma-separated target language codes (overrides TARGET_LANGS)
    #[arg(long, value_delimiter = ',')]
    target_langs: Option<Vec<String>>,

    /// Folder layout: language-first or nested (overrides FOLDER_STRUCTURE)
    #[arg(long, value_parser = parse_layout_arg)]
    layout: Option<Layout>,

    /// Maximum keys per translation request (overrides MAX_BATCH_SIZE)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Summary format printed at the end of the run
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Also write a daily-rotated debug log into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

fn parse_layout_arg(s: &str) -> std::result::Result<Layout, String> {
    s.parse::<Layout>().map_err(|e| e.to_string())
}

impl Cli {
    fn overrides(&self) -> RawConfig {
        RawConfig {
            translate_root: self.root.clone(),
            source_lang: self.source_lang.clone(),
            target_langs: self.target_langs.clone(),
            max_batch_size: self.batch_size,
            folder_structure: self.layout,
            ..Default::default()
        }
    }
}

fn init_tracing(log_dir: Option<&Path>, use_color: bool) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_ansi(use_color)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(rolling::daily(dir, "locsync.log"));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();
    let _guard = init_tracing(cli.log_dir.as_deref(), use_color);
    debug!(args = ?cli, "parsed arguments");

    let cfg = load_config(cli.overrides())?;
    let translator = AnthropicTranslator::from_config(&cfg)?;

    let result = sync::run_sync(
        &cfg,
        &translator,
        &cli.selectors,
        cli.force,
        cli.dry_run,
        cli.format,
        use_color,
    );
    match &result {
        Ok(()) => info!(event = "finished", "translation process completed"),
        Err(e) => error!(event = "failed", error = %e, "sync failed"),
    }
    result
}

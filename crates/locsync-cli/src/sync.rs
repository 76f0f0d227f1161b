use crate::OutputFormat;
use locsync_config::SyncConfig;
use locsync_provider_api::Translator;
use locsync_services::{SyncEngine, SyncSummary};
use owo_colors::OwoColorize;

pub fn run_sync(
    cfg: &SyncConfig,
    translator: &dyn Translator,
    selectors: &[String],
    force: bool,
    dry_run: bool,
    format: OutputFormat,
    use_color: bool,
) -> color_eyre::Result<()> {
    if format == OutputFormat::Text {
        ui_info!(
            "{} -> {} ({}) in {}",
            cfg.source_lang,
            cfg.target_langs.join(", "),
            cfg.layout,
            cfg.translate_root.display()
        );
    }

    let summary = SyncEngine::new(cfg, translator)
        .with_selectors(selectors)
        .force(force)
        .dry_run(dry_run)
        .run()?;

    match format {
        OutputFormat::Json => ui_out!("{}", serde_json::to_string(&summary)?),
        OutputFormat::Text => print_summary(&summary, use_color),
    }
    Ok(())
}

fn print_summary(s: &SyncSummary, use_color: bool) {
    let failures = s.units_failed + s.write_failures;
    if failures > 0 {
        ui_warn!(
            "{} unit(s) could not be read and {} file(s) could not be written",
            s.units_failed,
            s.write_failures
        );
    }

    let line = if s.dry_run {
        format!(
            "dry run: {} of {} unit(s) selected, {} file(s) would change, {} up to date",
            s.units_selected, s.units_found, s.files_planned, s.files_unchanged
        )
    } else {
        format!(
            "{} of {} unit(s) selected, {} file(s) written, {} up to date; {} key(s) translated, {} fell back to source, {} removed",
            s.units_selected,
            s.units_found,
            s.files_written,
            s.files_unchanged,
            s.keys_translated,
            s.keys_fallback,
            s.keys_deleted
        )
    };

    if use_color {
        ui_ok!("{}", line.green());
    } else {
        ui_ok!("{}", line);
    }
}

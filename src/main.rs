mod app;
mod cli;
mod state;
mod ui;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use app::EdaApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use state::AppState;

use rusty_eda::render::{render_outliers, ConsoleTarget, RenderOutcome, NO_OUTLIERS_NOTICE};
use rusty_eda::report::write_overview;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut state = AppState::load(&cli.path, cli.config())?;

    {
        let mut out = io::stdout().lock();
        write_overview(&mut out, &state.dataset, &state.classification, &state.config)
            .context("printing dataset overview")?;
        writeln!(out, "{}", state.report)?;
        if cli.json {
            let json = serde_json::to_string_pretty(&state.report)
                .context("serializing outlier report")?;
            writeln!(out, "{json}")?;
        }

        if cli.no_gui {
            let mut console = ConsoleTarget::new(&mut out);
            render_outliers(&state.dataset, &state.report, &mut console)
                .context("rendering boxplots")?;
            return Ok(());
        }
    }

    match state.render().context("rendering boxplots")? {
        RenderOutcome::NoOutliers => {
            println!(
                "{}",
                state.canvas.last_notice().unwrap_or(NO_OUTLIERS_NOTICE)
            );
            Ok(())
        }
        RenderOutcome::Rendered { drawn, skipped, .. } => {
            if !skipped.is_empty() {
                log::warn!("no boxplot drawn for {skipped:?}");
            }
            log::info!("opening figure with {drawn} boxplot(s)");
            show_window(state)
        }
    }
}

fn show_window(state: AppState) -> Result<()> {
    let title = format!("Rusty EDA – {}", state.file_name());
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(EdaApp::new(state)))),
    )
    .map_err(|e| anyhow!("figure window failed: {e}"))
}

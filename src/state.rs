use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rusty_eda::analysis::{ColumnClassification, OutlierReport};
use rusty_eda::config::AnalysisConfig;
use rusty_eda::data::{load_file, Dataset};
use rusty_eda::render::{render_outliers, FigureCanvas, RenderError, RenderOutcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One analysed file, independent of rendering.
pub struct AppState {
    pub source: PathBuf,
    pub config: AnalysisConfig,
    pub dataset: Dataset,
    /// Numerical / categorical split, computed once at load.
    pub classification: ColumnClassification,
    pub report: OutlierReport,
    /// Surface the boxplot figure is rendered onto.
    pub canvas: FigureCanvas,
}

impl AppState {
    /// Load, classify and run outlier detection.
    pub fn load(path: &Path, config: AnalysisConfig) -> Result<Self> {
        let detector = config.detector().context("invalid analysis settings")?;
        let dataset =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        let classification = ColumnClassification::from_dataset(&dataset);
        let report = detector.detect(&dataset, &classification.numerical);

        Ok(AppState {
            source: path.to_path_buf(),
            config,
            dataset,
            classification,
            report,
            canvas: FigureCanvas::default(),
        })
    }

    /// Render the flagged columns onto the canvas.
    pub fn render(&mut self) -> Result<RenderOutcome, RenderError> {
        render_outliers(&self.dataset, &self.report, &mut self.canvas)
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

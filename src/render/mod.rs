//! Boxplot rendering of flagged columns onto an explicit [`RenderTarget`].
//!
//! ```text
//!  OutlierReport ──► render_outliers ──► RenderTarget
//!                         │                 ├─ FigureCanvas  (egui window)
//!                         │                 └─ ConsoleTarget (text)
//!                         └─ GridLayout: min(n, 2) cols × ceil(n / 2) rows
//! ```
//!
//! A target sees `begin_figure`, one `draw_panel` per flagged column and
//! always a closing `end_figure`, or a single `notice` when nothing was
//! flagged.

pub mod boxplot;
pub mod console;
pub mod figure;
pub mod layout;

pub use boxplot::{BoxStats, BoxplotPanel};
pub use console::ConsoleTarget;
pub use figure::{Figure, FigureCanvas};
pub use layout::GridLayout;

use crate::analysis::OutlierReport;
use crate::data::Dataset;

pub const NO_OUTLIERS_NOTICE: &str = "NO OUTLIERS FOUND";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("column {0:?} has no values to plot")]
    NoValues(String),

    #[error("column {0:?} is not in the dataset")]
    MissingColumn(String),

    #[error("column {0:?} has no outlier bounds")]
    MissingBounds(String),

    #[error("render target: {0}")]
    Target(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A drawing surface for one figure at a time.
pub trait RenderTarget {
    /// Text shown instead of a figure.
    fn notice(&mut self, message: &str);

    fn begin_figure(&mut self, layout: GridLayout) -> Result<(), RenderError>;

    fn draw_panel(&mut self, slot: usize, panel: BoxplotPanel) -> Result<(), RenderError>;

    /// Release the figure. Called once for every successful `begin_figure`.
    fn end_figure(&mut self);
}

/// Ends the open figure when dropped.
struct FigureScope<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: RenderTarget + ?Sized> FigureScope<'a, T> {
    fn begin(target: &'a mut T, layout: GridLayout) -> Result<Self, RenderError> {
        target.begin_figure(layout)?;
        Ok(FigureScope { target })
    }
}

impl<T: RenderTarget + ?Sized> Drop for FigureScope<'_, T> {
    fn drop(&mut self) {
        self.target.end_figure();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    NoOutliers,
    Rendered {
        layout: GridLayout,
        drawn: usize,
        /// Flagged columns whose panel could not be drawn.
        skipped: Vec<String>,
    },
}

/// Draw one boxplot per flagged column of `report`, in report order.
///
/// A panel that fails is logged and left blank; the others are still
/// drawn.
pub fn render_outliers<T: RenderTarget + ?Sized>(
    dataset: &Dataset,
    report: &OutlierReport,
    target: &mut T,
) -> Result<RenderOutcome, RenderError> {
    let flagged = report.flagged_columns();
    let Some(layout) = GridLayout::for_panels(flagged.len()) else {
        target.notice(NO_OUTLIERS_NOTICE);
        return Ok(RenderOutcome::NoOutliers);
    };

    let scope = FigureScope::begin(target, layout)?;
    let mut drawn = 0;
    let mut skipped = Vec::new();

    for (slot, name) in flagged.iter().enumerate() {
        let result =
            panel_for(dataset, report, name).and_then(|panel| scope.target.draw_panel(slot, panel));
        match result {
            Ok(()) => drawn += 1,
            Err(err) => {
                log::warn!("skipping boxplot for {name}: {err}");
                skipped.push(name.to_string());
            }
        }
    }
    drop(scope);

    Ok(RenderOutcome::Rendered {
        layout,
        drawn,
        skipped,
    })
}

fn panel_for(dataset: &Dataset, report: &OutlierReport, name: &str) -> Result<BoxplotPanel, RenderError> {
    let column = dataset
        .column(name)
        .ok_or_else(|| RenderError::MissingColumn(name.to_string()))?;
    let bounds = report
        .get(name)
        .and_then(|c| c.bounds)
        .ok_or_else(|| RenderError::MissingBounds(name.to_string()))?;
    BoxplotPanel::new(column, &bounds)
}

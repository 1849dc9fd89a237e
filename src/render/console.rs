use std::io::Write;

use super::{BoxplotPanel, GridLayout, RenderError, RenderTarget};

/// Text rendering of the figure, one line per panel.
pub struct ConsoleTarget<W: Write> {
    out: W,
    layout: Option<GridLayout>,
}

impl<W: Write> ConsoleTarget<W> {
    pub fn new(out: W) -> Self {
        ConsoleTarget { out, layout: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderTarget for ConsoleTarget<W> {
    fn notice(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "{message}") {
            log::error!("failed to write notice: {e}");
        }
    }

    fn begin_figure(&mut self, layout: GridLayout) -> Result<(), RenderError> {
        writeln!(
            self.out,
            "Boxplots ({} row(s) x {} column(s))",
            layout.rows, layout.cols
        )?;
        self.layout = Some(layout);
        Ok(())
    }

    fn draw_panel(&mut self, slot: usize, panel: BoxplotPanel) -> Result<(), RenderError> {
        let (row, col) = self
            .layout
            .and_then(|l| l.position(slot))
            .ok_or_else(|| RenderError::Target(format!("slot {slot} is not in the grid")))?;
        let s = &panel.stats;
        let outliers: Vec<String> = s.outliers.iter().map(|&v| panel.format_value(v)).collect();
        writeln!(
            self.out,
            "  [{row},{col}] {}: whiskers {} .. {} | box {} [{}] {} | {} outlier(s): {}",
            panel.title,
            panel.format_value(s.lower_whisker),
            panel.format_value(s.upper_whisker),
            panel.format_value(s.q1),
            panel.format_value(s.median),
            panel.format_value(s.q3),
            outliers.len(),
            outliers.join(", "),
        )?;
        Ok(())
    }

    fn end_figure(&mut self) {
        self.layout = None;
        if let Err(e) = self.out.flush() {
            log::error!("failed to flush figure output: {e}");
        }
    }
}

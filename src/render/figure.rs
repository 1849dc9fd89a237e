use super::{BoxplotPanel, GridLayout, RenderError, RenderTarget};

/// A finished grid of boxplot panels. Slots without a panel stay blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub layout: GridLayout,
    slots: Vec<Option<BoxplotPanel>>,
}

impl Figure {
    pub fn new(layout: GridLayout) -> Self {
        Figure {
            layout,
            slots: vec![None; layout.cells()],
        }
    }

    pub fn slot(&self, index: usize) -> Option<&BoxplotPanel> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn panels(&self) -> impl Iterator<Item = &BoxplotPanel> {
        self.slots.iter().flatten()
    }

    fn place(&mut self, index: usize, panel: BoxplotPanel) -> Result<(), RenderError> {
        let cells = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| RenderError::Target(format!("slot {index} outside a {cells}-cell grid")))?;
        *slot = Some(panel);
        Ok(())
    }
}

/// In-memory surface backing the GUI window: keeps the last finished
/// figure, or the last notice.
#[derive(Debug, Default)]
pub struct FigureCanvas {
    open: Option<Figure>,
    figure: Option<Figure>,
    notice: Option<String>,
}

impl FigureCanvas {
    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

impl RenderTarget for FigureCanvas {
    fn notice(&mut self, message: &str) {
        self.figure = None;
        self.notice = Some(message.to_string());
    }

    fn begin_figure(&mut self, layout: GridLayout) -> Result<(), RenderError> {
        if self.open.is_some() {
            return Err(RenderError::Target("a figure is already open".to_string()));
        }
        self.figure = None;
        self.notice = None;
        self.open = Some(Figure::new(layout));
        Ok(())
    }

    fn draw_panel(&mut self, slot: usize, panel: BoxplotPanel) -> Result<(), RenderError> {
        self.open
            .as_mut()
            .ok_or_else(|| RenderError::Target("no figure is open".to_string()))?
            .place(slot, panel)
    }

    fn end_figure(&mut self) {
        if let Some(figure) = self.open.take() {
            self.figure = Some(figure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::OutlierBounds;
    use crate::data::{CellValue, Column, ColumnKind};

    fn panel(name: &str) -> BoxplotPanel {
        let column = Column::new(
            name,
            ColumnKind::Numeric,
            vec![CellValue::Float(1.0), CellValue::Float(9.0)],
        );
        BoxplotPanel::new(&column, &OutlierBounds::from_quartiles(3.0, 7.0, 0.0)).unwrap()
    }

    #[test]
    fn figure_is_published_on_end() {
        let mut canvas = FigureCanvas::default();
        let layout = GridLayout::for_panels(3).unwrap();
        canvas.begin_figure(layout).unwrap();
        canvas.draw_panel(0, panel("a")).unwrap();
        assert!(canvas.figure().is_none());
        canvas.draw_panel(2, panel("b")).unwrap();
        canvas.end_figure();

        let figure = canvas.figure().unwrap();
        assert_eq!(figure.layout, layout);
        assert_eq!(figure.slot(0).unwrap().column, "a");
        assert!(figure.slot(1).is_none());
        assert_eq!(figure.slot(2).unwrap().column, "b");
        assert!(figure.slot(3).is_none());
        assert_eq!(figure.panels().count(), 2);
    }

    #[test]
    fn panels_need_an_open_figure_and_a_valid_slot() {
        let mut canvas = FigureCanvas::default();
        assert!(canvas.draw_panel(0, panel("a")).is_err());

        canvas.begin_figure(GridLayout::for_panels(1).unwrap()).unwrap();
        assert!(canvas.begin_figure(GridLayout::for_panels(1).unwrap()).is_err());
        assert!(canvas.draw_panel(5, panel("a")).is_err());
        canvas.end_figure();
        assert_eq!(canvas.figure().unwrap().panels().count(), 0);
    }

    #[test]
    fn notice_replaces_previous_figure() {
        let mut canvas = FigureCanvas::default();
        canvas.begin_figure(GridLayout::for_panels(1).unwrap()).unwrap();
        canvas.end_figure();
        canvas.notice("nothing here");
        assert!(canvas.figure().is_none());
        assert_eq!(canvas.last_notice(), Some("nothing here"));
    }
}

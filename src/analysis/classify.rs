use serde::Serialize;

use crate::data::{ColumnKind, Dataset};

/// Numerical / categorical partition of a dataset's columns, each list in
/// dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    /// `Categorical` columns go to the categorical list; `Numeric` and
    /// `Temporal` columns are numerical.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut out = ColumnClassification::default();
        for column in dataset.columns() {
            match column.kind {
                ColumnKind::Categorical => out.categorical.push(column.name.clone()),
                ColumnKind::Numeric | ColumnKind::Temporal => {
                    out.numerical.push(column.name.clone())
                }
            }
        }
        log::debug!(
            "classified {} numerical and {} categorical columns",
            out.numerical.len(),
            out.categorical.len()
        );
        out
    }
}

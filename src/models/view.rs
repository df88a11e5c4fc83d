use super::error::AppError;
use super::selection::ViewSelection;
use super::series::{CategoryId, Metric, SeriesRecord};
use crate::config::Config;
use crate::services::registry::DatasetRegistry;
use std::rc::Rc;

/// Render-ready projection of the selection over the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub category: CategoryId,
    pub series: Rc<SeriesRecord>,
    /// Active metrics, in the series' definition order.
    pub columns: Vec<Metric>,
}

/// One table row: the year and the value of each active column.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub year: i32,
    pub values: Vec<f64>,
}

/// Chart input: x-axis labels and one line per active column.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub years: Vec<String>,
    pub lines: Vec<(Metric, Vec<f64>)>,
}

/// Builds the derived view. Registry errors are returned unchanged. Metrics
/// the selection has never toggled count as `Config::NEW_METRIC_ACTIVE`.
pub fn build<R>(registry: &R, selection: &ViewSelection) -> Result<DerivedView, AppError>
where
    R: DatasetRegistry + ?Sized,
{
    let series = registry.get_series(&selection.category)?;

    let columns = series
        .metrics()
        .iter()
        .filter(|m| {
            selection
                .metrics
                .is_active_or(&m.key, Config::NEW_METRIC_ACTIVE)
        })
        .cloned()
        .collect();

    Ok(DerivedView {
        category: selection.category.clone(),
        series,
        columns,
    })
}

impl DerivedView {
    pub fn column_keys(&self) -> Vec<&str> {
        self.columns.iter().map(|m| m.key.as_str()).collect()
    }

    fn column_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .filter_map(|m| self.series.metric_index(&m.key))
            .collect()
    }

    pub fn rows(&self) -> Vec<ViewRow> {
        let indices = self.column_indices();
        self.series
            .points()
            .iter()
            .map(|p| ViewRow {
                year: p.year,
                values: indices.iter().map(|&i| p.values[i]).collect(),
            })
            .collect()
    }

    pub fn chart_data(&self) -> ChartData {
        let points = self.series.points();
        let years = points.iter().map(|p| p.year.to_string()).collect();

        let lines = self
            .columns
            .iter()
            .zip(self.column_indices())
            .map(|(metric, i)| (metric.clone(), points.iter().map(|p| p.values[i]).collect()))
            .collect();

        ChartData { years, lines }
    }
}

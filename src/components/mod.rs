pub mod category_selector;
pub mod chart;
pub mod data_table;
pub mod metric_toggles;
pub mod recommendations;
pub mod status;

pub use category_selector::CategorySelector;
pub use chart::Chart;
pub use data_table::DataTable;
pub use metric_toggles::MetricToggles;
pub use recommendations::Recommendations;
pub use status::Status;

pub mod error;
pub mod report;
pub mod selection;
pub mod series;
pub mod view;

use super::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Key identifying a reporting category (e.g. `oil`, `electric`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A selectable category with its display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    pub title: String,
}

impl Category {
    /// Creates a category whose chart title is derived from its label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: CategoryId::new(id),
            title: format!("{label} Emission Trends"),
            label,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Definition of a tracked metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub label: String,
}

impl Metric {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// One year of measurements; `values[i]` belongs to `SeriesRecord::metrics()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub values: Vec<f64>,
}

/// Historical metrics for one category, ascending by year.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    category: CategoryId,
    metrics: Vec<Metric>,
    points: Vec<SeriesPoint>,
}

impl SeriesRecord {
    /// Validates and builds a series. Points are sorted by year; duplicate
    /// years, duplicate metric keys and ragged points are rejected.
    pub fn new(
        category: CategoryId,
        metrics: Vec<Metric>,
        mut points: Vec<SeriesPoint>,
    ) -> Result<Self, AppError> {
        let mut keys = BTreeSet::new();
        if let Some(dup) = metrics.iter().find(|m| !keys.insert(m.key.as_str())) {
            return Err(AppError::DataError(format!(
                "Duplicate metric '{}' in {category}",
                dup.key
            )));
        }

        if let Some(point) = points.iter().find(|p| p.values.len() != metrics.len()) {
            return Err(AppError::DataError(format!(
                "Year {} in {category} has {} values, expected {}",
                point.year,
                point.values.len(),
                metrics.len()
            )));
        }

        points.sort_by_key(|p| p.year);
        if let Some(pair) = points.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(AppError::DataError(format!(
                "Duplicate year {} in {category}",
                pair[0].year
            )));
        }

        Ok(Self {
            category,
            metrics,
            points,
        })
    }

    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn metric_index(&self, key: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.key == key)
    }

    pub fn has_metric(&self, key: &str) -> bool {
        self.metric_index(key).is_some()
    }

    /// Value of `key` at `year`, if both exist.
    pub fn value(&self, year: i32, key: &str) -> Option<f64> {
        let idx = self.metric_index(key)?;
        self.points
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.values.get(idx).copied())
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }
}

// WIRE FORMAT
/// Series as served by `GET /reports/{category}` and stored in the bundled sample file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSeries {
    pub category: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub metrics: Vec<Metric>,
    pub points: Vec<ApiPoint>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiPoint {
    pub year: i32,
    pub metrics: HashMap<String, f64>,
}

impl ApiSeries {
    /// Display information for the category, falling back to the id as label.
    pub fn category_info(&self) -> Category {
        let label = self.label.clone().unwrap_or_else(|| self.category.clone());
        let category = Category::new(self.category.clone(), label);
        match &self.title {
            Some(title) => category.with_title(title.clone()),
            None => category,
        }
    }
}

impl TryFrom<ApiSeries> for SeriesRecord {
    type Error = AppError;

    fn try_from(api: ApiSeries) -> Result<Self, Self::Error> {
        let category = CategoryId::new(api.category);
        let points = api
            .points
            .into_iter()
            .map(|mut p| {
                let expected = api.metrics.len();
                if p.metrics.len() != expected {
                    return Err(AppError::DataError(format!(
                        "Year {} in {category} has {} metrics, expected {expected}",
                        p.year,
                        p.metrics.len()
                    )));
                }
                let values = api
                    .metrics
                    .iter()
                    .map(|m| {
                        p.metrics.remove(&m.key).ok_or_else(|| {
                            AppError::DataError(format!(
                                "Year {} in {category} is missing '{}'",
                                p.year, m.key
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SeriesPoint {
                    year: p.year,
                    values,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Self::new(category, api.metrics, points)
    }
}

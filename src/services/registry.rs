use crate::config::Config;
use crate::models::{
    error::AppError,
    series::{ApiSeries, Category, CategoryId, SeriesRecord},
};
use crate::services::{client::ReportClient, retry::retry_with_backoff};
use serde::Deserialize;
use std::{cell::RefCell, collections::HashMap, rc::Rc};
use tracing::{debug, info};

const SAMPLE_REPORTS: &str = include_str!("../../data/sample_reports.json");

/// Read access to the per-category series. Consumers never learn whether the
/// data is bundled or fetched.
pub trait DatasetRegistry {
    /// Known categories, in display order.
    fn categories(&self) -> Vec<Category>;

    fn get_series(&self, id: &CategoryId) -> Result<Rc<SeriesRecord>, AppError>;

    fn category(&self, id: &CategoryId) -> Option<Category> {
        self.categories().into_iter().find(|c| &c.id == id)
    }

    fn contains(&self, id: &CategoryId) -> bool {
        self.category(id).is_some()
    }
}

// STATIC REGISTRY
#[derive(Deserialize)]
struct SeriesFile {
    series: Vec<ApiSeries>,
}

/// In-memory table of series.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    categories: Vec<Category>,
    series: HashMap<CategoryId, Rc<SeriesRecord>>,
}

impl StaticRegistry {
    pub fn from_records(
        records: impl IntoIterator<Item = (Category, SeriesRecord)>,
    ) -> Result<Self, AppError> {
        let mut registry = Self::default();
        for (category, record) in records {
            if record.category() != &category.id {
                return Err(AppError::DataError(format!(
                    "Series for {} filed under {}",
                    record.category(),
                    category.id
                )));
            }
            if registry.series.contains_key(&category.id) {
                return Err(AppError::DataError(format!(
                    "Duplicate category: {}",
                    category.id
                )));
            }
            registry
                .series
                .insert(category.id.clone(), Rc::new(record));
            registry.categories.push(category);
        }
        Ok(registry)
    }

    /// Parses `{ "series": [ ... ] }`.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let file: SeriesFile = serde_json::from_str(json)
            .map_err(|e| AppError::DataError(format!("Invalid series file: {e}")))?;

        let records = file
            .series
            .into_iter()
            .map(|api| {
                let category = api.category_info();
                SeriesRecord::try_from(api).map(|record| (category, record))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(records)
    }

    /// The dataset bundled with the application.
    pub fn sample() -> Result<Self, AppError> {
        Self::from_json(SAMPLE_REPORTS)
    }
}

impl DatasetRegistry for StaticRegistry {
    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn get_series(&self, id: &CategoryId) -> Result<Rc<SeriesRecord>, AppError> {
        self.series
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::UnknownCategory(id.to_string()))
    }
}

// REMOTE REGISTRY
/// Category catalogue backed by the report gateway, with a cache of the
/// series fetched so far.
pub struct RemoteRegistry {
    client: Rc<ReportClient>,
    categories: Vec<Category>,
    cache: RefCell<HashMap<CategoryId, Rc<SeriesRecord>>>,
}

impl RemoteRegistry {
    pub fn new(client: Rc<ReportClient>, categories: Vec<Category>) -> Self {
        Self {
            client,
            categories,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Uses the catalogue from `Config::CATEGORIES`.
    pub fn with_default_catalog(client: Rc<ReportClient>) -> Self {
        Self::new(client, Config::categories())
    }

    pub fn client(&self) -> &Rc<ReportClient> {
        &self.client
    }

    pub fn is_loaded(&self, id: &CategoryId) -> bool {
        self.cache.borrow().contains_key(id)
    }

    /// Fetches `GET /reports/{id}` without touching the cache.
    pub async fn fetch(&self, id: &CategoryId) -> Result<SeriesRecord, AppError> {
        if !self.contains(id) {
            return Err(AppError::UnknownCategory(id.to_string()));
        }

        let path = format!("/reports/{id}");
        let api: ApiSeries = retry_with_backoff(
            || self.client.fetch_resource(&path),
            Config::MAX_RETRY_ATTEMPTS,
        )
        .await?;

        if api.category != id.as_str() {
            return Err(AppError::DataError(format!(
                "Requested {id}, received {}",
                api.category
            )));
        }

        let record = SeriesRecord::try_from(api)?;
        debug!(category = %id, points = record.points().len(), "series fetched");
        Ok(record)
    }

    /// Stores a fetched series, replacing any previous copy.
    pub fn insert(&self, record: SeriesRecord) -> Result<(), AppError> {
        let id = record.category().clone();
        if !self.contains(&id) {
            return Err(AppError::UnknownCategory(id.to_string()));
        }
        info!(category = %id, "series cached");
        self.cache.borrow_mut().insert(id, Rc::new(record));
        Ok(())
    }
}

impl DatasetRegistry for RemoteRegistry {
    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn get_series(&self, id: &CategoryId) -> Result<Rc<SeriesRecord>, AppError> {
        if !self.contains(id) {
            return Err(AppError::UnknownCategory(id.to_string()));
        }
        self.cache
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotLoaded(id.to_string()))
    }
}

// DATA SOURCE
/// Which registry backs the dashboard, chosen once at startup.
#[derive(Clone)]
pub enum DataSource {
    Static(Rc<StaticRegistry>),
    Remote(Rc<RemoteRegistry>),
}

impl DataSource {
    /// Builds the source selected by `Config::USE_LIVE_DATA`.
    pub fn from_config() -> Result<Self, AppError> {
        if Config::USE_LIVE_DATA {
            let client = Rc::new(ReportClient::new()?);
            Ok(Self::Remote(Rc::new(RemoteRegistry::with_default_catalog(
                client,
            ))))
        } else {
            Ok(Self::Static(Rc::new(StaticRegistry::sample()?)))
        }
    }

    pub fn registry(&self) -> Rc<dyn DatasetRegistry> {
        match self {
            Self::Static(registry) => registry.clone(),
            Self::Remote(registry) => registry.clone(),
        }
    }

    pub fn remote(&self) -> Option<&Rc<RemoteRegistry>> {
        match self {
            Self::Remote(registry) => Some(registry),
            Self::Static(_) => None,
        }
    }
}

impl PartialEq for DataSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => Rc::ptr_eq(a, b),
            (Self::Remote(a), Self::Remote(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::{Metric, SeriesPoint};

    fn remote() -> RemoteRegistry {
        let client = ReportClient::with_config(
            crate::services::client::ApiConfig::builder()
                .base_url("http://localhost:8081/api")
                .build(),
        )
        .unwrap();
        RemoteRegistry::new(Rc::new(client), vec![Category::new("oil", "Oil & Gas")])
    }

    fn oil_record() -> SeriesRecord {
        SeriesRecord::new(
            "oil".into(),
            vec![Metric::new("emissions", "E")],
            vec![SeriesPoint {
                year: 2018,
                values: vec![320.0],
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_registry_loads() {
        let registry = StaticRegistry::sample().unwrap();
        let ids: Vec<_> = registry
            .categories()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["oil", "electric", "other"]);
    }

    #[test]
    fn test_remote_known_but_not_loaded() {
        let registry = remote();
        assert!(registry.contains(&"oil".into()));
        assert_eq!(
            registry.get_series(&"oil".into()),
            Err(AppError::NotLoaded("oil".to_string()))
        );
        assert_eq!(
            registry.get_series(&"coal".into()),
            Err(AppError::UnknownCategory("coal".to_string()))
        );
    }

    #[test]
    fn test_remote_insert_fills_cache() {
        let registry = remote();
        registry.insert(oil_record()).unwrap();
        assert!(registry.is_loaded(&"oil".into()));
        assert_eq!(registry.get_series(&"oil".into()).unwrap().years(), vec![2018]);
    }

    #[test]
    fn test_static_duplicate_category_rejected() {
        let result = StaticRegistry::from_records(vec![
            (Category::new("oil", "Oil"), oil_record()),
            (Category::new("oil", "Oil"), oil_record()),
        ]);
        assert!(matches!(result, Err(AppError::DataError(_))));
    }
}

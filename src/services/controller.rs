use crate::config::Config;
use crate::models::{
    error::AppError,
    selection::{MetricToggles, ViewSelection},
    series::{Category, CategoryId, SeriesRecord},
    view::{self, DerivedView},
};
use crate::services::registry::DatasetRegistry;
use chrono::{DateTime, Utc};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Called with the rebuilt view after every change.
///
/// Listeners run while the controller is mutably borrowed, so they must only
/// schedule work (e.g. a re-render) and never call back into the controller.
pub type Listener = Rc<dyn Fn(&Result<DerivedView, AppError>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Identity of one fetch. Only the most recently issued ticket for the
/// selected category may change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    category: CategoryId,
}

impl FetchTicket {
    pub fn category(&self) -> &CategoryId {
        &self.category
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was committed and listeners notified.
    Applied,
    /// The fetch failed; existing data stays and the error is recorded.
    Failed,
    /// A newer selection or fetch superseded this one; nothing changed.
    Discarded,
}

/// Owns the view selection. Every mutation is validated up front and either
/// applied whole or rejected with the previous state intact.
pub struct ViewController {
    registry: Rc<dyn DatasetRegistry>,
    selection: ViewSelection,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    generation: u64,
    pending: Option<FetchTicket>,
    fetch_error: Option<AppError>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl ViewController {
    /// Starts on `Config::DEFAULT_CATEGORY`, or the registry's first category
    /// when the default is not available.
    pub fn new(registry: Rc<dyn DatasetRegistry>) -> Result<Self, AppError> {
        let default = CategoryId::new(Config::DEFAULT_CATEGORY);
        let category = if registry.contains(&default) {
            default
        } else {
            registry
                .categories()
                .into_iter()
                .next()
                .map(|c| c.id)
                .ok_or_else(|| AppError::ConfigError("Registry has no categories".to_string()))?
        };

        Self::with_selection(registry, ViewSelection::new(category, MetricToggles::new()))
    }

    /// Starts from an explicit selection. Metrics of the selected series that
    /// are missing from the toggles are added with their default state.
    pub fn with_selection(
        registry: Rc<dyn DatasetRegistry>,
        mut selection: ViewSelection,
    ) -> Result<Self, AppError> {
        if !registry.contains(&selection.category) {
            return Err(AppError::UnknownCategory(selection.category.to_string()));
        }
        if let Ok(series) = registry.get_series(&selection.category) {
            selection
                .metrics
                .register(series.metrics(), Config::NEW_METRIC_ACTIVE);
        }

        Ok(Self {
            registry,
            selection,
            listeners: Vec::new(),
            next_subscription: 0,
            generation: 0,
            pending: None,
            fetch_error: None,
            last_refreshed: None,
        })
    }

    pub fn registry(&self) -> &Rc<dyn DatasetRegistry> {
        &self.registry
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> ViewSelection {
        self.selection.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.registry.categories()
    }

    /// Display information for the selected category.
    pub fn category(&self) -> Option<Category> {
        self.registry.category(&self.selection.category)
    }

    pub fn current_view(&self) -> Result<DerivedView, AppError> {
        view::build(&*self.registry, &self.selection)
    }

    /// Replaces the category. Toggles are left exactly as they are; metrics
    /// they have no entry for render with their default state.
    pub fn select_category(&mut self, id: CategoryId) -> Result<(), AppError> {
        if !self.registry.contains(&id) {
            warn!(category = %id, "rejected unknown category");
            return Err(AppError::UnknownCategory(id.to_string()));
        }

        debug!(from = %self.selection.category, to = %id, "category selected");
        self.selection.category = id;
        self.supersede_fetches();
        self.notify();
        Ok(())
    }

    /// Flips `name` and returns its new state. The metric must exist in the
    /// selected category's series. A metric never toggled before starts from
    /// `Config::NEW_METRIC_ACTIVE`.
    pub fn toggle_metric(&mut self, name: &str) -> Result<bool, AppError> {
        let series = self.registry.get_series(&self.selection.category)?;
        if !series.has_metric(name) {
            warn!(metric = name, category = %self.selection.category, "rejected unknown metric");
            return Err(AppError::UnknownMetric(name.to_string()));
        }

        let active = self
            .selection
            .metrics
            .flip_or(name, Config::NEW_METRIC_ACTIVE);
        debug!(metric = name, active, "metric toggled");
        self.notify();
        Ok(active)
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    // FETCH TRACKING
    /// Issues a ticket for fetching the selected category, superseding any
    /// ticket issued before.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            category: self.selection.category.clone(),
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.category == self.selection.category
    }

    /// Settles a fetch. `commit` stores the series where the registry can see
    /// it and is only called for the current ticket.
    pub fn complete_fetch<F>(
        &mut self,
        ticket: FetchTicket,
        result: Result<SeriesRecord, AppError>,
        commit: F,
    ) -> FetchOutcome
    where
        F: FnOnce(SeriesRecord) -> Result<(), AppError>,
    {
        if !self.is_current(&ticket) {
            debug!(category = %ticket.category, "discarding superseded fetch");
            return FetchOutcome::Discarded;
        }
        self.pending = None;

        let committed = result.and_then(commit);

        let outcome = match committed {
            Ok(()) => {
                info!(category = %ticket.category, "series refreshed");
                self.fetch_error = None;
                self.last_refreshed = Some(Utc::now());
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(category = %ticket.category, error = %e, "fetch failed");
                self.fetch_error = Some(e);
                FetchOutcome::Failed
            }
        };
        self.notify();
        outcome
    }

    /// Error of the last settled fetch for the selected category. Cleared by
    /// the next successful fetch or by selecting another category.
    pub fn fetch_error(&self) -> Option<&AppError> {
        self.fetch_error.as_ref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.as_ref().is_some_and(|t| self.is_current(t))
    }

    /// Outstanding tickets and the last fetch error belong to the previous
    /// selection.
    fn supersede_fetches(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.fetch_error = None;
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let view = self.current_view();
        for (_, listener) in &self.listeners {
            listener(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::registry::StaticRegistry;
    use std::cell::{Cell, RefCell};

    fn controller() -> ViewController {
        ViewController::new(Rc::new(StaticRegistry::sample().unwrap())).unwrap()
    }

    #[test]
    fn test_defaults_to_oil_with_all_metrics_on() {
        let ctrl = controller();
        let selection = ctrl.selection();
        assert_eq!(selection.category.as_str(), "oil");
        assert_eq!(selection.metrics.active_names(), vec!["emissions", "efficiency"]);
    }

    #[test]
    fn test_listener_called_per_mutation() {
        let mut ctrl = controller();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let id = ctrl.subscribe(Rc::new(move |view: &Result<DerivedView, AppError>| {
            assert!(view.is_ok());
            seen.set(seen.get() + 1);
        }));

        ctrl.select_category("electric".into()).unwrap();
        ctrl.toggle_metric("emissions").unwrap();
        assert_eq!(calls.get(), 2);

        ctrl.unsubscribe(id);
        ctrl.toggle_metric("emissions").unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_rejected_mutation_does_not_notify() {
        let mut ctrl = controller();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        ctrl.subscribe(Rc::new(move |_: &Result<DerivedView, AppError>| {
            seen.set(seen.get() + 1);
        }));

        assert!(ctrl.toggle_metric("waste").is_err());
        assert!(ctrl.select_category("coal".into()).is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_listener_runs_inside_mutation_borrow() {
        let shared = Rc::new(RefCell::new(controller()));
        let queued = Rc::new(Cell::new(0));
        let queue = queued.clone();
        let handle = Rc::downgrade(&shared);
        shared
            .borrow_mut()
            .subscribe(Rc::new(move |_: &Result<DerivedView, AppError>| {
                let ctrl = handle.upgrade().unwrap();
                assert!(ctrl.try_borrow().is_err());
                queue.set(queue.get() + 1);
            }));

        shared
            .borrow_mut()
            .select_category("electric".into())
            .unwrap();

        assert_eq!(queued.get(), 1);
        assert_eq!(shared.borrow().selection().category.as_str(), "electric");
    }

    #[test]
    fn test_begin_fetch_supersedes_previous_ticket() {
        let mut ctrl = controller();
        let first = ctrl.begin_fetch();
        let second = ctrl.begin_fetch();

        assert!(!ctrl.is_current(&first));
        assert!(ctrl.is_current(&second));
        assert!(ctrl.is_fetching());
    }
}

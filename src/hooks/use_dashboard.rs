use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::models::{
    error::AppError,
    selection::ViewSelection,
    series::{Category, CategoryId},
    view::DerivedView,
};
use crate::services::{
    controller::{FetchOutcome, ViewController},
    registry::DataSource,
};

#[derive(Clone, PartialEq, Debug)]
pub enum LoadState {
    Loading,
    Ready { updated: Option<DateTime<Utc>> },
    /// The last fetch failed; any view on screen is the previous data.
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Everything the dashboard renders, plus the callbacks that mutate it.
#[derive(Clone, PartialEq)]
pub struct DashboardHandle {
    pub categories: Vec<Category>,
    pub category: Option<Category>,
    pub selection: ViewSelection,
    pub view: Result<DerivedView, AppError>,
    pub status: LoadState,
    pub select_category: Callback<CategoryId>,
    pub toggle_metric: Callback<String>,
}

type SharedController = Rc<RefCell<ViewController>>;

/// Owns a `ViewController` for the lifetime of the component. Mutations
/// notify the controller's listeners, which re-render the component; with a
/// remote source the selected category is fetched and polled.
#[hook]
pub fn use_dashboard(source: DataSource) -> Result<DashboardHandle, AppError> {
    let controller = use_memo(source.clone(), |source| {
        ViewController::new(source.registry()).map(|c| Rc::new(RefCell::new(c)))
    });
    let force_update = use_force_update();
    let trigger = use_state(|| 0u32); // Polling trigger

    // Re-render whenever the controller reports a change. Listeners run inside
    // the callbacks' `borrow_mut`; `force_update` only queues a render on the
    // Yew scheduler, so the controller is read again after that borrow ends.
    {
        let controller = (*controller).clone();
        let force_update = force_update.clone();
        use_effect_with(source.clone(), move |_| {
            let subscription = controller.as_ref().ok().map(|ctrl| {
                let id = ctrl
                    .borrow_mut()
                    .subscribe(Rc::new(move |_: &Result<DerivedView, AppError>| {
                        force_update.force_update();
                    }));
                (ctrl.clone(), id)
            });

            move || {
                if let Some((ctrl, id)) = subscription {
                    ctrl.borrow_mut().unsubscribe(id);
                }
            }
        });
    }

    let selected = (*controller)
        .as_ref()
        .ok()
        .map(|ctrl| ctrl.borrow().selection().category);

    // Fetch the selected category from the gateway, then poll
    {
        let controller = (*controller).clone();
        let force_update = force_update.clone();
        let trigger_value = *trigger;

        use_effect_with(
            (source.clone(), selected.clone(), trigger_value),
            move |(source, _, _)| {
                let aborted = Rc::new(Cell::new(false));

                if let (Some(remote), Ok(ctrl)) = (source.remote().cloned(), controller) {
                    let ticket = ctrl.borrow_mut().begin_fetch();
                    force_update.force_update();

                    let aborted = aborted.clone();
                    spawn_local(async move {
                        let result = remote.fetch(ticket.category()).await;
                        if aborted.get() {
                            return;
                        }

                        let outcome = ctrl.borrow_mut().complete_fetch(ticket, result, |record| {
                            remote.insert(record)
                        });
                        if outcome == FetchOutcome::Failed {
                            if let Some(e) = ctrl.borrow().fetch_error() {
                                gloo::console::error!(&format!("Failed to load report: {e}"));
                            }
                        }

                        if crate::config::Config::ENABLE_AUTO_REFRESH {
                            TimeoutFuture::new(crate::config::Config::POLLING_INTERVAL_MS).await;
                            if !aborted.get() {
                                trigger.set(*trigger + 1); // Trigger next fetch
                            }
                        }
                    });
                }

                move || aborted.set(true)
            },
        );
    }

    let ctrl = match &*controller {
        Ok(ctrl) => ctrl.clone(),
        Err(e) => return Err(e.clone()),
    };

    Ok(snapshot(&ctrl))
}

fn snapshot(ctrl: &SharedController) -> DashboardHandle {
    let select_category = {
        let ctrl = ctrl.clone();
        Callback::from(move |id: CategoryId| {
            if let Err(e) = ctrl.borrow_mut().select_category(id) {
                gloo::console::warn!(&format!("Cannot select category: {e}"));
            }
        })
    };

    let toggle_metric = {
        let ctrl = ctrl.clone();
        Callback::from(move |name: String| {
            if let Err(e) = ctrl.borrow_mut().toggle_metric(&name) {
                gloo::console::warn!(&format!("Cannot toggle metric: {e}"));
            }
        })
    };

    let state = ctrl.borrow();
    let view = state.current_view();
    let status = match (state.fetch_error(), &view) {
        (Some(e), _) => LoadState::Error(e.to_string()),
        (None, Err(AppError::NotLoaded(_))) => LoadState::Loading,
        (None, Err(e)) => LoadState::Error(e.to_string()),
        (None, Ok(_)) if state.is_fetching() && state.last_refreshed().is_none() => {
            LoadState::Loading
        }
        (None, Ok(_)) => LoadState::Ready {
            updated: state.last_refreshed(),
        },
    };

    DashboardHandle {
        categories: state.categories(),
        category: state.category(),
        selection: state.selection(),
        view,
        status,
        select_category,
        toggle_metric,
    }
}

use yew::prelude::*;

use crate::config::Config;
use crate::models::{selection::MetricToggles as Toggles, series::Metric};

#[derive(Properties, PartialEq)]
pub struct MetricTogglesProps {
    /// Metrics of the selected series, in display order.
    pub metrics: Vec<Metric>,
    pub toggles: Toggles,
    pub on_toggle: Callback<String>,
}

/// One checkbox per metric of the selected series
#[function_component(MetricToggles)]
pub fn metric_toggles(props: &MetricTogglesProps) -> Html {
    html! {
        <div class="metric-toggles">
            {
                props.metrics.iter().map(|metric| {
                    let checked = props
                        .toggles
                        .is_active_or(&metric.key, Config::NEW_METRIC_ACTIVE);
                    let onchange = {
                        let callback = props.on_toggle.clone();
                        let key = metric.key.clone();
                        Callback::from(move |_: Event| callback.emit(key.clone()))
                    };
                    html! {
                        <label class="metric-toggle" key={metric.key.clone()}>
                            <input type="checkbox" {checked} {onchange} />
                            {format!("Show {}", metric.label)}
                        </label>
                    }
                }).collect::<Html>()
            }
        </div>
    }
}

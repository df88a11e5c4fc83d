use yew::prelude::*;

use impact_dashboard::components::{
    CategorySelector, Chart, DataTable, MetricToggles, Recommendations, Status,
};
use impact_dashboard::hooks::use_dashboard::use_dashboard;
use impact_dashboard::services::registry::DataSource;

#[derive(Properties, PartialEq)]
struct DashboardProps {
    source: DataSource,
}

#[function_component(Dashboard)]
fn dashboard(props: &DashboardProps) -> Html {
    let dashboard = use_dashboard(props.source.clone());
    let dashboard = match dashboard {
        Ok(handle) => handle,
        Err(e) => {
            return html! {
                <div class="status error"><p>{"❌ Error: "}{e.to_string()}</p></div>
            };
        }
    };

    let title = dashboard
        .category
        .as_ref()
        .map(|c| c.title.clone())
        .unwrap_or_default();

    html! {
        <>
            <section class="controls">
                <CategorySelector
                    categories={dashboard.categories.clone()}
                    selected={dashboard.selection.category.clone()}
                    on_change={dashboard.select_category.clone()}
                />
                if let Ok(view) = &dashboard.view {
                    <MetricToggles
                        metrics={view.series.metrics().to_vec()}
                        toggles={dashboard.selection.metrics.clone()}
                        on_toggle={dashboard.toggle_metric.clone()}
                    />
                }
            </section>

            <Status state={dashboard.status.clone()} />

            if let Ok(view) = &dashboard.view {
                <section class="chart-section">
                    <Chart data={view.chart_data()} {title} />
                </section>

                <section class="table-section">
                    <h2>{"Data Summary"}</h2>
                    <DataTable view={view.clone()} />
                </section>
            }

            <section class="recommendations-section">
                <h2>{"Mitigation Recommendations"}</h2>
                <Recommendations />
            </section>
        </>
    }
}

#[function_component(App)]
fn app() -> Html {
    let source = use_memo((), |_| DataSource::from_config());

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{"Environmental Impact Dashboard"}</h1>
            </header>

            <main class="app-main">
                {
                    match &*source {
                        Ok(source) => html! { <Dashboard source={source.clone()} /> },
                        Err(e) => html! {
                            <div class="status error"><p>{"❌ Error: "}{e.to_string()}</p></div>
                        },
                    }
                }
            </main>

            <style>
                {include_str!("style.css")}
            </style>
        </div>
    }
}

fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    yew::Renderer::<App>::new().render();
}

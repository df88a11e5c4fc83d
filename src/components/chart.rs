use charming::{
    Chart as CharmingChart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle, LineStyleType,
        SplitLine, TextStyle, Tooltip, Trigger,
    },
    renderer::WasmRenderer,
    series::Line,
};
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::config::Config;
use crate::models::view::ChartData;
use crate::utils::debounce::create_debounced_resize_listener;

const CHART_ID: &str = "impact-chart";

/// Line colours in column order; the first two match emissions and efficiency.
const LINE_COLORS: [&str; 6] = [
    "#10b981", // emerald
    "#3b82f6", // blue
    "#f59e0b", // amber
    "#dc267f", // magenta
    "#785ef0", // purple
    "#fe6100", // orange
];

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub data: ChartData,
    pub title: String,
}

#[function_component(Chart)]
pub fn chart(props: &ChartProps) -> Html {
    let container_ref = use_node_ref();

    {
        let container_ref = container_ref.clone();

        use_effect_with(
            (props.data.clone(), props.title.clone(), container_ref),
            |(data, title, container_ref)| {
                let listener = container_ref.cast::<HtmlElement>().map(|container| {
                    render_chart(&container, data, title);

                    let data = data.clone();
                    let title = title.clone();
                    create_debounced_resize_listener(
                        move || render_chart(&container, &data, &title),
                        Config::RESIZE_DEBOUNCE_MS,
                    )
                });

                move || drop(listener)
            },
        );
    }

    html! {
        <div class="chart-container" ref={container_ref}>
            <div id={CHART_ID} />
        </div>
    }
}

fn render_chart(container: &HtmlElement, data: &ChartData, title: &str) {
    let width = container.client_width().cast_unsigned();
    let height = container.client_height().cast_unsigned();

    if width == 0 || height == 0 {
        return;
    }

    let chart = build_chart(data, title);
    if let Err(e) = WasmRenderer::new(width, height).render(CHART_ID, &chart) {
        web_sys::console::error_1(&format!("Render error: {e:?}").into());
    }
}

/// With no active columns the chart still shows the year axis.
fn build_chart(data: &ChartData, title: &str) -> CharmingChart {
    let (title_color, axis_color, grid_color) = ("#374151", "#6b7280", "#e5e7eb");

    let mut chart = CharmingChart::new()
        .title(
            Title::new()
                .text(title)
                .left("center")
                .text_style(TextStyle::new().font_size(16).color(title_color)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .legend(Legend::new().bottom("0%"))
        .grid(
            Grid::new()
                .left("6%")
                .right("4%")
                .bottom("12%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(data.years.clone())
                .axis_label(AxisLabel::new().color(axis_color)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().color(axis_color))
                .split_line(
                    SplitLine::new().line_style(
                        LineStyle::new()
                            .color(grid_color)
                            .type_(LineStyleType::Dashed),
                    ),
                ),
        );

    for (i, (metric, values)) in data.lines.iter().enumerate() {
        let color = LINE_COLORS[i % LINE_COLORS.len()];
        chart = chart.series(
            Line::new()
                .name(metric.label.as_str())
                .line_style(LineStyle::new().width(3).color(color))
                .item_style(ItemStyle::new().color(color))
                .data(values.clone()),
        );
    }

    chart
}

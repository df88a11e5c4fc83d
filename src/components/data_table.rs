use yew::prelude::*;

use crate::models::view::DerivedView;

#[derive(Properties, PartialEq)]
pub struct DataTableProps {
    pub view: DerivedView,
}

/// Year column followed by one column per active metric
#[function_component(DataTable)]
pub fn data_table(props: &DataTableProps) -> Html {
    let rows = props.view.rows();

    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>{"Year"}</th>
                    { for props.view.columns.iter().map(|m| html! { <th key={m.key.clone()}>{&m.label}</th> }) }
                </tr>
            </thead>
            <tbody>
                {
                    rows.iter().enumerate().map(|(i, row)| {
                        let class = if i % 2 == 0 { "row-even" } else { "row-odd" };
                        html! {
                            <tr key={row.year} {class}>
                                <td>{row.year}</td>
                                { for row.values.iter().map(|v| html! { <td>{format_value(*v)}</td> }) }
                            </tr>
                        }
                    }).collect::<Html>()
                }
            </tbody>
        </table>
    }
}

/// Whole numbers print without a fraction.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

use yew::prelude::*;

use crate::config::Config;

#[derive(Properties, PartialEq)]
pub struct RecommendationsProps {
    #[prop_or_else(default_items)]
    pub items: Vec<String>,
}

fn default_items() -> Vec<String> {
    Config::RECOMMENDATIONS
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[function_component(Recommendations)]
pub fn recommendations(props: &RecommendationsProps) -> Html {
    html! {
        <ul class="recommendations">
            { for props.items.iter().map(|item| html! { <li>{item}</li> }) }
        </ul>
    }
}

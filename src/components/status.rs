use crate::hooks::use_dashboard::LoadState;
use chrono::Local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusProps {
    pub state: LoadState,
}

#[function_component(Status)]
pub fn status(props: &StatusProps) -> Html {
    match &props.state {
        LoadState::Loading => html! {
            <div class="status loading">
                <div class="spinner"></div>
                <p>{"Loading data..."}</p>
            </div>
        },
        LoadState::Ready { updated: Some(at) } => html! {
            <div class="status success">
                <p>{format!("✅ Updated {}", at.with_timezone(&Local).format("%H:%M"))}</p>
            </div>
        },
        LoadState::Ready { updated: None } => html! {},
        LoadState::Error(msg) => html! {
            <div class="status error">
                <p>{"❌ Error: "}{msg}</p>
            </div>
        },
    }
}

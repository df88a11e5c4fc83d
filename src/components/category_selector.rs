use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::models::series::{Category, CategoryId};

#[derive(Properties, PartialEq)]
pub struct CategorySelectorProps {
    pub categories: Vec<Category>,
    pub selected: CategoryId,
    pub on_change: Callback<CategoryId>,
}

/// Category dropdown component
#[function_component(CategorySelector)]
pub fn category_selector(props: &CategorySelectorProps) -> Html {
    let on_change = {
        let callback = props.on_change.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            callback.emit(CategoryId::new(target.value()));
        })
    };

    html! {
        <select
            class="category-selector"
            onchange={on_change}
            aria-label="Select reporting category"
            title="Select reporting category"
        >
            {
                props.categories.iter().map(|c| {
                    let selected = c.id == props.selected;
                    html! {
                        <option value={c.id.to_string()} {selected}>{&c.label}</option>
                    }
                }).collect::<Html>()
            }
        </select>
    }
}

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::MathView;
use crate::vm::map_level_cards;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let cards = use_hook(map_level_cards);

    use_hook(move || {
        if let Some(level) = ctx.take_initial_level() {
            let _ = navigator.replace(Route::Practice {
                level: level.value(),
            });
        }
    });

    rsx! {
        div { class: "page home-page",
            header { class: "home-header",
                h1 { class: "home-title", "分數練習達人" }
                p { class: "home-subtitle", "從國小到國中，一步步掌握分數運算！" }
            }
            div { class: "level-grid",
                for card in cards {
                    div { key: "{card.id}", class: "level-card",
                        h2 { class: "level-card__title", "{card.title}" }
                        p { class: "level-card__description", "{card.description}" }
                        div { class: "level-card__example",
                            h3 { "例題：" }
                            MathView { latex: card.example.to_string(), class: "level-card__math".to_string() }
                        }
                        button {
                            class: "btn btn-primary level-card__start",
                            id: "level-start-{card.id}",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Practice { level: card.id });
                            },
                            "開始練習"
                        }
                    }
                }
            }
        }
    }
}

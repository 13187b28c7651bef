use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const MATHJAX_CONFIG: &str = r"window.MathJax = {
  tex: { inlineMath: [['$', '$']], displayMath: [['$$', '$$']] },
  startup: { typeset: false }
};";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "分數練習達人" }

        // The renderer loads asynchronously; math views poll for it.
        document::Script { "{MATHJAX_CONFIG}" }
        document::Script {
            src: "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js",
            r#async: true,
        }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "發生錯誤" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}

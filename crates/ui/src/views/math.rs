use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dioxus::document::eval;
use dioxus::prelude::*;
use services::{TypesetBackend, TypesetError, typeset_with_fallback};

use crate::context::AppContext;

static NEXT_MATH_ID: AtomicU64 = AtomicU64::new(0);

fn next_math_id() -> String {
    format!("math-{}", NEXT_MATH_ID.fetch_add(1, Ordering::Relaxed))
}

/// MathJax inside the desktop webview, driven through `document::eval`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MathJaxBackend;

#[async_trait(?Send)]
impl TypesetBackend for MathJaxBackend {
    async fn is_ready(&self) -> bool {
        eval("return !!(window.MathJax && window.MathJax.typesetPromise);")
            .join::<bool>()
            .await
            .unwrap_or(false)
    }

    async fn typeset(&self, target: &str) -> Result<(), TypesetError> {
        let js = format!(
            r#"const el = document.getElementById({target:?});
            if (!el) return "missing";
            try {{
                await window.MathJax.typesetPromise([el]);
                return null;
            }} catch (err) {{
                return String(err && err.message ? err.message : err);
            }}"#
        );
        match eval(&js).join::<Option<String>>().await {
            Ok(None) => Ok(()),
            Ok(Some(reason)) if reason == "missing" => {
                Err(TypesetError::MissingTarget(target.to_string()))
            }
            Ok(Some(reason)) => Err(TypesetError::Rejected(reason)),
            Err(err) => Err(TypesetError::Rejected(format!("{err:?}"))),
        }
    }
}

fn delimited(latex: &str, inline: bool) -> String {
    if inline {
        format!("${latex}$")
    } else {
        format!("$${latex}$$")
    }
}

/// Math markup typeset by MathJax; shows the raw markup when typesetting fails.
///
/// Give each instance a `key` derived from its markup so new expressions remount.
#[component]
pub fn MathView(
    latex: String,
    #[props(default)] inline: bool,
    #[props(default)] class: String,
) -> Element {
    let ctx = use_context::<AppContext>();
    let policy = ctx.config().typeset;
    let element_id = use_hook(next_math_id);
    let mut fallback = use_signal(|| false);

    let target = element_id.clone();
    use_effect(move || {
        let target = target.clone();
        spawn(async move {
            let outcome = typeset_with_fallback(&MathJaxBackend, &target, policy).await;
            if outcome.is_fallback() {
                fallback.set(true);
            }
        });
    });

    let body = if fallback() {
        latex.clone()
    } else {
        delimited(&latex, inline)
    };
    let class = format!("math {class}");

    if inline {
        rsx! {
            span { id: "{element_id}", class: "{class}", "{body}" }
        }
    } else {
        rsx! {
            div { id: "{element_id}", class: "{class}", "{body}" }
        }
    }
}

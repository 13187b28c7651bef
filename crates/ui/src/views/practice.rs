use dioxus::prelude::*;
use dioxus_router::use_navigator;
use drill_core::model::LevelId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{MathView, ScratchpadView, ViewError};
use crate::vm::{AnswerField, PracticeIntent, ProblemCardVm, start_practice};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[cfg(test)]
use crate::vm::PracticeVm;

#[component]
pub fn PracticeView(level: u8) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let practice_loop = ctx.practice_loop();

    let vm = {
        let practice_loop = practice_loop.clone();
        use_signal(move || {
            LevelId::new(level)
                .ok()
                .map(|level_id| start_practice(&practice_loop, level_id))
        })
    };

    let dispatch_intent = use_callback(move |intent: PracticeIntent| {
        let mut vm = vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.apply(&practice_loop, intent);
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PracticeTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let vm_guard = vm.read();
    let Some(current) = vm_guard.as_ref() else {
        return rsx! {
            div { class: "page practice-page",
                p { class: "practice-empty", "{ViewError::UnknownLevel.message()}" }
                button {
                    class: "btn btn-secondary",
                    id: "practice-back",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::Home {});
                    },
                    "返回等級選擇"
                }
            }
        };
    };
    let title = current.title();
    let cards = current.cards();
    let error = current.error();
    let can_check = current.can_check();
    let score_label = current.score_label();
    drop(vm_guard);

    rsx! {
        div { class: "page practice-page",
            header { class: "practice-header",
                h1 { class: "practice-title", "{title}" }
                button {
                    class: "btn btn-secondary",
                    id: "practice-back",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::Home {});
                    },
                    "返回等級選擇"
                }
            }
            div { class: "practice-body",
                div { class: "practice-problems",
                    if cards.is_empty() {
                        div { class: "practice-empty",
                            p { "{error.unwrap_or(ViewError::EmptyBatch).message()}" }
                            button {
                                class: "btn btn-secondary",
                                id: "practice-retry",
                                r#type: "button",
                                onclick: move |_| dispatch_intent.call(PracticeIntent::NewBatch),
                                "重試"
                            }
                        }
                    } else {
                        for card in cards {
                            ProblemCard {
                                key: "{card.index}-{card.expression}",
                                card: card.clone(),
                                on_intent: dispatch_intent,
                            }
                        }
                    }
                }
                div { class: "practice-scratch",
                    ScratchpadView {}
                }
            }
            footer { class: "practice-footer",
                if let Some(score) = score_label {
                    span { class: "practice-score", id: "practice-score", "{score}" }
                }
                button {
                    class: "btn btn-success",
                    id: "practice-check",
                    r#type: "button",
                    disabled: !can_check,
                    onclick: move |_| dispatch_intent.call(PracticeIntent::Check),
                    "核對答案"
                }
                button {
                    class: "btn btn-primary",
                    id: "practice-new-batch",
                    r#type: "button",
                    onclick: move |_| dispatch_intent.call(PracticeIntent::NewBatch),
                    "換一批題目"
                }
            }
        }
    }
}

#[component]
fn ProblemCard(card: ProblemCardVm, on_intent: EventHandler<PracticeIntent>) -> Element {
    let index = card.index;
    let edit = move |field: AnswerField, raw: String| {
        on_intent.call(PracticeIntent::Edit { index, field, raw });
    };

    rsx! {
        div { class: "{card.feedback.class}", id: "problem-{index}",
            div { class: "problem__row",
                span { class: "problem__label", "{card.label}" }
                MathView { latex: card.expression.clone(), class: "problem__math".to_string() }
                span { class: "problem__icon", "{card.feedback.icon}" }
            }
            div { class: "fraction-input",
                input {
                    r#type: "number",
                    class: "fraction-input__box",
                    aria_label: "Numerator",
                    value: "{card.numerator}",
                    oninput: move |evt| edit(AnswerField::Numerator, evt.value()),
                }
                span { class: "fraction-input__bar", "/" }
                input {
                    r#type: "number",
                    class: "fraction-input__box",
                    aria_label: "Denominator",
                    value: "{card.denominator}",
                    oninput: move |evt| edit(AnswerField::Denominator, evt.value()),
                }
            }
            if let Some(answer) = card.correct_answer.clone() {
                div { class: "problem__answer",
                    span { "正確答案:" }
                    MathView { key: "{answer}", latex: answer, inline: true }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PracticeTestHandles {
    dispatch: Rc<RefCell<Option<Callback<PracticeIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<PracticeVm>>>>>,
}

#[cfg(test)]
impl PracticeTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<PracticeIntent>,
        vm: Signal<Option<PracticeVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<PracticeIntent> {
        (*self.dispatch.borrow()).expect("practice dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<PracticeVm>> {
        (*self.vm.borrow()).expect("practice vm registered")
    }
}

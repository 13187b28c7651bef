use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use drill_core::model::LevelId;
use services::{PracticeConfig, PracticeLoopService};

use crate::context::{UiApp, build_app_context};
use crate::views::practice::PracticeTestHandles;
use crate::views::{HomeView, PracticeView};

#[derive(Clone)]
struct TestApp {
    initial_level: Option<LevelId>,
    practice_loop: Arc<PracticeLoopService>,
}

impl UiApp for TestApp {
    fn initial_level(&self) -> Option<LevelId> {
        self.initial_level
    }

    fn config(&self) -> PracticeConfig {
        PracticeConfig::default()
    }

    fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Practice(u8),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    practice_handles: Option<PracticeTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.practice_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Practice(level) => rsx! { PracticeView { level } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub practice_handles: Option<PracticeTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn practice(&self) -> &PracticeTestHandles {
        self.practice_handles
            .as_ref()
            .expect("practice handles for a practice view")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_loop(view, Arc::new(PracticeLoopService::new()))
}

pub fn setup_view_harness_with_loop(
    view: ViewKind,
    practice_loop: Arc<PracticeLoopService>,
) -> ViewHarness {
    let practice_handles = match view {
        ViewKind::Practice(_) => Some(PracticeTestHandles::default()),
        ViewKind::Home => None,
    };

    let app = Arc::new(TestApp {
        initial_level: None,
        practice_loop,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            practice_handles: practice_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        practice_handles,
    }
}

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use drill_core::model::LevelId;
use services::{PracticeConfig, PracticeLoopService};

pub trait UiApp: Send + Sync {
    /// Level to open directly on launch instead of the level grid.
    fn initial_level(&self) -> Option<LevelId>;
    fn config(&self) -> PracticeConfig;

    fn practice_loop(&self) -> Arc<PracticeLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    initial_level_configured: Option<LevelId>,
    // 0 once consumed.
    initial_level_once: Arc<AtomicU8>,
    config: PracticeConfig,

    practice_loop: Arc<PracticeLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial_level_configured = app.initial_level();
        let config = app.config();
        let practice_loop = app.practice_loop();

        Self {
            initial_level_configured,
            initial_level_once: Arc::new(AtomicU8::new(
                initial_level_configured.map_or(0, |level| level.value()),
            )),
            config,
            practice_loop,
        }
    }

    /// Returns the launch level once; later calls return `None`.
    #[must_use]
    pub fn take_initial_level(&self) -> Option<LevelId> {
        let raw = self.initial_level_once.swap(0, Ordering::AcqRel);
        LevelId::new(raw).ok()
    }

    /// The configured value (not the one-shot value). Useful for diagnostics/UI.
    #[must_use]
    pub fn initial_level_configured(&self) -> Option<LevelId> {
        self.initial_level_configured
    }

    #[must_use]
    pub fn config(&self) -> PracticeConfig {
        self.config
    }

    #[must_use]
    pub fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<LevelId>);

    impl UiApp for Fixed {
        fn initial_level(&self) -> Option<LevelId> {
            self.0
        }

        fn config(&self) -> PracticeConfig {
            PracticeConfig::default()
        }

        fn practice_loop(&self) -> Arc<PracticeLoopService> {
            Arc::new(PracticeLoopService::new())
        }
    }

    #[test]
    fn initial_level_is_taken_once() {
        let level = LevelId::new(5).unwrap();
        let app: Arc<dyn UiApp> = Arc::new(Fixed(Some(level)));
        let ctx = build_app_context(&app);
        let clone = ctx.clone();

        assert_eq!(ctx.take_initial_level(), Some(level));
        assert_eq!(clone.take_initial_level(), None);
        assert_eq!(ctx.initial_level_configured(), Some(level));
    }

    #[test]
    fn no_initial_level_by_default() {
        let app: Arc<dyn UiApp> = Arc::new(Fixed(None));
        assert_eq!(build_app_context(&app).take_initial_level(), None);
    }
}

use std::time::Duration;

use crate::typeset::TypesetPolicy;

/// Runtime knobs for a practice screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PracticeConfig {
    pub typeset: TypesetPolicy,
    /// Delay before a queued scratchpad resize is applied (about one frame).
    pub resize_delay: Duration,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            typeset: TypesetPolicy::default(),
            resize_delay: Duration::from_millis(16),
        }
    }
}

mod home;
mod math;
mod practice;
mod scratchpad;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use math::{MathJaxBackend, MathView};
pub use practice::PracticeView;
pub use scratchpad::ScratchpadView;
pub use state::ViewError;

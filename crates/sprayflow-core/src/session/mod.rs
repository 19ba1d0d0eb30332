mod engine;
mod plan;

pub use engine::{SessionEngine, SessionState};
pub use plan::SessionPlan;

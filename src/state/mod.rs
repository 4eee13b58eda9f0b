//! State management module
//!
//! This module holds the scenario engine and everything it keeps track of:
//! the scenario catalog, per-user progress and variable substitution

pub mod engine;
pub mod locks;
pub mod scenarios;
pub mod storage;
pub mod template;

// Re-export commonly used state components
pub use engine::{ScenarioEngine, HandleOutcome, StepAction, InputResolution, plan_step, resolve_pending_input};
pub use locks::UserLocks;
pub use scenarios::ScenarioManager;
pub use storage::{ProgressStore, StateStorage, MemoryStateStorage};
pub use template::{substitute_text, substitute_value};

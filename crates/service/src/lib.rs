//! Swap Service
//!
//! Core logic for quote orchestration, selection, refresh and execution.

pub mod engine;
pub mod executor;
pub mod orchestrator;
pub mod pricing;
pub mod refresh;
pub mod selection;

#[cfg(test)]
mod test_support;

pub use engine::{EngineConfig, EngineError, EngineEvent, EngineResult, EngineSnapshot, SwapEngine};
pub use executor::SwapExecutor;
pub use orchestrator::{CycleOutcome, OrchestratorConfig, QuoteOrchestrator};
pub use refresh::{IntervalTicks, RefreshScheduler, RefreshState, TickOutcome, TickSource};
pub use selection::SelectionPolicy;

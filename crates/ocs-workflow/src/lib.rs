//! # ocs-workflow — Generic Workflow Transition Engine
//!
//! A reusable finite-state-machine executor for the compliance workflows in
//! the Orbital Compliance Stack (document approval, authorization pipelines,
//! assessment review). The engine is parameterized by a declarative
//! [`WorkflowDefinition`] and a caller-defined context type; it owns no
//! business semantics of its own.
//!
//! ```text
//! host application                ocs-workflow
//!   WorkflowDefinition<C>  ──▶    WorkflowEngine<C>
//!   context (per instance) ──▶      execute_transition / evaluate_transitions
//!   persisted state        ◀──    TransitionResult / CascadeOutcome
//! ```
//!
//! ## Contract
//!
//! - Definitions are validated at construction; a structurally invalid
//!   definition ([`WorkflowError`]) never becomes an engine.
//! - Operational failures (unknown state/event, guard rejection, hook
//!   failure) are returned as failed [`TransitionResult`]s, never thrown.
//! - Automatic transitions cascade sequentially under a hard
//!   `max_auto_transitions` cap, the cycle-breaker for self-referential
//!   definitions.
//! - The caller-supplied context is opaque: the engine passes it by
//!   reference into guards, conditions, and hooks and never inspects,
//!   clones, or retains it. Callers sharing one context across concurrent
//!   attempts are responsible for serializing access.

pub mod definition;
pub mod engine;

pub use definition::{
    ConditionFn, ErrorObserverFn, GuardFn, HookFn, ObserverFn, StateDefinition, Transition,
    TransitionAttempt, WorkflowDefinition,
};
pub use engine::{
    AvailableTransition, CascadeOutcome, EngineOptions, TransitionResult, WorkflowEngine,
    WorkflowError, DEFAULT_MAX_AUTO_TRANSITIONS,
};

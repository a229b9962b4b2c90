//! # Workflow Definitions
//!
//! Declarative state/transition configuration consumed by the
//! [`WorkflowEngine`](crate::engine::WorkflowEngine). A definition is plain
//! data authored by the host application (typically hard-coded per business
//! process, e.g. a document-approval or authorization pipeline) plus the
//! guard, condition, and hook closures attached at the seams.
//!
//! States and transitions are kept in declaration order. Lookups go through
//! linear search by name; definitions are small (tens of states) and the
//! order is part of the contract: `evaluate_transitions` fires the *first*
//! eligible auto-transition in declaration order.
//!
//! ## Hook Signatures
//!
//! Guards are read-only predicates over the context and may suspend; hooks
//! receive `&mut C` and perform the caller's side effects. Both return boxed
//! futures so the engine can await arbitrary host code. Hook failures are
//! reported through `anyhow::Error` — the error type belongs to the host,
//! not the engine.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Async guard predicate gating a manually-triggered transition.
///
/// Returning `Ok(false)` or `Err(_)` blocks the transition.
pub type GuardFn<C> =
    Arc<dyn for<'a> Fn(&'a C) -> BoxFuture<'a, anyhow::Result<bool>> + Send + Sync>;

/// Synchronous condition gating an automatic transition.
pub type ConditionFn<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

/// Async side-effect hook invoked with the caller's context
/// (`on_enter`, `on_exit`, `on_transition`).
pub type HookFn<C> =
    Arc<dyn for<'a> Fn(&'a mut C) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync>;

/// Definition-wide observer invoked around every transition attempt
/// (`before_transition`, `after_transition`).
pub type ObserverFn<C> = Arc<
    dyn for<'a> Fn(&'a mut C, TransitionAttempt) -> BoxFuture<'a, anyhow::Result<()>>
        + Send
        + Sync,
>;

/// Definition-wide error observer invoked when a hook fails mid-transition.
/// Receives the attempt and the failure message. Infallible by construction —
/// an error handler that errors has nowhere to report to.
pub type ErrorObserverFn<C> = Arc<
    dyn for<'a> Fn(&'a mut C, TransitionAttempt, String) -> BoxFuture<'a, ()> + Send + Sync,
>;

/// The state/event pair a transition attempt was invoked with. Passed to the
/// definition-wide observers by value so observer futures only borrow the
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAttempt {
    /// The state the attempt started from.
    pub from: String,
    /// The event name that was attempted.
    pub event: String,
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// A single named transition out of a state.
///
/// Built through the pure factory constructors: [`Transition::to`] for
/// manually-triggered transitions and [`Transition::auto`] for automatic
/// ones (which always carry their condition).
pub struct Transition<C> {
    to: String,
    description: Option<String>,
    guard: Option<GuardFn<C>>,
    auto: bool,
    auto_condition: Option<ConditionFn<C>>,
    on_transition: Option<HookFn<C>>,
}

impl<C> Transition<C> {
    /// A manually-triggered transition to `target`.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            to: target.into(),
            description: None,
            guard: None,
            auto: false,
            auto_condition: None,
            on_transition: None,
        }
    }

    /// An automatic transition to `target`, eligible to fire without a
    /// caller-invoked event whenever `condition` evaluates true.
    pub fn auto<F>(target: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to: target.into(),
            description: None,
            guard: None,
            auto: true,
            auto_condition: Some(Arc::new(condition)),
            on_transition: None,
        }
    }

    /// Builder: attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: attach an async guard predicate.
    pub fn with_guard(mut self, guard: GuardFn<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Builder: attach a synchronous guard predicate.
    pub fn with_guard_fn<F>(self, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.with_guard(Arc::new(move |ctx| {
            Box::pin(std::future::ready(Ok(guard(ctx))))
        }))
    }

    /// Builder: attach an async `on_transition` side-effect hook.
    pub fn with_on_transition(mut self, hook: HookFn<C>) -> Self {
        self.on_transition = Some(hook);
        self
    }

    /// Builder: attach a synchronous `on_transition` side-effect hook.
    pub fn with_on_transition_fn<F>(self, hook: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.with_on_transition(Arc::new(move |ctx| {
            hook(ctx);
            Box::pin(std::future::ready(Ok(())))
        }))
    }

    /// The target state name.
    pub fn target(&self) -> &str {
        &self.to
    }

    /// The optional human-readable description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether this transition is automatic.
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// The guard, if one is attached.
    pub fn guard(&self) -> Option<&GuardFn<C>> {
        self.guard.as_ref()
    }

    /// The `on_transition` hook, if one is attached.
    pub fn on_transition(&self) -> Option<&HookFn<C>> {
        self.on_transition.as_ref()
    }

    /// Evaluate the auto-condition against the context.
    ///
    /// Transitions without a condition report `false` — an automatic
    /// transition is only eligible when its condition affirmatively holds.
    pub fn condition_met(&self, ctx: &C) -> bool {
        self.auto_condition.as_ref().is_some_and(|cond| cond(ctx))
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("to", &self.to)
            .field("description", &self.description)
            .field("auto", &self.auto)
            .field("has_guard", &self.guard.is_some())
            .field("has_condition", &self.auto_condition.is_some())
            .field("has_on_transition", &self.on_transition.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StateDefinition
// ---------------------------------------------------------------------------

/// A named workflow state: its outgoing transitions in declaration order,
/// optional entry/exit hooks, and informational metadata.
///
/// The `terminal_hint` metadata is descriptive only. Actual terminality is
/// derived from the transition list being empty — see
/// [`WorkflowEngine::is_terminal_state`](crate::engine::WorkflowEngine::is_terminal_state).
pub struct StateDefinition<C> {
    name: String,
    label: Option<String>,
    terminal_hint: bool,
    on_enter: Option<HookFn<C>>,
    on_exit: Option<HookFn<C>>,
    transitions: Vec<(String, Transition<C>)>,
}

impl<C> StateDefinition<C> {
    /// Create a state with no transitions or hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            terminal_hint: false,
            on_enter: None,
            on_exit: None,
            transitions: Vec::new(),
        }
    }

    /// Builder: attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: mark the state as intended-terminal (informational only).
    pub fn with_terminal_hint(mut self, hint: bool) -> Self {
        self.terminal_hint = hint;
        self
    }

    /// Builder: attach an async `on_enter` hook.
    pub fn with_on_enter(mut self, hook: HookFn<C>) -> Self {
        self.on_enter = Some(hook);
        self
    }

    /// Builder: attach a synchronous `on_enter` hook.
    pub fn with_on_enter_fn<F>(self, hook: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.with_on_enter(Arc::new(move |ctx| {
            hook(ctx);
            Box::pin(std::future::ready(Ok(())))
        }))
    }

    /// Builder: attach an async `on_exit` hook.
    pub fn with_on_exit(mut self, hook: HookFn<C>) -> Self {
        self.on_exit = Some(hook);
        self
    }

    /// Builder: attach a synchronous `on_exit` hook.
    pub fn with_on_exit_fn<F>(self, hook: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.with_on_exit(Arc::new(move |ctx| {
            hook(ctx);
            Box::pin(std::future::ready(Ok(())))
        }))
    }

    /// Builder: register a named transition. Declaration order is preserved
    /// and is significant for auto-transition scanning.
    pub fn transition(mut self, event: impl Into<String>, transition: Transition<C>) -> Self {
        self.transitions.push((event.into(), transition));
        self
    }

    /// The state name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The optional display label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The informational terminal hint.
    pub fn terminal_hint(&self) -> bool {
        self.terminal_hint
    }

    /// The `on_enter` hook, if present.
    pub fn on_enter(&self) -> Option<&HookFn<C>> {
        self.on_enter.as_ref()
    }

    /// The `on_exit` hook, if present.
    pub fn on_exit(&self) -> Option<&HookFn<C>> {
        self.on_exit.as_ref()
    }

    /// All transitions in declaration order, with their event names.
    pub fn transitions(&self) -> &[(String, Transition<C>)] {
        &self.transitions
    }

    /// Look up a transition by event name.
    pub fn get_transition(&self, event: &str) -> Option<&Transition<C>> {
        self.transitions
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, t)| t)
    }
}

impl<C> fmt::Debug for StateDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("terminal_hint", &self.terminal_hint)
            .field("has_on_enter", &self.on_enter.is_some())
            .field("has_on_exit", &self.on_exit.is_some())
            .field(
                "transitions",
                &self.transitions.iter().map(|(e, _)| e).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// WorkflowDefinition
// ---------------------------------------------------------------------------

/// A complete workflow definition: states in declaration order, the initial
/// state name, and the optional definition-wide observers.
///
/// Structural invariants (initial state exists, every transition target
/// exists, names are unique) are checked when the definition is handed to
/// [`WorkflowEngine::new`](crate::engine::WorkflowEngine::new), not here —
/// the definition itself is inert data.
pub struct WorkflowDefinition<C> {
    initial_state: String,
    states: Vec<StateDefinition<C>>,
    before_transition: Option<ObserverFn<C>>,
    after_transition: Option<ObserverFn<C>>,
    on_error: Option<ErrorObserverFn<C>>,
}

impl<C> WorkflowDefinition<C> {
    /// Create a definition with the given initial state name and no states.
    pub fn new(initial_state: impl Into<String>) -> Self {
        Self {
            initial_state: initial_state.into(),
            states: Vec::new(),
            before_transition: None,
            after_transition: None,
            on_error: None,
        }
    }

    /// Builder: register a state. Declaration order is preserved.
    pub fn state(mut self, state: StateDefinition<C>) -> Self {
        self.states.push(state);
        self
    }

    /// Builder: attach the `before_transition` observer.
    pub fn with_before_transition(mut self, observer: ObserverFn<C>) -> Self {
        self.before_transition = Some(observer);
        self
    }

    /// Builder: attach the `after_transition` observer.
    pub fn with_after_transition(mut self, observer: ObserverFn<C>) -> Self {
        self.after_transition = Some(observer);
        self
    }

    /// Builder: attach the `on_error` observer.
    pub fn with_on_error(mut self, observer: ErrorObserverFn<C>) -> Self {
        self.on_error = Some(observer);
        self
    }

    /// The configured initial state name.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// All states in declaration order.
    pub fn states(&self) -> &[StateDefinition<C>] {
        &self.states
    }

    /// Look up a state by name.
    pub fn get_state(&self, name: &str) -> Option<&StateDefinition<C>> {
        self.states.iter().find(|s| s.name() == name)
    }

    /// The `before_transition` observer, if present.
    pub fn before_transition(&self) -> Option<&ObserverFn<C>> {
        self.before_transition.as_ref()
    }

    /// The `after_transition` observer, if present.
    pub fn after_transition(&self) -> Option<&ObserverFn<C>> {
        self.after_transition.as_ref()
    }

    /// The `on_error` observer, if present.
    pub fn on_error(&self) -> Option<&ErrorObserverFn<C>> {
        self.on_error.as_ref()
    }
}

impl<C> fmt::Debug for WorkflowDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowDefinition")
            .field("initial_state", &self.initial_state)
            .field(
                "states",
                &self.states.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("has_before_transition", &self.before_transition.is_some())
            .field("has_after_transition", &self.after_transition.is_some())
            .field("has_on_error", &self.on_error.is_some())
            .finish()
    }
}

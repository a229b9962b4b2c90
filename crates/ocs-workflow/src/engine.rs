//! # Workflow Transition Engine
//!
//! Executes state transitions against caller-supplied contexts according to
//! an immutable [`WorkflowDefinition`]: guard enforcement, the ordered hook
//! sequence, and bounded auto-transition cascades.
//!
//! ## Failure Model
//!
//! Construction errors ([`WorkflowError`]) are thrown once, at
//! [`WorkflowEngine::new`]. Operational failures — unknown state, unknown
//! event, guard rejection, hook failure — are never thrown; they come back
//! as a [`TransitionResult`] with `success == false` and a descriptive
//! `error` string. Callers branch on `success`, not on exceptions.
//!
//! ## Atomicity
//!
//! Transitions are atomic. The hook sequence is
//! `before_transition → on_exit → on_transition → on_enter → after_transition`,
//! each step awaited in order. A failure at any step short-circuits the
//! rest, is routed to the definition's `on_error` observer, and yields a
//! failed result whose `current_state` equals `previous_state`: the state
//! is considered to have moved only if every hook succeeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::definition::{StateDefinition, TransitionAttempt, WorkflowDefinition};

/// Default cascade bound for automatic transitions.
pub const DEFAULT_MAX_AUTO_TRANSITIONS: usize = 10;

// ---------------------------------------------------------------------------
// Errors & options
// ---------------------------------------------------------------------------

/// Structural definition errors, raised at engine construction.
///
/// An engine cannot be built over a definition that violates these — there
/// is no degraded mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The configured initial state is not among the defined states.
    #[error("initial state \"{state}\" is not defined in the workflow")]
    UnknownInitialState {
        /// The offending initial state name.
        state: String,
    },

    /// A transition targets a state that does not exist.
    #[error("transition \"{event}\" on state \"{state}\" targets unknown state \"{to}\"")]
    DanglingTarget {
        /// The state declaring the transition.
        state: String,
        /// The transition's event name.
        event: String,
        /// The missing target state name.
        to: String,
    },

    /// Two states share the same name.
    #[error("duplicate state \"{state}\" in workflow definition")]
    DuplicateState {
        /// The duplicated state name.
        state: String,
    },

    /// Two transitions on the same state share the same event name.
    #[error("duplicate transition \"{event}\" on state \"{state}\"")]
    DuplicateTransition {
        /// The state declaring the transitions.
        state: String,
        /// The duplicated event name.
        event: String,
    },
}

/// Engine construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Emit a `tracing` debug event per transition step.
    pub debug: bool,
    /// Hard cap on cascaded auto-transitions per `evaluate_transitions` call.
    pub max_auto_transitions: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            debug: false,
            max_auto_transitions: DEFAULT_MAX_AUTO_TRANSITIONS,
        }
    }
}

// ---------------------------------------------------------------------------
// Result value objects
// ---------------------------------------------------------------------------

/// The outcome of a single transition attempt.
///
/// A value object with no identity beyond the call that produced it. On
/// failure, `current_state` equals `previous_state` and `error` describes
/// the rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// Whether the transition was applied.
    pub success: bool,
    /// The state the attempt started from.
    pub previous_state: String,
    /// The state after the attempt (equal to `previous_state` on failure).
    pub current_state: String,
    /// The event name that was attempted.
    pub transition_event: String,
    /// Failure description, present iff `success == false`.
    pub error: Option<String>,
    /// When the attempt completed.
    pub timestamp: DateTime<Utc>,
}

impl TransitionResult {
    fn applied(previous: &str, current: &str, event: &str) -> Self {
        Self {
            success: true,
            previous_state: previous.to_string(),
            current_state: current.to_string(),
            transition_event: event.to_string(),
            error: None,
            timestamp: Utc::now(),
        }
    }

    fn rejected(previous: &str, event: &str, error: String) -> Self {
        Self {
            success: false,
            previous_state: previous.to_string(),
            current_state: previous.to_string(),
            transition_event: event.to_string(),
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

/// A transition as seen from a given state, annotated with its current
/// auto-condition evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableTransition {
    /// The event name that triggers the transition.
    pub event: String,
    /// The target state name.
    pub to: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether the transition is automatic.
    pub auto: bool,
    /// The auto-condition evaluated against the supplied context
    /// (`false` when no condition is defined).
    pub condition_met: bool,
}

/// The outcome of an auto-transition cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// Whether at least one transition was applied.
    pub transitioned: bool,
    /// The state the cascade settled in.
    pub final_state: String,
    /// Every transition result, in cascade order.
    pub transitions: Vec<TransitionResult>,
}

// ---------------------------------------------------------------------------
// WorkflowEngine
// ---------------------------------------------------------------------------

/// A generic finite-state-machine executor over a caller-defined context
/// type.
///
/// The engine holds only the immutable definition and options; the mutable
/// context is supplied per call and never retained. One engine instance can
/// therefore serve any number of workflow instances — callers persist the
/// returned `current_state` and rehydrate their context per operation.
pub struct WorkflowEngine<C> {
    definition: WorkflowDefinition<C>,
    options: EngineOptions,
}

impl<C> WorkflowEngine<C> {
    /// Validate the definition and build an engine over it.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::UnknownInitialState`] if `initial_state` names no
    /// defined state; [`WorkflowError::DanglingTarget`] if any transition
    /// targets an unknown state; [`WorkflowError::DuplicateState`] /
    /// [`WorkflowError::DuplicateTransition`] if names collide. The
    /// definition is a name-keyed mapping and these violations would make
    /// lookups ambiguous or dangling, so the engine refuses to exist.
    pub fn new(
        definition: WorkflowDefinition<C>,
        options: EngineOptions,
    ) -> Result<Self, WorkflowError> {
        for (i, state) in definition.states().iter().enumerate() {
            if definition.states()[..i].iter().any(|s| s.name() == state.name()) {
                return Err(WorkflowError::DuplicateState {
                    state: state.name().to_string(),
                });
            }
            for (j, (event, _)) in state.transitions().iter().enumerate() {
                if state.transitions()[..j].iter().any(|(e, _)| e == event) {
                    return Err(WorkflowError::DuplicateTransition {
                        state: state.name().to_string(),
                        event: event.clone(),
                    });
                }
            }
        }

        if definition.get_state(definition.initial_state()).is_none() {
            return Err(WorkflowError::UnknownInitialState {
                state: definition.initial_state().to_string(),
            });
        }

        for state in definition.states() {
            for (event, transition) in state.transitions() {
                if definition.get_state(transition.target()).is_none() {
                    return Err(WorkflowError::DanglingTarget {
                        state: state.name().to_string(),
                        event: event.clone(),
                        to: transition.target().to_string(),
                    });
                }
            }
        }

        Ok(Self { definition, options })
    }

    /// Build an engine with default options.
    pub fn with_defaults(definition: WorkflowDefinition<C>) -> Result<Self, WorkflowError> {
        Self::new(definition, EngineOptions::default())
    }

    /// The stored definition, unchanged.
    pub fn definition(&self) -> &WorkflowDefinition<C> {
        &self.definition
    }

    /// The engine options in effect.
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// The state definition for `name`, or `None` if absent.
    pub fn state(&self, name: &str) -> Option<&StateDefinition<C>> {
        self.definition.get_state(name)
    }

    /// The transitions out of `state_name` in declaration order, each
    /// annotated with its auto-condition evaluated against `ctx`.
    ///
    /// Unknown states yield an empty list, not an error.
    pub fn available_transitions(&self, state_name: &str, ctx: &C) -> Vec<AvailableTransition> {
        let Some(state) = self.definition.get_state(state_name) else {
            return Vec::new();
        };
        state
            .transitions()
            .iter()
            .map(|(event, t)| AvailableTransition {
                event: event.clone(),
                to: t.target().to_string(),
                description: t.description().map(str::to_string),
                auto: t.is_auto(),
                condition_met: t.condition_met(ctx),
            })
            .collect()
    }

    /// Whether `event` could fire from `state_name` right now.
    ///
    /// `false` for unknown states or events; otherwise the guard's awaited
    /// verdict (a guard error counts as rejection), or `true` when no guard
    /// is attached. Never disagrees with [`execute_transition`] on
    /// feasibility for these cases.
    ///
    /// [`execute_transition`]: WorkflowEngine::execute_transition
    pub async fn can_transition(&self, state_name: &str, event: &str, ctx: &C) -> bool {
        let Some(state) = self.definition.get_state(state_name) else {
            return false;
        };
        let Some(transition) = state.get_transition(event) else {
            return false;
        };
        match transition.guard() {
            Some(guard) => guard(ctx).await.unwrap_or(false),
            None => true,
        }
    }

    /// Attempt the transition named `event` from `state_name`.
    ///
    /// Runs the full hook sequence (see the module docs for ordering and
    /// atomicity). All documented failure cases are converted into a failed
    /// [`TransitionResult`]; nothing is thrown.
    pub async fn execute_transition(
        &self,
        state_name: &str,
        event: &str,
        ctx: &mut C,
    ) -> TransitionResult {
        let attempt = TransitionAttempt {
            from: state_name.to_string(),
            event: event.to_string(),
        };

        // The before-observer runs first, ahead of the existence checks, so
        // it sees every attempt including misdirected ones.
        if let Some(observer) = self.definition.before_transition() {
            if let Err(e) = observer(ctx, attempt.clone()).await {
                return self
                    .hook_failure(ctx, &attempt, format!("before_transition hook failed: {e}"))
                    .await;
            }
        }

        let Some(state) = self.definition.get_state(state_name) else {
            return TransitionResult::rejected(
                state_name,
                event,
                format!("{state_name} not found in workflow"),
            );
        };
        let Some(transition) = state.get_transition(event) else {
            return TransitionResult::rejected(
                state_name,
                event,
                format!("{event} not found in state"),
            );
        };

        if let Some(guard) = transition.guard() {
            match guard(ctx).await {
                Ok(true) => {}
                Ok(false) => {
                    if self.options.debug {
                        tracing::debug!(from = state_name, event, "guard rejected transition");
                    }
                    return TransitionResult::rejected(
                        state_name,
                        event,
                        format!("guard rejected transition {event}"),
                    );
                }
                Err(e) => {
                    return self
                        .hook_failure(
                            ctx,
                            &attempt,
                            format!("guard rejected transition {event}: {e}"),
                        )
                        .await;
                }
            }
        }

        let target = transition.target().to_string();

        if let Some(hook) = state.on_exit() {
            if let Err(e) = hook(ctx).await {
                return self
                    .hook_failure(ctx, &attempt, format!("on_exit hook failed: {e}"))
                    .await;
            }
        }
        if let Some(hook) = transition.on_transition() {
            if let Err(e) = hook(ctx).await {
                return self
                    .hook_failure(ctx, &attempt, format!("on_transition hook failed: {e}"))
                    .await;
            }
        }
        let target_state = self
            .definition
            .get_state(&target)
            .expect("transition targets are validated at construction");
        if let Some(hook) = target_state.on_enter() {
            if let Err(e) = hook(ctx).await {
                return self
                    .hook_failure(ctx, &attempt, format!("on_enter hook failed: {e}"))
                    .await;
            }
        }

        if let Some(observer) = self.definition.after_transition() {
            if let Err(e) = observer(ctx, attempt.clone()).await {
                return self
                    .hook_failure(ctx, &attempt, format!("after_transition hook failed: {e}"))
                    .await;
            }
        }

        if self.options.debug {
            tracing::debug!(from = state_name, event, to = %target, "transition executed");
        }
        TransitionResult::applied(state_name, &target, event)
    }

    /// Drive the auto-transition cascade from `state_name`.
    ///
    /// Repeatedly fires the first (declaration-order) automatic transition
    /// whose condition holds, following the state forward, until no
    /// transition is eligible, one fails, or `max_auto_transitions` results
    /// have accumulated. The cap is a hard bound against cyclic
    /// auto-transition definitions.
    pub async fn evaluate_transitions(&self, state_name: &str, ctx: &mut C) -> CascadeOutcome {
        let mut current = state_name.to_string();
        let mut transitions: Vec<TransitionResult> = Vec::new();

        loop {
            if transitions.len() >= self.options.max_auto_transitions {
                tracing::warn!(
                    state = %current,
                    max = self.options.max_auto_transitions,
                    "auto-transition cascade reached safety cap"
                );
                break;
            }
            let Some(state) = self.definition.get_state(&current) else {
                break;
            };
            let Some((event, _)) = state
                .transitions()
                .iter()
                .find(|(_, t)| t.is_auto() && t.condition_met(ctx))
            else {
                break;
            };
            let event = event.clone();

            let result = self.execute_transition(&current, &event, ctx).await;
            let applied = result.success;
            let landed = result.current_state.clone();
            transitions.push(result);
            if !applied {
                // The state did not move; retrying the same condition would
                // spin until the cap on every call.
                break;
            }
            current = landed;
        }

        CascadeOutcome {
            transitioned: transitions.iter().any(|t| t.success),
            final_state: current,
            transitions,
        }
    }

    /// The distinct target states reachable in one transition from
    /// `state_name`, in first-seen declaration order. Empty for unknown or
    /// terminal states.
    pub fn next_states(&self, state_name: &str) -> Vec<String> {
        let Some(state) = self.definition.get_state(state_name) else {
            return Vec::new();
        };
        let mut targets: Vec<String> = Vec::new();
        for (_, t) in state.transitions() {
            if !targets.iter().any(|seen| seen == t.target()) {
                targets.push(t.target().to_string());
            }
        }
        targets
    }

    /// Whether `state_name` is terminal: unknown states are treated as
    /// terminal (fail-safe), and a known state is terminal iff it declares
    /// no transitions. The definition's `terminal_hint` metadata does not
    /// participate.
    pub fn is_terminal_state(&self, state_name: &str) -> bool {
        match self.definition.get_state(state_name) {
            Some(state) => state.transitions().is_empty(),
            None => true,
        }
    }

    /// All declared state names, in declaration order.
    pub fn all_states(&self) -> Vec<String> {
        self.definition
            .states()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// The declared states with no outgoing transitions, in declaration
    /// order.
    pub fn terminal_states(&self) -> Vec<String> {
        self.definition
            .states()
            .iter()
            .filter(|s| s.transitions().is_empty())
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Convert a hook failure into a failed result, routing the error to
    /// the `on_error` observer first.
    async fn hook_failure(
        &self,
        ctx: &mut C,
        attempt: &TransitionAttempt,
        error: String,
    ) -> TransitionResult {
        tracing::warn!(
            from = %attempt.from,
            event = %attempt.event,
            %error,
            "transition hook failed; state not moved"
        );
        if let Some(observer) = self.definition.on_error() {
            observer(ctx, attempt.clone(), error.clone()).await;
        }
        TransitionResult::rejected(&attempt.from, &attempt.event, error)
    }
}

impl<C> std::fmt::Debug for WorkflowEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("definition", &self.definition)
            .field("options", &self.options)
            .finish()
    }
}

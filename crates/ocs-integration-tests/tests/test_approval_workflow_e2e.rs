//! End-to-end document approval scenarios: guard-gated manual transitions
//! and the auto-approve cascade, exercised exactly the way the dashboard's
//! approval pipeline drives the engine.

use ocs_workflow::{
    StateDefinition, Transition, WorkflowDefinition, WorkflowEngine,
};

#[derive(Debug, Default)]
struct ApprovalCtx {
    docs_complete: bool,
    is_approved: bool,
}

/// draft --submit--> pending_review --approve(guard: docs_complete)--> approved
fn approval_definition() -> WorkflowDefinition<ApprovalCtx> {
    WorkflowDefinition::new("draft")
        .state(StateDefinition::new("draft").transition("submit", Transition::to("pending_review")))
        .state(
            StateDefinition::new("pending_review").transition(
                "approve",
                Transition::to("approved")
                    .with_description("Reviewer sign-off")
                    .with_guard_fn(|ctx: &ApprovalCtx| ctx.docs_complete),
            ),
        )
        .state(StateDefinition::new("approved"))
}

#[tokio::test]
async fn guard_blocks_until_documentation_complete() {
    let engine = WorkflowEngine::with_defaults(approval_definition()).unwrap();
    let mut ctx = ApprovalCtx::default();

    let result = engine
        .execute_transition("pending_review", "approve", &mut ctx)
        .await;
    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().contains("guard rejected"));
    assert_eq!(result.current_state, "pending_review");

    ctx.docs_complete = true;
    let result = engine
        .execute_transition("pending_review", "approve", &mut ctx)
        .await;
    assert!(result.success);
    assert_eq!(result.current_state, "approved");
}

#[tokio::test]
async fn auto_approve_cascade_fires_exactly_once() {
    let definition = WorkflowDefinition::new("draft")
        .state(StateDefinition::new("draft").transition("submit", Transition::to("pending_review")))
        .state(
            StateDefinition::new("pending_review")
                .transition(
                    "approve",
                    Transition::to("approved")
                        .with_guard_fn(|ctx: &ApprovalCtx| ctx.docs_complete),
                )
                .transition(
                    "auto_approve",
                    Transition::auto("approved", |ctx: &ApprovalCtx| {
                        ctx.is_approved && ctx.docs_complete
                    }),
                ),
        )
        .state(StateDefinition::new("approved"));
    let engine = WorkflowEngine::with_defaults(definition).unwrap();

    let mut ctx = ApprovalCtx {
        is_approved: true,
        docs_complete: true,
    };
    let outcome = engine.evaluate_transitions("pending_review", &mut ctx).await;
    assert!(outcome.transitioned);
    assert_eq!(outcome.final_state, "approved");
    assert_eq!(outcome.transitions.len(), 1);
    assert_eq!(outcome.transitions[0].transition_event, "auto_approve");

    // The landing state is terminal; a second evaluation is a no-op.
    let outcome = engine.evaluate_transitions("approved", &mut ctx).await;
    assert!(!outcome.transitioned);
    assert!(engine.is_terminal_state("approved"));
}

#[tokio::test]
async fn full_pipeline_from_draft_to_approved() {
    let engine = WorkflowEngine::with_defaults(approval_definition()).unwrap();
    let mut ctx = ApprovalCtx {
        docs_complete: true,
        ..ApprovalCtx::default()
    };

    // The host persists current_state between calls; we thread it through.
    let submitted = engine.execute_transition("draft", "submit", &mut ctx).await;
    assert!(submitted.success);
    let approved = engine
        .execute_transition(&submitted.current_state, "approve", &mut ctx)
        .await;
    assert!(approved.success);
    assert_eq!(approved.previous_state, "pending_review");
    assert_eq!(approved.current_state, "approved");

    // Results are serializable snapshots for the host's audit trail.
    let json = serde_json::to_string(&approved).unwrap();
    assert!(json.contains("\"approved\""));
}

#[tokio::test]
async fn can_transition_agrees_with_execute_feasibility() {
    let engine = WorkflowEngine::with_defaults(approval_definition()).unwrap();
    let mut ctx = ApprovalCtx::default();

    for (state, event) in [
        ("missing", "submit"),
        ("draft", "missing"),
        ("pending_review", "approve"),
    ] {
        let can = engine.can_transition(state, event, &ctx).await;
        let executed = engine.execute_transition(state, event, &mut ctx).await;
        assert_eq!(can, executed.success, "disagreement on {state}/{event}");
    }
}

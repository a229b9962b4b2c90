//! Cross-crate flows: a compliance profile driving an authorization
//! workflow, and a profile's reporting obligations feeding the report
//! scheduler.

use chrono::{Datelike, NaiveDate};
use ocs_rules::{
    evaluate, standard_catalog, ActivityType, ComplianceProfile, EntitySize, Establishment,
    OrbitalRegime, QuestionnaireAnswers, RegulatoryRegime,
};
use ocs_schedule::{describe, ReportSchedule, ReportScheduler};
use ocs_workflow::{StateDefinition, Transition, WorkflowDefinition, WorkflowEngine};

fn light_regime_answers() -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        activity_type: ActivityType::SpacecraftOperation,
        defense_only: false,
        establishment: Establishment::Eu,
        entity_size: EntitySize::Small,
        operates_constellation: true,
        constellation_size: 6,
        orbital_regime: OrbitalRegime::Leo,
        provides_eu_services: true,
    }
}

struct AuthCtx {
    profile: ComplianceProfile,
    declaration_filed: bool,
}

#[tokio::test]
async fn authorization_pipeline_gated_by_compliance_profile() {
    let profile = evaluate(&light_regime_answers(), &standard_catalog());
    assert_eq!(profile.regime, RegulatoryRegime::Light);

    // submitted --grant--> granted, guarded by the evaluated profile: the
    // light-regime declaration must be filed before the authority grants.
    let definition = WorkflowDefinition::new("submitted")
        .state(StateDefinition::new("submitted").transition(
            "grant",
            Transition::to("granted").with_guard_fn(|ctx: &AuthCtx| {
                ctx.profile.regime == RegulatoryRegime::Light && ctx.declaration_filed
            }),
        ))
        .state(StateDefinition::new("granted"));
    let engine = WorkflowEngine::with_defaults(definition).unwrap();

    let mut ctx = AuthCtx {
        profile,
        declaration_filed: false,
    };
    let result = engine.execute_transition("submitted", "grant", &mut ctx).await;
    assert!(!result.success);

    ctx.declaration_filed = true;
    let result = engine.execute_transition("submitted", "grant", &mut ctx).await;
    assert!(result.success);
    assert_eq!(result.current_state, "granted");
}

#[test]
fn light_regime_profile_drives_monthly_reporting_schedule() {
    let profile = evaluate(&light_regime_answers(), &standard_catalog());

    // The light-regime declaration deadline exists, so the operator sets up
    // a monthly status report ahead of it.
    let deadline = profile
        .key_dates
        .iter()
        .find(|d| d.label.contains("Light-regime"))
        .expect("light regime profile carries a declaration deadline");
    assert_eq!(deadline.date, NaiveDate::from_ymd_opt(2028, 1, 1).unwrap());

    let now = NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
        .and_utc();
    let mut scheduler = ReportScheduler::new();
    let id = scheduler.add(
        ReportSchedule::new(
            format!("{} status report", profile.operator_label),
            "0 6 1 * *",
            now,
        )
        .unwrap(),
    );

    let schedule = scheduler.get(&id).unwrap();
    assert_eq!(
        describe(&schedule.cron_expression).unwrap(),
        "monthly on day 1 at 06:00 UTC"
    );

    // First run comes due on February 1st; running it rolls to March 1st.
    let first_due = schedule.next_run.unwrap();
    assert_eq!(first_due.day(), 1);
    assert!(scheduler.due(first_due).len() == 1);
    assert!(scheduler.mark_run(&id, first_due));
    let rolled = scheduler.get(&id).unwrap().next_run.unwrap();
    assert_eq!(rolled.day(), 1);
    assert!(rolled > first_due);
}

#[test]
fn third_country_profile_serializes_for_the_api_layer() {
    let mut answers = light_regime_answers();
    answers.establishment = Establishment::ThirdCountryEuServices;
    let profile = evaluate(&answers, &standard_catalog());

    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["operator_code"], "SCO");
    assert_eq!(json["regime"], "light");
    assert_eq!(json["constellation_tier"], "small_constellation");
    assert!(json["cost_estimate"].as_str().unwrap().starts_with("TBD"));
    let checklist = json["checklist"].as_array().unwrap();
    assert!(checklist
        .iter()
        .any(|item| item["article_ref"] == "Art. 11"));
}

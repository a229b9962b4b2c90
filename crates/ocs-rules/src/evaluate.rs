//! # Compliance Profile Evaluation
//!
//! The single-pass evaluator: questionnaire answers + regulatory catalog in,
//! complete compliance profile out. Pure and deterministic; given the same
//! inputs it produces the same profile, which the caller treats as an
//! immutable snapshot to render or persist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::answers::QuestionnaireAnswers;
use crate::catalog::{Article, RegulationCatalog};
use crate::classify::{authorization_path, ConstellationTier, OperatorType, RegulatoryRegime};

/// Full enforcement horizon of the modeled regulation.
const ENFORCEMENT_HORIZON: (i32, u32, u32) = (2030, 1, 1);

/// Light-regime declaration deadline: entry into force plus 24 months.
const LIGHT_REGIME_DEADLINE: (i32, u32, u32) = (2028, 1, 1);

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("calendar date constants are valid")
}

/// A required action with its article reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// What the operator must do.
    pub action: String,
    /// The article the action stems from, e.g. `"Art. 11"`.
    pub article_ref: String,
}

/// A key regulatory date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDate {
    /// The date itself.
    pub date: NaiveDate,
    /// What happens on that date.
    pub label: String,
}

/// Per-title applicability summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleStatus {
    /// The title (compliance module) name.
    pub module: String,
    /// Articles in the module.
    pub total_articles: usize,
    /// Articles applicable to this operator.
    pub applicable_articles: usize,
    /// Whether the module imposes any obligation on this operator.
    pub required: bool,
}

/// Catalog-wide applicability statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceStats {
    /// Total articles in the catalog.
    pub total_articles: usize,
    /// Articles applicable to this operator.
    pub applicable_count: usize,
    /// `round(applicable / total * 100)`; 0 for an empty catalog.
    pub applicable_percentage: u8,
}

/// The complete compliance profile for one answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceProfile {
    /// Operator type classification.
    pub operator_type: OperatorType,
    /// Operator abbreviation code (catalog key).
    pub operator_code: String,
    /// Human label, third-country variant where applicable.
    pub operator_label: String,
    /// Established in an EU Member State.
    pub is_eu_operator: bool,
    /// Established outside the Union.
    pub is_third_country: bool,
    /// Echo of the defence-only answer.
    pub defense_only: bool,
    /// The applicable authorization path description.
    pub authorization_path: String,
    /// Light or standard regulatory track.
    pub regime: RegulatoryRegime,
    /// Constellation size classification.
    pub constellation_tier: ConstellationTier,
    /// Display label for the primary orbital regime.
    pub orbital_regime_label: String,
    /// Articles applicable to this operator, in regulation order.
    pub applicable_articles: Vec<Article>,
    /// Per-title applicability summaries.
    pub module_statuses: Vec<ModuleStatus>,
    /// Ordered required actions.
    pub checklist: Vec<ChecklistItem>,
    /// Key regulatory dates.
    pub key_dates: Vec<KeyDate>,
    /// Rough authorization cost estimate.
    pub cost_estimate: String,
    /// Catalog-wide statistics.
    pub stats: ComplianceStats,
}

/// Evaluate the questionnaire answers against the regulatory catalog.
///
/// Total over its declared input shape: every well-formed answer set maps to
/// a profile. Unrecognized enumeration values cannot reach this function —
/// they are rejected when the answers are deserialized.
pub fn evaluate(answers: &QuestionnaireAnswers, catalog: &RegulationCatalog) -> ComplianceProfile {
    let operator_type = OperatorType::from_activity(answers.activity_type);
    let code = operator_type.code();
    let third_country = answers.establishment.is_third_country();
    let regime = RegulatoryRegime::from_entity_size(answers.entity_size);
    let tier =
        ConstellationTier::from_size(answers.operates_constellation, answers.constellation_size);

    let applicable_articles: Vec<Article> = catalog
        .articles()
        .filter(|a| a.applies_to_code(code))
        .cloned()
        .collect();

    let module_statuses: Vec<ModuleStatus> = catalog
        .titles
        .iter()
        .map(|title| {
            let total = title.articles().count();
            let applicable = title.articles().filter(|a| a.applies_to_code(code)).count();
            ModuleStatus {
                module: title.name.clone(),
                total_articles: total,
                applicable_articles: applicable,
                required: applicable > 0,
            }
        })
        .collect();

    let total = catalog.article_count();
    let applicable_count = applicable_articles.len();
    let applicable_percentage = if total == 0 {
        0
    } else {
        (applicable_count as f64 / total as f64 * 100.0).round() as u8
    };

    let checklist = build_checklist(answers, operator_type, regime, tier, third_country);
    let key_dates = build_key_dates(regime);

    tracing::debug!(
        operator = code,
        regime = ?regime,
        applicable = applicable_count,
        total,
        "compliance profile evaluated"
    );

    ComplianceProfile {
        operator_type,
        operator_code: code.to_string(),
        operator_label: operator_type.label(third_country),
        is_eu_operator: !third_country,
        is_third_country: third_country,
        defense_only: answers.defense_only,
        authorization_path: authorization_path(
            answers.establishment,
            answers.provides_eu_services,
        ),
        regime,
        constellation_tier: tier,
        orbital_regime_label: answers.orbital_regime.label().to_string(),
        applicable_articles,
        module_statuses,
        checklist,
        key_dates,
        cost_estimate: operator_type.cost_estimate(third_country),
        stats: ComplianceStats {
            total_articles: total,
            applicable_count,
            applicable_percentage,
        },
    }
}

fn build_checklist(
    answers: &QuestionnaireAnswers,
    operator_type: OperatorType,
    regime: RegulatoryRegime,
    tier: ConstellationTier,
    third_country: bool,
) -> Vec<ChecklistItem> {
    let mut items = Vec::new();
    let mut push = |action: &str, article_ref: &str| {
        items.push(ChecklistItem {
            action: action.to_string(),
            article_ref: article_ref.to_string(),
        });
    };

    if third_country {
        push(
            "Register with the EUSPA register of third-country operators",
            "Art. 11",
        );
    } else {
        push(
            "Prepare and submit an authorisation application to your national competent authority",
            "Art. 4",
        );
    }

    match regime {
        RegulatoryRegime::Light => push(
            "Prepare the simplified declaration for the light authorisation regime",
            "Art. 10",
        ),
        RegulatoryRegime::Standard => push(
            "Compile the full authorisation dossier: technical file, risk assessments, financial standing",
            "Art. 5",
        ),
    }

    push(
        "Carry out and document a cybersecurity risk assessment of space and ground segments",
        "Art. 27",
    );

    match operator_type {
        OperatorType::SpacecraftOperator | OperatorType::InSpaceServicingOperator => {
            push(
                "Prepare a space debris mitigation plan covering end-of-life disposal",
                "Art. 43",
            );
            push(
                "Implement collision avoidance procedures and conjunction data sharing",
                "Art. 29",
            );
        }
        OperatorType::LaunchOperator => push(
            "Report launch emissions and environmental footprint per launch campaign",
            "Art. 46",
        ),
        OperatorType::LaunchSiteOperator => push(
            "Demonstrate launch site safety measures and exclusion zone management",
            "Art. 17",
        ),
        OperatorType::SpaceDataProvider => push(
            "Document data handling and service continuity arrangements",
            "Art. 78",
        ),
    }

    if tier >= ConstellationTier::MediumConstellation {
        push(
            "Provide a constellation coordination and spectrum usage plan",
            "Art. 15",
        );
    }

    if answers.defense_only {
        push(
            "Review the defence-activities scope exclusion before proceeding with authorisation",
            "Art. 2",
        );
    }

    items
}

fn build_key_dates(regime: RegulatoryRegime) -> Vec<KeyDate> {
    let mut dates = vec![KeyDate {
        date: ymd(ENFORCEMENT_HORIZON),
        label: "Full enforcement of authorisation obligations".to_string(),
    }];
    if regime == RegulatoryRegime::Light {
        dates.push(KeyDate {
            date: ymd(LIGHT_REGIME_DEADLINE),
            label: "Light-regime declaration deadline (entry into force plus 24 months)"
                .to_string(),
        });
    }
    dates
}

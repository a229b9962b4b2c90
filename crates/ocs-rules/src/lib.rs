//! # ocs-rules — Compliance Rule Evaluator
//!
//! Pure classification of a questionnaire answer set against a declarative
//! regulatory catalog, producing the complete compliance profile the
//! dashboard and report generator render: operator classification,
//! applicable regime, applicable articles, per-module summaries, checklist,
//! key dates, and statistics.
//!
//! ```text
//! assessment wizard            ocs-rules
//!   QuestionnaireAnswers ──▶     evaluate(answers, catalog)
//!   RegulationCatalog    ──▶       │
//!                                  ▼
//!                               ComplianceProfile (immutable snapshot)
//! ```
//!
//! The evaluator has no side effects, no hidden state, and no error
//! conditions: answer fields are closed enums, so malformed input is
//! rejected at the serde boundary before it can reach [`evaluate`]. The
//! catalog is always passed explicitly, never read from a module-level
//! singleton, keeping the evaluator trivially testable and thread-safe.

pub mod answers;
pub mod catalog;
pub mod classify;
pub mod evaluate;

pub use answers::{ActivityType, EntitySize, Establishment, OrbitalRegime, QuestionnaireAnswers};
pub use catalog::{standard_catalog, Article, Chapter, RegulationCatalog, Title, APPLIES_ALL};
pub use classify::{authorization_path, ConstellationTier, OperatorType, RegulatoryRegime};
pub use evaluate::{
    evaluate, ChecklistItem, ComplianceProfile, ComplianceStats, KeyDate, ModuleStatus,
};

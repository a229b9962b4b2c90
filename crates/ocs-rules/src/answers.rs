//! # Questionnaire Answers
//!
//! The fixed-shape answer record produced by the assessment wizard. Every
//! field is a closed enum or primitive; unrecognized values are rejected at
//! the serde boundary, so the evaluator itself never sees a malformed
//! answer set.

use serde::{Deserialize, Serialize};

/// The operator's primary space activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Operating one or more spacecraft in orbit.
    SpacecraftOperation,
    /// Providing launch services.
    LaunchServices,
    /// Operating a launch site.
    LaunchSiteOperation,
    /// In-space servicing, assembly, or manufacturing.
    InSpaceServicing,
    /// Providing space-derived data services.
    SpaceDataProvision,
}

/// Where the operator is established, and whether it offers services in the
/// Union. This drives the authorization path (national competent authority
/// vs EUSPA registration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Establishment {
    /// Established in an EU Member State.
    Eu,
    /// Established in a third country, offering services in the Union.
    ThirdCountryEuServices,
    /// Established in a third country, not offering services in the Union.
    ThirdCountryNoEuServices,
}

impl Establishment {
    /// Whether the operator is established in an EU Member State.
    pub fn is_eu(&self) -> bool {
        matches!(self, Self::Eu)
    }

    /// Whether the operator is established outside the Union.
    pub fn is_third_country(&self) -> bool {
        !self.is_eu()
    }
}

/// Entity size category, following the SME definition thresholds plus the
/// research-institution special case relevant to light-regime eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySize {
    /// Fewer than 10 employees.
    Micro,
    /// 10 to 49 employees.
    Small,
    /// 50 to 249 employees.
    Medium,
    /// 250 employees or more.
    Large,
    /// University or research institution.
    Research,
}

/// The primary orbital regime of the operator's spacecraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitalRegime {
    /// Low Earth Orbit (below 2,000 km).
    Leo,
    /// Medium Earth Orbit.
    Meo,
    /// Geostationary orbit.
    Geo,
    /// Beyond GEO: cislunar and deep space.
    BeyondGeo,
}

impl OrbitalRegime {
    /// Human-readable label for display in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Leo => "Low Earth Orbit (LEO)",
            Self::Meo => "Medium Earth Orbit (MEO)",
            Self::Geo => "Geostationary Orbit (GEO)",
            Self::BeyondGeo => "Beyond GEO (cislunar and deep space)",
        }
    }
}

/// The complete answer set from the compliance assessment questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    /// Primary space activity.
    pub activity_type: ActivityType,
    /// Whether the operator's activities are exclusively defence-related.
    pub defense_only: bool,
    /// Establishment jurisdiction category.
    pub establishment: Establishment,
    /// Entity size category.
    pub entity_size: EntitySize,
    /// Whether the operator runs a coordinated group of spacecraft.
    pub operates_constellation: bool,
    /// Number of spacecraft in the constellation (ignored unless
    /// `operates_constellation` is set).
    pub constellation_size: u32,
    /// Primary orbital regime.
    pub orbital_regime: OrbitalRegime,
    /// Whether the operator offers services in the Union.
    pub provides_eu_services: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActivityType::InSpaceServicing).unwrap();
        assert_eq!(json, "\"in_space_servicing\"");
        let back: ActivityType = serde_json::from_str("\"launch_services\"").unwrap();
        assert_eq!(back, ActivityType::LaunchServices);
    }

    #[test]
    fn unrecognized_activity_type_is_rejected() {
        let result: Result<ActivityType, _> = serde_json::from_str("\"asteroid_mining\"");
        assert!(result.is_err());
    }

    #[test]
    fn establishment_flags() {
        assert!(Establishment::Eu.is_eu());
        assert!(!Establishment::Eu.is_third_country());
        assert!(Establishment::ThirdCountryEuServices.is_third_country());
        assert!(Establishment::ThirdCountryNoEuServices.is_third_country());
    }

    #[test]
    fn orbital_regime_labels() {
        assert_eq!(OrbitalRegime::Leo.label(), "Low Earth Orbit (LEO)");
        assert_eq!(
            OrbitalRegime::BeyondGeo.label(),
            "Beyond GEO (cislunar and deep space)"
        );
    }

    #[test]
    fn answers_serde_roundtrip() {
        let answers = QuestionnaireAnswers {
            activity_type: ActivityType::SpacecraftOperation,
            defense_only: false,
            establishment: Establishment::Eu,
            entity_size: EntitySize::Small,
            operates_constellation: true,
            constellation_size: 12,
            orbital_regime: OrbitalRegime::Leo,
            provides_eu_services: true,
        };
        let json = serde_json::to_string(&answers).unwrap();
        let back: QuestionnaireAnswers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answers);
    }
}

//! # Operator Classification
//!
//! The closed classification enums derived from questionnaire answers:
//! operator type (1:1 from activity type), regulatory regime, and
//! constellation tier. One definition each, exhaustive `match` everywhere.

use serde::{Deserialize, Serialize};

use crate::answers::{ActivityType, EntitySize, Establishment};

/// The operator type under the modeled regulation, mapped 1:1 from the
/// declared activity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorType {
    /// Operates spacecraft in orbit.
    SpacecraftOperator,
    /// Provides launch services.
    LaunchOperator,
    /// Operates a launch site.
    LaunchSiteOperator,
    /// Performs in-space servicing, assembly, or manufacturing.
    InSpaceServicingOperator,
    /// Provides space-derived data services.
    SpaceDataProvider,
}

impl OperatorType {
    /// Classify from the declared activity type.
    pub fn from_activity(activity: ActivityType) -> Self {
        match activity {
            ActivityType::SpacecraftOperation => Self::SpacecraftOperator,
            ActivityType::LaunchServices => Self::LaunchOperator,
            ActivityType::LaunchSiteOperation => Self::LaunchSiteOperator,
            ActivityType::InSpaceServicing => Self::InSpaceServicingOperator,
            ActivityType::SpaceDataProvision => Self::SpaceDataProvider,
        }
    }

    /// The abbreviation code used in catalog `applies_to` lists.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SpacecraftOperator => "SCO",
            Self::LaunchOperator => "LO",
            Self::LaunchSiteOperator => "LSO",
            Self::InSpaceServicingOperator => "ISO",
            Self::SpaceDataProvider => "SDP",
        }
    }

    /// Human label, with the third-country variant where applicable.
    pub fn label(&self, third_country: bool) -> String {
        let base = match self {
            Self::SpacecraftOperator => "Spacecraft Operator",
            Self::LaunchOperator => "Launch Operator",
            Self::LaunchSiteOperator => "Launch Site Operator",
            Self::InSpaceServicingOperator => "In-Space Servicing Operator",
            Self::SpaceDataProvider => "Space Data Provider",
        };
        if third_country {
            format!("Third-Country {base}")
        } else {
            base.to_string()
        }
    }

    /// Rough authorization cost estimate for display.
    ///
    /// Third-country operators get a placeholder: no Union fee schedule has
    /// been adopted for third-country registrations.
    pub fn cost_estimate(&self, third_country: bool) -> String {
        if third_country {
            return "TBD (no Union fee schedule applies to third-country registrations)"
                .to_string();
        }
        match self {
            Self::SpacecraftOperator => "EUR 15,000 to 40,000",
            Self::LaunchOperator => "EUR 50,000 to 120,000",
            Self::LaunchSiteOperator => "EUR 80,000 to 200,000",
            Self::InSpaceServicingOperator => "EUR 25,000 to 60,000",
            Self::SpaceDataProvider => "EUR 10,000 to 25,000",
        }
        .to_string()
    }
}

/// The applicable regulatory track.
///
/// Derived from entity size thresholds and the research-institution
/// override (Art. 10 eligibility). Constellation size never participates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryRegime {
    /// Simplified track for micro/small entities and research institutions.
    Light,
    /// Full authorisation track.
    Standard,
}

impl RegulatoryRegime {
    /// Derive the regime from the entity size category.
    pub fn from_entity_size(size: EntitySize) -> Self {
        match size {
            EntitySize::Micro | EntitySize::Small | EntitySize::Research => Self::Light,
            EntitySize::Medium | EntitySize::Large => Self::Standard,
        }
    }
}

/// Constellation size classification band. Lower bound of each band is
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstellationTier {
    /// No constellation, or a single spacecraft.
    SingleSatellite,
    /// 2 to 9 spacecraft.
    SmallConstellation,
    /// 10 to 99 spacecraft.
    MediumConstellation,
    /// 100 to 999 spacecraft.
    LargeConstellation,
    /// 1000 spacecraft or more.
    MegaConstellation,
}

impl ConstellationTier {
    /// Classify from the constellation flag and declared size.
    pub fn from_size(operates_constellation: bool, size: u32) -> Self {
        if !operates_constellation {
            return Self::SingleSatellite;
        }
        match size {
            0 | 1 => Self::SingleSatellite,
            2..=9 => Self::SmallConstellation,
            10..=99 => Self::MediumConstellation,
            100..=999 => Self::LargeConstellation,
            _ => Self::MegaConstellation,
        }
    }
}

/// The applicable authorization path description for the operator's
/// establishment category.
///
/// Offering services in the Union is what triggers the Act for third-country
/// operators, so the `provides_eu_services` flag takes precedence over an
/// establishment category declared without EU services.
pub fn authorization_path(establishment: Establishment, provides_eu_services: bool) -> String {
    match establishment {
        Establishment::Eu => {
            "Authorisation by the national competent authority of the Member State of establishment"
                .to_string()
        }
        Establishment::ThirdCountryEuServices => {
            "Registration with EUSPA and Union-level authorisation for services offered in the Union"
                .to_string()
        }
        Establishment::ThirdCountryNoEuServices => {
            if provides_eu_services {
                "Registration with EUSPA and Union-level authorisation for services offered in the Union"
                    .to_string()
            } else {
                "No Union authorisation required while no services are offered in the Union"
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_type_maps_one_to_one() {
        assert_eq!(
            OperatorType::from_activity(ActivityType::SpacecraftOperation),
            OperatorType::SpacecraftOperator
        );
        assert_eq!(
            OperatorType::from_activity(ActivityType::LaunchServices),
            OperatorType::LaunchOperator
        );
        assert_eq!(
            OperatorType::from_activity(ActivityType::LaunchSiteOperation),
            OperatorType::LaunchSiteOperator
        );
        assert_eq!(
            OperatorType::from_activity(ActivityType::InSpaceServicing),
            OperatorType::InSpaceServicingOperator
        );
        assert_eq!(
            OperatorType::from_activity(ActivityType::SpaceDataProvision),
            OperatorType::SpaceDataProvider
        );
    }

    #[test]
    fn operator_codes_are_distinct() {
        let codes = [
            OperatorType::SpacecraftOperator.code(),
            OperatorType::LaunchOperator.code(),
            OperatorType::LaunchSiteOperator.code(),
            OperatorType::InSpaceServicingOperator.code(),
            OperatorType::SpaceDataProvider.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn labels_vary_by_establishment() {
        let op = OperatorType::SpacecraftOperator;
        assert_eq!(op.label(false), "Spacecraft Operator");
        assert_eq!(op.label(true), "Third-Country Spacecraft Operator");
    }

    #[test]
    fn cost_estimate_is_tbd_for_third_country() {
        for op in [
            OperatorType::SpacecraftOperator,
            OperatorType::LaunchOperator,
            OperatorType::SpaceDataProvider,
        ] {
            assert!(op.cost_estimate(true).starts_with("TBD"));
            assert!(op.cost_estimate(false).starts_with("EUR"));
        }
    }

    #[test]
    fn regime_from_entity_size() {
        assert_eq!(
            RegulatoryRegime::from_entity_size(EntitySize::Micro),
            RegulatoryRegime::Light
        );
        assert_eq!(
            RegulatoryRegime::from_entity_size(EntitySize::Small),
            RegulatoryRegime::Light
        );
        assert_eq!(
            RegulatoryRegime::from_entity_size(EntitySize::Research),
            RegulatoryRegime::Light
        );
        assert_eq!(
            RegulatoryRegime::from_entity_size(EntitySize::Medium),
            RegulatoryRegime::Standard
        );
        assert_eq!(
            RegulatoryRegime::from_entity_size(EntitySize::Large),
            RegulatoryRegime::Standard
        );
    }

    #[test]
    fn constellation_tier_band_boundaries() {
        assert_eq!(
            ConstellationTier::from_size(false, 500),
            ConstellationTier::SingleSatellite
        );
        assert_eq!(
            ConstellationTier::from_size(true, 1),
            ConstellationTier::SingleSatellite
        );
        assert_eq!(
            ConstellationTier::from_size(true, 2),
            ConstellationTier::SmallConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 9),
            ConstellationTier::SmallConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 10),
            ConstellationTier::MediumConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 99),
            ConstellationTier::MediumConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 100),
            ConstellationTier::LargeConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 999),
            ConstellationTier::LargeConstellation
        );
        assert_eq!(
            ConstellationTier::from_size(true, 1000),
            ConstellationTier::MegaConstellation
        );
    }

    #[test]
    fn constellation_tier_serde_names() {
        assert_eq!(
            serde_json::to_string(&ConstellationTier::SingleSatellite).unwrap(),
            "\"single_satellite\""
        );
        assert_eq!(
            serde_json::to_string(&ConstellationTier::MediumConstellation).unwrap(),
            "\"medium_constellation\""
        );
    }

    #[test]
    fn authorization_path_eu_services_flag_wins() {
        let path = authorization_path(Establishment::ThirdCountryNoEuServices, true);
        assert!(path.contains("EUSPA"));
        let path = authorization_path(Establishment::ThirdCountryNoEuServices, false);
        assert!(path.contains("No Union authorisation"));
    }
}

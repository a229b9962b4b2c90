//! # Regulatory Catalog
//!
//! The declarative article catalog the evaluator filters against: titles
//! containing chapters containing articles, each article declaring which
//! operator-type codes it applies to and which it excludes.
//!
//! The catalog is always passed to the evaluator explicitly. It is
//! serde-loadable so deployments can ship catalog revisions as data;
//! [`standard_catalog`] provides the built-in EU Space Act subset used by
//! the assessment wizard.

use serde::{Deserialize, Serialize};

/// Sentinel operator code matching every operator type.
pub const APPLIES_ALL: &str = "ALL";

/// A single article of the modeled regulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article reference, e.g. `"Art. 43"`.
    pub number: String,
    /// Article heading.
    pub title: String,
    /// Operator-type codes this article applies to, or [`APPLIES_ALL`].
    pub applies_to: Vec<String>,
    /// Operator-type codes vetoed even when `applies_to` matches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

impl Article {
    /// Whether this article applies to the given operator code.
    ///
    /// Applicable iff `applies_to` contains the code or the `ALL` sentinel,
    /// and `excludes` does not contain the code. An exclusion vetoes even an
    /// `ALL` match.
    pub fn applies_to_code(&self, code: &str) -> bool {
        let included = self
            .applies_to
            .iter()
            .any(|c| c == code || c == APPLIES_ALL);
        included && !self.excludes.iter().any(|c| c == code)
    }
}

/// A chapter grouping articles within a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter heading.
    pub name: String,
    /// Articles in regulation order.
    pub articles: Vec<Article>,
}

/// A title of the regulation, the unit the per-module summaries report on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title heading.
    pub name: String,
    /// Chapters in regulation order.
    pub chapters: Vec<Chapter>,
}

impl Title {
    /// Iterate over every article in this title.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.chapters.iter().flat_map(|c| c.articles.iter())
    }
}

/// The full regulatory catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationCatalog {
    /// Titles in regulation order.
    pub titles: Vec<Title>,
}

impl RegulationCatalog {
    /// Iterate over every article across all titles, in regulation order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.titles.iter().flat_map(|t| t.articles())
    }

    /// Total article count.
    pub fn article_count(&self) -> usize {
        self.articles().count()
    }
}

fn article(number: &str, title: &str, applies_to: &[&str], excludes: &[&str]) -> Article {
    Article {
        number: number.to_string(),
        title: title.to_string(),
        applies_to: applies_to.iter().map(|s| s.to_string()).collect(),
        excludes: excludes.iter().map(|s| s.to_string()).collect(),
    }
}

/// The built-in EU Space Act catalog subset.
///
/// Operator codes: `SCO` (spacecraft), `LO` (launch), `LSO` (launch site),
/// `ISO` (in-space servicing), `SDP` (space data provider).
pub fn standard_catalog() -> RegulationCatalog {
    RegulationCatalog {
        titles: vec![
            Title {
                name: "General Provisions".to_string(),
                chapters: vec![Chapter {
                    name: "Subject Matter and Scope".to_string(),
                    articles: vec![
                        article("Art. 1", "Subject matter", &[APPLIES_ALL], &[]),
                        article("Art. 2", "Scope and defence exclusion", &[APPLIES_ALL], &[]),
                        article("Art. 3", "Definitions", &[APPLIES_ALL], &[]),
                    ],
                }],
            },
            Title {
                name: "Authorisation of Space Activities".to_string(),
                chapters: vec![
                    Chapter {
                        name: "Authorisation Requirements".to_string(),
                        articles: vec![
                            article("Art. 4", "Authorisation requirement", &[APPLIES_ALL], &[]),
                            article(
                                "Art. 5",
                                "Conditions for granting authorisation",
                                &[APPLIES_ALL],
                                &[],
                            ),
                            article("Art. 6", "Application procedure", &[APPLIES_ALL], &[]),
                            article(
                                "Art. 10",
                                "Light authorisation regime",
                                &[APPLIES_ALL],
                                &[],
                            ),
                            article(
                                "Art. 11",
                                "Third-country operators and EUSPA register",
                                &[APPLIES_ALL],
                                &[],
                            ),
                        ],
                    },
                    Chapter {
                        name: "Activity-Specific Conditions".to_string(),
                        articles: vec![
                            article(
                                "Art. 13",
                                "Launch service conditions",
                                &["LO", "LSO"],
                                &[],
                            ),
                            article(
                                "Art. 15",
                                "Spacecraft and constellation operation requirements",
                                &["SCO", "ISO"],
                                &[],
                            ),
                            article("Art. 17", "Launch site safety", &["LSO"], &[]),
                        ],
                    },
                ],
            },
            Title {
                name: "Resilience and Cybersecurity".to_string(),
                chapters: vec![Chapter {
                    name: "Security of Space Systems".to_string(),
                    articles: vec![
                        article(
                            "Art. 27",
                            "Cybersecurity risk assessment",
                            &[APPLIES_ALL],
                            &[],
                        ),
                        article(
                            "Art. 28",
                            "Incident reporting obligations",
                            &[APPLIES_ALL],
                            &[],
                        ),
                        article(
                            "Art. 29",
                            "Collision avoidance and conjunction assessment",
                            &["SCO", "ISO"],
                            &[],
                        ),
                        article(
                            "Art. 30",
                            "Tracking and telemetry data sharing",
                            &[APPLIES_ALL],
                            &["SDP", "LSO"],
                        ),
                    ],
                }],
            },
            Title {
                name: "Environment and Space Debris".to_string(),
                chapters: vec![Chapter {
                    name: "Debris Mitigation".to_string(),
                    articles: vec![
                        article(
                            "Art. 43",
                            "Space debris mitigation plan",
                            &["SCO", "ISO", "LO"],
                            &[],
                        ),
                        article(
                            "Art. 44",
                            "End-of-life disposal and de-orbiting",
                            &["SCO", "ISO"],
                            &[],
                        ),
                        article(
                            "Art. 45",
                            "Environmental footprint declaration",
                            &[APPLIES_ALL],
                            &[],
                        ),
                        article(
                            "Art. 46",
                            "Launch emissions reporting",
                            &["LO", "LSO"],
                            &[],
                        ),
                    ],
                }],
            },
            Title {
                name: "Supervision and Enforcement".to_string(),
                chapters: vec![Chapter {
                    name: "Supervision".to_string(),
                    articles: vec![
                        article(
                            "Art. 75",
                            "Supervision by national competent authorities",
                            &[APPLIES_ALL],
                            &[],
                        ),
                        article("Art. 78", "Information obligations", &[APPLIES_ALL], &[]),
                        article("Art. 80", "Penalties", &[APPLIES_ALL], &[]),
                        article(
                            "Art. 82",
                            "Union register of space objects",
                            &["SCO", "ISO"],
                            &[],
                        ),
                    ],
                }],
            },
        ],
    }
}

//! Composite signal scoring: rule sets, predicates, and strength buckets.
//!
//! A rule set is an explicit, named list of `(predicate, weight)` pairs with
//! strength cut-offs over the summed score. Scoring one row is pure: the only
//! whole-series input is the confidence threshold carried by [`ScoreContext`].

use std::fmt;

use crate::domain::frame::IndicatorRow;

/// Indicator fields a predicate can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Confidence,
    ConfidenceChange,
    Pmi,
    YieldCurve,
    ClaimsYoY,
}

impl Field {
    pub fn value(&self, row: &IndicatorRow) -> Option<f64> {
        match self {
            Field::Confidence => row.confidence,
            Field::ConfidenceChange => row.confidence_change,
            Field::Pmi => row.pmi,
            Field::YieldCurve => row.yield_curve,
            Field::ClaimsYoY => row.claims_yoy,
        }
    }
}

/// Per-run values injected into per-row scoring. The confidence threshold is
/// a whole-series statistic computed once per run, never per row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub confidence_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Above { field: Field, value: f64 },
    Below { field: Field, value: f64 },
    /// Confidence below the whole-series quantile threshold in the context.
    BelowConfidenceThreshold,
}

impl Predicate {
    /// Missing data never satisfies a rule: a row with partial indicators
    /// still scores on whatever is present.
    pub fn holds(&self, row: &IndicatorRow, ctx: &ScoreContext) -> bool {
        match self {
            Predicate::Above { field, value } => field.value(row).is_some_and(|v| v > *value),
            Predicate::Below { field, value } => field.value(row).is_some_and(|v| v < *value),
            Predicate::BelowConfidenceThreshold => match ctx.confidence_threshold {
                Some(threshold) => row.confidence.is_some_and(|v| v < threshold),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub weight: u32,
}

/// Categorical bucket over the composite score, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    None,
    Medium,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::None => "None",
            Strength::Medium => "Medium",
            Strength::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// A named set of scoring rules plus the strength cut-offs over their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub name: &'static str,
    pub rules: Vec<ScoreRule>,
    pub medium_score: u32,
    pub strong_score: u32,
}

impl RuleSet {
    /// The reference rule set: depressed confidence that is recovering,
    /// expansionary PMI, positive yield curve, falling claims.
    pub fn standard() -> Self {
        RuleSet {
            name: "standard",
            rules: vec![
                ScoreRule {
                    name: "confidence_depressed",
                    predicate: Predicate::BelowConfidenceThreshold,
                    weight: 1,
                },
                ScoreRule {
                    name: "confidence_recovering",
                    predicate: Predicate::Above {
                        field: Field::ConfidenceChange,
                        value: 0.0,
                    },
                    weight: 1,
                },
                ScoreRule {
                    name: "pmi_expansion",
                    predicate: Predicate::Above {
                        field: Field::Pmi,
                        value: 50.0,
                    },
                    weight: 1,
                },
                ScoreRule {
                    name: "curve_positive",
                    predicate: Predicate::Above {
                        field: Field::YieldCurve,
                        value: 0.0,
                    },
                    weight: 1,
                },
                ScoreRule {
                    name: "claims_falling",
                    predicate: Predicate::Below {
                        field: Field::ClaimsYoY,
                        value: 0.0,
                    },
                    weight: 1,
                },
            ],
            medium_score: 2,
            strong_score: 4,
        }
    }

    /// Stricter variant: steeper curve, clearly falling claims, and a higher
    /// bar for Medium.
    pub fn strict() -> Self {
        let mut ruleset = RuleSet::standard();
        ruleset.name = "strict";
        ruleset.medium_score = 3;
        for rule in &mut ruleset.rules {
            match rule.name {
                "curve_positive" => {
                    rule.predicate = Predicate::Above {
                        field: Field::YieldCurve,
                        value: 0.3,
                    }
                }
                "claims_falling" => {
                    rule.predicate = Predicate::Below {
                        field: Field::ClaimsYoY,
                        value: -1.0,
                    }
                }
                _ => {}
            }
        }
        ruleset
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(RuleSet::standard()),
            "strict" => Some(RuleSet::strict()),
            _ => None,
        }
    }

    pub fn max_score(&self) -> u32 {
        self.rules.iter().map(|r| r.weight).sum()
    }

    /// Sum of weights of the satisfied rules.
    pub fn score(&self, row: &IndicatorRow, ctx: &ScoreContext) -> u32 {
        self.rules
            .iter()
            .filter(|rule| rule.predicate.holds(row, ctx))
            .map(|rule| rule.weight)
            .sum()
    }

    /// Monotonic step mapping from score to strength bucket.
    pub fn strength(&self, score: u32) -> Strength {
        if score >= self.strong_score {
            Strength::Strong
        } else if score >= self.medium_score {
            Strength::Medium
        } else {
            Strength::None
        }
    }
}

/// A row together with its composite score and strength bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub row: IndicatorRow,
    pub score: u32,
    pub strength: Strength,
}

/// Score every row against the rule set. Pure and order-preserving.
pub fn score_rows(rows: &[IndicatorRow], ruleset: &RuleSet, ctx: &ScoreContext) -> Vec<ScoredRow> {
    rows.iter()
        .map(|row| {
            let score = ruleset.score(row, ctx);
            ScoredRow {
                row: row.clone(),
                score,
                strength: ruleset.strength(score),
            }
        })
        .collect()
}

//! The rule-based recommendation engine.
//!
//! A pure function from a claim's classification fields to an ordered list
//! of suggested actions: no I/O, no randomness, and total over its input
//! domain — malformed numeric fields degrade gracefully instead of
//! erroring. Identifiers are assigned only when the output is persisted.

use crate::{
  claim::Claim,
  recommendation::{Category, NewRecommendation, Priority},
};

/// Default high-value threshold, currency-agnostic.
pub const DEFAULT_HIGH_VALUE_THRESHOLD: f64 = 50_000.0;

/// Values the extraction step emits when a field could not be determined.
const PLACEHOLDER_VALUES: &[&str] = &["", "Unknown", "Not specified", "N/A"];

// ─── Engine ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
  high_value_threshold: f64,
}

impl Default for RecommendationEngine {
  fn default() -> Self {
    Self::new(DEFAULT_HIGH_VALUE_THRESHOLD)
  }
}

impl RecommendationEngine {
  pub const fn new(high_value_threshold: f64) -> Self {
    Self {
      high_value_threshold,
    }
  }

  /// Evaluate every rule against `claim` and return the actions that fired,
  /// sorted by priority rank (Critical → Low). The sort is stable, so rules
  /// of equal priority keep their emission order. No rule firing yields an
  /// empty list, not an error.
  pub fn recommend(&self, claim: &Claim) -> Vec<NewRecommendation> {
    let mut out = Vec::new();

    // Severity escalation.
    if claim.severity.eq_ignore_ascii_case("critical") {
      out.push(rec(
        "Assign a senior adjuster immediately",
        Priority::Critical,
        Category::Processing,
        "🚨",
        "Severity is Critical; the claim needs senior review before any \
         payout decision.",
      ));
    } else if claim.severity.eq_ignore_ascii_case("high") {
      out.push(rec(
        "Schedule a detailed damage investigation",
        Priority::High,
        Category::Processing,
        "🔍",
        "Severity is High; the reported damage warrants an on-site \
         investigation.",
      ));
    }

    // Clear-cut minor claims can skip the queue.
    if claim.severity.eq_ignore_ascii_case("low")
      && claim.confidence.eq_ignore_ascii_case("high")
    {
      out.push(rec(
        "Fast-track for quick approval",
        Priority::Low,
        Category::Processing,
        "✅",
        "Low severity with high extraction confidence; eligible for the \
         fast-track queue.",
      ));
    }

    if claim.loss_type.eq_ignore_ascii_case("theft") {
      out.push(rec(
        "Verify the police report before processing",
        Priority::High,
        Category::Verification,
        "🚔",
        "Loss type is Theft; a police report is required for theft claims.",
      ));
    }

    // High-value payouts need a second signature. A malformed amount means
    // the value is unknown and the rule is skipped.
    if let Some(amount) = parse_amount(&claim.estimated_loss)
      && amount > self.high_value_threshold
    {
      out.push(rec(
        "Obtain supervisor approval for high-value payout",
        Priority::Critical,
        Category::Administrative,
        "🧾",
        "Estimated loss exceeds the configured high-value threshold.",
      ));
    }

    if claim.confidence.eq_ignore_ascii_case("low")
      || classification_fields(claim).iter().any(|v| is_placeholder(v))
    {
      out.push(rec(
        "Request additional documentation from the claimant",
        Priority::Medium,
        Category::Documentation,
        "📄",
        "Extraction confidence is low or one or more classification fields \
         could not be determined.",
      ));
    }

    out.sort_by_key(|r| r.priority.rank());
    out
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn rec(
  action: &str,
  priority: Priority,
  category: Category,
  icon: &str,
  reasoning: &str,
) -> NewRecommendation {
  NewRecommendation {
    action: action.to_string(),
    priority,
    category,
    icon: Some(icon.to_string()),
    reasoning: reasoning.to_string(),
  }
}

/// The eight classification outputs, in schema order.
fn classification_fields(claim: &Claim) -> [&str; 8] {
  [
    &claim.loss_type,
    &claim.severity,
    &claim.affected_assets,
    &claim.estimated_loss,
    &claim.incident_date,
    &claim.location,
    &claim.confidence,
    &claim.explanation,
  ]
}

fn is_placeholder(value: &str) -> bool {
  let v = value.trim();
  PLACEHOLDER_VALUES.iter().any(|p| v.eq_ignore_ascii_case(p))
}

/// Extract a numeric amount from free text like `"$75,000"` or `"₹7,000"`.
///
/// Currency symbols and thousands separators are dropped; whatever remains
/// must parse as a finite number or the amount is treated as unknown.
pub fn parse_amount(raw: &str) -> Option<f64> {
  let cleaned: String = raw
    .chars()
    .filter(|c| c.is_ascii_digit() || *c == '.')
    .collect();
  if cleaned.is_empty() {
    return None;
  }
  cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn claim(
    severity: &str,
    confidence: &str,
    loss_type: &str,
    estimated_loss: &str,
  ) -> Claim {
    Claim {
      id:              1,
      recorded_at:     Utc::now(),
      claim_text:      "Test claim".to_string(),
      loss_type:       loss_type.to_string(),
      severity:        severity.to_string(),
      affected_assets: "Vehicle".to_string(),
      estimated_loss:  estimated_loss.to_string(),
      incident_date:   "2025-11-05".to_string(),
      location:        "Pune".to_string(),
      confidence:      confidence.to_string(),
      explanation:     "Classified from keywords in the report".to_string(),
    }
  }

  #[test]
  fn critical_high_value_claim_gets_adjuster_and_approval() {
    let engine = RecommendationEngine::new(50_000.0);
    let recs = engine.recommend(&claim("Critical", "High", "Fire", "$75,000"));

    // Both critical actions present, in emission order.
    let critical: Vec<&str> = recs
      .iter()
      .filter(|r| r.priority == Priority::Critical)
      .map(|r| r.action.as_str())
      .collect();
    assert_eq!(
      critical,
      [
        "Assign a senior adjuster immediately",
        "Obtain supervisor approval for high-value payout",
      ]
    );
    assert!(!recs.iter().any(|r| r.action.contains("Fast-track")));
  }

  #[test]
  fn low_severity_high_confidence_fast_tracks() {
    let engine = RecommendationEngine::new(50_000.0);
    let recs =
      engine.recommend(&claim("Low", "High", "Accident", "₹7,000"));

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].action, "Fast-track for quick approval");
    assert_eq!(recs[0].priority, Priority::Low);
    assert_eq!(recs[0].category, Category::Processing);
  }

  #[test]
  fn malformed_amount_skips_threshold_rule() {
    let engine = RecommendationEngine::new(50_000.0);
    let recs =
      engine.recommend(&claim("Medium", "Medium", "Fire", "unspecified"));

    // "unspecified" is not a recognised placeholder either, so no rule
    // fires at all; nothing errors.
    assert!(!recs.iter().any(|r| r.category == Category::Administrative));
    assert!(recs.is_empty());
  }

  #[test]
  fn theft_requires_police_report_verification() {
    let engine = RecommendationEngine::default();
    let recs = engine.recommend(&claim("Medium", "High", "Theft", "₹9,000"));

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, Category::Verification);
    assert_eq!(recs[0].priority, Priority::High);
  }

  #[test]
  fn high_severity_schedules_investigation() {
    let engine = RecommendationEngine::default();
    let recs = engine.recommend(&claim("High", "High", "Flood", "₹20,000"));

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].action, "Schedule a detailed damage investigation");
    assert_eq!(recs[0].priority, Priority::High);
  }

  #[test]
  fn placeholder_field_triggers_documentation_request() {
    let engine = RecommendationEngine::default();
    let mut input = claim("Medium", "High", "Accident", "₹9,000");
    input.affected_assets = "Not specified".to_string();

    let recs = engine.recommend(&input);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].category, Category::Documentation);
    assert_eq!(recs[0].priority, Priority::Medium);
  }

  #[test]
  fn low_confidence_triggers_documentation_request() {
    let engine = RecommendationEngine::default();
    let recs = engine.recommend(&claim("Medium", "Low", "Accident", "₹9,000"));

    assert!(recs.iter().any(|r| r.category == Category::Documentation));
  }

  #[test]
  fn unremarkable_claim_yields_no_recommendations() {
    let engine = RecommendationEngine::default();
    let recs =
      engine.recommend(&claim("Medium", "Medium", "Accident", "₹9,000"));
    assert!(recs.is_empty());
  }

  #[test]
  fn output_is_sorted_by_priority_rank() {
    let engine = RecommendationEngine::new(50_000.0);
    // Fires: theft (High), high-value (Critical), documentation (Medium).
    let mut input = claim("Medium", "Low", "Theft", "$80,000");
    input.incident_date = "Unknown".to_string();

    let ranks: Vec<u8> = engine
      .recommend(&input)
      .iter()
      .map(|r| r.priority.rank())
      .collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
    assert_eq!(ranks[0], Priority::Critical.rank());
  }

  #[test]
  fn recommend_is_deterministic() {
    let engine = RecommendationEngine::default();
    let input = claim("Critical", "Low", "Theft", "$80,000");
    assert_eq!(engine.recommend(&input), engine.recommend(&input));
  }

  #[test]
  fn amount_parsing_tolerates_currency_text() {
    assert_eq!(parse_amount("$75,000"), Some(75_000.0));
    assert_eq!(parse_amount("₹7,000"), Some(7_000.0));
    assert_eq!(parse_amount("12345.67"), Some(12_345.67));
    assert_eq!(parse_amount("EUR 1,200"), Some(1_200.0));
    assert_eq!(parse_amount("unspecified"), None);
    assert_eq!(parse_amount(""), None);
    assert_eq!(parse_amount("1.2.3"), None);
  }
}

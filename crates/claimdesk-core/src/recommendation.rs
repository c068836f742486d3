//! Recommendation types — prioritized action items derived from a claim.

use serde::{Deserialize, Serialize};

// ─── Priority ────────────────────────────────────────────────────────────────

/// Urgency of a recommended action. The serialized spelling doubles as the
/// text stored in the `priority` column on both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
  Critical,
  High,
  Medium,
  Low,
}

impl Priority {
  /// Sort rank; lower sorts first (Critical → Low).
  pub const fn rank(self) -> u8 {
    match self {
      Self::Critical => 1,
      Self::High => 2,
      Self::Medium => 3,
      Self::Low => 4,
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Critical => "Critical",
      Self::High => "High",
      Self::Medium => "Medium",
      Self::Low => "Low",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "Critical" => Some(Self::Critical),
      "High" => Some(Self::High),
      "Medium" => Some(Self::Medium),
      "Low" => Some(Self::Low),
      _ => None,
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The workflow area an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
  Processing,
  Verification,
  Documentation,
  Administrative,
  Communication,
}

impl Category {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Processing => "Processing",
      Self::Verification => "Verification",
      Self::Documentation => "Documentation",
      Self::Administrative => "Administrative",
      Self::Communication => "Communication",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "Processing" => Some(Self::Processing),
      "Verification" => Some(Self::Verification),
      "Documentation" => Some(Self::Documentation),
      "Administrative" => Some(Self::Administrative),
      "Communication" => Some(Self::Communication),
      _ => None,
    }
  }
}

// ─── Recommendation ──────────────────────────────────────────────────────────

/// A suggested action tied to a claim, as persisted by a backend.
///
/// For one claim, recommendations read back ordered by priority rank,
/// ties broken by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
  pub id:        i64,
  /// Foreign reference to the owning claim; the claim row must exist at
  /// insertion time.
  pub claim_id:  i64,
  pub action:    String,
  pub priority:  Priority,
  pub category:  Category,
  /// Presentation hint for UI consumers.
  pub icon:      Option<String>,
  pub reasoning: String,
}

// ─── NewRecommendation ───────────────────────────────────────────────────────

/// Engine output. No identifiers — those are assigned only at persistence
/// time, and the owning claim id is supplied when the batch is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecommendation {
  pub action:    String,
  pub priority:  Priority,
  pub category:  Category,
  pub icon:      Option<String>,
  pub reasoning: String,
}

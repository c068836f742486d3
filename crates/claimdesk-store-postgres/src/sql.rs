//! Pure SQL-text helpers for the PostgreSQL backend.
//!
//! Queries in this crate are written in the canonical `?` placeholder
//! syntax shared with the embedded backend and rewritten into PostgreSQL's
//! positional `$1…$N` form here. Pure string transformation — no backend
//! connectivity involved — so it is tested on its own below.

/// Rewrite each canonical `?` placeholder into `$1…$N`, in order.
pub fn adapt_placeholders(query: &str) -> String {
  let mut out = String::with_capacity(query.len() + 8);
  let mut n = 0u32;
  for c in query.chars() {
    if c == '?' {
      n += 1;
      out.push('$');
      out.push_str(&n.to_string());
    } else {
      out.push(c);
    }
  }
  out
}

/// Escape `%`, `_`, and the escape character itself so user input matches
/// literally inside a LIKE pattern.
pub fn escape_like(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Lowercased `%needle%` pattern for the case-forced LIKE comparisons.
pub fn like_pattern(needle: &str) -> String {
  format!("%{}%", escape_like(&needle.to_lowercase()))
}

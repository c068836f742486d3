//! LIKE-pattern helpers for the search query.

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

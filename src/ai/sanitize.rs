//! Fence stripping for model-generated SQL
//!
//! Models wrap SQL in markdown code fences more often than not. The output
//! contract is: strip one leading fence (labeled ```sql or bare ```), strip
//! one trailing ``` fence, trim whitespace. Nothing else is validated here.

/// Strip surrounding markdown code fences from generated SQL.
pub fn strip_sql_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```sql") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}

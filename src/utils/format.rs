use crate::utils::error::{PbnError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// `5000000` -> `Rp 5.000.000`
pub fn format_idr(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}Rp {}", sign, group_thousands(amount.unsigned_abs(), '.'))
}

/// `12500` -> `12,500`
pub fn format_number(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(value.unsigned_abs(), ','))
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

type SlugPatterns = (Regex, Regex, Regex);

fn slug_patterns() -> Result<&'static SlugPatterns> {
    static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
    if let Some(patterns) = PATTERNS.get() {
        return Ok(patterns);
    }

    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|e| PbnError::ConfigError {
            message: format!("Invalid slug pattern: {}", e),
        })
    };
    let compiled = (
        compile(r"[^a-z0-9\s-]")?,
        compile(r"\s+")?,
        compile(r"-+")?,
    );
    Ok(PATTERNS.get_or_init(|| compiled))
}

/// URL slug for blog posts and pages, e.g. `"Tips SEO 2024!"` -> `"tips-seo-2024"`.
pub fn slugify(title: &str) -> Result<String> {
    let (invalid, spaces, dashes) = slug_patterns()?;
    let lower = title.trim().to_lowercase();
    let stripped = invalid.replace_all(&lower, "");
    let dashed = spaces.replace_all(stripped.trim(), "-");
    Ok(dashes
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string())
}

//! Presentation helpers: label colors, inline token markup and score
//! formatting.

use serde::Serialize;

use crate::alignment::{PredictedToken, QualityLabel};

/// Background for tokens tagged BAD
pub const WARNING_COLOR: &str = "rgb(255, 204, 203)";
/// Background for every other label
pub const NEUTRAL_COLOR: &str = "rgb(211,211,211)";

/// Map a raw quality label to its display color.
pub fn color_for(label: &str) -> &'static str {
    if label == "BAD" {
        WARNING_COLOR
    } else {
        NEUTRAL_COLOR
    }
}

/// A token ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColoredToken {
    pub text: String,
    pub quality: QualityLabel,
    pub color: &'static str,
}

impl From<&PredictedToken> for ColoredToken {
    fn from(token: &PredictedToken) -> Self {
        Self {
            text: token.text.clone(),
            quality: token.quality.clone(),
            color: color_for(token.quality.as_str()),
        }
    }
}

pub fn colorize(tokens: &[PredictedToken]) -> Vec<ColoredToken> {
    tokens.iter().map(ColoredToken::from).collect()
}

/// Render tokens as inline highlighted spans, preserving order.
pub fn render_inline(tokens: &[PredictedToken]) -> String {
    tokens
        .iter()
        .map(|token| {
            format!(
                "<span class=\"token\" style=\"background: {}; padding: 0.25rem 0.5rem; \
                 margin: 0 0.15rem; border-radius: 0.4rem; line-height: 2.2;\">{}</span>",
                color_for(token.quality.as_str()),
                escape_html(&token.text)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Round a score to two decimals
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Display form of a score, always with two decimals
pub fn format_score(score: f64) -> String {
    let rounded = round_score(score);
    // -0.001 rounds to -0.0
    format!("{:.2}", if rounded == 0.0 { 0.0 } else { rounded })
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

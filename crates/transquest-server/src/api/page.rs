//! The single demo page: direction picker, input form and colored output.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::fmt::Write;
use tracing::warn;
use transquest_core::render::escape_html;
use transquest_core::{render_inline, LanguageDirection, QualityReport, DEFAULT_SOURCE_TEXT};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub direction: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// What the result area shows
#[derive(Debug)]
pub enum PageOutcome {
    Report(QualityReport),
    Error(String),
}

#[derive(Debug)]
pub struct PageModel {
    pub direction: LanguageDirection,
    pub loaded: Vec<LanguageDirection>,
    pub source: String,
    pub target: String,
    pub outcome: PageOutcome,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let parsed = query
        .direction
        .as_deref()
        .map(str::parse::<LanguageDirection>)
        .transpose();

    let loaded = state.service.registry().loaded_directions();

    let page = match parsed {
        Err(err) => {
            warn!("Rejected page request: {}", err);
            PageModel {
                direction: LanguageDirection::EnDe,
                loaded,
                source: query.source.unwrap_or_else(|| DEFAULT_SOURCE_TEXT.to_string()),
                target: query.target.unwrap_or_default(),
                outcome: PageOutcome::Error(err.to_string()),
            }
        }
        Ok(direction) => {
            let direction = direction.unwrap_or(LanguageDirection::EnDe);
            let source = query
                .source
                .unwrap_or_else(|| DEFAULT_SOURCE_TEXT.to_string());
            let target = query
                .target
                .unwrap_or_else(|| direction.default_target_text().to_string());

            let outcome = match state
                .estimate(direction, source.clone(), target.clone())
                .await
            {
                Ok(report) => PageOutcome::Report(report),
                Err(err) => PageOutcome::Error(err.message),
            };

            PageModel {
                direction,
                loaded,
                source,
                target,
                outcome,
            }
        }
    };

    Html(render_page(&page))
}

const STYLE: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", sans-serif; color: #262730; display: flex; min-height: 100vh; }
aside { width: 18rem; background: #f0f2f6; padding: 2rem 1.5rem; box-sizing: border-box; }
main { flex: 1; padding: 2rem 3rem; }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; }
textarea { width: 100%; min-height: 6rem; font: inherit; padding: 0.5rem; box-sizing: border-box; }
.error { background: #ffe8e6; border-left: 4px solid #ff4b4b; padding: 0.75rem 1rem; }
.disabled { color: #a3a8b4; }
button { margin-top: 1rem; padding: 0.4rem 1.2rem; font: inherit; }
"#;

/// Switching direction reloads that direction's example texts
const DIRECTION_SWITCH: &str = "window.location.search = '?direction=' + this.value";

/// Render the complete page
pub fn render_page(page: &PageModel) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>TransQuest UI</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<form method=\"get\" action=\"/\" style=\"display: contents\">\n");

    render_sidebar(&mut html, page);
    render_main(&mut html, page);

    html.push_str("</form>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, page: &PageModel) {
    html.push_str("<aside>\n<h1>TransQuest</h1>\n");
    html.push_str("<p>Translation Quality Estimation with Cross-lingual Transformers</p>\n");
    html.push_str("<p><a href=\"https://github.com/TharinduDR/TransQuest\">code</a></p>\n<hr>\n");
    html.push_str("<h2>Translation Direction</h2>\n<p>Select the direction of the Translation</p>\n");

    for direction in LanguageDirection::all() {
        let checked = if *direction == page.direction {
            " checked"
        } else {
            ""
        };
        let class = if page.loaded.contains(direction) {
            ""
        } else {
            " class=\"disabled\""
        };
        let _ = writeln!(
            html,
            "<label{class}><input type=\"radio\" name=\"direction\" value=\"{value}\"{checked} \
             onchange=\"{DIRECTION_SWITCH}\"> {value}</label><br>",
            value = direction.as_str(),
        );
    }
    html.push_str("</aside>\n");
}

fn render_main(html: &mut String, page: &PageModel) {
    html.push_str("<main>\n<h2>Input a Translation</h2>\n");
    html.push_str("<p>Input a Source and the Target to get the quality from TransQuest</p>\n");
    let _ = writeln!(
        html,
        "<div class=\"columns\">\n\
         <div><label>Source<br><textarea name=\"source\">{}</textarea></label></div>\n\
         <div><label>Target<br><textarea name=\"target\">{}</textarea></label></div>\n\
         </div>\n<button type=\"submit\">Estimate</button>",
        escape_html(&page.source),
        escape_html(&page.target)
    );

    html.push_str("<h2>Translation Quality</h2>\n");
    match &page.outcome {
        PageOutcome::Error(message) => {
            let _ = writeln!(html, "<div class=\"error\">{}</div>", escape_html(message));
        }
        PageOutcome::Report(report) => {
            let _ = writeln!(
                html,
                "<p>Target sentence fixing effort (HTER): <strong>{}</strong></p>\n\
                 <p>Direct Assessment: <strong>{}</strong></p>",
                report.hter_display(),
                report.da_display()
            );
            let _ = writeln!(
                html,
                "<div class=\"columns\">\n\
                 <div><p>Predicted Source Quality (BAD quality words in Red)</p>\n<div>{}</div></div>\n\
                 <div><p>Predicted Target Quality (BAD quality words and gaps in Red)</p>\n<div>{}</div></div>\n\
                 </div>",
                render_inline(&report.source_tokens),
                render_inline(&report.target_tokens)
            );
        }
    }
    html.push_str("</main>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use transquest_core::{PredictedToken, QualityLabel};

    fn report() -> QualityReport {
        QualityReport {
            direction: LanguageDirection::EnDe,
            hter: 0.4,
            da: 0.71828,
            source_tokens: vec![PredictedToken::new("Welcome", QualityLabel::Ok)],
            target_tokens: vec![
                PredictedToken::gap(QualityLabel::Ok),
                PredictedToken::new("Herzlich", QualityLabel::Bad),
                PredictedToken::gap(QualityLabel::Ok),
            ],
        }
    }

    #[test]
    fn renders_scores_with_two_decimals() {
        let html = render_page(&PageModel {
            direction: LanguageDirection::EnDe,
            loaded: vec![LanguageDirection::EnDe],
            source: "Welcome".to_string(),
            target: "Herzlich".to_string(),
            outcome: PageOutcome::Report(report()),
        });

        assert!(html.contains("(HTER): <strong>0.40</strong>"));
        assert!(html.contains("Direct Assessment: <strong>0.72</strong>"));
        assert!(html.contains("value=\"en-de\" checked"));
        assert!(html.contains("rgb(255, 204, 203)"));
        assert!(html.contains("&lt;GAP&gt;"));
    }

    #[test]
    fn unloaded_directions_are_greyed_out() {
        let html = render_page(&PageModel {
            direction: LanguageDirection::EnZh,
            loaded: vec![LanguageDirection::EnDe],
            source: String::new(),
            target: String::new(),
            outcome: PageOutcome::Error("en-zh is not loaded".to_string()),
        });

        assert!(html.contains("<label class=\"disabled\"><input type=\"radio\" name=\"direction\" value=\"en-zh\" checked"));
        assert!(html.contains("<div class=\"error\">en-zh is not loaded</div>"));
        assert!(!html.contains("HTER"));
    }

    #[test]
    fn direction_switch_drops_typed_texts() {
        let html = render_page(&PageModel {
            direction: LanguageDirection::EnDe,
            loaded: vec![LanguageDirection::EnDe],
            source: "Welcome".to_string(),
            target: "Herzlich willkommen".to_string(),
            outcome: PageOutcome::Error("x".to_string()),
        });

        assert!(html.contains(
            "value=\"en-zh\" onchange=\"window.location.search = '?direction=' + this.value\""
        ));
        assert!(!html.contains("this.form.submit()"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_page(&PageModel {
            direction: LanguageDirection::EnDe,
            loaded: vec![LanguageDirection::EnDe],
            source: "<script>alert(1)</script>".to_string(),
            target: String::new(),
            outcome: PageOutcome::Error("x".to_string()),
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}

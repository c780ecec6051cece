use crate::core::content::{content_text, has_content};
use crate::core::projector::Projector;
use crate::domain::model::{AnalysisRecord, Dimension, DimensionAnalysis, TablePayload};
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    /// `None` for scores that are comments rather than numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        let score = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Some(if score >= 8.0 {
            ScoreBand::Strong
        } else if score >= 6.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Fair => "fair",
            ScoreBand::Weak => "weak",
        }
    }
}

/// `"8/10 (strong)"` for numeric scores, the comment verbatim otherwise.
pub fn render_score(value: &Value) -> Option<String> {
    let text = content_text(value)?;
    Some(match ScoreBand::from_value(value) {
        Some(band) => format!("{}/10 ({})", text.trim(), band.label()),
        None => text,
    })
}

pub fn render_table(
    projector: &Projector,
    payload: &TablePayload,
    selected: Option<usize>,
) -> String {
    let mut header: Vec<String> = vec!["#".to_string()];
    header.extend(projector.basic_labels().into_iter().map(String::from));
    header.push("Actions".to_string());

    let rows: Vec<Vec<String>> = payload
        .table_data
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut cells = vec![(index + 1).to_string()];
            cells.extend(projector.basic_row(row));
            let action = if !projector.has_analysis(row) {
                "-"
            } else if selected == Some(index) {
                "Hide Analysis"
            } else {
                "View Analysis"
            };
            cells.push(action.to_string());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str("Transcription Records\n");
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("No transcriptions found\n");
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

pub fn render_pagination(page: u32) -> String {
    let mut parts = Vec::with_capacity(3);
    if page > 1 {
        parts.push("[p] Previous".to_string());
    }
    parts.push(format!("Page {}", page));
    parts.push("[n] Next".to_string());
    parts.join("  ")
}

fn dimension_has_content(block: &DimensionAnalysis) -> bool {
    block.fields().into_iter().any(has_content)
}

fn render_dimension(out: &mut String, dimension: Dimension, block: &DimensionAnalysis) {
    match render_score(&block.score) {
        Some(score) => {
            let _ = writeln!(out, "## {}  [{}]", dimension.title(), score);
        }
        None => {
            let _ = writeln!(out, "## {}", dimension.title());
        }
    }
    if let Some(detail) = content_text(&block.detail) {
        let _ = writeln!(out, "{}", detail);
    }
    if let Some(positive) = content_text(&block.positive) {
        let _ = writeln!(out, "  + {}", positive);
    }
    if let Some(negative) = content_text(&block.negative) {
        let _ = writeln!(out, "  - {}", negative);
    }
    let suggestions: Vec<String> = [&block.suggestion1, &block.suggestion2]
        .into_iter()
        .filter_map(content_text)
        .collect();
    if !suggestions.is_empty() {
        out.push_str("  Suggestions:\n");
        for suggestion in suggestions {
            let _ = writeln!(out, "    • {}", suggestion);
        }
    }
    out.push('\n');
}

pub fn render_analysis(record: &AnalysisRecord) -> String {
    let mut out = String::new();
    out.push_str("# Call Analysis\n");
    if let Some(overall) = render_score(&record.overall_score) {
        let _ = writeln!(out, "Overall Score: {}", overall);
    }
    out.push('\n');

    for dimension in Dimension::ALL {
        let block = record.dimension(dimension);
        if dimension_has_content(block) {
            render_dimension(&mut out, dimension, block);
        }
    }

    if let Some(strengths) = content_text(&record.strengths) {
        let _ = writeln!(out, "## Strengths\n{}\n", strengths);
    }
    if let Some(areas) = content_text(&record.areas_for_improvement) {
        let _ = writeln!(out, "## Areas for Improvement\n{}\n", areas);
    }
    if let Some(transcription) = content_text(&record.transcription) {
        let _ = writeln!(out, "## Transcription\n{}\n", transcription);
    }

    let recaps: Vec<(Dimension, Vec<String>)> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let points = record.recap.get(dimension);
            let texts = [&points.first, &points.second]
                .into_iter()
                .filter_map(content_text)
                .collect::<Vec<_>>();
            (dimension, texts)
        })
        .filter(|(_, texts)| !texts.is_empty())
        .collect();
    if !recaps.is_empty() {
        out.push_str("## Key Takeaways\n");
        for (dimension, texts) in recaps {
            let _ = writeln!(out, "{}", dimension.recap_title());
            for text in texts {
                let _ = writeln!(out, "  • {}", text);
            }
        }
    }

    out.trim_end().to_string() + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projector::{ColumnPolicy, MatchMode};
    use serde_json::json;

    fn payload() -> TablePayload {
        TablePayload::new(
            vec![
                "id".into(),
                "name".into(),
                "Time".into(),
                "pitch_followed_detail".into(),
                "score_pitch".into(),
                "score_overall".into(),
                "recap_energy_2".into(),
            ],
            vec![
                vec![
                    json!(1),
                    json!("Alice"),
                    json!("2024-01-01 10:00:00"),
                    json!("Good opening"),
                    json!("8"),
                    json!("7"),
                    json!("Keep the pace"),
                ],
                vec![
                    json!(2),
                    json!("Bob"),
                    Value::Null,
                    json!("null"),
                    json!(""),
                    Value::Null,
                    json!("undefined"),
                ],
            ],
        )
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_value(&json!(8)), Some(ScoreBand::Strong));
        assert_eq!(ScoreBand::from_value(&json!("6.5")), Some(ScoreBand::Fair));
        assert_eq!(ScoreBand::from_value(&json!("3")), Some(ScoreBand::Weak));
        assert_eq!(ScoreBand::from_value(&json!("solid call")), None);
        assert_eq!(render_score(&json!("9")), Some("9/10 (strong)".to_string()));
        assert_eq!(render_score(&json!("solid call")), Some("solid call".to_string()));
        assert_eq!(render_score(&json!("null")), None);
    }

    #[test]
    fn test_table_gates_actions_on_content() {
        let payload = payload();
        let projector = Projector::new(&payload.headers, MatchMode::Exact, ColumnPolicy::Fixed);
        let table = render_table(&projector, &payload, Some(0));

        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].starts_with("# | id | name"));
        assert!(lines[3].contains("Alice"));
        assert!(lines[3].contains("Jan 1, 2024, 10:00 AM"));
        assert!(lines[3].ends_with("Hide Analysis"));
        assert!(lines[4].contains("Bob"));
        assert!(lines[4].ends_with("-"));
    }

    #[test]
    fn test_empty_table() {
        let payload = TablePayload::default();
        let projector = Projector::new(&payload.headers, MatchMode::Exact, ColumnPolicy::Fixed);
        assert!(render_table(&projector, &payload, None).contains("No transcriptions found"));
    }

    #[test]
    fn test_analysis_panel_omits_empty_blocks() {
        let payload = payload();
        let projector = Projector::new(&payload.headers, MatchMode::Exact, ColumnPolicy::Fixed);

        let rendered = render_analysis(&projector.analysis(&payload.table_data[0]));
        assert!(rendered.contains("Overall Score: 7/10 (fair)\n"));
        assert!(rendered.contains("## Pitch Quality  [8/10 (strong)]"));
        assert!(rendered.contains("Good opening"));
        assert!(rendered.contains("Energy Recap\n  • Keep the pace"));
        assert!(!rendered.contains("Confidence Level"));
        assert!(!rendered.contains("Strengths"));

        let empty = render_analysis(&projector.analysis(&payload.table_data[1]));
        assert_eq!(empty, "# Call Analysis\n");
    }

    #[test]
    fn test_pagination_footer() {
        assert_eq!(render_pagination(1), "Page 1  [n] Next");
        assert_eq!(render_pagination(4), "[p] Previous  Page 4  [n] Next");
    }
}

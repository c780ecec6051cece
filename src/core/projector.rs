use crate::core::content::{display_text, has_content};
use crate::core::timefmt::format_timestamp;
use crate::domain::model::{AnalysisRecord, Dimension};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How a field name is matched against the payload headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Header equals the field name, ignoring case.
    #[default]
    Exact,
    /// First header containing the field name, ignoring case.
    Substring,
}

/// Which columns make up the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPolicy {
    /// `id`, `name` and a formatted `Time`.
    #[default]
    Fixed,
    /// Every header not matching one of [`RESERVED_SUBSTRINGS`].
    Filtered,
}

/// Headers containing any of these belong to the analysis panel, not the summary table.
pub const RESERVED_SUBSTRINGS: [&str; 9] = [
    "pitch_followed",
    "confidence",
    "tonality",
    "energy",
    "objection",
    "strengths",
    "areas_for_improvement",
    "recap",
    "score",
];

const FIXED_COLUMNS: [(&str, Option<fn(&Value) -> String>); 3] = [
    ("id", None),
    ("name", None),
    ("Time", Some(format_timestamp as fn(&Value) -> String)),
];

static NULL: Value = Value::Null;

/// Lowercased header name to column position, built once per payload.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    mode: MatchMode,
    lowered: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String], mode: MatchMode) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let mut positions = HashMap::with_capacity(lowered.len());
        for (index, header) in lowered.iter().enumerate() {
            // first occurrence wins on duplicate headers
            positions.entry(header.clone()).or_insert(index);
        }
        Self {
            mode,
            lowered,
            positions,
        }
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        match self.mode {
            MatchMode::Exact => self.exact_position(field),
            MatchMode::Substring => {
                let needle = field.to_lowercase();
                self.lowered.iter().position(|header| header.contains(&needle))
            }
        }
    }

    pub fn exact_position(&self, field: &str) -> Option<usize> {
        self.positions.get(&field.to_lowercase()).copied()
    }
}

#[derive(Debug, Clone)]
pub struct BasicColumn {
    pub label: String,
    pub position: Option<usize>,
    pub formatter: Option<fn(&Value) -> String>,
}

impl BasicColumn {
    pub fn render(&self, row: &[Value]) -> String {
        let value = self
            .position
            .and_then(|index| row.get(index))
            .unwrap_or(&NULL);
        match self.formatter {
            Some(format) => format(value),
            None => display_text(value).unwrap_or_default(),
        }
    }
}

/// Projects positional rows onto the summary columns and the analysis record.
#[derive(Debug, Clone)]
pub struct Projector {
    index: HeaderIndex,
    columns: Vec<BasicColumn>,
}

impl Projector {
    pub fn new(headers: &[String], mode: MatchMode, policy: ColumnPolicy) -> Self {
        let index = HeaderIndex::new(headers, mode);
        let columns = match policy {
            // the fixed columns always use exact lookup: "id" is a substring of too many headers
            ColumnPolicy::Fixed => FIXED_COLUMNS
                .iter()
                .map(|(name, formatter)| BasicColumn {
                    label: name.to_string(),
                    position: index.exact_position(name),
                    formatter: *formatter,
                })
                .collect(),
            ColumnPolicy::Filtered => headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !is_reserved(header))
                .map(|(position, header)| BasicColumn {
                    label: header.clone(),
                    position: Some(position),
                    formatter: None,
                })
                .collect(),
        };
        Self { index, columns }
    }

    pub fn basic_columns(&self) -> &[BasicColumn] {
        &self.columns
    }

    pub fn basic_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn basic_row(&self, row: &[Value]) -> Vec<String> {
        self.columns.iter().map(|column| column.render(row)).collect()
    }

    /// Value under `field`, or null when no header matches or the row is too short.
    pub fn resolve(&self, row: &[Value], field: &str) -> Value {
        self.index
            .position(field)
            .and_then(|index| row.get(index))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn analysis(&self, row: &[Value]) -> AnalysisRecord {
        let mut record = AnalysisRecord::default();

        for dimension in Dimension::ALL {
            let block = record.dimension_mut(dimension);
            block.detail = self.resolve(row, &dimension.detail_field());
            block.positive = self.resolve(row, &dimension.positive_field());
            block.negative = self.resolve(row, &dimension.negative_field());
            block.suggestion1 = self.resolve(row, &dimension.suggestion_field(1));
            block.suggestion2 = self.resolve(row, &dimension.suggestion_field(2));
            block.score = self.resolve(row, &dimension.score_field());

            let recap = record.recap.get_mut(dimension);
            recap.first = self.resolve(row, &dimension.recap_field(1));
            recap.second = self.resolve(row, &dimension.recap_field(2));
        }

        record.strengths = self.resolve(row, "strengths");
        record.areas_for_improvement = self.resolve(row, "areas_for_improvement");
        record.overall_score = self.resolve(row, "score_overall");
        record.transcription = self.resolve(row, "transcription");
        record
    }

    /// Whether the row has anything to show in the analysis panel.
    pub fn has_analysis(&self, row: &[Value]) -> bool {
        analysis_fields()
            .iter()
            .any(|field| has_content(&self.resolve(row, field)))
    }
}

fn is_reserved(header: &str) -> bool {
    let lowered = header.to_lowercase();
    RESERVED_SUBSTRINGS
        .iter()
        .any(|reserved| lowered.contains(reserved))
}

/// Every field name the analysis record is built from.
pub fn analysis_fields() -> Vec<String> {
    let mut fields = Vec::with_capacity(44);
    for dimension in Dimension::ALL {
        fields.push(dimension.detail_field());
        fields.push(dimension.positive_field());
        fields.push(dimension.negative_field());
        fields.push(dimension.suggestion_field(1));
        fields.push(dimension.suggestion_field(2));
        fields.push(dimension.score_field());
        fields.push(dimension.recap_field(1));
        fields.push(dimension.recap_field(2));
    }
    fields.extend(
        ["strengths", "areas_for_improvement", "score_overall", "transcription"]
            .into_iter()
            .map(String::from),
    );
    fields
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of the transcription API: column names plus positional rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub table_data: Vec<Vec<Value>>,
}

impl TablePayload {
    pub fn new(headers: Vec<String>, table_data: Vec<Vec<Value>>) -> Self {
        Self { headers, table_data }
    }

    pub fn is_empty(&self) -> bool {
        self.table_data.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.table_data.len()
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.table_data.get(index).map(Vec::as_slice)
    }

    /// Indices of rows whose width differs from the header count.
    pub fn malformed_rows(&self) -> Vec<usize> {
        self.table_data
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.headers.len())
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Pitch,
    Confidence,
    Tonality,
    Energy,
    Objection,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Pitch,
        Dimension::Confidence,
        Dimension::Tonality,
        Dimension::Energy,
        Dimension::Objection,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Dimension::Pitch => "pitch",
            Dimension::Confidence => "confidence",
            Dimension::Tonality => "tonality",
            Dimension::Energy => "energy",
            Dimension::Objection => "objection",
        }
    }

    /// Prefix of the detail/positive/negative/suggestion columns.
    pub fn field_prefix(self) -> &'static str {
        match self {
            Dimension::Pitch => "pitch_followed",
            other => other.key(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Pitch => "Pitch Quality",
            Dimension::Confidence => "Confidence Level",
            Dimension::Tonality => "Tonality",
            Dimension::Energy => "Energy Level",
            Dimension::Objection => "Objection Handling",
        }
    }

    pub fn recap_title(self) -> &'static str {
        match self {
            Dimension::Pitch => "Pitch Recap",
            Dimension::Confidence => "Confidence Recap",
            Dimension::Tonality => "Tonality Recap",
            Dimension::Energy => "Energy Recap",
            Dimension::Objection => "Objection Handling Recap",
        }
    }

    pub fn detail_field(self) -> String {
        format!("{}_detail", self.field_prefix())
    }

    pub fn positive_field(self) -> String {
        format!("{}_positive", self.field_prefix())
    }

    pub fn negative_field(self) -> String {
        format!("{}_negative", self.field_prefix())
    }

    /// `n` is 1 or 2.
    pub fn suggestion_field(self, n: u8) -> String {
        format!("{}_suggested_{}", self.field_prefix(), n)
    }

    pub fn score_field(self) -> String {
        format!("score_{}", self.key())
    }

    /// `n` is 1 or 2.
    pub fn recap_field(self, n: u8) -> String {
        format!("recap_{}_{}", self.key(), n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAnalysis {
    pub detail: Value,
    pub positive: Value,
    pub negative: Value,
    pub suggestion1: Value,
    pub suggestion2: Value,
    /// Either a numeric score or a free-text comment.
    pub score: Value,
}

impl DimensionAnalysis {
    pub fn fields(&self) -> [&Value; 6] {
        [
            &self.detail,
            &self.positive,
            &self.negative,
            &self.suggestion1,
            &self.suggestion2,
            &self.score,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapPoints {
    pub first: Value,
    pub second: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recap {
    pub pitch: RecapPoints,
    pub confidence: RecapPoints,
    pub tonality: RecapPoints,
    pub energy: RecapPoints,
    pub objection: RecapPoints,
}

impl Recap {
    pub fn get(&self, dimension: Dimension) -> &RecapPoints {
        match dimension {
            Dimension::Pitch => &self.pitch,
            Dimension::Confidence => &self.confidence,
            Dimension::Tonality => &self.tonality,
            Dimension::Energy => &self.energy,
            Dimension::Objection => &self.objection,
        }
    }

    pub(crate) fn get_mut(&mut self, dimension: Dimension) -> &mut RecapPoints {
        match dimension {
            Dimension::Pitch => &mut self.pitch,
            Dimension::Confidence => &mut self.confidence,
            Dimension::Tonality => &mut self.tonality,
            Dimension::Energy => &mut self.energy,
            Dimension::Objection => &mut self.objection,
        }
    }
}

/// Per-row analysis, derived from a row every time it is requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub pitch: DimensionAnalysis,
    pub confidence: DimensionAnalysis,
    pub tonality: DimensionAnalysis,
    pub energy: DimensionAnalysis,
    pub objection: DimensionAnalysis,
    pub strengths: Value,
    pub areas_for_improvement: Value,
    pub overall_score: Value,
    pub transcription: Value,
    pub recap: Recap,
}

impl AnalysisRecord {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionAnalysis {
        match dimension {
            Dimension::Pitch => &self.pitch,
            Dimension::Confidence => &self.confidence,
            Dimension::Tonality => &self.tonality,
            Dimension::Energy => &self.energy,
            Dimension::Objection => &self.objection,
        }
    }

    pub(crate) fn dimension_mut(&mut self, dimension: Dimension) -> &mut DimensionAnalysis {
        match dimension {
            Dimension::Pitch => &mut self.pitch,
            Dimension::Confidence => &mut self.confidence,
            Dimension::Tonality => &mut self.tonality,
            Dimension::Energy => &mut self.energy,
            Dimension::Objection => &mut self.objection,
        }
    }
}

use crate::core::projector::Projector;
use crate::core::Storage;
use crate::domain::model::{AnalysisRecord, TablePayload};
use crate::utils::error::{Result, ViewerError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RowAnalysis {
    row: usize,
    analysis: AnalysisRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub table_file: String,
    pub analysis_file: String,
    pub rows: usize,
    pub analysed_rows: usize,
}

/// Writes the summary table as CSV and the per-row analyses as JSON.
pub struct PageExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> PageExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn export(
        &self,
        page: u32,
        payload: &TablePayload,
        projector: &Projector,
    ) -> Result<ExportSummary> {
        let table_file = format!("transcriptions_page_{}.csv", page);
        let analysis_file = format!("analysis_page_{}.json", page);

        let csv_data = table_csv(payload, projector)?;
        tracing::debug!("Writing {} ({} bytes)", table_file, csv_data.len());
        self.storage.write_file(&table_file, &csv_data).await?;

        let analyses: Vec<RowAnalysis> = payload
            .table_data
            .iter()
            .enumerate()
            .filter(|(_, row)| projector.has_analysis(row))
            .map(|(index, row)| RowAnalysis {
                row: index + 1,
                analysis: projector.analysis(row),
            })
            .collect();
        let json_data = serde_json::to_vec_pretty(&analyses)?;
        tracing::debug!("Writing {} ({} bytes)", analysis_file, json_data.len());
        self.storage.write_file(&analysis_file, &json_data).await?;

        Ok(ExportSummary {
            table_file,
            analysis_file,
            rows: payload.row_count(),
            analysed_rows: analyses.len(),
        })
    }
}

fn table_csv(payload: &TablePayload, projector: &Projector) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["#".to_string()];
    header.extend(projector.basic_labels().into_iter().map(String::from));
    header.push("has_analysis".to_string());
    writer.write_record(&header)?;

    for (index, row) in payload.table_data.iter().enumerate() {
        let mut record = vec![(index + 1).to_string()];
        record.extend(projector.basic_row(row));
        record.push(projector.has_analysis(row).to_string());
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ViewerError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projector::{ColumnPolicy, MatchMode};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_export_writes_table_and_analysis() {
        let payload = TablePayload::new(
            vec!["id".into(), "name".into(), "Time".into(), "strengths".into()],
            vec![
                vec![json!(1), json!("Alice, Jr."), json!("2024-03-05 14:30:00"), json!("Rapport")],
                vec![json!(2), json!("Bob"), Value::Null, json!("undefined")],
            ],
        );
        let projector = Projector::new(&payload.headers, MatchMode::Exact, ColumnPolicy::Fixed);
        let storage = MockStorage::default();
        let exporter = PageExporter::new(storage.clone());

        let summary = exporter.export(4, &payload, &projector).await.unwrap();
        assert_eq!(summary.table_file, "transcriptions_page_4.csv");
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.analysed_rows, 1);

        let csv_bytes = storage.get_file("transcriptions_page_4.csv").await.unwrap();
        let csv_text = String::from_utf8(csv_bytes).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "#,id,name,Time,has_analysis");
        assert_eq!(lines[1], "1,1,\"Alice, Jr.\",\"Mar 5, 2024, 2:30 PM\",true");
        assert_eq!(lines[2], "2,2,Bob,-,false");

        let json_bytes = storage.get_file("analysis_page_4.json").await.unwrap();
        let analyses: serde_json::Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(analyses.as_array().unwrap().len(), 1);
        assert_eq!(analyses[0]["row"], json!(1));
        assert_eq!(analyses[0]["analysis"]["strengths"], json!("Rapport"));
        assert_eq!(analyses[0]["analysis"]["areasForImprovement"], Value::Null);
    }
}

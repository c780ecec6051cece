use anyhow::Result;
use call_analyzer::{
    ColumnPolicy, HttpTranscriptionSource, LocalStorage, MatchMode, PageExporter,
    TranscriptionViewer, ViewSettings,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn alice_page() -> serde_json::Value {
    json!({
        "headers": ["id", "name", "Time", "pitch_followed_detail", "score_overall"],
        "table_data": [[1, "Alice", "2024-01-01 10:00:00", "Good opening", "8"]]
    })
}

fn source_for(server: &MockServer) -> HttpTranscriptionSource {
    HttpTranscriptionSource::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_projection_over_http() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/transcriptions")
                .query_param("page", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(alice_page());
        })
        .await;

    let mut viewer = TranscriptionViewer::new(source_for(&server), ViewSettings::default(), 1);
    assert!(viewer.go_to_page(1).await);
    api_mock.assert_async().await;

    let payload = viewer.state().payload();
    assert_eq!(
        viewer.projector().basic_row(&payload.table_data[0]),
        vec!["1", "Alice", "Jan 1, 2024, 10:00 AM"]
    );

    viewer.toggle_row(0);
    let record = viewer.selected_analysis().unwrap();
    assert_eq!(record.pitch.detail, json!("Good opening"));
    assert_eq!(record.overall_score, json!("8"));
    assert_eq!(record.confidence.detail, serde_json::Value::Null);

    let rendered = viewer.render();
    assert!(rendered.contains("## Pitch Quality"));
    assert!(rendered.contains("Overall Score: 8/10"));
    Ok(())
}

#[tokio::test]
async fn test_failed_page_keeps_previous_records() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/transcriptions")
                .query_param("page", "1");
            then.status(200).json_body(alice_page());
        })
        .await;
    let failing = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/transcriptions")
                .query_param("page", "2");
            then.status(503);
        })
        .await;

    let mut viewer = TranscriptionViewer::new(source_for(&server), ViewSettings::default(), 1);
    assert!(viewer.go_to_page(1).await);
    assert!(!viewer.next_page().await);
    failing.assert_async().await;

    assert_eq!(viewer.state().page(), 2);
    assert_eq!(viewer.state().payload().row_count(), 1);
    assert!(viewer.render().contains("Alice"));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_api_degrades_to_empty_table() -> Result<()> {
    // nothing listens on the discard port
    let source = HttpTranscriptionSource::new("http://127.0.0.1:9", Duration::from_secs(2))?;
    let mut viewer = TranscriptionViewer::new(source, ViewSettings::default(), 1);

    assert!(!viewer.go_to_page(1).await);
    assert!(!viewer.state().is_loading());
    assert!(viewer.render().contains("No transcriptions found"));
    Ok(())
}

#[tokio::test]
async fn test_substring_mode_with_filtered_columns() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/transcriptions");
            then.status(200).json_body(json!({
                "headers": [
                    "call_id",
                    "Agent",
                    "Score_Pitch_Value",
                    "Recap_Pitch_1_text",
                    "Strengths"
                ],
                "table_data": [["c-17", "Dana", 5, "Lead with the value", "Clear voice"]]
            }));
        })
        .await;

    let settings = ViewSettings {
        match_mode: MatchMode::Substring,
        column_policy: ColumnPolicy::Filtered,
    };
    let mut viewer = TranscriptionViewer::new(source_for(&server), settings, 1);
    assert!(viewer.go_to_page(1).await);

    assert_eq!(viewer.projector().basic_labels(), vec!["call_id", "Agent"]);

    viewer.toggle_row(0);
    let record = viewer.selected_analysis().unwrap();
    assert_eq!(record.pitch.score, json!(5));
    assert_eq!(record.recap.pitch.first, json!("Lead with the value"));
    assert_eq!(record.strengths, json!("Clear voice"));

    let rendered = viewer.render();
    assert!(rendered.contains("5/10 (weak)"));
    assert!(rendered.contains("Pitch Recap"));
    Ok(())
}

#[tokio::test]
async fn test_malformed_rows_are_padded() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/transcriptions");
            then.status(200).json_body(json!({
                "headers": ["id", "name", "Time", "strengths"],
                "table_data": [[1], [2, "Eve", "2024-02-29 23:59:00", "Persistent", "extra"]]
            }));
        })
        .await;

    let mut viewer = TranscriptionViewer::new(source_for(&server), ViewSettings::default(), 1);
    assert!(viewer.go_to_page(1).await);

    let payload = viewer.state().payload();
    let projector = viewer.projector();
    assert_eq!(projector.basic_row(&payload.table_data[0]), vec!["1", "", "-"]);
    assert!(!projector.has_analysis(&payload.table_data[0]));
    assert_eq!(
        projector.basic_row(&payload.table_data[1]),
        vec!["2", "Eve", "Feb 29, 2024, 11:59 PM"]
    );
    assert!(projector.has_analysis(&payload.table_data[1]));
    Ok(())
}

#[tokio::test]
async fn test_export_to_local_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("exports");

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/transcriptions")
                .query_param("page", "3");
            then.status(200).json_body(alice_page());
        })
        .await;

    let mut viewer = TranscriptionViewer::new(source_for(&server), ViewSettings::default(), 3);
    assert!(viewer.go_to_page(3).await);

    let exporter = PageExporter::new(LocalStorage::new(output_path.to_string_lossy().to_string()));
    let summary = exporter
        .export(viewer.state().page(), viewer.state().payload(), viewer.projector())
        .await?;
    assert_eq!(summary.analysed_rows, 1);

    let csv_content = std::fs::read_to_string(output_path.join("transcriptions_page_3.csv"))?;
    assert!(csv_content.starts_with("#,id,name,Time,has_analysis"));
    assert!(csv_content.contains("Alice"));

    let json_content = std::fs::read_to_string(output_path.join("analysis_page_3.json"))?;
    let analyses: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(analyses[0]["analysis"]["pitch"]["detail"], json!("Good opening"));
    assert_eq!(analyses[0]["analysis"]["overallScore"], json!("8"));
    Ok(())
}

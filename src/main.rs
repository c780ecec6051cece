use call_analyzer::core::{ConfigProvider, TranscriptionSource};
use call_analyzer::utils::{logger, validation::Validate};
use call_analyzer::{
    AppConfig, CliConfig, HttpTranscriptionSource, LocalStorage, PageExporter,
    TranscriptionViewer, ViewerError,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

fn fail(e: &ViewerError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting call-analyzer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = AppConfig::load(&cli).unwrap_or_else(|e| fail(&e));
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let source = HttpTranscriptionSource::from_config(&config).unwrap_or_else(|e| fail(&e));
    let mut viewer = TranscriptionViewer::new(source, config.view_settings(), config.page());

    viewer.go_to_page(config.page()).await;
    if let Some(row) = config.row {
        if viewer.toggle_row(row - 1).is_none() {
            tracing::warn!(
                "Row {} on page {} is missing or has no analysis",
                row,
                viewer.state().page()
            );
        }
    }
    print!("{}", viewer.render());

    if let Some(dir) = config.export_dir() {
        export_page(&viewer, dir).await?;
    }

    if config.interactive {
        run_interactive(&mut viewer, config.export_dir()).await?;
    }

    Ok(())
}

async fn export_page<S: TranscriptionSource>(
    viewer: &TranscriptionViewer<S>,
    dir: &str,
) -> anyhow::Result<()> {
    let exporter = PageExporter::new(LocalStorage::new(dir.to_string()));
    let summary = exporter
        .export(viewer.state().page(), viewer.state().payload(), viewer.projector())
        .await?;
    tracing::info!(
        "📁 Exported {} rows ({} with analysis) to {}/{} and {}/{}",
        summary.rows,
        summary.analysed_rows,
        dir,
        summary.table_file,
        dir,
        summary.analysis_file
    );
    Ok(())
}

async fn run_interactive<S: TranscriptionSource>(
    viewer: &mut TranscriptionViewer<S>,
    export_dir: Option<&str>,
) -> anyhow::Result<()> {
    println!("Commands: n = next, p = previous, <row> = toggle analysis, r = reload, q = quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        match command {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => {
                viewer.next_page().await;
            }
            "p" | "prev" | "previous" => {
                if viewer.state().previous_page().is_none() {
                    println!("Already on the first page");
                    continue;
                }
                viewer.previous_page().await;
            }
            "r" | "reload" => {
                viewer.reload().await;
            }
            other => match other.parse::<usize>() {
                Ok(row) if row >= 1 => {
                    viewer.toggle_row(row - 1);
                }
                _ => {
                    println!("Unknown command: {}", other);
                    continue;
                }
            },
        }

        print!("{}", viewer.render());
        if let Some(dir) = export_dir {
            export_page(viewer, dir).await?;
        }
    }

    Ok(())
}

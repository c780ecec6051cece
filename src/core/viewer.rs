use crate::core::projector::{ColumnPolicy, MatchMode, Projector};
use crate::core::render::{render_analysis, render_pagination, render_table};
use crate::core::session::ViewState;
use crate::core::{ConfigProvider, TranscriptionSource};
use crate::domain::model::AnalysisRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSettings {
    pub match_mode: MatchMode,
    pub column_policy: ColumnPolicy,
}

impl ViewSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            match_mode: config.match_mode(),
            column_policy: config.column_policy(),
        }
    }
}

/// Drives one paginated view: fetches pages, keeps state, renders text.
pub struct TranscriptionViewer<S: TranscriptionSource> {
    source: S,
    settings: ViewSettings,
    state: ViewState,
    projector: Projector,
}

impl<S: TranscriptionSource> TranscriptionViewer<S> {
    pub fn new(source: S, settings: ViewSettings, page: u32) -> Self {
        let state = ViewState::new(page);
        let projector = Projector::new(
            &state.payload().headers,
            settings.match_mode,
            settings.column_policy,
        );
        Self {
            source,
            settings,
            state,
            projector,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Fetches `page`. A failed fetch is logged and the held payload stays on display.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        let generation = self.state.begin_load(page);
        let page = self.state.page();
        tracing::info!("Loading transcriptions page {}", page);

        match self.source.fetch_page(page).await {
            Ok(payload) => {
                let rows = payload.row_count();
                if !self.state.apply_response(generation, payload) {
                    return false;
                }
                self.projector = Projector::new(
                    &self.state.payload().headers,
                    self.settings.match_mode,
                    self.settings.column_policy,
                );
                tracing::info!("Loaded {} transcriptions on page {}", rows, page);
                true
            }
            Err(e) => {
                tracing::error!("Failed to fetch transcriptions: {}", e);
                tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());
                self.state.apply_failure(generation);
                false
            }
        }
    }

    pub async fn reload(&mut self) -> bool {
        self.go_to_page(self.state.page()).await
    }

    pub async fn next_page(&mut self) -> bool {
        self.go_to_page(self.state.next_page()).await
    }

    /// No-op on the first page.
    pub async fn previous_page(&mut self) -> bool {
        match self.state.previous_page() {
            Some(page) => self.go_to_page(page).await,
            None => false,
        }
    }

    /// Rows without any analysis content cannot be expanded.
    pub fn toggle_row(&mut self, index: usize) -> Option<usize> {
        if self.state.selected_row() != Some(index) {
            if let Some(row) = self.state.payload().row(index) {
                if !self.projector.has_analysis(row) {
                    tracing::debug!("Row {} has no analysis to show", index + 1);
                    return self.state.selected_row();
                }
            }
        }
        self.state.toggle_row(index)
    }

    /// Recomputed from the raw row on every call.
    pub fn selected_analysis(&self) -> Option<AnalysisRecord> {
        self.state.selected().map(|row| self.projector.analysis(row))
    }

    pub fn render(&self) -> String {
        let mut out = render_table(
            &self.projector,
            self.state.payload(),
            self.state.selected_row(),
        );
        if let Some(record) = self.selected_analysis() {
            out.push('\n');
            out.push_str(&render_analysis(&record));
        }
        out.push('\n');
        out.push_str(&render_pagination(self.state.page()));
        out.push('\n');
        out
    }
}

use crate::domain::model::TablePayload;
use serde_json::Value;

/// In-memory view state: current page, the payload on display and the expanded row.
#[derive(Debug, Clone)]
pub struct ViewState {
    page: u32,
    payload: TablePayload,
    selected_row: Option<usize>,
    loading: bool,
    generation: u64,
}

impl ViewState {
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            payload: TablePayload::default(),
            selected_row: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn payload(&self) -> &TablePayload {
        &self.payload
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    pub fn previous_page(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    /// Starts a request for `page` and returns its generation token.
    pub fn begin_load(&mut self, page: u32) -> u64 {
        let page = page.max(1);
        if page != self.page {
            self.selected_row = None;
        }
        self.page = page;
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    /// Applies a response; stale generations are discarded.
    ///
    /// [`TranscriptionViewer`](crate::core::viewer::TranscriptionViewer) awaits each fetch
    /// before starting the next, so only drivers that issue overlapping requests against
    /// one state can hit the stale branch.
    pub fn apply_response(&mut self, generation: u64, payload: TablePayload) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Discarding stale response (generation {}, latest {})",
                generation,
                self.generation
            );
            return false;
        }
        self.payload = payload;
        self.loading = false;
        if self
            .selected_row
            .is_some_and(|row| row >= self.payload.row_count())
        {
            self.selected_row = None;
        }
        true
    }

    /// Clears the loading flag after a failed request, keeping the held payload.
    pub fn apply_failure(&mut self, generation: u64) {
        if generation == self.generation {
            self.loading = false;
        }
    }

    /// Expands `index`, or collapses it when it is already expanded.
    pub fn toggle_row(&mut self, index: usize) -> Option<usize> {
        self.selected_row = if self.selected_row == Some(index) {
            None
        } else if index < self.payload.row_count() {
            Some(index)
        } else {
            tracing::debug!(
                "Ignoring selection of row {} (page has {} rows)",
                index,
                self.payload.row_count()
            );
            self.selected_row
        };
        self.selected_row
    }

    pub fn selected(&self) -> Option<&[Value]> {
        self.selected_row.and_then(|index| self.payload.row(index))
    }
}

//! Storage breakdown view.

use uuid::Uuid;

use crate::client::ClientResult;
use crate::models::{StorageReport, StorageViewKind};

use super::{FetchTicket, ViewData, commit_guarded};

/// Holds the storage report plus the view-local slice selection.
#[derive(Debug)]
pub struct StorageView {
    data: ViewData<StorageReport>,
    kind: StorageViewKind,
    dataset_id: Option<Uuid>,
}

impl Default for StorageView {
    fn default() -> Self {
        StorageView {
            data: ViewData::default(),
            kind: StorageViewKind::Overview,
            dataset_id: None,
        }
    }
}

impl StorageView {
    pub fn new() -> Self {
        StorageView::default()
    }

    pub fn data(&self) -> &ViewData<StorageReport> {
        &self.data
    }

    pub fn kind(&self) -> StorageViewKind {
        self.kind
    }

    pub fn dataset_id(&self) -> Option<Uuid> {
        self.dataset_id
    }

    /// Switches between the overview and the dataset slice. View-local:
    /// does not touch the shared filter state.
    pub fn set_kind(&mut self, kind: StorageViewKind) {
        self.kind = kind;
        if kind == StorageViewKind::Overview {
            self.dataset_id = None;
        }
    }

    pub fn set_dataset(&mut self, dataset_id: Option<Uuid>) {
        self.dataset_id = dataset_id;
        if dataset_id.is_some() {
            self.kind = StorageViewKind::Datasets;
        }
    }

    pub fn begin(&mut self) {
        self.data.begin();
    }

    pub fn commit(
        &mut self,
        ticket: FetchTicket,
        generation: u64,
        result: ClientResult<StorageReport>,
    ) -> bool {
        commit_guarded(&mut self.data, ticket, generation, result, "storage")
    }
}

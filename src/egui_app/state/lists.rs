use crate::list_view::{ListPage, ListQuery, Listable};
use crate::model::RecordId;

/// Loaded records of one list page plus its query.
#[derive(Debug)]
pub struct ListState<R: Listable> {
    pub records: Vec<R>,
    pub query: ListQuery<R::Filter, R::Sort>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<R: Listable> ListState<R> {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            query: ListQuery::new(page_size),
            loading: false,
            loaded: false,
            error: None,
        }
    }

    /// Swap in freshly fetched records; the page is clamped on the next `page()`.
    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
        self.loading = false;
        self.loaded = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn page(&mut self) -> ListPage {
        self.query.run(&self.records)
    }
}

/// A single fetched record shown on a detail page.
#[derive(Debug)]
pub struct DetailState<T> {
    pub id: Option<RecordId>,
    pub record: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            id: None,
            record: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> DetailState<T> {
    pub fn begin(&mut self, id: RecordId) {
        if self.id != Some(id) {
            self.record = None;
        }
        self.id = Some(id);
        self.loading = true;
        self.error = None;
    }

    /// Whether a result for `id` still belongs on screen.
    pub fn wants(&self, id: RecordId) -> bool {
        self.id == Some(id)
    }
}

/// Create/edit form around a draft.
#[derive(Debug, Default)]
pub struct FormState<D> {
    pub draft: D,
    /// `Some` while editing an existing record.
    pub editing: Option<RecordId>,
    /// The edit form is waiting for the record to seed from.
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl<D: Default> FormState<D> {
    pub fn reset(&mut self, editing: Option<RecordId>) {
        *self = Self {
            editing,
            loading: editing.is_some(),
            ..Self::default()
        };
    }
}

/// Open search-and-pick modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerModal {
    pub search: String,
    pub error: Option<String>,
}

use crate::api::ApiError;
use crate::data::{Client, ClientForm, FormField};

pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 8, 10, 20];
pub const DEFAULT_ROWS_PER_PAGE: usize = 8;

pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required.";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save client.";
pub const CLIENT_ADDED_MESSAGE: &str = "Client added successfully.";
pub const CLIENT_UPDATED_MESSAGE: &str = "Client updated successfully.";

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Closed,
    Creating,
    Editing(Client),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteState {
    Idle,
    Confirming(Client),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveError {
    /// A required field was left empty; nothing was sent.
    Validation(String),
    /// The backend refused the request or could not be reached.
    Request(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Validation(msg) | SaveError::Request(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<&ApiError> for SaveError {
    fn from(err: &ApiError) -> Self {
        SaveError::Request(
            err.user_message()
                .unwrap_or(SAVE_FAILED_MESSAGE)
                .to_string(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Create(ClientForm),
    Update { id: String, form: ClientForm },
}

/// Request produced by a validated save, to be sent by the caller. It
/// remembers which opening of the dialog issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    dialog_session: u64,
    pub action: SaveAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: usize,
    pub rows_per_page: usize,
}

impl Pagination {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.rows_per_page)
    }

    /// The rows of `items` on the current page. An out-of-range page is empty.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.rows_per_page).min(items.len());
        &items[start..end]
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page + 1 < self.page_count(total)
    }

    /// "from–to of total", 1-based. A page with no rows reads "0–0 of total".
    pub fn range_label(&self, total: usize) -> String {
        let start = self.offset();
        if start >= total {
            return format!("0–0 of {}", total);
        }
        let end = start.saturating_add(self.rows_per_page).min(total);
        format!("{}–{} of {}", start + 1, end, total)
    }
}

/// In-memory state of the client management screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDirectory {
    clients: Vec<Client>,
    filtered: Vec<Client>,
    search_query: String,
    pagination: Pagination,
    dialog: DialogState,
    delete: DeleteState,
    form: ClientForm,
    error: Option<String>,
    success: Option<String>,
    // bumped every time the add/edit dialog opens or closes
    dialog_session: u64,
    // dialog session of the save in flight, if any
    saving: Option<u64>,
    deleting: bool,
}

impl Default for ClientDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl ClientDirectory {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            clients: Vec::new(),
            filtered: Vec::new(),
            search_query: String::new(),
            pagination: Pagination::new(rows_per_page),
            dialog: DialogState::Closed,
            delete: DeleteState::Idle,
            form: ClientForm::default(),
            error: None,
            success: None,
            dialog_session: 0,
            saving: None,
            deleting: false,
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn filtered(&self) -> &[Client] {
        &self.filtered
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn dialog(&self) -> &DialogState {
        &self.dialog
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// True while a save issued from the dialog currently open is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving == Some(self.dialog_session)
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.dialog, DialogState::Editing(_))
    }

    pub fn find(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    // ---- loading -------------------------------------------------------

    /// Replace the authoritative list. The filtered view is reset to the
    /// whole list; the search text and page are left alone.
    pub fn apply_loaded(&mut self, clients: Vec<Client>) {
        self.filtered = clients.clone();
        self.clients = clients;
    }

    // ---- search and pagination -----------------------------------------

    pub fn set_search(&mut self, raw: &str) {
        self.search_query = raw.to_lowercase();
        self.filtered = self
            .clients
            .iter()
            .filter(|client| client.matches(&self.search_query))
            .cloned()
            .collect();
        self.pagination.page = 0;
    }

    /// Forget the search text and show the whole list from the first page.
    pub fn reset_search(&mut self) {
        self.search_query.clear();
        self.filtered = self.clients.clone();
        self.pagination.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.page = page;
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.pagination = Pagination::new(rows_per_page);
    }

    pub fn page_window(&self) -> &[Client] {
        self.pagination.window(&self.filtered)
    }

    // ---- add / edit dialog ---------------------------------------------

    pub fn open_create(&mut self) {
        self.dialog_session += 1;
        self.form = ClientForm::default();
        self.dialog = DialogState::Creating;
        self.clear_messages();
    }

    pub fn open_edit(&mut self, client: &Client) {
        self.dialog_session += 1;
        self.form = ClientForm::from_client(client);
        self.dialog = DialogState::Editing(client.clone());
        self.clear_messages();
    }

    pub fn close_dialog(&mut self) {
        self.dialog_session += 1;
        self.dialog = DialogState::Closed;
        self.form = ClientForm::default();
    }

    /// Update one form field. The customer id of an existing client is fixed.
    pub fn set_field(&mut self, field: FormField, value: String) {
        if field == FormField::ApId && self.is_editing() {
            return;
        }
        self.form.set(field, value);
    }

    /// Validate the form and mark a save as in flight.
    ///
    /// Returns `Ok(None)` when the dialog is closed or a save from this same
    /// dialog has not finished yet.
    pub fn begin_save(&mut self) -> Result<Option<SaveRequest>, SaveError> {
        if self.is_saving() || self.dialog == DialogState::Closed {
            return Ok(None);
        }

        self.clear_messages();

        if !self.form.is_complete() {
            let err = SaveError::Validation(REQUIRED_FIELDS_MESSAGE.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        let action = match &self.dialog {
            DialogState::Editing(client) => SaveAction::Update {
                id: client.id.clone(),
                form: self.form.clone(),
            },
            _ => SaveAction::Create(self.form.clone()),
        };

        self.saving = Some(self.dialog_session);
        Ok(Some(SaveRequest {
            dialog_session: self.dialog_session,
            action,
        }))
    }

    /// Record the outcome of a save. Returns true when the list must be
    /// reloaded.
    ///
    /// Messages and the dialog are only touched when the dialog that issued
    /// the request is still the one open. A late outcome from a dialog the
    /// user already left is logged, and a late success still reloads.
    pub fn finish_save(
        &mut self,
        request: &SaveRequest,
        result: Result<(), ApiError>,
    ) -> Result<bool, SaveError> {
        if self.saving == Some(request.dialog_session) {
            self.saving = None;
        }
        let current = request.dialog_session == self.dialog_session;

        match result {
            Ok(()) => {
                if current {
                    let message = match request.action {
                        SaveAction::Create(_) => CLIENT_ADDED_MESSAGE,
                        SaveAction::Update { .. } => CLIENT_UPDATED_MESSAGE,
                    };
                    self.success = Some(message.to_string());
                    self.close_dialog();
                } else {
                    log::info!("Save finished after its dialog was closed");
                }
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to save client: {}", e);
                let err = SaveError::from(&e);
                if current {
                    self.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    // ---- delete dialog -------------------------------------------------

    pub fn open_delete_confirm(&mut self, client: &Client) {
        self.clear_messages();
        self.delete = DeleteState::Confirming(client.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.delete = DeleteState::Idle;
    }

    /// Mark a delete as in flight and return the id to delete.
    pub fn begin_delete(&mut self) -> Option<String> {
        if self.deleting {
            return None;
        }
        match &self.delete {
            DeleteState::Confirming(client) => {
                self.deleting = true;
                Some(client.id.clone())
            }
            DeleteState::Idle => None,
        }
    }

    /// Record the outcome of a delete. Failures are logged only and keep the
    /// confirmation open. Returns true when the list must be reloaded.
    pub fn finish_delete(&mut self, id: &str, result: Result<(), ApiError>) -> bool {
        self.deleting = false;

        match result {
            Ok(()) => {
                self.delete = DeleteState::Idle;
                true
            }
            Err(e) => {
                log::error!("Failed to delete client {}: {}", id, e);
                false
            }
        }
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }
}

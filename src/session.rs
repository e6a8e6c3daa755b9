use crate::api::{ApiError, ClientBackend};
use crate::data::Client;
use crate::directory::{ClientDirectory, SaveAction, SaveError, SaveRequest};

/// Fetch the full collection. Failures are logged and yield `None`.
pub async fn fetch_clients(backend: &dyn ClientBackend) -> Option<Vec<Client>> {
    match backend.list_clients().await {
        Ok(clients) => Some(clients),
        Err(e) => {
            log::error!("Error fetching clients: {}", e);
            None
        }
    }
}

pub async fn send_save(backend: &dyn ClientBackend, request: &SaveRequest) -> Result<(), ApiError> {
    match &request.action {
        SaveAction::Create(form) => backend.create_client(form).await,
        SaveAction::Update { id, form } => backend.update_client(id, form).await,
    }
}

/// Something that holds the screen state and lets a short closure mutate it.
/// Implemented for a bare `ClientDirectory` and for the UI's signal, so the
/// flows below never keep the state borrowed across a request.
pub trait DirectoryStore {
    fn update<R>(&mut self, f: impl FnOnce(&mut ClientDirectory) -> R) -> R;
}

impl DirectoryStore for ClientDirectory {
    fn update<R>(&mut self, f: impl FnOnce(&mut ClientDirectory) -> R) -> R {
        f(self)
    }
}

/// Reload the authoritative list. Returns false if the fetch failed, in which
/// case the previous list is kept.
pub async fn load<S: DirectoryStore>(store: &mut S, backend: &dyn ClientBackend) -> bool {
    match fetch_clients(backend).await {
        Some(clients) => {
            log::info!("Loaded {} clients", clients.len());
            store.update(|directory| directory.apply_loaded(clients));
            true
        }
        None => false,
    }
}

/// Entering the management screen starts from an empty search over a
/// freshly loaded list.
pub async fn open_screen<S: DirectoryStore>(store: &mut S, backend: &dyn ClientBackend) -> bool {
    store.update(|directory| directory.reset_search());
    load(store, backend).await
}

/// Validate and submit the add/edit form, then reload on success.
pub async fn save<S: DirectoryStore>(
    store: &mut S,
    backend: &dyn ClientBackend,
) -> Result<(), SaveError> {
    let Some(request) = store.update(|directory| directory.begin_save())? else {
        return Ok(());
    };

    let result = send_save(backend, &request).await;
    if store.update(|directory| directory.finish_save(&request, result))? {
        load(store, backend).await;
    }
    Ok(())
}

/// Delete the client awaiting confirmation. Returns true on success.
pub async fn confirm_delete<S: DirectoryStore>(store: &mut S, backend: &dyn ClientBackend) -> bool {
    let Some(id) = store.update(|directory| directory.begin_delete()) else {
        return false;
    };

    let result = backend.delete_client(&id).await;
    let deleted = store.update(|directory| directory.finish_delete(&id, result));
    if deleted {
        load(store, backend).await;
    }
    deleted
}

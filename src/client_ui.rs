use crate::api::ClientBackend;
use crate::data::{gender_label, Client, FormField, GENDERS};
use crate::directory::{ClientDirectory, DeleteState, DialogState, ROWS_PER_PAGE_OPTIONS};
use crate::session::{self, DirectoryStore};
use dioxus::prelude::*;
use std::sync::Arc;

/// Shared backend handle. Two handles are equal when they point at the same
/// backend instance.
#[derive(Clone)]
pub struct BackendHandle(pub Arc<dyn ClientBackend>);

impl PartialEq for BackendHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl DirectoryStore for Signal<ClientDirectory> {
    fn update<R>(&mut self, f: impl FnOnce(&mut ClientDirectory) -> R) -> R {
        self.with_mut(f)
    }
}

#[component]
pub fn ClientManagementScreen(
    mut directory: Signal<ClientDirectory>,
    backend: BackendHandle,
    on_client_selected: EventHandler<String>,
) -> Element {
    // Start from an empty search and load the full list once on mount
    {
        let backend = backend.clone();
        use_effect(move || {
            let backend = backend.clone();
            spawn(async move {
                let mut directory = directory;
                session::open_screen(&mut directory, backend.0.as_ref()).await;
            });
        });
    }

    let search_query = directory.read().search_query().to_string();
    let dialog = directory.read().dialog().clone();
    let banner = match dialog {
        DialogState::Closed => directory.read().success().map(str::to_string),
        _ => None,
    };
    let delete_state = directory.read().delete_state().clone();
    let deleting = directory.read().is_deleting();

    let confirm_delete = {
        let backend = backend.clone();
        move |_| {
            let backend = backend.clone();
            spawn(async move {
                let mut directory = directory;
                session::confirm_delete(&mut directory, backend.0.as_ref()).await;
            });
        }
    };

    rsx! {
        div {
            class: "min-h-screen bg-gray-100",

            header {
                class: "bg-white shadow-sm border-b",
                div {
                    class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div {
                        class: "flex justify-center items-center py-6",
                        h1 {
                            class: "text-3xl font-bold text-gray-900",
                            "Client Management"
                        }
                    }
                }
            }

            main {
                class: "max-w-6xl mx-auto py-6 px-4 sm:px-6 lg:px-8 space-y-4",

                // Search and add
                div {
                    class: "flex space-x-4",
                    input {
                        r#type: "text",
                        value: "{search_query}",
                        placeholder: "Search by ID, Name, or Surname",
                        oninput: move |evt| directory.write().set_search(&evt.value()),
                        class: "flex-1 px-3 py-2 border border-gray-300 rounded-md text-sm focus:outline-none focus:ring-2 focus:ring-blue-500 focus:border-transparent"
                    }
                    button {
                        onclick: move |_| directory.write().open_create(),
                        class: "px-4 py-2 text-sm font-medium text-white bg-blue-600 hover:bg-blue-700 rounded-md shadow-sm",
                        "Add New Client"
                    }
                }

                if let Some(message) = banner {
                    Alert { kind: AlertKind::Success, message }
                }

                ClientTable { directory, on_client_selected }
                PaginationBar { directory }
            }

            if dialog != DialogState::Closed {
                ClientFormDialog { directory, backend: backend.clone() }
            }

            if let DeleteState::Confirming(client) = delete_state {
                DeleteConfirmationDialog {
                    client,
                    deleting,
                    on_confirm: confirm_delete,
                    on_cancel: move |_| directory.write().cancel_delete(),
                }
            }
        }
    }
}

#[component]
fn ClientTable(
    mut directory: Signal<ClientDirectory>,
    on_client_selected: EventHandler<String>,
) -> Element {
    let rows = directory.read().page_window().to_vec();

    rsx! {
        div {
            class: "bg-white shadow rounded-lg overflow-hidden",
            style: "min-height: 400px;",
            table {
                class: "min-w-full divide-y divide-gray-200",
                thead {
                    class: "bg-gray-50",
                    tr {
                        for heading in ["ID", "Name", "Surname", "Gender", "Actions"] {
                            th {
                                class: "px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider",
                                "{heading}"
                            }
                        }
                    }
                }
                tbody {
                    class: "bg-white divide-y divide-gray-200",
                    if rows.is_empty() {
                        tr {
                            td {
                                colspan: "5",
                                class: "px-6 py-4 text-sm text-gray-500",
                                "No clients found."
                            }
                        }
                    }
                    for client in rows {
                        ClientRow {
                            key: "{client.id}",
                            client: client.clone(),
                            on_select: on_client_selected,
                            on_edit: move |client: Client| directory.write().open_edit(&client),
                            on_delete: move |client: Client| directory.write().open_delete_confirm(&client),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ClientRow(
    client: Client,
    on_select: EventHandler<String>,
    on_edit: EventHandler<Client>,
    on_delete: EventHandler<Client>,
) -> Element {
    let id = client.id.clone();
    let edit_client = client.clone();
    let delete_client = client.clone();

    rsx! {
        tr {
            class: "cursor-pointer hover:bg-gray-50",
            onclick: move |_| on_select.call(id.clone()),

            td { class: "px-6 py-4 align-top text-sm text-gray-900", "{client.ap_id}" }
            td { class: "px-6 py-4 align-top text-sm text-gray-900", "{client.name}" }
            td { class: "px-6 py-4 align-top text-sm text-gray-900", "{client.surname}" }
            td { class: "px-6 py-4 align-top text-sm text-gray-900", "{client.gender}" }
            td {
                class: "px-6 py-4 align-top text-sm space-x-2",
                button {
                    onclick: move |e| {
                        e.stop_propagation(); // keep the row from navigating
                        on_edit.call(edit_client.clone());
                    },
                    class: "text-blue-600 hover:text-blue-800",
                    title: "Edit",
                    "✏️"
                }
                button {
                    onclick: move |e| {
                        e.stop_propagation();
                        on_delete.call(delete_client.clone());
                    },
                    class: "text-red-600 hover:text-red-800",
                    title: "Delete",
                    "🗑️"
                }
            }
        }
    }
}

#[component]
fn PaginationBar(mut directory: Signal<ClientDirectory>) -> Element {
    let pagination = directory.read().pagination();
    let total = directory.read().filtered().len();
    let range = pagination.range_label(total);
    let has_previous = pagination.has_previous();
    let has_next = pagination.has_next(total);

    rsx! {
        div {
            class: "flex items-center justify-end space-x-6 text-sm text-gray-700",
            div {
                class: "flex items-center space-x-2",
                span { "Rows per page:" }
                select {
                    value: "{pagination.rows_per_page}",
                    onchange: move |evt| {
                        match evt.value().parse::<usize>() {
                            Ok(rows) => directory.write().set_rows_per_page(rows),
                            Err(e) => log::warn!("Ignoring rows per page '{}': {}", evt.value(), e),
                        }
                    },
                    class: "border-gray-300 rounded-md text-sm",
                    for rows in ROWS_PER_PAGE_OPTIONS {
                        option {
                            value: "{rows}",
                            selected: rows == pagination.rows_per_page,
                            "{rows}"
                        }
                    }
                }
            }
            span { "{range}" }
            div {
                class: "flex space-x-2",
                button {
                    disabled: !has_previous,
                    onclick: move |_| directory.write().set_page(pagination.page.saturating_sub(1)),
                    class: "px-2 py-1 rounded-md hover:bg-gray-200 disabled:opacity-50",
                    "‹"
                }
                button {
                    disabled: !has_next,
                    onclick: move |_| directory.write().set_page(pagination.page + 1),
                    class: "px-2 py-1 rounded-md hover:bg-gray-200 disabled:opacity-50",
                    "›"
                }
            }
        }
    }
}

#[component]
fn ClientFormDialog(mut directory: Signal<ClientDirectory>, backend: BackendHandle) -> Element {
    let editing = directory.read().is_editing();
    let saving = directory.read().is_saving();
    let form = directory.read().form().clone();
    let error = directory.read().error().map(str::to_string);
    let success = directory.read().success().map(str::to_string);
    let gender_heading = format!("{} *", FormField::Gender.label());

    let save = move |_| {
        let backend = backend.clone();
        spawn(async move {
            let mut directory = directory;
            if let Err(e) = session::save(&mut directory, backend.0.as_ref()).await {
                log::warn!("Client not saved: {}", e);
            }
        });
    };

    rsx! {
        div {
            class: "fixed inset-0 bg-gray-600 bg-opacity-50 overflow-y-auto h-full w-full z-50 flex items-center justify-center",
            onclick: move |_| directory.write().close_dialog(),

            div {
                class: "bg-white rounded-lg shadow-xl max-w-lg w-full mx-4",
                onclick: |e| e.stop_propagation(),

                div {
                    class: "p-4 border-b border-gray-200",
                    h3 {
                        class: "text-lg font-medium text-gray-900",
                        if editing { "Edit Client" } else { "Add Client" }
                    }
                }

                div {
                    class: "p-4 space-y-4",

                    for field in [FormField::ApId, FormField::Name, FormField::Surname] {
                        FormTextField {
                            key: "{field:?}",
                            field,
                            value: form.get(field).to_string(),
                            disabled: field == FormField::ApId && editing,
                            on_input: move |value| directory.write().set_field(field, value),
                        }
                    }

                    div {
                        label {
                            class: "block text-sm font-medium text-gray-700",
                            "{gender_heading}"
                        }
                        select {
                            name: FormField::Gender.name(),
                            value: "{form.gender}",
                            onchange: move |evt| directory.write().set_field(FormField::Gender, evt.value()),
                            class: "mt-1 block w-full border-gray-300 rounded-md shadow-sm focus:ring-blue-500 focus:border-blue-500",
                            option { value: "", selected: form.gender.is_empty(), "Select Gender" }
                            for gender in GENDERS {
                                option {
                                    value: gender,
                                    selected: form.gender == gender,
                                    {gender_label(gender)}
                                }
                            }
                        }
                    }

                    if let Some(message) = error {
                        Alert { kind: AlertKind::Error, message }
                    }
                    if let Some(message) = success {
                        Alert { kind: AlertKind::Success, message }
                    }
                }

                div {
                    class: "flex justify-end space-x-3 p-4 border-t border-gray-200",
                    button {
                        onclick: move |_| directory.write().close_dialog(),
                        class: "px-4 py-2 text-sm font-medium text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-md transition-colors",
                        "Cancel"
                    }
                    button {
                        onclick: save,
                        disabled: saving,
                        class: format!(
                            "px-4 py-2 text-sm font-medium text-white rounded-md transition-colors {}",
                            if saving { "bg-gray-400 cursor-not-allowed" } else { "bg-blue-600 hover:bg-blue-700" }
                        ),
                        if saving { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}

#[component]
fn FormTextField(
    field: FormField,
    value: String,
    disabled: bool,
    on_input: EventHandler<String>,
) -> Element {
    let heading = format!("{} *", field.label());

    rsx! {
        div {
            label {
                class: "block text-sm font-medium text-gray-700",
                "{heading}"
            }
            input {
                r#type: "text",
                name: field.name(),
                value: "{value}",
                disabled: disabled,
                oninput: move |evt| on_input.call(evt.value()),
                class: "mt-1 block w-full border-gray-300 rounded-md shadow-sm focus:ring-blue-500 focus:border-blue-500 disabled:bg-gray-100"
            }
        }
    }
}

#[component]
fn DeleteConfirmationDialog(
    client: Client,
    deleting: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let full_name = client.full_name();

    rsx! {
        div {
            class: "fixed inset-0 bg-gray-600 bg-opacity-50 overflow-y-auto h-full w-full z-50 flex items-center justify-center",
            onclick: move |_| on_cancel.call(()),

            div {
                class: "bg-white rounded-lg shadow-xl max-w-md w-full mx-4",
                onclick: |e| e.stop_propagation(),

                div {
                    class: "p-4 border-b border-gray-200",
                    h3 {
                        class: "text-lg font-medium text-gray-900",
                        "Confirm Deletion"
                    }
                }

                div {
                    class: "p-4",
                    p {
                        class: "text-sm text-gray-600",
                        "Are you sure you want to delete the client \"{full_name}\"?"
                    }
                }

                div {
                    class: "flex justify-end space-x-3 p-4 border-t border-gray-200",
                    button {
                        onclick: move |_| on_cancel.call(()),
                        class: "px-4 py-2 text-sm font-medium text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-md transition-colors",
                        "Cancel"
                    }
                    button {
                        onclick: move |_| on_confirm.call(()),
                        disabled: deleting,
                        class: "px-4 py-2 text-sm font-medium text-white bg-red-600 hover:bg-red-700 rounded-md transition-colors disabled:opacity-50",
                        "Delete"
                    }
                }
            }
        }
    }
}

#[component]
pub fn ClientDetailView(
    client_id: String,
    directory: Signal<ClientDirectory>,
    on_back: EventHandler<()>,
) -> Element {
    let client = directory.read().find(&client_id).cloned();

    rsx! {
        div {
            class: "min-h-screen bg-gray-100",
            main {
                class: "max-w-3xl mx-auto py-6 px-4 sm:px-6 lg:px-8 space-y-4",
                button {
                    onclick: move |_| on_back.call(()),
                    class: "text-sm text-blue-600 hover:text-blue-800",
                    "← Back to clients"
                }
                match client {
                    Some(client) => rsx! {
                        ClientDetailCard { client }
                    },
                    None => rsx! {
                        div {
                            class: "bg-white shadow rounded-lg p-6 text-sm text-gray-500",
                            "Client not found."
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn ClientDetailCard(client: Client) -> Element {
    let full_name = client.full_name();
    let rows = [
        (FormField::ApId.label(), client.ap_id.clone()),
        (FormField::Name.label(), client.name.clone()),
        (FormField::Surname.label(), client.surname.clone()),
        (FormField::Gender.label(), client.gender.clone()),
    ];

    rsx! {
        div {
            class: "bg-white shadow rounded-lg p-6",
            h2 {
                class: "text-2xl font-bold text-gray-900 mb-4",
                "{full_name}"
            }
            dl {
                class: "grid grid-cols-2 gap-4 text-sm",
                for (label, value) in rows {
                    dt { class: "font-medium text-gray-500", "{label}" }
                    dd { class: "text-gray-900", "{value}" }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AlertKind {
    Error,
    Success,
}

#[component]
fn Alert(kind: AlertKind, message: String) -> Element {
    let class = match kind {
        AlertKind::Error => "p-3 rounded-md text-sm bg-red-50 text-red-700 border border-red-200",
        AlertKind::Success => {
            "p-3 rounded-md text-sm bg-green-50 text-green-700 border border-green-200"
        }
    };

    rsx! {
        div { class: "{class}", "{message}" }
    }
}

#![allow(non_snake_case)]

use dioxus::prelude::*;
use std::sync::Arc;

mod api;
mod client_ui;
mod config;
mod data;
mod directory;
mod session;

use api::HttpClientBackend;
use client_ui::{BackendHandle, ClientDetailView, ClientManagementScreen};
use config::AppConfig;
use directory::ClientDirectory;

#[derive(Debug, Clone, PartialEq)]
enum AppView {
    Clients,
    ClientDetail { id: String },
}

impl AppView {
    fn path(&self) -> String {
        match self {
            AppView::Clients => "/clients".to_string(),
            AppView::ClientDetail { id } => format!("/client/{}", id),
        }
    }
}

fn main() {
    dioxus_logger::init(tracing::Level::INFO).expect("failed to init logger");

    LaunchBuilder::desktop()
        .with_cfg(dioxus::desktop::Config::new().with_window(
            dioxus::desktop::WindowBuilder::new().with_title("Client Management"),
        ))
        .launch(App);
}

fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

fn App() -> Element {
    let config = use_hook(load_config);
    let backend = use_hook(|| {
        HttpClientBackend::from_config(&config)
            .map(|backend| BackendHandle(Arc::new(backend)))
            .map_err(|e| e.to_string())
    });
    let directory = use_signal(|| ClientDirectory::new(config.rows_per_page));
    let mut view = use_signal(|| AppView::Clients);

    let backend = match backend {
        Ok(backend) => backend,
        Err(message) => {
            log::error!("Cannot reach the client API: {}", message);
            return rsx! {
                div {
                    class: "min-h-screen bg-gray-100 flex items-center justify-center",
                    div {
                        class: "bg-white shadow rounded-lg p-6 max-w-lg text-sm text-red-700",
                        "Invalid API configuration: {message}"
                    }
                }
            };
        }
    };

    let mut navigate = move |next: AppView| {
        log::info!("Navigating to {}", next.path());
        view.set(next);
    };

    rsx! {
        match view() {
            AppView::Clients => rsx! {
                ClientManagementScreen {
                    directory,
                    backend,
                    on_client_selected: move |id: String| navigate(AppView::ClientDetail { id }),
                }
            },
            AppView::ClientDetail { id } => rsx! {
                ClientDetailView {
                    client_id: id,
                    directory,
                    on_back: move |_| navigate(AppView::Clients),
                }
            },
        }
    }
}

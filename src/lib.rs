//! Library exports for reuse in benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Persistent TOML settings.
pub mod config;
/// Tracing setup.
pub mod logging;
pub(crate) mod http_client;
/// REST records shared by every page.
pub mod model;
/// Blocking client for the DATAHUB API.
pub mod api;
/// Search, filter, sort and paging over loaded records.
pub mod list_view;
/// Bucketed drag-and-drop assignment.
pub mod buckets;
/// Experiment variants and traffic split.
pub mod traffic;
/// Form drafts and validation.
pub mod forms;
/// Insight authoring steps.
pub mod insight_wizard;
/// CSV export.
pub mod export;
/// Display formatting helpers.
pub mod format;
/// Client-side routes and history.
pub mod routes;
/// Shared egui UI modules.
pub mod egui_app;

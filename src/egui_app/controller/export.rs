use std::path::{Path, PathBuf};

use rfd::FileDialog;

use super::*;
use crate::app_dirs;
use crate::buckets::Selection;
use crate::export::{self, ExportError, ExportRecord, column_board};
use crate::format::today;
use crate::list_view::Listable;
use crate::model::{Metric, Segment};

impl EguiController {
    pub fn open_export(&mut self, target: ExportTarget) {
        let columns = match target {
            ExportTarget::Metrics => column_board::<Metric>(),
            ExportTarget::Segments => column_board::<Segment>(),
        };
        self.ui.export = Some(ExportModal {
            target,
            columns,
            error: None,
        });
    }

    pub fn close_export(&mut self) {
        self.ui.export = None;
    }

    /// Add a column (or move it last when already chosen) or drop it with `selected = false`.
    pub fn drop_export_column(&mut self, key: &'static str, selected: bool) {
        let Some(modal) = self.ui.export.as_mut() else {
            return;
        };
        modal.error = None;
        if selected {
            if let Err(err) = modal.columns.place(key, Selection::Selected) {
                modal.error = Some(err.to_string());
            }
        } else {
            modal.columns.unplace(&key);
        }
    }

    /// Ask for a destination and write the rows currently matching the list view.
    pub fn run_export(&mut self) {
        let Some(modal) = self.ui.export.as_ref() else {
            return;
        };
        if modal.columns.selected().is_empty() {
            self.fail_export(ExportError::NoColumns.to_string());
            return;
        }
        let name = export::export_file_name(modal.target.file_stem(), today());
        let mut dialog = FileDialog::new().set_file_name(&name);
        match app_dirs::exports_dir() {
            Ok(dir) => dialog = dialog.set_directory(dir),
            Err(err) => tracing::warn!("No default export folder: {err}"),
        }
        let Some(path) = dialog
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        self.export_to(&path);
    }

    /// Write the export without a dialog.
    pub fn export_to(&mut self, path: &Path) {
        let Some(modal) = self.ui.export.as_ref() else {
            return;
        };
        let columns = modal.columns.selected().to_vec();
        let result = match modal.target {
            ExportTarget::Metrics => write_matching(
                path,
                &self.ui.metrics.list.records,
                &self.ui.metrics.list.query.matching(&self.ui.metrics.list.records),
                &columns,
            ),
            ExportTarget::Segments => write_matching(
                path,
                &self.ui.segments.list.records,
                &self.ui.segments.list.query.matching(&self.ui.segments.list.records),
                &columns,
            ),
        };
        match result {
            Ok(rows) => {
                self.ui.export = None;
                self.ui.last_export = Some(path.to_path_buf());
                self.set_status(
                    format!("Exported {rows} rows to {}", path.display()),
                    StatusTone::Info,
                );
            }
            Err(err) => {
                tracing::warn!("CSV export failed: {err}");
                self.fail_export(err.to_string());
            }
        }
    }

    fn fail_export(&mut self, message: String) {
        self.set_status(message.clone(), StatusTone::Error);
        if let Some(modal) = self.ui.export.as_mut() {
            modal.error = Some(message);
        }
    }

    /// Open the last exported file with the system handler.
    pub fn open_last_export(&mut self) {
        let Some(path) = self.ui.last_export.clone() else {
            return;
        };
        if let Err(err) = open::that(&path) {
            self.set_status(
                format!("Could not open {}: {err}", path.display()),
                StatusTone::Error,
            );
        }
    }

    pub fn last_export(&self) -> Option<&PathBuf> {
        self.ui.last_export.as_ref()
    }
}

fn write_matching<R: ExportRecord + Listable + Clone>(
    path: &Path,
    records: &[R],
    rows: &[usize],
    columns: &[&'static str],
) -> Result<usize, ExportError> {
    let selected: Vec<R> = rows
        .iter()
        .filter_map(|index| records.get(*index).cloned())
        .collect();
    export::save_csv(path, &selected, columns)?;
    Ok(selected.len())
}

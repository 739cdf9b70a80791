use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::LoadError;
use crate::data::model::{DatasetKind, OccupationRecord};
use crate::export::{ExportFormat, ExportScope};
use crate::state::{Action, AppState, ExportRequest, Tab};
use crate::ui::plot;

const SELECTED_FILL: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar: view switcher and status line.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading("Occupation Automation Probability Dashboard");
        ui.separator();

        let mut tab = state.tab;
        ui.selectable_value(&mut tab, Tab::Search, "Search & Analyze");
        ui.selectable_value(&mut tab, Tab::Browse, "Browse All Occupations");
        if tab != state.tab {
            actions.push(Action::SetTab(tab));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg.as_str());
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – overview and full downloads
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    let Some(store) = &state.store else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.heading("Data Overview");
    ui.separator();
    ui.label(format!("Total Occupations: {}", store.cdf.len()));
    if let Some((first, last)) = store.cdf.year_span() {
        ui.label(format!("Time Range: {first}-{last}"));
    }
    ui.small(format!("CDF: {}", store.cdf_source));
    ui.small(format!("PDF: {}", store.pdf_source));

    ui.add_space(8.0);
    ui.heading("Download Full Datasets");
    ui.separator();
    for kind in [DatasetKind::Cdf, DatasetKind::Pdf] {
        export_buttons(ui, kind, ExportScope::Full, actions);
    }
}

/// A CSV and a spreadsheet button for one table.
fn export_buttons(ui: &mut Ui, kind: DatasetKind, scope: ExportScope, actions: &mut Vec<Action>) {
    let prefix = match scope {
        ExportScope::Full => "",
        ExportScope::Selected => "Selected ",
    };
    ui.horizontal(|ui: &mut Ui| {
        for (format, label) in [
            (ExportFormat::Csv, "CSV"),
            (ExportFormat::Spreadsheet, "Excel"),
        ] {
            if ui.button(format!("{prefix}{kind} {label}")).clicked() {
                actions.push(Action::Export(ExportRequest {
                    kind,
                    scope,
                    format,
                }));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Load failure diagnostic
// ---------------------------------------------------------------------------

/// Shown instead of the dashboard when startup loading failed.
pub fn load_error_panel(ui: &mut Ui, error: &LoadError) {
    ui.heading(RichText::new("Could not load the probability data").color(Color32::RED));
    ui.separator();
    ui.label(RichText::new(error.to_string()).strong());
    ui.add_space(8.0);

    match error {
        LoadError::NotFound {
            kind,
            tried,
            found,
            searched,
        } => {
            ui.label(format!("Candidate names tried for the {kind} file:"));
            for name in tried {
                ui.monospace(format!("  {name}"));
            }
            ui.add_space(4.0);
            if found.is_empty() {
                ui.label(format!("No spreadsheet files found in {}.", searched.display()));
            } else {
                ui.label(format!("Spreadsheet files found in {}:", searched.display()));
                for name in found {
                    ui.monospace(format!("  {name}"));
                }
            }
            ui.add_space(8.0);
            ui.label("Please check:");
            ui.label("1. File names are exactly correct");
            ui.label("2. Files are in the data directory (or set cdfPath / pdfPath)");
            ui.label("3. Files are not corrupted");
        }
        LoadError::Unreadable { .. } => {
            ui.label("Possible solutions:");
            ui.label("1. Make sure the files are not open in another program");
            ui.label("2. Check if files are corrupted");
            ui.label("3. Verify file permissions");
        }
        LoadError::SchemaMismatch { row, .. } => {
            if let Some(row) = row {
                ui.label(format!("Problem found at data row {row}."));
            }
            ui.label("Expected column 0 = SOC code, column 1 = title, then one numeric column per year.");
        }
    }
}

// ---------------------------------------------------------------------------
// Search & analyze tab
// ---------------------------------------------------------------------------

pub fn search_tab(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    let Some(store) = &state.store else {
        return;
    };

    ui.heading("Search Occupations");
    let mut term = state.session.search_term.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut term)
            .hint_text("e.g., 'Chief Executive', '11-1011', 'Software Developer'...")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        actions.push(Action::Search(term));
    }

    if !state.session.search_term.is_empty() {
        if state.search_hits.is_empty() {
            ui.colored_label(
                Color32::from_rgb(0xff, 0x7f, 0x0e),
                "No occupations found matching your search term.",
            );
        } else {
            ui.label(format!(
                "Found {} matching occupation(s)",
                state.search_hits.len()
            ));
            ScrollArea::vertical()
                .id_salt("search_results")
                .max_height(260.0)
                .show(ui, |ui: &mut Ui| {
                    for &idx in &state.search_hits {
                        record_card(ui, state, &store.cdf.rows[idx].record, actions);
                    }
                });
        }
    }

    if state.session.selection.is_empty() {
        return;
    }

    ui.add_space(12.0);
    ui.heading("Selected Occupations Analysis");
    selection_summary(ui, state, actions);

    let series = state.projection();
    ui.add_space(8.0);
    plot::probability_plot(ui, DatasetKind::Cdf, &series, &state.palette);
    ui.add_space(8.0);
    plot::probability_plot(ui, DatasetKind::Pdf, &series, &state.palette);

    ui.add_space(8.0);
    ui.strong("Export Selected Occupations Data");
    ui.horizontal(|ui: &mut Ui| {
        for kind in [DatasetKind::Cdf, DatasetKind::Pdf] {
            export_buttons(ui, kind, ExportScope::Selected, actions);
        }
    });

    ui.add_space(8.0);
    if ui.button("Clear All Selections").clicked() {
        actions.push(Action::Clear);
    }
}

/// Numbered list of the selection with per-item remove.
fn selection_summary(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    let stale = state.stale_titles();
    for (i, occ) in state.session.selection.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let swatch = RichText::new("■").color(state.palette.color_for(i));
            ui.label(swatch);
            ui.label(format!("{}. {} ({})", i + 1, occ.title, occ.code));
            if stale.contains(&occ.title) {
                ui.colored_label(Color32::YELLOW, "not in dataset")
                    .on_hover_text("This title is missing from the loaded CDF table");
            }
            if ui
                .small_button("❌")
                .on_hover_text("Remove from selection")
                .clicked()
            {
                actions.push(Action::Remove(occ.title.clone()));
            }
        });
    }
}

/// One search result / browse row: identifiers plus an add or remove button.
fn record_card(ui: &mut Ui, state: &AppState, record: &OccupationRecord, actions: &mut Vec<Action>) {
    let selected = state.session.selection.is_selected(&record.title);
    let mut frame = egui::Frame::group(ui.style());
    if selected {
        frame = frame.stroke(egui::Stroke::new(1.5, SELECTED_FILL));
    }
    frame.show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(format!("SOC Code: {}", record.code)).strong());
                ui.label(format!("Title: {}", record.title));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                toggle_button(ui, selected, record, actions);
            });
        });
    });
}

fn toggle_button(ui: &mut Ui, selected: bool, record: &OccupationRecord, actions: &mut Vec<Action>) {
    if selected {
        if ui.button("Remove").clicked() {
            actions.push(Action::Remove(record.title.clone()));
        }
    } else if ui.button("Add").clicked() {
        actions.push(Action::Add(record.clone()));
    }
}

// ---------------------------------------------------------------------------
// Browse tab
// ---------------------------------------------------------------------------

pub fn browse_tab(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    let Some(store) = &state.store else {
        return;
    };

    ui.heading("Browse All Occupations");
    let pages = state.page_count();
    if pages == 0 {
        ui.label("The dataset is empty.");
        return;
    }

    let mut page = state.session.page;
    egui::ComboBox::from_label("Select Page")
        .selected_text(format!("{}", page + 1))
        .show_ui(ui, |ui: &mut Ui| {
            for p in 0..pages {
                ui.selectable_value(&mut page, p, format!("{}", p + 1));
            }
        });
    if page != state.session.page {
        actions.push(Action::SetPage(page));
    }

    let range = state.page_range();
    ui.label(format!(
        "Showing occupations {}-{} of {}",
        range.start + 1,
        range.end,
        state.total_records()
    ));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .column(Column::auto().at_least(70.0))
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("SOC Code");
            });
            header.col(|ui| {
                ui.strong("Title");
            });
            header.col(|_ui| {});
        })
        .body(|mut body| {
            for row in &store.cdf.rows[range] {
                let record = &row.record;
                let selected = state.session.selection.is_selected(&record.title);
                body.row(26.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(record.code.as_str());
                    });
                    table_row.col(|ui| {
                        let text = RichText::new(&record.title);
                        ui.label(if selected { text.color(SELECTED_FILL) } else { text });
                    });
                    table_row.col(|ui| {
                        toggle_button(ui, selected, record, actions);
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

/// Serialize the requested table and ask where to save it.
pub fn export_with_dialog(state: &mut AppState, req: ExportRequest) {
    let exported = match state.export(req) {
        Ok(Some(exported)) => exported,
        Ok(None) => {
            state.status_message = Some("Nothing to export".to_string());
            return;
        }
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Export error: {e}"));
            return;
        }
    };

    let (filter_name, ext) = match req.format {
        ExportFormat::Csv => ("CSV", "csv"),
        ExportFormat::Spreadsheet => ("Excel workbook", "xlsx"),
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save export")
        .set_file_name(exported.filename.as_str())
        .add_filter(filter_name, &[ext])
        .save_file()
    else {
        return;
    };

    state.status_message = Some(match exported.save(&path) {
        Ok(()) => format!("Saved {}", path.display()),
        Err(e) => {
            log::error!("Writing {} failed: {e}", path.display());
            format!("Export error: {e}")
        }
    });
}

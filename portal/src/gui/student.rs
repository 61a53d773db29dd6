use super::app::Navigation;
use super::{Background, Event};
use crate::config::{MAX_SEMESTER, MIN_SEMESTER};
use crate::database::Branch;
use crate::services::photos;
use crate::views::{IntakePhase, StudentIntake};
use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;

/// Widget-only state for the intake form
#[derive(Default)]
pub struct FormBuffers {
    photo_path: String,
    pub encoding: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    intake: &mut StudentIntake,
    form: &mut FormBuffers,
    background: &Background,
    epoch: u64,
) -> Navigation {
    if intake.phase() == IntakePhase::Submitted {
        return render_submitted(ui);
    }

    let mut nav = Navigation::Stay;
    if ui.button("← Back to Home").clicked() {
        nav = Navigation::Back;
    }
    ui.add_space(12.0);
    ui.heading("Submit a Complaint");
    ui.separator();

    let mut draft = intake.draft().clone();

    ui.label(RichText::new("Student Name").strong());
    ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("Enter your full name"));
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new("Engineering Branch").strong());
            egui::ComboBox::from_id_source("branch")
                .selected_text(draft.branch.label())
                .width(360.0)
                .show_ui(ui, |ui| {
                    for branch in Branch::ALL {
                        ui.selectable_value(&mut draft.branch, branch, branch.label());
                    }
                });
        });
        ui.vertical(|ui| {
            ui.label(RichText::new("Semester").strong());
            egui::ComboBox::from_id_source("semester")
                .selected_text(format!("Semester {}", draft.semester))
                .show_ui(ui, |ui| {
                    for semester in MIN_SEMESTER..=MAX_SEMESTER {
                        ui.selectable_value(
                            &mut draft.semester,
                            semester,
                            format!("Semester {}", semester),
                        );
                    }
                });
        });
    });
    ui.add_space(8.0);

    ui.label(RichText::new("Complaint Description").strong());
    ui.add(
        egui::TextEdit::multiline(&mut draft.description)
            .desired_rows(5)
            .desired_width(f32::INFINITY)
            .hint_text("Describe your issue in detail..."),
    );
    ui.add_space(8.0);

    intake.set_name(draft.name);
    intake.set_branch(draft.branch);
    if let Err(e) = intake.set_semester(draft.semester) {
        tracing::warn!("{}", e);
    }
    intake.set_description(draft.description);

    render_photo_picker(ui, intake, form, background, epoch);
    ui.add_space(12.0);

    if let Some(error) = intake.error() {
        ui.colored_label(Color32::RED, error);
    }

    let submitting = intake.phase() == IntakePhase::Submitting;
    let label = if submitting { "Submitting..." } else { "Submit Complaint" };
    let clicked = ui
        .add_enabled(
            !submitting && !form.encoding,
            egui::Button::new(RichText::new(label).strong()).min_size(egui::vec2(240.0, 36.0)),
        )
        .clicked();

    if clicked {
        if let Ok(complaint) = intake.begin_submit() {
            let save = intake.persist(complaint);
            background.spawn(async move {
                Event::ComplaintSaved {
                    screen: epoch,
                    saved: save.await,
                }
            });
        }
    }

    nav
}

fn render_photo_picker(
    ui: &mut egui::Ui,
    intake: &mut StudentIntake,
    form: &mut FormBuffers,
    background: &Background,
    epoch: u64,
) {
    ui.label(RichText::new("Attach Photo (Optional)").strong());

    if let Some(data_url) = intake.draft().photo.as_deref() {
        let size = photos::decoded_len(data_url).unwrap_or(0);
        let preview = super::photo_image(ui.ctx(), egui::Id::new(("draft_photo", data_url)), data_url);
        let mut remove = false;
        ui.horizontal(|ui| {
            if let Some(image) = preview {
                ui.add(image.max_height(96.0).rounding(6.0));
            }
            ui.label(format!("Photo attached ({} KB)", size.div_ceil(1024)));
            if ui.button("Remove").clicked() {
                remove = true;
            }
        });
        if remove {
            intake.clear_photo();
        }
        return;
    }

    if form.encoding {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Reading photo...");
        });
        return;
    }

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut form.photo_path).hint_text("Path to an image file"));
        if ui.button("Attach").clicked() && !form.photo_path.trim().is_empty() {
            let path = PathBuf::from(form.photo_path.trim());
            form.encoding = true;
            background.spawn(async move {
                Event::PhotoEncoded {
                    screen: epoch,
                    encoded: photos::encode_photo_file(&path).await,
                }
            });
        }
    });
    ui.label(
        RichText::new("or drag and drop. PNG, JPG, GIF up to 2MB")
            .small()
            .color(Color32::GRAY),
    );
}

/// Take a file dropped onto the window as the draft photo
pub fn accept_dropped_files(
    ctx: &egui::Context,
    intake: &mut StudentIntake,
    form: &mut FormBuffers,
    background: &Background,
    epoch: u64,
) {
    if intake.phase() != IntakePhase::Editing {
        return;
    }
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };

    if let Some(bytes) = file.bytes {
        let name = file.name;
        form.encoding = true;
        background.spawn(async move {
            Event::PhotoEncoded {
                screen: epoch,
                encoded: photos::encode_photo_bytes(&name, &bytes),
            }
        });
    } else if let Some(path) = file.path {
        form.encoding = true;
        background.spawn(async move {
            Event::PhotoEncoded {
                screen: epoch,
                encoded: photos::encode_photo_file(&path).await,
            }
        });
    }
}

fn render_submitted(ui: &mut egui::Ui) -> Navigation {
    let mut nav = Navigation::Stay;
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(
            RichText::new("Complaint Submitted!")
                .size(30.0)
                .strong()
                .color(Color32::from_rgb(22, 163, 74)),
        );
        ui.add_space(12.0);
        ui.label(
            "Thank you for reaching out. Your complaint has been forwarded to the faculty dashboard.",
        );
        ui.add_space(24.0);
        if ui.button("Return to Home").clicked() {
            nav = Navigation::Back;
        }
    });
    nav
}

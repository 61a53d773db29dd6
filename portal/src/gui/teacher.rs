use super::app::Navigation;
use super::{Background, Event};
use crate::database::Complaint;
use crate::services::photos;
use crate::views::{AuthMode, Dashboard, TeacherPortal};
use eframe::egui::{self, Color32, RichText};

const TEAL: Color32 = Color32::from_rgb(13, 148, 136);
const SOLVE_GREEN: Color32 = Color32::from_rgb(22, 163, 74);

enum CardAction {
    Analyze(String),
    Solve(String),
}

pub fn render(ui: &mut egui::Ui, portal: &mut TeacherPortal, background: &Background) -> Navigation {
    if portal.is_authenticated() {
        render_dashboard(ui, portal, background);
        Navigation::Stay
    } else {
        render_auth(ui, portal, background)
    }
}

fn render_auth(ui: &mut egui::Ui, portal: &mut TeacherPortal, background: &Background) -> Navigation {
    let mut nav = Navigation::Stay;
    if ui.button("← Back").clicked() {
        nav = Navigation::Back;
    }

    let registering = portal.mode() == AuthMode::Register;
    let mut submit = false;
    let mut toggle = false;

    ui.vertical_centered(|ui| {
        ui.set_max_width(420.0);
        ui.add_space(40.0);
        let title = if registering { "Teacher Registration" } else { "Teacher Login" };
        ui.label(RichText::new(title).size(28.0).strong().color(TEAL));
        ui.label(RichText::new("Access the SeaCollege Faculty Dashboard").color(Color32::GRAY));
        ui.add_space(20.0);

        if registering {
            ui.label("Full Name");
            ui.text_edit_singleline(&mut portal.form.name);
        }
        ui.label("Email ID");
        ui.add(egui::TextEdit::singleline(&mut portal.form.email).hint_text("name@seacollege.edu"));
        ui.label("Password");
        let password = ui.add(egui::TextEdit::singleline(&mut portal.form.password).password(true));
        if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }

        if let Some(error) = portal.auth_error() {
            ui.add_space(8.0);
            ui.colored_label(Color32::RED, error);
        }

        ui.add_space(12.0);
        let label = if registering { "Register" } else { "Login" };
        if ui
            .add(egui::Button::new(RichText::new(label).strong()).min_size(egui::vec2(200.0, 32.0)))
            .clicked()
        {
            submit = true;
        }

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let (prompt, link) = if registering {
                ("Already registered?", "Login now")
            } else {
                ("First time here?", "Create an account")
            };
            ui.label(prompt);
            if ui.link(link).clicked() {
                toggle = true;
            }
        });
    });

    if toggle {
        portal.toggle_mode();
    } else if submit {
        if let Err(e) = background.block_on(portal.submit_auth()) {
            tracing::error!("Teacher authentication failed: {}", e);
            portal.set_auth_error(format!("Something went wrong: {}", e));
        }
    }

    nav
}

fn render_dashboard(ui: &mut egui::Ui, portal: &mut TeacherPortal, background: &Background) {
    let mut logout = false;
    let mut action = None;

    if let Some(dashboard) = portal.dashboard() {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new("Faculty Dashboard").size(22.0).strong());
                ui.label(
                    RichText::new(format!("Welcome, {}", dashboard.teacher().name))
                        .small()
                        .color(Color32::GRAY),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(RichText::new("Logout").color(Color32::RED)).clicked() {
                    logout = true;
                }
            });
        });
        ui.separator();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Pending Complaints").size(20.0).strong());
            ui.label(
                RichText::new(dashboard.pending().len().to_string())
                    .strong()
                    .color(TEAL),
            );
        });
        ui.add_space(8.0);

        if let Some(error) = dashboard.error() {
            ui.colored_label(Color32::RED, error);
            ui.add_space(8.0);
        }

        if dashboard.pending().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(RichText::new("No Pending Complaints").size(18.0).strong());
                ui.label("All caught up! Have a great day.");
            });
        }

        for complaint in dashboard.pending() {
            if let Some(picked) = render_card(ui, dashboard, complaint) {
                action = Some(picked);
            }
            ui.add_space(10.0);
        }
    }

    if logout {
        ui.ctx().data_mut(|d| d.remove::<egui::Id>(viewer_id()));
        portal.logout();
        return;
    }

    let Some(dashboard) = portal.dashboard_mut() else {
        return;
    };
    match action {
        Some(CardAction::Analyze(id)) => start_analysis(dashboard, &id, background),
        Some(CardAction::Solve(id)) => {
            // Failure is kept on the dashboard and drawn above the list
            let _ = background.block_on(dashboard.mark_solved(&id));
        }
        None => {}
    }
}

fn start_analysis(dashboard: &mut Dashboard, id: &str, background: &Background) {
    let Some(complaint) = dashboard.begin_analysis(id) else {
        return;
    };
    let session = dashboard.session();
    let advisor = dashboard.advisor();
    let id = id.to_string();
    background.spawn(async move {
        let result = advisor.analyze(&complaint).await;
        Event::AnalysisDone {
            session,
            id,
            result,
        }
    });
}

fn render_card(ui: &mut egui::Ui, dashboard: &Dashboard, complaint: &Complaint) -> Option<CardAction> {
    let mut action = None;

    egui::Frame::group(ui.style())
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::vec2(14.0, 12.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&complaint.student_name).size(17.0).strong());
                    ui.label(
                        RichText::new(format!("{} • Sem {}", complaint.branch, complaint.semester))
                            .small()
                            .color(Color32::GRAY),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.label(
                        RichText::new(complaint.status.to_string().to_uppercase())
                            .small()
                            .strong()
                            .color(Color32::from_rgb(161, 98, 7)),
                    );
                });
            });
            ui.add_space(6.0);
            ui.add(egui::Label::new(&complaint.description).wrap(true));

            if let Some(data_url) = complaint.photo_data_url.as_deref() {
                ui.add_space(6.0);
                render_attachment(ui, &complaint.id, data_url);
            }

            if let Some(analysis) = dashboard.analysis(&complaint.id) {
                ui.add_space(6.0);
                egui::Frame::none()
                    .fill(Color32::from_rgb(238, 242, 255))
                    .rounding(egui::Rounding::same(6.0))
                    .inner_margin(egui::vec2(10.0, 8.0))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(format!("AI Analysis • Priority: {}", analysis.priority))
                                .strong()
                                .color(Color32::from_rgb(67, 56, 202)),
                        );
                        ui.label(RichText::new(&analysis.summary).color(Color32::DARK_GRAY));
                        ui.label(
                            RichText::new(format!("Advice: {}", analysis.advice))
                                .italics()
                                .color(Color32::DARK_GRAY),
                        );
                    });
            }

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let solve = egui::Button::new(RichText::new("✔ Mark as Solved").color(Color32::WHITE))
                    .fill(SOLVE_GREEN);
                if ui.add(solve).clicked() {
                    action = Some(CardAction::Solve(complaint.id.clone()));
                }

                if dashboard.analysis(&complaint.id).is_none() {
                    if dashboard.is_analyzing(&complaint.id) {
                        ui.spinner();
                        ui.label("Analyzing...");
                    } else if ui.button("Get AI Analysis").clicked() {
                        action = Some(CardAction::Analyze(complaint.id.clone()));
                    }
                }
            });
        });

    action
}

fn render_attachment(ui: &mut egui::Ui, complaint_id: &str, data_url: &str) {
    let size = photos::decoded_len(data_url).unwrap_or(0);
    ui.label(
        RichText::new(format!("ATTACHMENT ({} KB)", size.div_ceil(1024)))
            .small()
            .color(Color32::GRAY),
    );

    let photo_id = egui::Id::new(("complaint_photo", complaint_id));
    let Some(image) = super::photo_image(ui.ctx(), photo_id, data_url) else {
        ui.label(RichText::new("Photo could not be read").small().color(Color32::RED));
        return;
    };

    let thumbnail = ui
        .add(image.max_height(180.0).rounding(6.0).sense(egui::Sense::click()))
        .on_hover_text("Click to view full size");
    if thumbnail.clicked() {
        ui.ctx().data_mut(|d| d.insert_temp(viewer_id(), photo_id));
    }
}

fn viewer_id() -> egui::Id {
    egui::Id::new("photo_viewer")
}

/// Full-size view of a complaint photo opened from its card
pub fn render_photo_viewer(ctx: &egui::Context) {
    let Some(photo_id) = ctx.data_mut(|d| d.get_temp::<egui::Id>(viewer_id())) else {
        return;
    };
    let Some(image) = super::cached_photo_image(ctx, photo_id) else {
        ctx.data_mut(|d| d.remove::<egui::Id>(viewer_id()));
        return;
    };

    let mut open = true;
    egui::Window::new("Attachment")
        .open(&mut open)
        .collapsible(false)
        .default_size([720.0, 540.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add(image.shrink_to_fit());
        });

    if !open {
        ctx.data_mut(|d| d.remove::<egui::Id>(viewer_id()));
    }
}

/// Transient resolved-complaint notice in the top-right corner
pub fn render_toast(ctx: &egui::Context, message: &str) {
    egui::Area::new(egui::Id::new("resolved_toast"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 64.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(SOLVE_GREEN)
                .show(ui, |ui| {
                    ui.label(RichText::new(format!("✔ {}", message)).color(Color32::WHITE));
                });
        });
}

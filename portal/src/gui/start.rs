use super::app::Navigation;
use chrono::{Datelike, Local};
use eframe::egui::{self, Color32, RichText};

const STUDENT_BLUE: Color32 = Color32::from_rgb(37, 99, 235);
const TEACHER_TEAL: Color32 = Color32::from_rgb(13, 148, 136);

pub fn render(ui: &mut egui::Ui) -> Navigation {
    let mut nav = Navigation::Stay;

    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(
            RichText::new("SeaCollege Voice")
                .size(40.0)
                .strong()
                .color(STUDENT_BLUE),
        );
        ui.add_space(8.0);
        ui.label(
            "A seamless bridge between students and faculty. \
             Report issues, track resolutions, and improve our campus together.",
        );
        ui.add_space(40.0);

        if role_button(ui, "Student", "Submit complaints and feedback instantly.", STUDENT_BLUE) {
            nav = Navigation::Student;
        }
        ui.add_space(16.0);
        if role_button(ui, "Teacher", "Review submissions and resolve issues.", TEACHER_TEAL) {
            nav = Navigation::Teacher;
        }
    });

    nav
}

fn role_button(ui: &mut egui::Ui, title: &str, blurb: &str, color: Color32) -> bool {
    let text = RichText::new(format!("{}\n{}", title, blurb)).size(18.0).color(color);
    ui.add_sized([320.0, 80.0], egui::Button::new(text)).clicked()
}

pub fn render_footer(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!(
                "© {} SeaCollege • Campus Complaint Portal",
                Local::now().year()
            ))
            .small()
            .color(Color32::GRAY),
        );
    });
}

use super::{start, student, teacher, Background, Event};
use crate::app::AppState;
use crate::views::{RootView, Screen};
use eframe::egui::{self, CentralPanel, Context, TopBottomPanel};
use eframe::App;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// What a screen asks the root switcher to do after drawing
pub enum Navigation {
    Stay,
    Student,
    Teacher,
    Back,
}

pub struct PortalApp {
    root: RootView,
    background: Background,
    events: Receiver<Event>,
    /// Bumped on every navigation; background results carry the value
    /// current when they were started
    screen_epoch: u64,
    student_form: student::FormBuffers,
    alert: Option<String>,
}

impl PortalApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Handle, state: AppState) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let (tx, rx) = mpsc::channel();
        Self {
            root: RootView::new(state),
            background: Background::new(runtime, tx, cc.egui_ctx.clone()),
            events: rx,
            screen_epoch: 0,
            student_form: student::FormBuffers::default(),
            alert: None,
        }
    }

    fn navigate(&mut self, nav: Navigation) {
        match nav {
            Navigation::Stay => return,
            Navigation::Student => self.root.open_student(),
            Navigation::Teacher => self.root.open_teacher(),
            Navigation::Back => self.root.back(),
        }
        self.screen_epoch += 1;
        self.student_form = student::FormBuffers::default();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match (event, self.root.screen_mut()) {
                (Event::PhotoEncoded { screen, encoded }, Screen::Student(intake))
                    if screen == self.screen_epoch =>
                {
                    intake.attach_photo(encoded);
                    self.student_form.encoding = false;
                }
                (Event::ComplaintSaved { screen, saved }, Screen::Student(intake))
                    if screen == self.screen_epoch =>
                {
                    intake.finish_submit(saved);
                }
                (Event::AnalysisDone { session, id, result }, Screen::Teacher(portal)) => {
                    match portal.dashboard_mut() {
                        Some(dashboard) if dashboard.session() == session => {
                            dashboard.finish_analysis(&id, result);
                        }
                        _ => tracing::debug!("Discarding analysis for closed session"),
                    }
                }
                _ => tracing::debug!("Discarding result for a screen that is gone"),
            }
        }
    }

    fn render_alert(&mut self, ctx: &Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        egui::Window::new("Attention")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

impl App for PortalApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        if let Screen::Teacher(portal) = self.root.screen_mut() {
            if let Some(dashboard) = portal.dashboard_mut() {
                let now = Instant::now();
                dashboard.dismiss_expired(now);
                if let Some(left) = dashboard.notification_remaining(now) {
                    ctx.request_repaint_after(left + Duration::from_millis(10));
                }
            }
        }

        if self.root.is_start() {
            TopBottomPanel::bottom("footer").show(ctx, start::render_footer);
        }

        let mut nav = Navigation::Stay;
        let epoch = self.screen_epoch;
        CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.root.screen_mut() {
                Screen::Start => nav = start::render(ui),
                Screen::Student(intake) => {
                    nav = student::render(
                        ui,
                        intake,
                        &mut self.student_form,
                        &self.background,
                        epoch,
                    );
                    if let Some(alert) = intake.take_alert() {
                        self.alert = Some(alert);
                    }
                }
                Screen::Teacher(portal) => {
                    nav = teacher::render(ui, portal, &self.background);
                }
            });
        });

        if let Screen::Student(intake) = self.root.screen_mut() {
            student::accept_dropped_files(ctx, intake, &mut self.student_form, &self.background, epoch);
        }

        if let Screen::Teacher(portal) = self.root.screen() {
            if let Some(dashboard) = portal.dashboard() {
                if let Some(note) = dashboard.notification() {
                    teacher::render_toast(ctx, &note.message);
                }
                teacher::render_photo_viewer(ctx);
            }
        }

        self.render_alert(ctx);
        self.navigate(nav);
    }
}

//! Native window
//!
//! egui rendering of the screen state machines in `views`. Slow work (photo
//! encoding, the delayed complaint save, AI analysis) runs on the tokio
//! runtime and reports back through [`Event`]s drained once per frame.

mod app;
mod start;
mod student;
mod teacher;

pub use app::PortalApp;

use crate::app::AppState;
use crate::error::Result;
use crate::services::{photos, AnalysisResult};
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Results of background work, tagged with the screen or session they
/// belong to so late arrivals for a torn-down screen are discarded
pub enum Event {
    PhotoEncoded { screen: u64, encoded: Result<String> },
    ComplaintSaved { screen: u64, saved: Result<()> },
    AnalysisDone {
        session: Uuid,
        id: String,
        result: Option<AnalysisResult>,
    },
}

/// Bridge from the UI thread to the runtime
#[derive(Clone)]
pub struct Background {
    runtime: Handle,
    events: Sender<Event>,
    ctx: egui::Context,
}

impl Background {
    pub fn new(runtime: Handle, events: Sender<Event>, ctx: egui::Context) -> Self {
        Self {
            runtime,
            events,
            ctx,
        }
    }

    /// Run a short store operation to completion on the UI thread
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run `future` on the runtime and post its event when done
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let events = self.events.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = future.await;
            if events.send(event).is_err() {
                tracing::debug!("Window closed before background work finished");
            }
            ctx.request_repaint();
        });
    }
}

/// Photo bytes registered with the image loaders under `uri`
#[derive(Clone)]
struct DecodedPhoto {
    uri: String,
    bytes: Arc<[u8]>,
}

fn photo_cache_id(id: egui::Id) -> egui::Id {
    id.with("decoded_photo")
}

/// Image widget for a photo `data:` URL.
///
/// The payload is decoded once per `id` and kept in egui's temp storage, so
/// `id` must change whenever the URL does.
pub fn photo_image(ctx: &egui::Context, id: egui::Id, data_url: &str) -> Option<egui::Image<'static>> {
    let cache_id = photo_cache_id(id);
    let cached = ctx.data_mut(|d| d.get_temp::<Option<DecodedPhoto>>(cache_id));
    let photo = match cached {
        Some(photo) => photo,
        None => {
            let decoded = photos::decode_data_url(data_url).map(|(mime, bytes)| DecodedPhoto {
                uri: format!("bytes://photo-{}.{}", id.value(), photos::extension_for(mime)),
                bytes: bytes.into(),
            });
            ctx.data_mut(|d| d.insert_temp(cache_id, decoded.clone()));
            decoded
        }
    };
    photo.map(|p| egui::Image::from_bytes(p.uri, p.bytes))
}

/// Image for a photo already decoded by [`photo_image`]
pub fn cached_photo_image(ctx: &egui::Context, id: egui::Id) -> Option<egui::Image<'static>> {
    ctx.data_mut(|d| d.get_temp::<Option<DecodedPhoto>>(photo_cache_id(id)))
        .flatten()
        .map(|p| egui::Image::from_bytes(p.uri, p.bytes))
}

/// Open the main window and block until it is closed
pub fn launch_gui(runtime: Handle, state: AppState) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SeaCollege Voice")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SeaCollege Voice",
        native_options,
        Box::new(move |cc| Box::new(PortalApp::new(cc, runtime, state))),
    )
}

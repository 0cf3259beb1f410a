// main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod canvas3d;
mod capture;
mod catalog;
mod json_loader;
mod pose;
mod remote;
mod score;
mod sequence;
mod session;
mod skeleton;
mod timer;
mod ui_canvas;
mod ui_panels;
mod video;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1360.0, 860.0])
            .with_min_inner_size([1100.0, 680.0])
            .with_title("DanceMirror"),
        centered: true,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "DanceMirror",
        options,
        Box::new(|cc| Ok(Box::new(app::DanceMirrorApp::new(cc)))),
    )
}

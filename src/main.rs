// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Inkmark - Main Entry Point
//!
//! A small rich-text markup editor: select text, toggle bold/italic/underline
//! or set a size and color, and the tags are written into the buffer.

mod app;
mod config;
mod document;
mod editor;
mod error;
mod export;
mod markup;
mod preview;
mod state;
mod string_utils;
mod theme;
mod ui;

use app::InkmarkApp;
use config::load_config;
use log::info;

const APP_NAME: &str = "Inkmark";

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([480.0, 320.0]);

    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }
    if window_size.maximized {
        viewport = viewport.with_maximized(true);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(InkmarkApp::new(cc)))),
    )
}

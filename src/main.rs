// GUI-subsystem binary: no console window is allocated on Windows.
#![windows_subsystem = "windows"]

use clap::Parser;
use colouringpad::app::ColouringPadApp;
use colouringpad::cli::CliArgs;
use colouringpad::logger;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let args = CliArgs::parse();
    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ColouringPad: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Colouring Pad"),
        ..Default::default()
    };

    let startup_file = args.file;
    eframe::run_native(
        "Colouring Pad",
        options,
        Box::new(move |cc| Box::new(ColouringPadApp::new(cc, config, startup_file))),
    )
}

use std::path::PathBuf;

use clap::Parser;

use causal_scope::app::ScopeApp;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the extracted graph payload (JSON with nodes, edges and
    /// concept groups).
    #[arg(long)]
    input: PathBuf,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "causal-scope",
        options,
        Box::new(move |cc| Ok(Box::new(ScopeApp::new(cc, args.input.clone())))),
    )
}

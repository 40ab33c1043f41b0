// src/main.rs
//
// Atelier de formules — point d'entrée natif
// ------------------------------------------
// But:
// - initialiser la journalisation (RUST_LOG=debug affiche jetons/RPN/arbre
//   à chaque compilation)
// - lancer l'UI eframe (AppFormule)
//
// Structure projet:
// - `impl eframe::App for AppFormule` vit dans src/app.rs
// - le noyau (tokenisation, RPN, arbre, formule) vit dans src/noyau/

use eframe::egui;

mod app;
mod noyau;

use app::AppFormule;

/// Titre de la fenêtre.
const TITRE_APP: &str = "Atelier de formules";

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 740.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppFormule>::default())),
    )
}

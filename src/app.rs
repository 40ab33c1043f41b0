// src/app.rs
//
// Atelier de formules — module App (racine)
// -----------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppFormule (pour main.rs: use crate::app::AppFormule;)
// - Fournir l'impl eframe::App
//
// Important:
// - La gestion d'Enter est faite dans vue.rs (au bon endroit: quand le champ
//   a le focus). Ici, on évite d'appeler des méthodes privées de vue.rs.

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppFormule;`
pub use etat::AppFormule;

use eframe::egui;

impl eframe::App for AppFormule {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Raccourci clavier global minimal :
        // ESC = effacer seulement l'entrée (comme bouton "C").
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree(); // méthode publique de etat.rs
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui); // méthode publique (dans vue.rs)
        });
    }
}

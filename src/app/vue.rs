// src/app/vue.rs
//
// Vue (UI egui) — natif
// ---------------------
// Objectifs :
// - Entrée de formule + Enter pour compiler et évaluer
// - Un champ numérique par paramètre référencé (x0, x1, ...)
// - Boutons : opérateurs, fonctions, paramètres, pavé numérique, C/CLR/AC
// - Panneau "Démarche" : jetons, RPN, arbre (chaîne entièrement parenthésée)
//
// La compilation n'a lieu que si la source a changé : une formule compilée
// se ré-évalue directement quand seules les valeurs des paramètres bougent.

use eframe::egui;

use super::etat::{AppFormule, Demarche};

impl AppFormule {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Atelier de formules");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_parametres(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Formule :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x^2 + 7 - sin(x3), (3+8)^x0, 1+1--2+8")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter compile + évalue (seulement si le champ est focus)
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.evaluer_via_noyau();
            self.focus_entree = true;
        }

        ui.add_space(6.0);

        // Actions
        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l'entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultat + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            let compiler = ui.add_sized([92.0, 30.0], egui::Button::new("Compiler"));
            if compiler.clicked() {
                self.compiler_via_noyau();
                self.focus_entree = true;
            }

            let eq = ui.add_sized([64.0, 30.0], egui::Button::new("="));
            if eq.clicked() {
                self.evaluer_via_noyau();
                self.focus_entree = true;
            }
        });

        ui.add_space(8.0);

        // Touches rapides : opérateurs + fonctions + paramètres
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "*", "*", InsertKind::Op);
            self.bouton_insert(ui, "/", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "exp", "exp(", InsertKind::Func);
            self.bouton_insert(ui, "log", "log(", InsertKind::Func);
            self.bouton_insert(ui, "sqrt", "sqrt(", InsertKind::Func);

            ui.separator();

            self.bouton_insert(ui, "x0", "x0", InsertKind::Word);
            self.bouton_insert(ui, "x1", "x1", InsertKind::Word);
            self.bouton_insert(ui, "x2", "x2", InsertKind::Word);
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique_formule")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7", InsertKind::Digit);
                self.bouton_insert(ui, "8", "8", InsertKind::Digit);
                self.bouton_insert(ui, "9", "9", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.end_row();

                self.bouton_insert(ui, "4", "4", InsertKind::Digit);
                self.bouton_insert(ui, "5", "5", InsertKind::Digit);
                self.bouton_insert(ui, "6", "6", InsertKind::Digit);
                self.bouton_insert(ui, "/", "/", InsertKind::Op);
                ui.end_row();

                self.bouton_insert(ui, "1", "1", InsertKind::Digit);
                self.bouton_insert(ui, "2", "2", InsertKind::Digit);
                self.bouton_insert(ui, "3", "3", InsertKind::Digit);
                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                ui.end_row();

                self.bouton_insert(ui, "0", "0", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace "intelligent" : retire d'un coup les motifs utiles
    /// ("sin(", "sqrt(", "x0", etc.).
    fn backspace_entree(&mut self) {
        if self.entree.is_empty() {
            return;
        }

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in ["sqrt(", "sin(", "cos(", "exp(", "log(", "x0", "x1", "x2"] {
            if self.entree.ends_with(pat) {
                for _ in 0..pat.chars().count() {
                    self.entree.pop();
                }
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_parametres(&mut self, ui: &mut egui::Ui) {
        ui.label("Paramètres :");

        if self.parametres.is_empty() {
            ui.monospace("aucun (compilez une formule contenant x0, x1, ...)");
            return;
        }

        egui::Grid::new("grille_parametres")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for (index, valeur) in &mut self.parametres {
                    ui.monospace(format!("x{index} ="));
                    ui.add(
                        egui::DragValue::new(valeur)
                            .speed(0.1)
                            .max_decimals(6),
                    );
                    ui.end_row();
                }
            });
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        if self.resultat_dispo {
            Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);
        } else {
            ui.monospace("indisponible");
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &self.demarche.arbre);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule "stable", sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func => {
                if !self.entree.is_empty() {
                    let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c.is_ascii_alphabetic() || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d'espaces auto
                self.entree.push_str(to_insert);
            }
            InsertKind::Word => {
                // mots (paramètres): espace si juste avant c'est un chiffre ou ')'
                if !self.entree.is_empty() && !self.entree.ends_with(char::is_whitespace) {
                    let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /// Compile l'entrée si elle diffère de la source déjà compilée, puis
    /// resynchronise les champs de paramètres. Dépose l'erreur éventuelle.
    fn compiler_via_noyau(&mut self) -> bool {
        let source = self.entree.trim();
        if source.is_empty() {
            self.set_erreur("Entrée vide");
            return false;
        }

        // compile-once : rien à faire si la source n'a pas changé
        if self.formule.est_compilee() && self.formule.source() == source {
            return true;
        }

        match self.formule.compiler_source(source) {
            Ok(()) => {
                self.sync_parametres();
                self.erreur.clear();
                self.rafraichir_demarche();
                true
            }
            Err(e) => {
                self.set_erreur(e.to_string());
                false
            }
        }
    }

    /// Compile au besoin puis évalue avec les liaisons courantes.
    fn evaluer_via_noyau(&mut self) {
        if !self.compiler_via_noyau() {
            return;
        }

        match self.formule.evaluer(&self.table_valeurs()) {
            Ok(valeur) => {
                self.set_resultat(valeur);
                self.rafraichir_demarche();
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
    }

    fn rafraichir_demarche(&mut self) {
        let d = self.formule.demarche();
        self.demarche = Demarche {
            jetons: d.jetons.clone(),
            rpn: d.rpn.clone(),
            arbre: match self.formule.arbre() {
                Some(arbre) => format!("{arbre}"),
                None => String::new(),
            },
        };
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
}

//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l'état de l'atelier de formules (entrée, formule compilée,
//! liaisons de paramètres, résultat, erreur, démarche) et offrir des
//! opérations simples (C/CLR/AC, synchronisation des paramètres) sans logique
//! d'affichage.
//!
//! Contrats :
//! - Aucun parsing ici : la vue appelle le noyau et dépose les résultats.
//! - La formule compilée est conservée d'une frame à l'autre : on compile une
//!   fois, on évalue autant de fois qu'on veut en changeant les liaisons.

use std::collections::BTreeMap;

use crate::noyau::Formule;

#[derive(Clone, Default, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
}

#[derive(Clone, Debug)]
pub struct AppFormule {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- formule compilée (compile-once / evaluate-many) ---
    pub formule: Formule,

    // --- liaisons de paramètres éditables (index, valeur), triées par index ---
    pub parametres: Vec<(u32, f64)>,

    // --- sorties ---
    pub resultat: String,      // dernier résultat d'évaluation
    pub erreur: String,        // message d'erreur (compilation ou évaluation)
    pub resultat_dispo: bool,  // false si rien d'évalué / erreur

    // --- démarche (panneau d'explication) ---
    pub demarche: Demarche,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l'entrée après un clic bouton.
    pub focus_entree: bool,
}

impl Default for AppFormule {
    fn default() -> Self {
        Self {
            entree: String::new(),
            formule: Formule::vide(),
            parametres: Vec::new(),
            resultat: String::new(),
            erreur: String::new(),
            resultat_dispo: false,
            demarche: Demarche::default(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppFormule {
    /* ------------------------ Actions "boutons" (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + formule + paramètres + résultats).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.formule.vider();
        self.parametres.clear();
        self.clear_resultats();
        self.focus_entree = true;
    }

    /// C : effacer seulement l'entrée (la formule compilée reste utilisable).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur + démarche (sans toucher à l'entrée
    /// ni à la formule compilée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.erreur.clear();
        self.resultat_dispo = false;
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    /// Utilitaire : placer une erreur.
    ///
    /// Choix UX : on coupe résultat + démarche (non fiables après un échec),
    /// l'entrée reste telle quelle pour correction.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.resultat.clear();
        self.resultat_dispo = false;
        self.demarche = Demarche::default();
        self.focus_entree = true;
    }

    /// Utilitaire : déposer un résultat d'évaluation.
    pub fn set_resultat(&mut self, valeur: f64) {
        self.erreur.clear();
        self.resultat = format!("{valeur}");
        self.resultat_dispo = true;
        self.focus_entree = true;
    }

    /// Resynchronise les liaisons éditables sur le prototype de la formule
    /// compilée : les index disparus sont retirés, les nouveaux arrivent à
    /// 0.0, les valeurs déjà saisies pour un index conservé sont GARDÉES.
    pub fn sync_parametres(&mut self) {
        let anciennes: BTreeMap<u32, f64> = self.parametres.iter().copied().collect();
        self.parametres = self
            .formule
            .prototype_parametres()
            .into_iter()
            .map(|(index, defaut)| (index, *anciennes.get(&index).unwrap_or(&defaut)))
            .collect();
    }

    /// Table (index -> valeur) telle qu'attendue par `Formule::evaluer`.
    pub fn table_valeurs(&self) -> BTreeMap<u32, f64> {
        self.parametres.iter().copied().collect()
    }
}

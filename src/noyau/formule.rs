// src/noyau/formule.rs
//
// Orchestrateur : compile une fois, évalue autant de fois que voulu.
//
// Pipeline : tokenize -> RPN -> Arbre (arène), chaque passe est une fonction
// pure d'une séquence vers la suivante ; la Formule possède l'arbre compilé
// et conserve une trace texte (jetons + RPN) pour le panneau "Démarche".
//
// Échec de compilation : l'arbre et la trace sont remis à zéro, la chaîne
// source est CONSERVÉE (inspection / nouvelle tentative après correction).

use std::collections::BTreeMap;

use log::{debug, warn};

use super::erreurs::ErreurFormule;
use super::expr::Arbre;
use super::jetons::{format_jetons, tokenize};
use super::rpn::vers_rpn;

/// Trace texte des étapes intermédiaires d'une compilation réussie.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemarcheCompilation {
    pub jetons: String,
    pub rpn: String,
}

/// Formule compilable puis évaluable.
///
/// Cycle de vie :
/// - construite vide ou depuis une chaîne (non compilée)
/// - `compiler` (re)construit l'arbre, en jetant l'ancien état
/// - `evaluer` est une lecture pure, exige une compilation réussie
/// - Clone recompile "structurellement" : l'arène se copie en profondeur
///   sans danger (poignées = indices), le déplacement est le move natif
#[derive(Clone, Debug, Default)]
pub struct Formule {
    source: String,
    arbre: Option<Arbre>,
    demarche: DemarcheCompilation,
}

impl Formule {
    /// Formule vide, non compilée.
    pub fn vide() -> Self {
        Self::default()
    }

    /// Enregistre la chaîne source sans compiler.
    pub fn depuis_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            arbre: None,
            demarche: DemarcheCompilation::default(),
        }
    }

    /// Compile la chaîne source courante.
    ///
    /// Une source vide (ou uniquement des espaces) est un cas dégénéré
    /// valide : Ok, mais la formule reste non compilée et `evaluer`
    /// échouera avec FormuleNonCompilee.
    pub fn compiler(&mut self) -> Result<(), ErreurFormule> {
        self.arbre = None;
        self.demarche = DemarcheCompilation::default();

        if self.source.trim().is_empty() {
            debug!("source vide: rien à compiler");
            return Ok(());
        }

        let resultat: Result<(Arbre, DemarcheCompilation), ErreurFormule> = (|| {
            let jetons = tokenize(&self.source)?;
            let jetons_txt = format_jetons(&jetons);
            debug!("jetons: {jetons_txt}");

            let rpn = vers_rpn(&jetons)?;
            let rpn_txt = format_jetons(&rpn);
            debug!("rpn: {rpn_txt}");

            let arbre = Arbre::depuis_rpn(&rpn)?;
            debug!("arbre: {arbre}");

            Ok((arbre, DemarcheCompilation {
                jetons: jetons_txt,
                rpn: rpn_txt,
            }))
        })();

        match resultat {
            Ok((arbre, demarche)) => {
                self.arbre = Some(arbre);
                self.demarche = demarche;
                Ok(())
            }
            Err(e) => {
                // état non initialisé, source conservée pour réessayer
                warn!("compilation échouée pour {:?}: {e}", self.source);
                Err(e)
            }
        }
    }

    /// Remplace la source puis compile (équivalent vider + source + compiler,
    /// mais en gardant la nouvelle chaîne en cas d'échec).
    pub fn compiler_source(&mut self, source: impl Into<String>) -> Result<(), ErreurFormule> {
        self.source = source.into();
        self.compiler()
    }

    /// Évalue l'arbre compilé pour la table (index -> valeur) donnée.
    pub fn evaluer(&self, valeurs: &BTreeMap<u32, f64>) -> Result<f64, ErreurFormule> {
        match &self.arbre {
            Some(arbre) => arbre.evaluer(valeurs),
            None => Err(ErreurFormule::FormuleNonCompilee),
        }
    }

    /// Table prototype attendue par `evaluer` : chaque index référencé par la
    /// formule, valeur par défaut 0.0. Vide si non compilée.
    pub fn prototype_parametres(&self) -> BTreeMap<u32, f64> {
        match &self.arbre {
            Some(arbre) => arbre.index_parametres().map(|i| (i, 0.0)).collect(),
            None => BTreeMap::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn est_compilee(&self) -> bool {
        self.arbre.is_some()
    }

    /// Arbre compilé (lecture seule), si la compilation a réussi.
    pub fn arbre(&self) -> Option<&Arbre> {
        self.arbre.as_ref()
    }

    /// Trace de la dernière compilation réussie (panneau "Démarche").
    pub fn demarche(&self) -> &DemarcheCompilation {
        &self.demarche
    }

    /// Remise à zéro complète, chaîne source comprise.
    pub fn vider(&mut self) {
        self.source.clear();
        self.arbre = None;
        self.demarche = DemarcheCompilation::default();
    }
}

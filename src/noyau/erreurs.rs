// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// Compilation : symbole inconnu, parenthèses orphelines, opérande manquante,
//               expression déconnectée.
// Évaluation  : paramètre non lié, formule non compilée.
//
// Contrat : toute erreur de compilation est détectée immédiatement et laisse
// la formule non initialisée (la chaîne source est conservée pour réessayer).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurFormule {
    /// Sous-chaîne qui n'est ni nombre, ni paramètre, ni mot-clé, ni opérateur.
    #[error("symbole non reconnu: '{0}'")]
    SymboleInconnu(String),

    /// Une '(' sans ')' correspondante (détectée en vidant la pile finale).
    #[error("parenthèse ouvrante non appariée")]
    ParentheseOuvranteOrpheline,

    /// Une ')' sans '(' correspondante.
    #[error("parenthèse fermante non appariée")]
    ParentheseFermanteOrpheline,

    /// Opérateur ou fonction sans assez d'arguments sur la pile.
    #[error("opérateur ou fonction sans opérande")]
    OperandeManquante,

    /// Plus d'une racine survit à la construction de l'arbre.
    #[error("expression déconnectée (plusieurs sous-expressions sans lien)")]
    ExpressionDeconnectee,

    /// Évaluation : l'index demandé manque dans la table des valeurs.
    /// On NE remplace PAS par 0 : ce serait masquer une faute de l'appelant.
    #[error("paramètre x{0} sans valeur")]
    ParametreNonLie(u32),

    /// Évaluation d'une formule vide ou jamais compilée.
    #[error("formule non compilée")]
    FormuleNonCompilee,
}

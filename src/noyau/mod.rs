//! Noyau de compilation de formules
//!
//! Organisation interne :
//! - erreurs.rs : taxonomie des erreurs (compilation + évaluation)
//! - jetons.rs  : tokenisation (découpage, classification, moins/négation)
//! - rpn.rs     : shunting-yard, infixe -> postfixe
//! - expr.rs    : arbre en arène (construction + évaluation récursive)
//! - formule.rs : orchestrateur compile-once / evaluate-many

pub mod erreurs;
pub mod expr;
pub mod formule;
pub mod jetons;
pub mod rpn;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreurs::ErreurFormule;
pub use formule::{DemarcheCompilation, Formule};

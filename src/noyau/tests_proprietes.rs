//! Tests de propriétés du pipeline complet (compile -> évalue).
//!
//! Couvre les comportements contractuels :
//! - précédence et associativité (tout est associatif à GAUCHE, '^' compris)
//! - moins vs négation
//! - liaison fonction/parenthèses
//! - partage des noeuds paramètre
//! - remontée d'erreurs typées
//! - idempotence de la compilation

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use super::{ErreurFormule, Formule};

fn evalue(source: &str, valeurs: &[(u32, f64)]) -> f64 {
    let mut f = Formule::depuis_source(source);
    f.compiler()
        .unwrap_or_else(|e| panic!("compiler({source:?}) erreur: {e}"));
    let table: BTreeMap<u32, f64> = valeurs.iter().copied().collect();
    f.evaluer(&table)
        .unwrap_or_else(|e| panic!("evaluer({source:?}) erreur: {e}"))
}

fn erreur_compile(source: &str) -> ErreurFormule {
    let mut f = Formule::depuis_source(source);
    f.compiler().unwrap_err()
}

// --- Aller-retour de base ---

#[test]
fn addition_simple() {
    assert_eq!(evalue("3+4", &[]), 7.0);
}

#[test]
fn espaces_insignifiants() {
    assert_eq!(evalue("  3 +   4 ", &[]), 7.0);
    assert_eq!(evalue("sin ( 0 )", &[]), 0.0);
}

// --- Précédence ---

#[test]
fn precedence_fois_avant_plus() {
    assert_eq!(evalue("2+3*4", &[]), 14.0);
    assert_eq!(evalue("2*3+4", &[]), 10.0);
}

#[test]
fn puissance_associative_gauche() {
    // Tous les opérateurs binaires sont associatifs à gauche, '^' compris :
    // 2^3^2 == (2^3)^2 == 64 (et PAS 2^(3^2) == 512).
    assert_eq!(evalue("2^3^2", &[]), 64.0);
    assert_eq!(evalue("8-3-2", &[]), 3.0);
    assert_eq!(evalue("16/4/2", &[]), 2.0);
}

#[test]
fn puissance_au_dessus_du_produit() {
    assert_eq!(evalue("2*3^2", &[]), 18.0);
    assert_eq!(evalue("3^2*2", &[]), 18.0);
}

// --- Moins vs négation ---

#[test]
fn negation_contre_soustraction() {
    // 1+1-(-2)+8
    assert_eq!(evalue("1+1--2+8", &[]), 12.0);
}

#[test]
fn negation_en_tete() {
    assert_eq!(evalue("-3+5", &[]), 2.0);
    assert_eq!(evalue("-x0", &[(0, 4.5)]), -4.5);
}

#[test]
fn negation_prioritaire_sur_la_puissance() {
    // la négation abaissée porte la précédence 5 : -2^2 == (-2)^2
    assert_eq!(evalue("-2^2", &[]), 4.0);
}

// --- Parenthèses et fonctions ---

#[test]
fn groupe_puis_puissance() {
    assert_eq!(evalue("(3+8)^x0", &[(0, 2.0)]), 121.0);
}

#[test]
fn fonction_liee_a_son_groupe() {
    assert_eq!(evalue("sin(0)+1", &[]), 1.0);
    assert_eq!(evalue("cos(0)*5", &[]), 5.0);
    assert_eq!(evalue("sqrt(9)+sqrt(16)", &[]), 7.0);
    // log == logarithme népérien ; aller-retour exp/log à l'ulp près
    assert!((evalue("log(exp(1))", &[]) - 1.0).abs() < 1e-12);
    assert!((evalue("exp(log(2))", &[]) - 2.0).abs() < 1e-12);
}

#[test]
fn exemple_complet_du_programme() {
    // "x^2 + 7 - sin(x3)" avec x0=3, x3=0 => 9 + 7 - 0
    assert_eq!(evalue("x^2 + 7 - sin(x3)", &[(0, 3.0), (3, 0.0)]), 16.0);
}

// --- Partage des paramètres ---

#[test]
fn partage_coherent_entre_occurrences() {
    // une seule poignée pour x0 : changer la valeur liée change TOUTES
    // les occurrences dans la même évaluation
    let mut f = Formule::depuis_source("x0+x0*2");
    f.compiler().unwrap();

    let mut table = BTreeMap::from([(0, 1.0)]);
    assert_eq!(f.evaluer(&table).unwrap(), 3.0);
    table.insert(0, 5.0);
    assert_eq!(f.evaluer(&table).unwrap(), 15.0);
}

// --- Erreurs ---

#[test]
fn erreurs_typees() {
    assert_eq!(
        erreur_compile("sin("),
        ErreurFormule::ParentheseOuvranteOrpheline
    );
    assert_eq!(
        erreur_compile(")"),
        ErreurFormule::ParentheseFermanteOrpheline
    );
    // opérateur binaire en tête (autre que '-') : échec net, pas de zéro
    // implicite — seul le moins profite de la règle de négation
    assert_eq!(erreur_compile("+3"), ErreurFormule::OperandeManquante);
    assert_eq!(erreur_compile("1 2"), ErreurFormule::ExpressionDeconnectee);
    assert_eq!(
        erreur_compile("2&3"),
        ErreurFormule::SymboleInconnu("2&3".to_string())
    );
}

#[test]
fn parametre_non_lie_nomme_l_index() {
    let mut f = Formule::depuis_source("x1+x7");
    f.compiler().unwrap();
    // x1 est lié, x7 manque : l'erreur doit nommer 7, pas défaut 0
    let table = BTreeMap::from([(1, 2.0)]);
    assert_eq!(
        f.evaluer(&table).unwrap_err(),
        ErreurFormule::ParametreNonLie(7)
    );
}

// --- Idempotence ---

#[test]
fn compiler_deux_fois_donne_les_memes_valeurs() {
    let sources = ["x^2 + 7 - sin(x3)", "1+1--2+8", "(3+8)^x0", "2^3^2"];
    for source in sources {
        let mut f1 = Formule::depuis_source(source);
        f1.compiler().unwrap();
        let mut f2 = Formule::depuis_source(source);
        f2.compiler().unwrap();

        let mut table = f1.prototype_parametres();
        assert_eq!(table, f2.prototype_parametres());

        for (i, (_, v)) in table.iter_mut().enumerate() {
            *v = 1.5 + i as f64;
        }
        assert_eq!(f1.evaluer(&table).unwrap(), f2.evaluer(&table).unwrap());
    }
}

// src/noyau/rpn.rs
//
// Infixe -> RPN (shunting-yard)
// Objectif :
// - Convertir une suite de Jeton désambiguïsés en notation postfixée
//
// Règles :
// - littéraux (nombres/paramètres) : sortie directe
// - fonctions unaires : empilées, elles ressortent juste après la parenthèse
//   fermante de leur argument (la fonction reste "collée" à son groupe)
// - opérateurs binaires : dépilent tout opérateur binaire de précédence
//   supérieure ou égale (associativité GAUCHE pour tous, y compris '^' :
//   2^3^2 == (2^3)^2 == 64)
// - la négation abaissée (NegBinaire, précédence 5) passe ici comme n'importe
//   quel opérateur binaire

use super::erreurs::ErreurFormule;
use super::jetons::Jeton;

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple :
///   jetons : [Sin, Ouvrante, Parametre(0), Division, Nombre(2), Fermante]
///   rpn    : [Parametre(0), Nombre(2), Division, Sin]
pub fn vers_rpn(jetons: &[Jeton]) -> Result<Vec<Jeton>, ErreurFormule> {
    let mut sortie: Vec<Jeton> = Vec::with_capacity(jetons.len());
    let mut pile: Vec<Jeton> = Vec::new();

    for jeton in jetons.iter().cloned() {
        if jeton.est_litteral() {
            sortie.push(jeton);
            continue;
        }

        if jeton.est_unaire() {
            pile.push(jeton);
            continue;
        }

        if jeton.est_binaire() {
            // dépile les binaires de précédence >= (jamais les fonctions,
            // jamais au-delà d'une '(')
            while let Some(haut) = pile.last() {
                if haut.est_binaire() && haut.precedence() >= jeton.precedence() {
                    sortie.push(pile.pop().unwrap());
                } else {
                    break;
                }
            }
            pile.push(jeton);
            continue;
        }

        match jeton {
            Jeton::Ouvrante => pile.push(jeton),

            Jeton::Fermante => {
                // dépile tout jusqu'à la '(' correspondante
                let mut appariee = false;
                while let Some(haut) = pile.pop() {
                    if haut == Jeton::Ouvrante {
                        appariee = true;
                        break;
                    }
                    sortie.push(haut);
                }
                if !appariee {
                    return Err(ErreurFormule::ParentheseFermanteOrpheline);
                }
                // fonction appliquée au groupe entier : elle sort maintenant
                if pile.last().is_some_and(Jeton::est_unaire) {
                    sortie.push(pile.pop().unwrap());
                }
            }

            // littéraux/binaires/unaires déjà traités plus haut
            _ => unreachable!("jeton non routé: {jeton:?}"),
        }
    }

    // vide la pile ; une '(' restante n'a jamais été fermée
    while let Some(haut) = pile.pop() {
        if haut == Jeton::Ouvrante {
            return Err(ErreurFormule::ParentheseOuvranteOrpheline);
        }
        sortie.push(haut);
    }

    Ok(sortie)
}

// src/noyau/expr.rs
//
// Arbre d'expression en arène.
// - Les noeuds vivent dans un Vec, adressés par des poignées IdNoeud
// - Les parents stockent des poignées, jamais de pointeurs : le partage des
//   noeuds Parametre est trivial et la libération se fait en un seul passage
// - Un seul noeud Parametre par index (registre parametres) : toutes les
//   occurrences textuelles de xN pointent vers la même poignée
//
// Clone est une copie profonde structurelle : les poignées restent valides
// dans la nouvelle arène puisqu'elles sont des indices, pas des adresses.

use std::collections::BTreeMap;
use std::fmt;

use super::erreurs::ErreurFormule;
use super::jetons::Jeton;

/// Poignée d'un noeud dans l'arène.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdNoeud(u32);

impl IdNoeud {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Noeud {
    Nombre(f64),
    Parametre(u32),

    // Unaires
    Neg(IdNoeud),
    Sqrt(IdNoeud),
    Exp(IdNoeud),
    Log(IdNoeud),
    Sin(IdNoeud),
    Cos(IdNoeud),

    // Binaires (l'ordre des opérandes compte : 3/5 vs 5/3)
    Add(IdNoeud, IdNoeud),
    Sous(IdNoeud, IdNoeud),
    Mul(IdNoeud, IdNoeud),
    Div(IdNoeud, IdNoeud),
    Puiss(IdNoeud, IdNoeud),
    // Négation réécrite : évalue comme Sous, gardée distincte pour la trace
    NegBinaire(IdNoeud, IdNoeud),
}

/// Arbre compilé : arène de noeuds + racine + registre des paramètres.
#[derive(Clone, Debug, PartialEq)]
pub struct Arbre {
    noeuds: Vec<Noeud>,
    racine: IdNoeud,
    parametres: BTreeMap<u32, IdNoeud>,
}

impl Arbre {
    /// Construit l'arbre à partir d'une RPN, via une pile de poignées.
    ///
    /// - nombre => nouveau noeud, empilé
    /// - paramètre => poignée recyclée depuis le registre si l'index existe déjà
    /// - fonction unaire => dépile 1 (OperandeManquante sinon)
    /// - opérateur binaire => dépile 2, le dernier dépilé est l'opérande DROITE
    /// À la fin, exactement une poignée doit rester : c'est la racine.
    pub fn depuis_rpn(rpn: &[Jeton]) -> Result<Arbre, ErreurFormule> {
        let mut noeuds: Vec<Noeud> = Vec::with_capacity(rpn.len());
        let mut parametres: BTreeMap<u32, IdNoeud> = BTreeMap::new();
        let mut pile: Vec<IdNoeud> = Vec::new();

        fn alloue(noeuds: &mut Vec<Noeud>, n: Noeud) -> IdNoeud {
            let id = IdNoeud(noeuds.len() as u32);
            noeuds.push(n);
            id
        }

        for jeton in rpn.iter().cloned() {
            match jeton {
                Jeton::Nombre(v) => {
                    let id = alloue(&mut noeuds, Noeud::Nombre(v));
                    pile.push(id);
                }

                Jeton::Parametre(index) => {
                    // une seule instance par index, partagée dans tout l'arbre
                    let id = match parametres.get(&index) {
                        Some(&id) => id,
                        None => {
                            let id = alloue(&mut noeuds, Noeud::Parametre(index));
                            parametres.insert(index, id);
                            id
                        }
                    };
                    pile.push(id);
                }

                Jeton::Sin | Jeton::Cos | Jeton::Exp | Jeton::Log | Jeton::Sqrt | Jeton::Neg => {
                    let fille = pile.pop().ok_or(ErreurFormule::OperandeManquante)?;
                    let n = match jeton {
                        Jeton::Sin => Noeud::Sin(fille),
                        Jeton::Cos => Noeud::Cos(fille),
                        Jeton::Exp => Noeud::Exp(fille),
                        Jeton::Log => Noeud::Log(fille),
                        Jeton::Sqrt => Noeud::Sqrt(fille),
                        // une RPN issue du pipeline ne contient plus de Neg
                        // (abaissé en NegBinaire), mais le constructeur reste
                        // total : un Neg brut vaut une négation unaire
                        Jeton::Neg => Noeud::Neg(fille),
                        _ => unreachable!(),
                    };
                    let id = alloue(&mut noeuds, n);
                    pile.push(id);
                }

                Jeton::Plus
                | Jeton::Moins
                | Jeton::Fois
                | Jeton::Division
                | Jeton::Puissance
                | Jeton::NegBinaire => {
                    let droite = pile.pop().ok_or(ErreurFormule::OperandeManquante)?;
                    let gauche = pile.pop().ok_or(ErreurFormule::OperandeManquante)?;
                    let n = match jeton {
                        Jeton::Plus => Noeud::Add(gauche, droite),
                        Jeton::Moins => Noeud::Sous(gauche, droite),
                        Jeton::Fois => Noeud::Mul(gauche, droite),
                        Jeton::Division => Noeud::Div(gauche, droite),
                        Jeton::Puissance => Noeud::Puiss(gauche, droite),
                        Jeton::NegBinaire => Noeud::NegBinaire(gauche, droite),
                        _ => unreachable!(),
                    };
                    let id = alloue(&mut noeuds, n);
                    pile.push(id);
                }

                // le convertisseur ne laisse jamais passer de parenthèses
                Jeton::Ouvrante | Jeton::Fermante => {
                    return Err(ErreurFormule::OperandeManquante)
                }
            }
        }

        let racine = pile.pop().ok_or(ErreurFormule::OperandeManquante)?;
        if !pile.is_empty() {
            return Err(ErreurFormule::ExpressionDeconnectee);
        }

        Ok(Arbre {
            noeuds,
            racine,
            parametres,
        })
    }

    /// Évalue l'arbre pour une table (index -> valeur) couvrant tous les
    /// paramètres référencés. Lecture pure : ni l'arène ni le registre ne
    /// sont modifiés, l'évaluation concurrente d'un même arbre est sûre.
    ///
    /// Cas limites numériques (x/0, sqrt(-1), log(-1)...) : IEEE-754
    /// (inf/NaN), jamais une erreur. `log` est le logarithme naturel.
    pub fn evaluer(&self, valeurs: &BTreeMap<u32, f64>) -> Result<f64, ErreurFormule> {
        self.evaluer_noeud(self.racine, valeurs)
    }

    fn evaluer_noeud(
        &self,
        id: IdNoeud,
        valeurs: &BTreeMap<u32, f64>,
    ) -> Result<f64, ErreurFormule> {
        match &self.noeuds[id.index()] {
            Noeud::Nombre(v) => Ok(*v),

            Noeud::Parametre(index) => valeurs
                .get(index)
                .copied()
                .ok_or(ErreurFormule::ParametreNonLie(*index)),

            Noeud::Neg(x) => Ok(-self.evaluer_noeud(*x, valeurs)?),
            Noeud::Sqrt(x) => Ok(self.evaluer_noeud(*x, valeurs)?.sqrt()),
            Noeud::Exp(x) => Ok(self.evaluer_noeud(*x, valeurs)?.exp()),
            Noeud::Log(x) => Ok(self.evaluer_noeud(*x, valeurs)?.ln()),
            Noeud::Sin(x) => Ok(self.evaluer_noeud(*x, valeurs)?.sin()),
            Noeud::Cos(x) => Ok(self.evaluer_noeud(*x, valeurs)?.cos()),

            Noeud::Add(a, b) => {
                Ok(self.evaluer_noeud(*a, valeurs)? + self.evaluer_noeud(*b, valeurs)?)
            }
            Noeud::Sous(a, b) => {
                Ok(self.evaluer_noeud(*a, valeurs)? - self.evaluer_noeud(*b, valeurs)?)
            }
            Noeud::Mul(a, b) => {
                Ok(self.evaluer_noeud(*a, valeurs)? * self.evaluer_noeud(*b, valeurs)?)
            }
            Noeud::Div(a, b) => {
                Ok(self.evaluer_noeud(*a, valeurs)? / self.evaluer_noeud(*b, valeurs)?)
            }
            Noeud::Puiss(a, b) => Ok(self
                .evaluer_noeud(*a, valeurs)?
                .powf(self.evaluer_noeud(*b, valeurs)?)),
            Noeud::NegBinaire(a, b) => {
                Ok(self.evaluer_noeud(*a, valeurs)? - self.evaluer_noeud(*b, valeurs)?)
            }
        }
    }

    /// Index des paramètres référencés, triés (registre des noeuds partagés).
    pub fn index_parametres(&self) -> impl Iterator<Item = u32> + '_ {
        self.parametres.keys().copied()
    }

    /// Nombre de noeuds de l'arène (partage compris : "x0+x0" => un seul
    /// noeud Parametre).
    pub fn nombre_noeuds(&self) -> usize {
        self.noeuds.len()
    }

    fn fmt_noeud(&self, id: IdNoeud, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.noeuds[id.index()] {
            Noeud::Nombre(v) => write!(f, "{v}"),
            Noeud::Parametre(i) => write!(f, "x{i}"),

            Noeud::Neg(x) => {
                write!(f, "-(")?;
                self.fmt_noeud(*x, f)?;
                write!(f, ")")
            }
            Noeud::Sqrt(x) => self.fmt_unaire("sqrt", *x, f),
            Noeud::Exp(x) => self.fmt_unaire("exp", *x, f),
            Noeud::Log(x) => self.fmt_unaire("log", *x, f),
            Noeud::Sin(x) => self.fmt_unaire("sin", *x, f),
            Noeud::Cos(x) => self.fmt_unaire("cos", *x, f),

            Noeud::Add(a, b) => self.fmt_binaire('+', *a, *b, f),
            Noeud::Sous(a, b) | Noeud::NegBinaire(a, b) => self.fmt_binaire('-', *a, *b, f),
            Noeud::Mul(a, b) => self.fmt_binaire('*', *a, *b, f),
            Noeud::Div(a, b) => self.fmt_binaire('/', *a, *b, f),
            Noeud::Puiss(a, b) => self.fmt_binaire('^', *a, *b, f),
        }
    }

    fn fmt_unaire(&self, nom: &str, x: IdNoeud, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{nom}(")?;
        self.fmt_noeud(x, f)?;
        write!(f, ")")
    }

    fn fmt_binaire(
        &self,
        op: char,
        a: IdNoeud,
        b: IdNoeud,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "(")?;
        self.fmt_noeud(a, f)?;
        write!(f, "{op}")?;
        self.fmt_noeud(b, f)?;
        write!(f, ")")
    }
}

/// Affichage debug (entièrement parenthésé, pas un rendu "joli").
impl fmt::Display for Arbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_noeud(self.racine, f)
    }
}

// src/noyau/jetons.rs
//
// Tokenisation en trois passes :
// (1) découpage : la chaîne est balayée caractère par caractère, avec un
//     tampon de sous-chaîne en cours ; les délimiteurs { ( ) espace + - * / ^ }
//     vident le tampon et (hors espace) deviennent eux-mêmes des candidats
// (2) classification : chaque candidat devient exactement un Jeton
// (3a) levée d'ambiguïté : un Moins devient Neg s'il est premier jeton ou
//      précédé d'un opérateur binaire ou d'une '('
// (3b) abaissement : chaque Neg est réécrit en paire (Nombre(0), NegBinaire),
//      si bien qu'en aval seuls des opérateurs binaires subsistent pour ce cas

use super::erreurs::ErreurFormule;

#[derive(Clone, Debug, PartialEq)]
pub enum Jeton {
    Nombre(f64),
    Parametre(u32),

    // Opérateurs binaires
    Plus,
    Moins,
    Fois,
    Division,
    Puissance,
    // Négation réécrite en binaire : opérande gauche implicite 0
    NegBinaire,

    // Fonctions unaires
    Sin,
    Cos,
    Exp,
    Log,
    Sqrt,
    // Négation unaire ; n'existe qu'entre les passes (3a) et (3b)
    Neg,

    Ouvrante,
    Fermante,
}

impl Jeton {
    pub fn est_litteral(&self) -> bool {
        matches!(self, Jeton::Nombre(_) | Jeton::Parametre(_))
    }

    pub fn est_unaire(&self) -> bool {
        matches!(
            self,
            Jeton::Sin | Jeton::Cos | Jeton::Exp | Jeton::Log | Jeton::Sqrt | Jeton::Neg
        )
    }

    pub fn est_binaire(&self) -> bool {
        matches!(
            self,
            Jeton::Plus
                | Jeton::Moins
                | Jeton::Fois
                | Jeton::Division
                | Jeton::Puissance
                | Jeton::NegBinaire
        )
    }

    /// Rang de précédence (opérateurs binaires seulement) :
    /// 0 pour +/-, 1 pour * et /, 2 pour ^, 5 pour la négation réécrite.
    pub fn precedence(&self) -> u8 {
        match self {
            Jeton::Plus | Jeton::Moins => 0,
            Jeton::Fois | Jeton::Division => 1,
            Jeton::Puissance => 2,
            Jeton::NegBinaire => 5,
            _ => 0,
        }
    }
}

/// Délimiteurs du découpage. L'espace est consommé sans produire de candidat.
const DELIMITEURS: [char; 8] = ['(', ')', ' ', '+', '-', '*', '/', '^'];

/// Tokenise une chaîne source en jetons désambiguïsés.
///
/// À la sortie : plus aucun Moins ambigu (tout Moins restant est une vraie
/// soustraction) et plus aucun Neg (déjà abaissé en `0, NegBinaire`).
pub fn tokenize(source: &str) -> Result<Vec<Jeton>, ErreurFormule> {
    let candidats = decoupe(source);

    let mut jetons = Vec::with_capacity(candidats.len());
    for c in &candidats {
        jetons.push(classifie(c)?);
    }

    resout_negation(&mut jetons);
    Ok(abaisse_negation(jetons))
}

/// Passe (1) : découpage par délimiteurs, tampon de sous-chaîne en cours.
fn decoupe(source: &str) -> Vec<String> {
    let mut candidats = Vec::new();
    let mut tampon = String::new();

    for c in source.chars() {
        if DELIMITEURS.contains(&c) {
            // la sous-chaîne en cours s'arrête ici
            if !tampon.is_empty() {
                candidats.push(std::mem::take(&mut tampon));
            }
            // l'espace est un pur séparateur, les autres délimiteurs comptent
            if c != ' ' {
                candidats.push(c.to_string());
            }
        } else {
            tampon.push(c);
        }
    }
    if !tampon.is_empty() {
        candidats.push(tampon);
    }

    candidats
}

/// Passe (2) : un candidat => exactement un jeton, sinon SymboleInconnu.
/// Le moins est classé Moins (soustraction) par défaut ; la passe (3a) tranche.
fn classifie(candidat: &str) -> Result<Jeton, ErreurFormule> {
    // Nombre : uniquement chiffres et au plus un point, au moins un chiffre.
    // ("1e5" n'est PAS un nombre ici : notation scientifique non supportée.)
    let points = candidat.chars().filter(|c| *c == '.').count();
    if points <= 1
        && candidat.chars().any(|c| c.is_ascii_digit())
        && candidat.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        let v = candidat
            .parse::<f64>()
            .map_err(|_| ErreurFormule::SymboleInconnu(candidat.to_string()))?;
        return Ok(Jeton::Nombre(v));
    }

    // Paramètre : 'x' suivi de chiffres ; "x" nu vaut x0.
    if let Some(reste) = candidat.strip_prefix('x') {
        if reste.chars().all(|c| c.is_ascii_digit()) {
            let index = if reste.is_empty() {
                0
            } else {
                reste
                    .parse::<u32>()
                    .map_err(|_| ErreurFormule::SymboleInconnu(candidat.to_string()))?
            };
            return Ok(Jeton::Parametre(index));
        }
    }

    // Mots-clés et opérateurs (sensibles à la casse)
    match candidat {
        "sin" => Ok(Jeton::Sin),
        "cos" => Ok(Jeton::Cos),
        "exp" => Ok(Jeton::Exp),
        "log" => Ok(Jeton::Log),
        "sqrt" => Ok(Jeton::Sqrt),
        "+" => Ok(Jeton::Plus),
        "-" => Ok(Jeton::Moins),
        "*" => Ok(Jeton::Fois),
        "/" => Ok(Jeton::Division),
        "^" => Ok(Jeton::Puissance),
        "(" => Ok(Jeton::Ouvrante),
        ")" => Ok(Jeton::Fermante),
        _ => Err(ErreurFormule::SymboleInconnu(candidat.to_string())),
    }
}

/// Passe (3a) : Moins => Neg si premier jeton, ou si le jeton précédent est
/// un opérateur binaire ou une '('.
///
/// NOTE : un Neg fraîchement créé est unaire, donc le Moins qui le suit reste
/// une soustraction ("--2" échoue plus loin, comme dans le programme d'origine).
fn resout_negation(jetons: &mut [Jeton]) {
    for i in 0..jetons.len() {
        if jetons[i] != Jeton::Moins {
            continue;
        }
        let negation = match i {
            0 => true,
            _ => jetons[i - 1].est_binaire() || jetons[i - 1] == Jeton::Ouvrante,
        };
        if negation {
            jetons[i] = Jeton::Neg;
        }
    }
}

/// Passe (3b) : Neg => (Nombre(0), NegBinaire). NegBinaire porte la plus
/// haute précédence (5, au-dessus de la puissance).
fn abaisse_negation(jetons: Vec<Jeton>) -> Vec<Jeton> {
    let mut sortie = Vec::with_capacity(jetons.len());
    for j in jetons {
        if j == Jeton::Neg {
            sortie.push(Jeton::Nombre(0.0));
            sortie.push(Jeton::NegBinaire);
        } else {
            sortie.push(j);
        }
    }
    sortie
}

/// Format utilitaire (panneau "Démarche" / journal) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    let mut out = Vec::with_capacity(jetons.len());
    for j in jetons {
        let s = match j {
            Jeton::Nombre(v) => format!("{v}"),
            Jeton::Parametre(i) => format!("x{i}"),

            Jeton::Plus => "+".to_string(),
            Jeton::Moins => "-".to_string(),
            Jeton::Fois => "*".to_string(),
            Jeton::Division => "/".to_string(),
            Jeton::Puissance => "^".to_string(),
            Jeton::NegBinaire => "neg".to_string(),

            Jeton::Sin => "sin".to_string(),
            Jeton::Cos => "cos".to_string(),
            Jeton::Exp => "exp".to_string(),
            Jeton::Log => "log".to_string(),
            Jeton::Sqrt => "sqrt".to_string(),
            Jeton::Neg => "neg?".to_string(),

            Jeton::Ouvrante => "(".to_string(),
            Jeton::Fermante => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}

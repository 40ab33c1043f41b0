//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte les erreurs de compilation typées (jamais de panique)
//! - invariants clés : compiler deux fois la même chaîne donne les mêmes
//!   valeurs ; une formule compilée s'évalue autant de fois qu'on veut sans
//!   re-parser ni dériver

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::Formule;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let n = rng.pick(10);
    if rng.coin() {
        format!("{n}")
    } else {
        format!("{n}.{}", rng.pick(100))
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(4) {
        0 | 1 => gen_nombre(rng),
        2 => format!("x{}", rng.pick(3)),
        _ => "x".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }

    match rng.pick(10) {
        0 => gen_atome(rng),
        1 => format!("({}+{})", gen_expr(rng, profondeur - 1), gen_expr(rng, profondeur - 1)),
        2 => format!("({}-{})", gen_expr(rng, profondeur - 1), gen_expr(rng, profondeur - 1)),
        3 => format!("({}*{})", gen_expr(rng, profondeur - 1), gen_expr(rng, profondeur - 1)),
        4 => format!("({}/{})", gen_expr(rng, profondeur - 1), gen_expr(rng, profondeur - 1)),
        5 => format!("-{}", gen_atome(rng)),
        6 => format!("sin({})", gen_expr(rng, profondeur - 1)),
        7 => format!("cos({})", gen_expr(rng, profondeur - 1)),
        8 => format!("sqrt({})", gen_expr(rng, profondeur - 1)),
        _ => format!("({}^{})", gen_atome(rng), rng.pick(4)),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_idempotence_compilation() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut vus_ok = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let source = gen_expr(&mut rng, 4);

        let mut f1 = Formule::depuis_source(&source);
        let mut f2 = Formule::depuis_source(&source);
        let r1 = f1.compiler();
        let r2 = f2.compiler();
        // même chaîne => même diagnostic (ou même succès)
        assert_eq!(r1, r2, "diagnostics divergents pour {source:?}");

        if r1.is_err() {
            continue;
        }
        vus_ok += 1;

        // deux compilations distinctes, mêmes valeurs pour plusieurs liaisons
        for graine in 0..4u32 {
            let mut table: BTreeMap<u32, f64> = f1.prototype_parametres();
            for (index, v) in table.iter_mut() {
                *v = f64::from(*index) + f64::from(graine) * 0.25 - 1.0;
            }
            let v1 = f1.evaluer(&table).unwrap();
            let v2 = f2.evaluer(&table).unwrap();
            // NaN == NaN n'est pas vrai en IEEE : comparer les bits
            assert_eq!(
                v1.to_bits(),
                v2.to_bits(),
                "valeurs divergentes pour {source:?}"
            );
        }
    }

    // le générateur produit des expressions bien formées : tout doit compiler
    assert!(vus_ok > 150, "trop peu de succès: {vus_ok}");
}

#[test]
fn fuzz_safe_evaluer_plusieurs_fois_sans_recompiler() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..40 {
        budget(t0, max);

        let source = gen_expr(&mut rng, 3);
        let mut f = Formule::depuis_source(&source);
        if f.compiler().is_err() {
            continue;
        }

        // compile une fois, évalue N fois : une liaison constante doit
        // donner une valeur constante (l'évaluation est une lecture pure)
        let mut table = f.prototype_parametres();
        for v in table.values_mut() {
            *v = 2.5;
        }
        let premier = f.evaluer(&table).unwrap();
        for _ in 0..20 {
            let suivant = f.evaluer(&table).unwrap();
            assert_eq!(premier.to_bits(), suivant.to_bits());
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let source = somme_balancee("1", 800);
    budget(t0, max);

    let mut f = Formule::depuis_source(&source);
    f.compiler().unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(f.evaluer(&BTreeMap::new()).unwrap(), 800.0);
}

#[test]
fn fuzz_safe_entrees_hostiles_sans_panique() {
    // chaînes tordues : on exige une erreur typée ou un succès, jamais
    // une panique du pipeline
    let hostiles = [
        "", " ", "(", ")", "((((", "))))", "+", "-", "*", "/", "^", "--1",
        "sin", "sin()", "sinx", "x-", "-", "1..2", ".", "x99", "x x",
        "2^", "^2", "()()", "sin(cos(", "pi", "1e5", "xx", "x1x2",
    ];

    for source in hostiles {
        let mut f = Formule::depuis_source(source);
        let _ = f.compiler();
        let _ = f.evaluer(&BTreeMap::new());
        // la source doit survivre à l'échec
        assert_eq!(f.source(), source);
    }
}

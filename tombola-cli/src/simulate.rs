use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;

use tombola_core::engine::draw_one;
use tombola_core::models::{DrawSettings, Participant};

/// `trials` tirages indépendants d'un seul créneau : bassin réinitialisé à
/// chaque essai, aucune exclusion. Renvoie les gains par nom, dans l'ordre de
/// première apparition. Sert à vérifier empiriquement la pondération.
pub fn run(
    participants: &[Participant],
    trials: u32,
    weighted: bool,
    rng: &mut StdRng,
    mut on_trial: impl FnMut(),
) -> Vec<(String, u32)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u32> = HashMap::new();
    for p in participants {
        if !counts.contains_key(&p.name) {
            order.push(p.name.clone());
            counts.insert(p.name.clone(), 0);
        }
    }

    let settings = DrawSettings {
        no_duplicate: false,
        weighted_probability: weighted,
        ..DrawSettings::default()
    };

    for _ in 0..trials {
        let mut used = HashSet::new();
        if let Some(w) = draw_one("Essai", 0, participants, &mut used, &settings, rng) {
            *counts.get_mut(&w.winner.name).expect("nom connu") += 1;
        }
        on_trial();
    }

    order
        .into_iter()
        .map(|name| {
            let wins = counts[&name];
            (name, wins)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use tombola_core::parse::parse_participants;

    #[test]
    fn test_counts_sum_to_trials() {
        let pool = parse_participants("A\nB\nC");
        let mut rng = StdRng::seed_from_u64(1);
        let counts = run(&pool, 1_000, true, &mut rng, || {});
        let total: u32 = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 1_000);
    }

    #[test]
    fn test_weighted_repetitions_raise_frequency() {
        let pool = parse_participants("A\nA\nA\nB");
        let mut rng = StdRng::seed_from_u64(42);
        let counts = run(&pool, 20_000, true, &mut rng, || {});

        assert_eq!(counts.len(), 2, "deux noms distincts");
        let a = f64::from(counts[0].1) / 20_000.0;
        assert!((a - 0.75).abs() < 0.02, "fréquence de A hors tolérance: {a}");
    }

    #[test]
    fn test_unweighted_flattens_repetitions() {
        let pool = parse_participants("A\nA\nA\nB");
        let mut rng = StdRng::seed_from_u64(42);
        let counts = run(&pool, 20_000, false, &mut rng, || {});

        let a = f64::from(counts[0].1) / 20_000.0;
        assert!((a - 0.5).abs() < 0.02, "fréquence de A hors tolérance: {a}");
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run(&[], 100, true, &mut rng, || {}).is_empty());
    }
}

use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;

use crate::models::{DrawSettings, DrawWinner, Participant};

/// Ensemble éligible pour un créneau.
///
/// Pondéré : chaque entrée du bassin dont le nom n'est pas exclu reste une
/// chance indépendante — un nom répété dans la saisie pèse d'autant plus.
/// Non pondéré : déduplication stable à la première occurrence par nom.
pub fn eligible<'a>(
    pool: &'a [Participant],
    used_names: &HashSet<String>,
    weighted: bool,
) -> Vec<&'a Participant> {
    if weighted {
        pool.iter().filter(|p| !used_names.contains(&p.name)).collect()
    } else {
        let mut seen = HashSet::new();
        pool.iter()
            .filter(|p| !used_names.contains(&p.name) && seen.insert(p.name.as_str()))
            .collect()
    }
}

/// Tire un gagnant pour un créneau : tirage uniforme indépendant sur les
/// indices de l'ensemble éligible. Ensemble vide = `None`, sans erreur ;
/// l'appelant arrête la boucle de l'action en cours.
pub fn draw_one(
    prize_name: &str,
    slot_index: usize,
    pool: &[Participant],
    used_names: &mut HashSet<String>,
    settings: &DrawSettings,
    rng: &mut StdRng,
) -> Option<DrawWinner> {
    let candidates = eligible(pool, used_names, settings.weighted_probability);
    if candidates.is_empty() {
        return None;
    }

    let winner = candidates[rng.random_range(0..candidates.len())].clone();
    if settings.no_duplicate {
        used_names.insert(winner.name.clone());
    }

    Some(DrawWinner {
        prize_name: prize_name.to_string(),
        winner,
        serial_number: (slot_index + 1) as u32,
        removed: false,
    })
}

use crate::models::{DrawWinner, Prize};

/// Aplati la liste des lots en une file ordonnée de créneaux : chaque nom
/// répété `count` fois, dans l'ordre de saisie. Si `reversed`, c'est la file
/// entière qui est inversée, pas chaque lot.
pub fn expand_slots(prizes: &[Prize], reversed: bool) -> Vec<String> {
    let mut slots = Vec::new();
    for prize in prizes {
        for _ in 0..prize.count {
            slots.push(prize.name.clone());
        }
    }
    if reversed {
        slots.reverse();
    }
    slots
}

/// Créneaux restant à pourvoir. Chaque résultat enregistré consomme son
/// créneau, forfaits compris : un forfait ne libère pas sa place.
pub fn remaining_slots<'a>(all_slots: &'a [String], results: &[DrawWinner]) -> &'a [String] {
    let used = results.len().min(all_slots.len());
    &all_slots[used..]
}

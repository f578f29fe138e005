use crate::models::{Participant, Prize};

/// Séparateur désigné entre nom et quantité (convention tableur français).
pub const PRIZE_SEPARATOR: char = ';';

/// Une ligne non vide par lot : `nom;quantité`, ou `nom quantité` en repli
/// historique (dernier token). Ligne malformée = un lot de quantité 1 portant
/// la ligne entière comme nom : l'entrée utilisateur n'est jamais rejetée.
pub fn parse_prizes(text: &str) -> Vec<Prize> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(id, line)| parse_prize_line(id, line))
        .collect()
}

fn parse_prize_line(id: usize, line: &str) -> Prize {
    let trimmed = line.trim();

    if let Some((name, count_part)) = trimmed.rsplit_once(PRIZE_SEPARATOR) {
        if let Some(count) = parse_count(count_part) {
            let name = name.trim();
            if !name.is_empty() {
                return Prize {
                    id,
                    name: name.to_string(),
                    count,
                };
            }
        }
    }

    if let Some((name, last)) = trimmed.rsplit_once(char::is_whitespace) {
        if let Some(count) = parse_count(last) {
            return Prize {
                id,
                name: normalize_spaces(name),
                count,
            };
        }
    }

    Prize {
        id,
        name: trimmed.to_string(),
        count: 1,
    }
}

fn parse_count(token: &str) -> Option<u32> {
    match token.trim().parse::<i64>() {
        Ok(n) if (1..=i64::from(u32::MAX)).contains(&n) => Some(n as u32),
        _ => None,
    }
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Une ligne non vide par participant. Pas de déduplication ici : les lignes
/// répétées restent des entrées distinctes (c'est le mécanisme de pondération).
pub fn parse_participants(text: &str) -> Vec<Participant> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(id, line)| Participant {
            id,
            name: line.trim().to_string(),
            raw: line.to_string(),
        })
        .collect()
}

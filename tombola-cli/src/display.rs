use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use tombola_core::models::{DrawSettings, DrawWinner, Participant, Prize};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Liste cumulative des résultats, les plus récents en premier.
pub fn display_results(results: &[DrawWinner], settings: &DrawSettings) {
    if results.is_empty() {
        println!("Aucun résultat pour le moment.");
        return;
    }

    if !settings.vertical_result {
        display_results_compact(results, settings);
        return;
    }

    let mut table = base_table();
    if settings.show_serial_number {
        table.set_header(vec!["N°", "Lot", "Gagnant", "Statut"]);
    } else {
        table.set_header(vec!["Lot", "Gagnant", "Statut"]);
    }

    for r in results.iter().rev() {
        let (statut, color) = if r.removed {
            ("forfait", Color::Red)
        } else {
            ("gagné", Color::Green)
        };
        let mut row = Vec::new();
        if settings.show_serial_number {
            row.push(Cell::new(format!("#{}", r.serial_number)));
        }
        row.push(Cell::new(&r.prize_name));
        row.push(Cell::new(&r.winner.name));
        row.push(Cell::new(statut).fg(color));
        table.add_row(row);
    }
    println!("{table}");
}

fn display_results_compact(results: &[DrawWinner], settings: &DrawSettings) {
    let mut current_prize = "";
    for r in results {
        if r.prize_name != current_prize {
            current_prize = &r.prize_name;
            println!("\n── {} ──", current_prize);
        }
        let marker = if r.removed { " (forfait)" } else { "" };
        if settings.show_serial_number {
            print!("  #{} {}{}", r.serial_number, r.winner.name, marker);
        } else {
            print!("  {}{}", r.winner.name, marker);
        }
    }
    println!();
}

/// Panneau « fenêtre » : uniquement les gagnants de la dernière action,
/// suivi du cumul.
pub fn display_action_summary(new_winners: &[DrawWinner], total: usize) {
    println!("\n🎊 Résultat du tirage !\n");

    let mut table = base_table();
    table.set_header(vec!["Lot", "Gagnant"]);
    for w in new_winners {
        table.add_row(vec![
            Cell::new(&w.prize_name),
            Cell::new(&w.winner.name).fg(Color::Yellow),
        ]);
    }
    println!("{table}");

    if total > new_winners.len() {
        println!("Cumul : {} gagnant(s) au total.", total);
    }
}

/// Aperçu avant tirage : lots, file des créneaux, taille du bassin.
pub fn display_overview(prizes: &[Prize], slots: &[String], participants: &[Participant]) {
    if prizes.is_empty() {
        println!("Aucun lot saisi.");
    } else {
        let mut table = base_table();
        table.set_header(vec!["Ordre", "Lot", "Quantité"]);
        for p in prizes {
            table.add_row(vec![
                Cell::new(p.id + 1),
                Cell::new(&p.name),
                Cell::new(p.count),
            ]);
        }
        println!("{table}");
    }

    println!("File des créneaux ({}) :", slots.len());
    if let Some(first) = slots.first() {
        println!("  Prochain : {}", first);
    }
    println!("Participants : {} entrée(s)", participants.len());
}

/// Fréquences empiriques d'une simulation, triées par nombre de gains.
pub fn display_frequencies(counts: &[(String, u32)], trials: u32) {
    let mut table = base_table();
    table.set_header(vec!["Nom", "Gains", "Fréquence"]);

    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    for (name, wins) in &sorted {
        let freq = f64::from(*wins) / f64::from(trials);
        table.add_row(vec![
            Cell::new(name),
            Cell::new(wins),
            Cell::new(format!("{:.2} %", freq * 100.0)),
        ]);
    }
    println!("{table}");
    println!("{} tirage(s) simulés, bassin réinitialisé à chaque essai.", trials);
}

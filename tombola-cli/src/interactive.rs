use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;

use tombola_core::export::export_csv;
use tombola_core::models::{DrawMethod, ResultDisplay, SoundEffect};
use tombola_core::session::DrawSession;

use crate::display;
use crate::effects;
use crate::import::read_list;
use crate::ritual::TerminalRitual;

const SAMPLE_PARTICIPANTS: &str = "Participant A\nParticipant B\nParticipant C";

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Tirer,
    Resultats,
    Apercu,
    Participants,
    Forfait,
    Reglages,
    Exporter,
    Reinitialiser,
    Quitter,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "tirer" | "t" => Some(InteractiveCommand::Tirer),
        "2" | "resultats" | "résultats" | "res" => Some(InteractiveCommand::Resultats),
        "3" | "apercu" | "aperçu" | "ap" => Some(InteractiveCommand::Apercu),
        "4" | "participants" | "liste" => Some(InteractiveCommand::Participants),
        "5" | "forfait" | "ff" => Some(InteractiveCommand::Forfait),
        "6" | "reglages" | "réglages" | "reg" => Some(InteractiveCommand::Reglages),
        "7" | "exporter" | "export" | "exp" => Some(InteractiveCommand::Exporter),
        "8" | "reinitialiser" | "réinitialiser" | "reset" => Some(InteractiveCommand::Reinitialiser),
        "9" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quitter),
        _ => None,
    }
}

fn display_menu(session: &DrawSession) {
    println!();
    println!("── {} ──", session.theme());
    match session.next_prize_name() {
        Some(next) => println!(
            "  {} créneau(x) restant(s), prochain : {}",
            session.remaining_count(),
            next
        ),
        None => println!("  Tous les lots sont tirés."),
    }
    println!("  1. tirer          Lancer l'action suivante");
    println!("  2. resultats      Afficher les résultats");
    println!("  3. apercu         Lots, créneaux et bassin");
    println!("  4. participants   Voir / réimporter la liste");
    println!("  5. forfait        Invalider un gagnant");
    println!("  6. reglages       Modifier les règles");
    println!("  7. exporter       Export CSV");
    println!("  8. reinitialiser  Effacer les résultats");
    println!("  9. quitter        Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn confirm(msg: &str) -> Result<bool> {
    Ok(prompt(&format!("{} (o/n) : ", msg))?.to_lowercase() == "o")
}

fn cmd_tirer(session: &mut DrawSession, rng: &mut StdRng, wav: Option<&Path>) -> Result<()> {
    let settings = session.settings().clone();
    let policy = effects::ritual_policy(&settings, wav);
    let mut observer = TerminalRitual::new(&settings, session.results().len());

    session.draw_action(rng, &policy, &mut observer)?;

    if settings.display_mode == ResultDisplay::InPage {
        display::display_results(session.results(), &settings);
    }
    Ok(())
}

fn cmd_participants(session: &mut DrawSession) -> Result<()> {
    println!("Participants : {} entrée(s)", session.participants().len());
    println!("(limite annoncée : 300 000 lignes, non contrôlée)");

    let input = prompt("Fichier à importer, « exemple », ou vide pour garder : ")?;
    if input.is_empty() {
        return Ok(());
    }
    let text = if input == "exemple" {
        SAMPLE_PARTICIPANTS.to_string()
    } else {
        read_list(&PathBuf::from(&input))?
    };
    session.set_participant_text(&text);
    println!("Liste remplacée : {} entrée(s).", session.participants().len());
    Ok(())
}

fn cmd_forfait(session: &mut DrawSession) -> Result<()> {
    if session.results().is_empty() {
        println!("Aucun résultat à invalider.");
        return Ok(());
    }
    let input = prompt("Numéro du résultat à mettre en forfait : ")?;
    let serial: u32 = input.parse().context("Numéro invalide")?;

    if !confirm(&format!("Confirmer le forfait du n°{} ?", serial))? {
        println!("Forfait annulé.");
        return Ok(());
    }
    session.mark_removed(serial)?;
    println!("N°{} mis en forfait. Le créneau reste consommé.", serial);
    Ok(())
}

fn cmd_reglages(session: &mut DrawSession) -> Result<()> {
    let mut settings = session.settings().clone();
    println!("Réglages actuels :");
    println!("  methode      : {}", settings.method);
    println!("  doublons     : {}", if settings.no_duplicate { "interdits" } else { "autorisés" });
    println!("  retrait      : {}", settings.remove_from_list);
    println!("  ponderation  : {}", settings.weighted_probability);
    println!("  affichage    : {}", match settings.display_mode {
        ResultDisplay::InPage => "en continu",
        ResultDisplay::Popup => "fenêtre",
    });
    println!("  numeros      : {}", settings.show_serial_number);
    println!("  vertical     : {}", settings.vertical_result);
    println!("  son          : {}", settings.sound_effect);
    println!("  confettis    : {}", settings.show_confetti);
    println!("  rapide       : {}", settings.fast_mode);

    let input = prompt("Option à basculer (vide pour revenir) : ")?;
    match input.as_str() {
        "" => return Ok(()),
        "methode" => {
            if !session.results().is_empty()
                && !confirm("Changer de méthode avec des résultats existants ?")?
            {
                println!("Méthode inchangée.");
                return Ok(());
            }
            settings.method = match settings.method {
                DrawMethod::StepByStep => DrawMethod::AllAtOnce,
                DrawMethod::AllAtOnce => DrawMethod::Reverse,
                DrawMethod::Reverse => DrawMethod::StepByStep,
            };
            println!("Méthode : {}", settings.method);
        }
        "doublons" => settings.no_duplicate = !settings.no_duplicate,
        "retrait" => settings.remove_from_list = !settings.remove_from_list,
        "ponderation" => settings.weighted_probability = !settings.weighted_probability,
        "affichage" => {
            settings.display_mode = match settings.display_mode {
                ResultDisplay::InPage => ResultDisplay::Popup,
                ResultDisplay::Popup => ResultDisplay::InPage,
            }
        }
        "numeros" => settings.show_serial_number = !settings.show_serial_number,
        "vertical" => settings.vertical_result = !settings.vertical_result,
        "son" => {
            settings.sound_effect = match settings.sound_effect {
                SoundEffect::None => SoundEffect::Tone1,
                SoundEffect::Tone1 => SoundEffect::Tone2,
                SoundEffect::Tone2 | SoundEffect::File => SoundEffect::None,
            };
            println!("Son : {}", settings.sound_effect);
        }
        "confettis" => settings.show_confetti = !settings.show_confetti,
        "rapide" => settings.fast_mode = !settings.fast_mode,
        other => {
            println!("Option inconnue : '{}'.", other);
            return Ok(());
        }
    }
    session.set_settings(settings);
    Ok(())
}

fn cmd_exporter(session: &DrawSession) -> Result<()> {
    let dir = prompt("Répertoire d'export [.] : ")?;
    let dir = if dir.is_empty() { ".".to_string() } else { dir };

    match export_csv(session.theme(), session.results(), Path::new(&dir))? {
        Some(path) => println!("Résultats exportés : {}", path.display()),
        None => println!("Aucun résultat à exporter."),
    }
    Ok(())
}

fn cmd_reinitialiser(session: &mut DrawSession) -> Result<()> {
    if !session.results().is_empty()
        && !confirm("Effacer tous les résultats du tirage en cours ?")?
    {
        println!("Réinitialisation annulée.");
        return Ok(());
    }
    session.reset();
    println!("Session réinitialisée.");
    Ok(())
}

pub fn run_interactive(
    session: &mut DrawSession,
    rng: &mut StdRng,
    wav: Option<&Path>,
) -> Result<()> {
    println!("Bienvenue dans la tombola interactive !");

    loop {
        display_menu(session);
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quitter) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Tirer) => {
                if let Err(e) = cmd_tirer(session, rng, wav) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Resultats) => {
                display::display_results(session.results(), session.settings());
            }
            Some(InteractiveCommand::Apercu) => {
                display::display_overview(session.prizes(), &session.remaining(), session.participants());
            }
            Some(InteractiveCommand::Participants) => {
                if let Err(e) = cmd_participants(session) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Forfait) => {
                if let Err(e) = cmd_forfait(session) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Reglages) => {
                if let Err(e) = cmd_reglages(session) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Exporter) => {
                if let Err(e) = cmd_exporter(session) {
                    println!("Erreur: {e:#}");
                }
            }
            Some(InteractiveCommand::Reinitialiser) => {
                if let Err(e) = cmd_reinitialiser(session) {
                    println!("Erreur: {e:#}");
                }
            }
            None => {
                println!(
                    "Commande inconnue : '{}'. Tapez un numéro (1-9) ou un nom de commande.",
                    input
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Tirer));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Resultats));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Apercu));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Participants));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Forfait));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Reglages));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Exporter));
        assert_eq!(parse_command("8"), Some(InteractiveCommand::Reinitialiser));
        assert_eq!(parse_command("9"), Some(InteractiveCommand::Quitter));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("tirer"), Some(InteractiveCommand::Tirer));
        assert_eq!(parse_command("résultats"), Some(InteractiveCommand::Resultats));
        assert_eq!(parse_command("forfait"), Some(InteractiveCommand::Forfait));
        assert_eq!(parse_command("réglages"), Some(InteractiveCommand::Reglages));
        assert_eq!(parse_command("exporter"), Some(InteractiveCommand::Exporter));
        assert_eq!(parse_command("reinitialiser"), Some(InteractiveCommand::Reinitialiser));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quitter));
    }

    #[test]
    fn test_parse_command_by_alias() {
        assert_eq!(parse_command("t"), Some(InteractiveCommand::Tirer));
        assert_eq!(parse_command("res"), Some(InteractiveCommand::Resultats));
        assert_eq!(parse_command("liste"), Some(InteractiveCommand::Participants));
        assert_eq!(parse_command("reset"), Some(InteractiveCommand::Reinitialiser));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quitter));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quitter));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("TIRER"), Some(InteractiveCommand::Tirer));
        assert_eq!(parse_command("Quitter"), Some(InteractiveCommand::Quitter));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("10"), None);
    }
}

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Result, bail};
use rand::Rng;
use rand::rngs::StdRng;

use crate::engine::{draw_one, eligible};
use crate::models::{DrawMethod, DrawSettings, DrawWinner, Participant, Prize};
use crate::parse::{parse_participants, parse_prizes};
use crate::ritual::RitualPolicy;
use crate::slots::{expand_slots, remaining_slots};

/// Pause entre deux créneaux d'une même action, hors mode rapide.
const SETTLE_PAUSE: Duration = Duration::from_millis(300);

/// Retour de l'observateur pendant le roulement : `CutShort` joue le rôle du
/// rappel de fin de signal qui écourte le rituel sans toucher à la sélection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinControl {
    Continue,
    CutShort,
}

/// Observateur du déroulement d'une action. Les effets (affichage, signal
/// sonore, confettis) vivent ici, jamais dans le moteur de tirage.
pub trait DrawObserver {
    /// Nom cosmétique affiché pendant le roulement, tenu `hold` durant.
    fn on_spin(&mut self, _name: &str, _hold: Duration) -> SpinControl {
        SpinControl::Continue
    }
    /// Le vrai gagnant du créneau vient d'être retenu.
    fn on_reveal(&mut self, _winner: &DrawWinner) {}
    /// Pause de stabilisation entre deux créneaux d'une même action.
    fn on_slot_settled(&mut self, _hold: Duration) {}
    /// Fin d'action : une seule fois, gagnants de cette action uniquement.
    fn on_action_complete(&mut self, _new_winners: &[DrawWinner]) {}
}

/// Observateur muet (mode rapide, tests).
pub struct SilentObserver;

impl DrawObserver for SilentObserver {}

/// Session de tirage : état partagé entre actions, possédé en exclusivité
/// pendant chaque action. Mono-thread, le drapeau `busy` est le seul verrou.
pub struct DrawSession {
    theme: String,
    prize_text: String,
    participant_text: String,
    prizes: Vec<Prize>,
    participants: Vec<Participant>,
    results: Vec<DrawWinner>,
    settings: DrawSettings,
    busy: bool,
}

impl DrawSession {
    pub fn new(theme: &str, prize_text: &str, participant_text: &str, settings: DrawSettings) -> Self {
        Self {
            theme: theme.to_string(),
            prize_text: prize_text.to_string(),
            participant_text: participant_text.to_string(),
            prizes: parse_prizes(prize_text),
            participants: parse_participants(participant_text),
            results: Vec::new(),
            settings,
            busy: false,
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant_text(&self) -> &str {
        &self.participant_text
    }

    pub fn results(&self) -> &[DrawWinner] {
        &self.results
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.theme = theme.to_string();
    }

    /// La file des créneaux est entièrement déterminée par (lots, méthode).
    pub fn all_slots(&self) -> Vec<String> {
        expand_slots(&self.prizes, self.settings.method.reversed())
    }

    pub fn remaining(&self) -> Vec<String> {
        remaining_slots(&self.all_slots(), &self.results).to_vec()
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining().len()
    }

    pub fn next_prize_name(&self) -> Option<String> {
        self.remaining().first().cloned()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_count() == 0
    }

    /// Le texte des lots est verrouillé dès qu'un résultat existe ; la file
    /// des créneaux ne change plus qu'au travers d'une réinitialisation.
    pub fn set_prize_text(&mut self, text: &str) -> Result<()> {
        if !self.results.is_empty() {
            bail!("Les lots ne sont plus modifiables après un premier tirage");
        }
        self.prize_text = text.to_string();
        self.prizes = parse_prizes(text);
        Ok(())
    }

    pub fn prize_text(&self) -> &str {
        &self.prize_text
    }

    /// La liste des participants reste modifiable ; elle n'est relue qu'au
    /// début de l'action suivante.
    pub fn set_participant_text(&mut self, text: &str) {
        self.participant_text = text.to_string();
        self.participants = parse_participants(text);
    }

    /// Changer de méthode re-déroule la file : l'appelant confirme d'abord
    /// quand des résultats existent.
    pub fn set_settings(&mut self, settings: DrawSettings) {
        self.settings = settings;
    }

    /// Forfait : le résultat reste dans la liste, son créneau et son numéro
    /// restent consommés ; seul le nom quitte l'ensemble d'exclusion des
    /// actions futures.
    pub fn mark_removed(&mut self, serial_number: u32) -> Result<()> {
        match self.results.iter_mut().find(|r| r.serial_number == serial_number) {
            Some(r) if r.removed => bail!("Le n°{} est déjà en forfait", serial_number),
            Some(r) => {
                r.removed = true;
                Ok(())
            }
            None => bail!("Aucun résultat avec le n°{}", serial_number),
        }
    }

    /// Efface résultats et état transitoire. La confirmation utilisateur est
    /// du ressort de l'interface.
    pub fn reset(&mut self) {
        self.results.clear();
        self.busy = false;
    }

    /// Une action complète de tirage : remplit un ou plusieurs créneaux selon
    /// la méthode, en séquençant roulement → révélation → stabilisation via
    /// l'observateur. Renvoie les gagnants de cette action.
    ///
    /// L'épuisement de l'ensemble éligible en cours d'action arrête la boucle
    /// en silence : l'acquis est conservé.
    pub fn draw_action(
        &mut self,
        rng: &mut StdRng,
        ritual: &RitualPolicy,
        observer: &mut dyn DrawObserver,
    ) -> Result<Vec<DrawWinner>> {
        if self.busy {
            bail!("Un tirage est déjà en cours");
        }
        if self.participants.is_empty() {
            bail!("La liste des participants est vide");
        }
        let remaining = self.remaining();
        if remaining.is_empty() {
            bail!("Tous les lots ont déjà été tirés");
        }

        self.busy = true;
        let settings = self.settings.clone();

        let mut used: HashSet<String> = HashSet::new();
        if settings.no_duplicate {
            for r in self.results.iter().filter(|r| !r.removed) {
                used.insert(r.winner.name.clone());
            }
        }

        // Créneaux couverts par cette action.
        let span = match settings.method {
            DrawMethod::AllAtOnce => remaining.len(),
            // Toute la quantité restante du prochain lot, en une invocation.
            DrawMethod::StepByStep | DrawMethod::Reverse => {
                let next = &remaining[0];
                remaining.iter().take_while(|s| *s == next).count()
            }
        };

        let delays = ritual.step_delays();
        let mut new_winners: Vec<DrawWinner> = Vec::new();

        for i in 0..span {
            let prize_name = &remaining[i];
            let slot_index = self.results.len();

            // Roulement cosmétique : ré-échantillonne des noms éligibles pour
            // l'affichage seulement, sans jamais influencer la sélection.
            if !settings.fast_mode && !delays.is_empty() {
                let names = eligible(&self.participants, &used, settings.weighted_probability);
                if !names.is_empty() {
                    for delay in &delays {
                        let shown = names[rng.random_range(0..names.len())];
                        if observer.on_spin(&shown.name, *delay) == SpinControl::CutShort {
                            break;
                        }
                    }
                }
            }

            let Some(winner) = draw_one(
                prize_name,
                slot_index,
                &self.participants,
                &mut used,
                &settings,
                rng,
            ) else {
                break;
            };

            observer.on_reveal(&winner);
            self.results.push(winner.clone());
            new_winners.push(winner);

            if !settings.fast_mode && i + 1 < span {
                observer.on_slot_settled(SETTLE_PAUSE);
            }
        }

        observer.on_action_complete(&new_winners);

        // Option « retirer les gagnants de la liste » : le texte participant
        // est réécrit à partir des lignes d'origine des non-gagnants.
        if settings.remove_from_list && settings.no_duplicate && !new_winners.is_empty() {
            let winners: HashSet<&str> = self
                .results
                .iter()
                .filter(|r| !r.removed)
                .map(|r| r.winner.name.as_str())
                .collect();
            let kept: Vec<&str> = self
                .participants
                .iter()
                .filter(|p| !winners.contains(p.name.as_str()))
                .map(|p| p.raw.as_str())
                .collect();
            let text = kept.join("\n");
            self.participant_text = text;
            self.participants = parse_participants(&self.participant_text);
        }

        self.busy = false;
        Ok(new_winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::models::{ResultDisplay, SoundEffect};

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn fast_settings() -> DrawSettings {
        DrawSettings {
            fast_mode: true,
            show_confetti: false,
            sound_effect: SoundEffect::None,
            display_mode: ResultDisplay::InPage,
            ..DrawSettings::default()
        }
    }

    fn draw(session: &mut DrawSession, seed: u64) -> Result<Vec<DrawWinner>> {
        session.draw_action(&mut rng(seed), &RitualPolicy::fast(), &mut SilentObserver)
    }

    #[derive(Default)]
    struct RecordingObserver {
        spins: usize,
        reveals: usize,
        settles: usize,
        completions: usize,
        last_action_size: usize,
        cut_after: Option<usize>,
    }

    impl DrawObserver for RecordingObserver {
        fn on_spin(&mut self, _name: &str, _hold: Duration) -> SpinControl {
            self.spins += 1;
            match self.cut_after {
                Some(n) if self.spins >= n => SpinControl::CutShort,
                _ => SpinControl::Continue,
            }
        }

        fn on_reveal(&mut self, _winner: &DrawWinner) {
            self.reveals += 1;
        }

        fn on_slot_settled(&mut self, _hold: Duration) {
            self.settles += 1;
        }

        fn on_action_complete(&mut self, new_winners: &[DrawWinner]) {
            self.completions += 1;
            self.last_action_size = new_winners.len();
        }
    }

    #[test]
    fn test_step_by_step_fills_whole_tier() {
        // Or;1 puis Argent;2 : première action = 1 créneau, deuxième = 2.
        let mut session = DrawSession::new("Fête", "Or;1\nArgent;2", "A\nB\nC", fast_settings());

        let first = draw(&mut session, 1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].prize_name, "Or");
        assert_eq!(first[0].serial_number, 1);

        let second = draw(&mut session, 2).unwrap();
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|w| w.prize_name == "Argent"));
        assert_eq!(second[0].serial_number, 2);
        assert_eq!(second[1].serial_number, 3);

        assert_eq!(session.results().len(), 3);
        assert!(session.is_exhausted());

        // Pas de doublon sur l'ensemble de la session.
        let names: HashSet<&str> = session.results().iter().map(|r| r.winner.name.as_str()).collect();
        assert_eq!(names.len(), 3);

        // File épuisée : l'action suivante est un refus bloquant.
        assert!(draw(&mut session, 3).is_err());
    }

    #[test]
    fn test_all_at_once_fills_everything() {
        let settings = DrawSettings {
            method: DrawMethod::AllAtOnce,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Or;1\nArgent;2\nBronze;3", "A\nB\nC\nD\nE\nF", settings);

        let winners = draw(&mut session, 5).unwrap();
        assert_eq!(winners.len(), 6);
        assert_eq!(session.results().len(), 6);
        assert!(session.is_exhausted());
        let serials: Vec<u32> = winners.iter().map(|w| w.serial_number).collect();
        assert_eq!(serials, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_reverse_draws_last_prize_first() {
        let settings = DrawSettings {
            method: DrawMethod::Reverse,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Or;1\nBronze;2", "A\nB\nC", settings);

        let first = draw(&mut session, 1).unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|w| w.prize_name == "Bronze"));

        let second = draw(&mut session, 2).unwrap();
        assert_eq!(second[0].prize_name, "Or");
    }

    #[test]
    fn test_empty_participants_is_blocking() {
        let mut session = DrawSession::new("Fête", "Or;1", "", fast_settings());
        let err = draw(&mut session, 1).unwrap_err();
        assert!(err.to_string().contains("participants"));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_pool_exhaustion_mid_action_keeps_partial_results() {
        // 2 participants pour 5 créneaux : l'action s'arrête sans erreur.
        let settings = DrawSettings {
            method: DrawMethod::AllAtOnce,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Lot;5", "A\nB", settings);

        let winners = draw(&mut session, 9).unwrap();
        assert_eq!(winners.len(), 2);
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.remaining_count(), 3);
    }

    #[test]
    fn test_remove_from_list_rewrites_participant_text() {
        let settings = DrawSettings {
            remove_from_list: true,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Or;2", "  Alice 0601\nBob 0602\nChloé 0603", settings);

        let winners = draw(&mut session, 4).unwrap();
        assert_eq!(winners.len(), 2);
        assert_eq!(session.participants().len(), 1);
        // La ligne restante est la ligne d'origine, espaces de bord compris.
        let remaining_raw = session.participant_text();
        assert!(!winners.iter().any(|w| remaining_raw.contains(&w.winner.name)));
    }

    #[test]
    fn test_forfeit_keeps_slot_but_frees_name() {
        let mut session = DrawSession::new("Fête", "Or;1\nArgent;1", "A\nB", fast_settings());

        let first = draw(&mut session, 1).unwrap();
        let first_name = first[0].winner.name.clone();
        session.mark_removed(1).unwrap();

        // Le créneau reste consommé : il ne reste que « Argent ».
        assert_eq!(session.remaining(), vec!["Argent".to_string()]);

        // Le nom forfait peut regagner un autre lot.
        let mut seen = HashSet::new();
        for seed in 0..50 {
            let mut probe = DrawSession::new("Fête", "Or;1\nArgent;1", "A\nB", fast_settings());
            probe.draw_action(&mut rng(1), &RitualPolicy::fast(), &mut SilentObserver).unwrap();
            probe.mark_removed(1).unwrap();
            let second = probe
                .draw_action(&mut rng(seed), &RitualPolicy::fast(), &mut SilentObserver)
                .unwrap();
            seen.insert(second[0].winner.name.clone());
        }
        assert!(
            seen.contains(&first_name),
            "le nom forfait devrait rester éligible: {seen:?}"
        );
    }

    #[test]
    fn test_forfeit_errors() {
        let mut session = DrawSession::new("Fête", "Or;1", "A", fast_settings());
        assert!(session.mark_removed(1).is_err());

        draw(&mut session, 1).unwrap();
        session.mark_removed(1).unwrap();
        assert!(session.mark_removed(1).is_err());
    }

    #[test]
    fn test_serials_stable_after_forfeit() {
        let settings = DrawSettings {
            method: DrawMethod::AllAtOnce,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Lot;3", "A\nB\nC", settings);
        draw(&mut session, 2).unwrap();

        session.mark_removed(2).unwrap();
        let serials: Vec<u32> = session.results().iter().map(|r| r.serial_number).collect();
        assert_eq!(serials, vec![1, 2, 3]);
        assert!(session.results()[1].removed);
    }

    #[test]
    fn test_prize_text_locked_after_results() {
        let mut session = DrawSession::new("Fête", "Or;1\nArgent;1", "A\nB", fast_settings());
        session.set_prize_text("Or;2").unwrap();
        assert_eq!(session.all_slots().len(), 2);

        draw(&mut session, 1).unwrap();
        assert!(session.set_prize_text("Or;5").is_err());
    }

    #[test]
    fn test_reset_clears_results_and_unlocks() {
        let mut session = DrawSession::new("Fête", "Or;1", "A\nB", fast_settings());
        draw(&mut session, 1).unwrap();
        assert!(session.is_exhausted());

        session.reset();
        assert!(session.results().is_empty());
        assert!(!session.is_exhausted());
        assert!(session.set_prize_text("Or;2").is_ok());
    }

    #[test]
    fn test_participant_edits_read_at_next_action() {
        let mut session = DrawSession::new("Fête", "Or;1\nArgent;1", "A", fast_settings());
        draw(&mut session, 1).unwrap();

        session.set_participant_text("B\nC");
        let second = draw(&mut session, 2).unwrap();
        assert_ne!(second[0].winner.name, "A");
    }

    #[test]
    fn test_observer_sequencing_standard_ritual() {
        let settings = DrawSettings {
            fast_mode: false,
            method: DrawMethod::AllAtOnce,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Lot;2", "A\nB\nC", settings);
        let mut observer = RecordingObserver::default();

        session
            .draw_action(&mut rng(3), &RitualPolicy::standard(), &mut observer)
            .unwrap();

        assert_eq!(observer.reveals, 2);
        assert_eq!(observer.spins, 24, "12 roulements par créneau");
        assert_eq!(observer.settles, 1, "pause entre les deux créneaux seulement");
        assert_eq!(observer.completions, 1, "une seule fin d'action");
        assert_eq!(observer.last_action_size, 2);
    }

    #[test]
    fn test_observer_can_cut_ritual_short() {
        let mut session = DrawSession::new("Fête", "Lot;1", "A\nB\nC", DrawSettings::default());
        let mut observer = RecordingObserver {
            cut_after: Some(4),
            ..RecordingObserver::default()
        };

        session
            .draw_action(&mut rng(3), &RitualPolicy::standard(), &mut observer)
            .unwrap();

        assert_eq!(observer.spins, 4);
        assert_eq!(observer.reveals, 1);
    }

    #[test]
    fn test_fast_mode_skips_ritual_entirely() {
        let mut session = DrawSession::new("Fête", "Lot;2", "A\nB\nC", fast_settings());
        let mut observer = RecordingObserver::default();

        session
            .draw_action(&mut rng(3), &RitualPolicy::standard(), &mut observer)
            .unwrap();

        assert_eq!(observer.spins, 0);
        assert_eq!(observer.settles, 0);
        assert_eq!(observer.reveals, 2);
    }

    #[test]
    fn test_results_never_exceed_slot_count() {
        let settings = DrawSettings {
            method: DrawMethod::AllAtOnce,
            no_duplicate: false,
            ..fast_settings()
        };
        let mut session = DrawSession::new("Fête", "Lot;4", "A\nB", settings);

        draw(&mut session, 1).unwrap();
        assert_eq!(session.results().len(), 4);
        assert!(draw(&mut session, 2).is_err());
        assert_eq!(session.results().len(), session.all_slots().len());
    }
}

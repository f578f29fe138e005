use std::io::Write;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use tombola_core::models::{DrawSettings, DrawWinner, ResultDisplay};
use tombola_core::session::{DrawObserver, SpinControl};

use crate::display;
use crate::effects::{self, CueSession};

/// Rendu terminal du rituel : noms en roulement sur une seule ligne, signal
/// sonore à la révélation, confettis une fois l'action terminée.
pub struct TerminalRitual {
    settings: DrawSettings,
    cue: CueSession,
    cue_deadline: Option<Duration>,
    spin_started: Option<Instant>,
    total_results: usize,
}

impl TerminalRitual {
    pub fn new(settings: &DrawSettings, total_results: usize) -> Self {
        Self {
            settings: settings.clone(),
            cue: CueSession::start(settings.sound_effect),
            // Le signal synthétisé borne aussi le roulement : à sa fin, le
            // rituel est écourté plutôt que d'attendre les minuteries.
            cue_deadline: effects::tone_duration(settings.sound_effect),
            spin_started: None,
            total_results,
        }
    }
}

impl DrawObserver for TerminalRitual {
    fn on_spin(&mut self, name: &str, hold: Duration) -> SpinControl {
        let started = *self.spin_started.get_or_insert_with(Instant::now);

        print!("\r   🎲 {name}        ");
        let _ = std::io::stdout().flush();
        std::thread::sleep(hold);

        match self.cue_deadline {
            Some(deadline) if started.elapsed() >= deadline => SpinControl::CutShort,
            _ => SpinControl::Continue,
        }
    }

    fn on_reveal(&mut self, winner: &DrawWinner) {
        self.spin_started = None;
        self.cue.play_reveal();

        print!("\r{}", " ".repeat(40));
        if self.settings.show_serial_number {
            println!("\r  🏆 #{} {} → {}", winner.serial_number, winner.prize_name, winner.winner.name);
        } else {
            println!("\r  🏆 {} → {}", winner.prize_name, winner.winner.name);
        }

        if !self.settings.fast_mode {
            if let Some(hold) = effects::tone_duration(self.settings.sound_effect) {
                std::thread::sleep(hold);
            }
        }
    }

    fn on_slot_settled(&mut self, hold: Duration) {
        std::thread::sleep(hold);
    }

    fn on_action_complete(&mut self, new_winners: &[DrawWinner]) {
        self.cue.stop();
        if new_winners.is_empty() {
            println!("Plus personne d'éligible : tirage interrompu.");
            return;
        }

        if self.settings.show_confetti {
            let mut rng = StdRng::from_rng(&mut rand::rng());
            effects::confetti(&mut rng, self.settings.fast_mode);
        }

        if self.settings.display_mode == ResultDisplay::Popup {
            display::display_action_summary(new_winners, self.total_results + new_winners.len());
        }
    }
}

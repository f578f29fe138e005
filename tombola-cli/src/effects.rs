use std::io::Write;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;

use tombola_core::models::{DrawSettings, SoundEffect};
use tombola_core::ritual::RitualPolicy;

/// Durées utiles des signaux synthétisés (enveloppes d'origine).
const TONE1_DURATION: Duration = Duration::from_millis(300);
const TONE2_DURATION: Duration = Duration::from_millis(500);

/// Silence d'amorce supposé d'un signal WAV externe.
const FILE_CUE_LEAD_IN: Duration = Duration::from_millis(400);

/// Ressource audio à portée d'action : démarrée en début d'action, arrêtée
/// sur chaque chemin de sortie grâce au Drop — y compris l'arrêt anticipé
/// sur bassin épuisé. Un échec du terminal ne bloque jamais le tirage.
pub struct CueSession {
    effect: SoundEffect,
    active: bool,
}

impl CueSession {
    pub fn start(effect: SoundEffect) -> Self {
        Self {
            effect,
            active: effect != SoundEffect::None,
        }
    }

    /// Signal de révélation : cloche du terminal, tenue selon l'enveloppe.
    pub fn play_reveal(&mut self) {
        if !self.active {
            return;
        }
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::warn!("Signal sonore indisponible : {e}");
            self.active = false;
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

impl Drop for CueSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Politique de rituel dérivée des réglages : le mode rapide écrase tout,
/// un signal WAV externe cale le rituel sur sa durée utile, le reste suit
/// l'enveloppe standard.
pub fn ritual_policy(settings: &DrawSettings, wav: Option<&Path>) -> RitualPolicy {
    if settings.fast_mode {
        return RitualPolicy::fast();
    }
    if settings.sound_effect == SoundEffect::File {
        if let Some(path) = wav {
            match wav_duration(path) {
                Ok(total) => {
                    let effective = total.saturating_sub(FILE_CUE_LEAD_IN);
                    if !effective.is_zero() {
                        return RitualPolicy::synced(FILE_CUE_LEAD_IN, effective);
                    }
                    log::warn!("Signal {:?} trop court, rituel standard", path);
                }
                Err(e) => log::warn!("Signal {:?} illisible ({e}), rituel standard", path),
            }
        } else {
            log::warn!("Aucun fichier WAV fourni pour le signal, rituel standard");
        }
    }
    RitualPolicy::standard()
}

/// Durée utile d'un effet synthétisé, `None` pour le silence.
pub fn tone_duration(effect: SoundEffect) -> Option<Duration> {
    match effect {
        SoundEffect::Tone1 => Some(TONE1_DURATION),
        SoundEffect::Tone2 => Some(TONE2_DURATION),
        SoundEffect::None | SoundEffect::File => None,
    }
}

fn wav_duration(path: &Path) -> anyhow::Result<Duration> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let secs = f64::from(reader.duration()) / f64::from(spec.sample_rate);
    Ok(Duration::from_secs_f64(secs))
}

const PARTICLES: [&str; 5] = ["🎉", "✨", "🎊", "⭐", "🎈"];

/// Pluie de confettis : une seule rafale par action, jamais par créneau.
pub fn confetti(rng: &mut StdRng, fast: bool) {
    for _ in 0..6 {
        let mut line = String::new();
        for _ in 0..rng.random_range(3..8) {
            for _ in 0..rng.random_range(0..6usize) {
                line.push(' ');
            }
            line.push_str(PARTICLES[rng.random_range(0..PARTICLES.len())]);
        }
        println!("{line}");
        if !fast {
            std::thread::sleep(Duration::from_millis(120));
        }
    }
}

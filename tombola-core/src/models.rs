use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prize {
    pub id: usize,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: usize,
    /// Clé d'appariement et nom affiché (ligne sans espaces de bord).
    pub name: String,
    /// Ligne d'origine, conservée telle quelle pour réécrire la liste.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawWinner {
    pub prize_name: String,
    pub winner: Participant,
    /// Numéro d'ordre = indice du créneau + 1, attribué une seule fois.
    pub serial_number: u32,
    /// Forfait : le gain est invalidé, le créneau et le numéro restent acquis.
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMethod {
    /// Chaque action tire toute la quantité restante du prochain lot.
    #[default]
    StepByStep,
    /// Une action tire tous les créneaux restants.
    AllAtOnce,
    /// Mécanique identique à StepByStep sur la file inversée.
    Reverse,
}

impl DrawMethod {
    pub fn reversed(&self) -> bool {
        matches!(self, DrawMethod::Reverse)
    }
}

impl std::fmt::Display for DrawMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawMethod::StepByStep => write!(f, "lot par lot"),
            DrawMethod::AllAtOnce => write!(f, "tout d'un coup"),
            DrawMethod::Reverse => write!(f, "ordre inverse"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultDisplay {
    /// Liste cumulative affichée en continu.
    #[default]
    InPage,
    /// Panneau récapitulatif des gagnants de la dernière action.
    Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    None,
    /// Balayage montant 400 → 1200 Hz, 0,3 s.
    Tone1,
    /// Accord C5 + E5, 0,5 s.
    Tone2,
    /// Signal WAV externe, rituel synchronisé sur sa durée utile.
    File,
}

impl std::fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundEffect::None => write!(f, "aucun"),
            SoundEffect::Tone1 => write!(f, "signal 1"),
            SoundEffect::Tone2 => write!(f, "signal 2"),
            SoundEffect::File => write!(f, "fichier"),
        }
    }
}

/// Réglages d'une session. Valeur lue en début d'action, jamais mutée en cours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub method: DrawMethod,
    pub no_duplicate: bool,
    pub remove_from_list: bool,
    /// Déclaré mais non câblé dans l'éligibilité (compatibilité des fichiers
    /// de réglages uniquement).
    pub allow_multiple_prizes: bool,
    pub weighted_probability: bool,
    pub display_mode: ResultDisplay,
    pub show_serial_number: bool,
    pub vertical_result: bool,
    pub sound_effect: SoundEffect,
    pub show_confetti: bool,
    pub fast_mode: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            method: DrawMethod::StepByStep,
            no_duplicate: true,
            remove_from_list: false,
            allow_multiple_prizes: false,
            weighted_probability: true,
            display_mode: ResultDisplay::InPage,
            show_serial_number: true,
            vertical_result: true,
            sound_effect: SoundEffect::Tone1,
            show_confetti: true,
            fast_mode: false,
        }
    }
}

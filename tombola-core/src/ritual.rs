use std::time::Duration;

/// Enveloppe historique du roulement : 12 étapes de 50 ms + 8 ms par étape.
const BASE_STEP_MS: u64 = 50;
const STEP_INCREMENT_MS: u64 = 8;
const STANDARD_STEPS: usize = 12;

/// Politique de rythme du rituel d'un créneau, découplée de tout fichier
/// audio : un signal alternatif ou le mode rapide fournissent simplement
/// d'autres valeurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RitualPolicy {
    /// Nombre de noms cosmétiques affichés avant la révélation.
    pub spin_steps: usize,
    /// Silence d'amorce du signal, ignoré dans le décompte utile.
    pub lead_in: Duration,
    /// Durée utile totale : la somme des délais d'étapes doit l'égaler.
    pub effective: Duration,
}

impl RitualPolicy {
    pub fn standard() -> Self {
        let total: u64 = (0..STANDARD_STEPS as u64)
            .map(|s| BASE_STEP_MS + s * STEP_INCREMENT_MS)
            .sum();
        Self {
            spin_steps: STANDARD_STEPS,
            lead_in: Duration::ZERO,
            effective: Duration::from_millis(total),
        }
    }

    /// Aucune étape, aucun délai : la sélection reste inchangée.
    pub fn fast() -> Self {
        Self {
            spin_steps: 0,
            lead_in: Duration::ZERO,
            effective: Duration::ZERO,
        }
    }

    /// Rituel calé sur la durée utile d'un signal externe.
    pub fn synced(lead_in: Duration, effective: Duration) -> Self {
        Self {
            spin_steps: STANDARD_STEPS,
            lead_in,
            effective,
        }
    }

    /// Délais par étape : forme croissante 50 + 8·s remise à l'échelle pour
    /// que la somme égale `effective`.
    pub fn step_delays(&self) -> Vec<Duration> {
        if self.spin_steps == 0 || self.effective.is_zero() {
            return vec![Duration::ZERO; self.spin_steps];
        }
        let raw: Vec<u64> = (0..self.spin_steps as u64)
            .map(|s| BASE_STEP_MS + s * STEP_INCREMENT_MS)
            .collect();
        let sum: u64 = raw.iter().sum();
        raw.iter()
            .map(|&r| Duration::from_secs_f64(self.effective.as_secs_f64() * r as f64 / sum as f64))
            .collect()
    }
}

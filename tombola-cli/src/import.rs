use std::path::Path;

use anyhow::{Context, Result};

use tombola_core::models::DrawSettings;

/// Lecture brute d'un fichier de liste : le contenu remplace le texte
/// participant tel quel, sans négociation d'encodage.
pub fn read_list(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Impossible de lire {:?}", path))
}

/// Fichier de réglages JSON optionnel. Les champs absents reprennent les
/// valeurs par défaut.
pub fn load_settings(path: &Path) -> Result<DrawSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire les réglages {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Réglages invalides dans {:?}", path))
}

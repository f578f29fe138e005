use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::DrawWinner;

/// BOM UTF-8 en tête de fichier, pour l'ouverture directe dans un tableur.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Exporte tous les résultats, forfaits compris, en CSV horodaté dans `dir`.
/// Zéro résultat = aucun fichier produit.
pub fn export_csv(theme: &str, results: &[DrawWinner], dir: &Path) -> Result<Option<PathBuf>> {
    if results.is_empty() {
        return Ok(None);
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{}_resultats_{}.csv", sanitize_theme(theme), stamp));

    let mut file =
        File::create(&path).with_context(|| format!("Impossible de créer {:?}", path))?;
    file.write_all(BOM).context("Échec de l'écriture du BOM")?;

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(["numero", "lot", "gagnant", "statut"])
        .context("Échec de l'écriture de l'en-tête")?;
    for r in results {
        let statut = if r.removed { "forfait" } else { "gagné" };
        writer
            .write_record([
                r.serial_number.to_string().as_str(),
                r.prize_name.as_str(),
                r.winner.name.as_str(),
                statut,
            ])
            .with_context(|| format!("Échec de l'écriture du n°{}", r.serial_number))?;
    }
    writer.flush().context("Échec de l'écriture du fichier CSV")?;

    Ok(Some(path))
}

fn sanitize_theme(theme: &str) -> String {
    let cleaned: String = theme
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.chars().all(|c| c == '_') {
        "tombola".to_string()
    } else {
        cleaned
    }
}

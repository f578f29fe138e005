mod display;
mod effects;
mod import;
mod interactive;
mod ritual;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tombola_core::export::export_csv;
use tombola_core::models::{DrawMethod, DrawSettings, ResultDisplay, SoundEffect};
use tombola_core::parse::parse_participants;
use tombola_core::session::DrawSession;

use crate::import::{load_settings, read_list};
use crate::ritual::TerminalRitual;

const DEFAULT_PRIZES: &str = "Lot spécial;1\nPremier lot;2\nDeuxième lot;5";
const DEFAULT_PARTICIPANTS: &str = "Participant A\nParticipant B\nParticipant C";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Lot par lot : chaque action tire la quantité restante du prochain lot
    Lots,
    /// Tout d'un coup : une action tire tous les créneaux restants
    Tout,
    /// Ordre inverse : mécanique identique sur la file inversée
    Inverse,
}

impl From<MethodArg> for DrawMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Lots => DrawMethod::StepByStep,
            MethodArg::Tout => DrawMethod::AllAtOnce,
            MethodArg::Inverse => DrawMethod::Reverse,
        }
    }
}

#[derive(Parser)]
#[command(name = "tombola", about = "Tirage au sort de lots en terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lancer un tirage complet depuis des fichiers
    Tirer {
        /// Fichier des lots (une ligne par lot : nom;quantité)
        #[arg(short, long)]
        lots: PathBuf,

        /// Fichier des participants (une ligne par personne)
        #[arg(short, long)]
        participants: PathBuf,

        /// Thème de l'événement (nom du fichier d'export)
        #[arg(short, long, default_value = "Tombola")]
        theme: String,

        /// Méthode de tirage
        #[arg(short, long, value_enum, default_value = "lots")]
        methode: MethodArg,

        /// Fichier de réglages JSON (les drapeaux ci-dessous l'emportent)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Mode rapide : aucun rituel, aucun délai
        #[arg(long)]
        rapide: bool,

        /// Autoriser un même nom à gagner plusieurs fois
        #[arg(long)]
        doublons: bool,

        /// Ignorer les répétitions de la liste (tirage non pondéré)
        #[arg(long)]
        sans_ponderation: bool,

        /// Fichier WAV du signal sonore (rituel synchronisé sur sa durée)
        #[arg(long)]
        son: Option<PathBuf>,

        /// Répertoire d'export CSV des résultats
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Prévisualiser lots, créneaux et participants sans tirer
    Apercu {
        /// Fichier des lots
        #[arg(short, long)]
        lots: PathBuf,

        /// Fichier des participants
        #[arg(short, long)]
        participants: PathBuf,

        /// Prévisualiser la file inversée
        #[arg(long)]
        inverse: bool,
    },

    /// Estimer les fréquences de gain par simulation
    Simuler {
        /// Fichier des participants
        #[arg(short, long)]
        participants: PathBuf,

        /// Nombre d'essais indépendants
        #[arg(short, long, default_value = "10000")]
        essais: u32,

        /// Ignorer les répétitions de la liste
        #[arg(long)]
        sans_ponderation: bool,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Mode interactif (REPL)
    Interactif {
        /// Fichier des lots (exemple intégré si absent)
        #[arg(short, long)]
        lots: Option<PathBuf>,

        /// Fichier des participants (exemple intégré si absent)
        #[arg(short, long)]
        participants: Option<PathBuf>,

        /// Thème de l'événement
        #[arg(short, long, default_value = "Tombola")]
        theme: String,

        /// Fichier de réglages JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fichier WAV du signal sonore
        #[arg(long)]
        son: Option<PathBuf>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tirer {
            lots,
            participants,
            theme,
            methode,
            config,
            rapide,
            doublons,
            sans_ponderation,
            son,
            export,
            seed,
        } => cmd_tirer(
            &lots,
            &participants,
            &theme,
            methode,
            config.as_deref(),
            rapide,
            doublons,
            sans_ponderation,
            son.as_deref(),
            export.as_deref(),
            seed,
        ),
        Command::Apercu {
            lots,
            participants,
            inverse,
        } => cmd_apercu(&lots, &participants, inverse),
        Command::Simuler {
            participants,
            essais,
            sans_ponderation,
            seed,
        } => cmd_simuler(&participants, essais, sans_ponderation, seed),
        Command::Interactif {
            lots,
            participants,
            theme,
            config,
            son,
            seed,
        } => cmd_interactif(
            lots.as_deref(),
            participants.as_deref(),
            &theme,
            config.as_deref(),
            son.as_deref(),
            seed,
        ),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn build_settings(
    config: Option<&Path>,
    methode: Option<MethodArg>,
    rapide: bool,
    doublons: bool,
    sans_ponderation: bool,
    son: Option<&Path>,
) -> Result<DrawSettings> {
    let mut settings = match config {
        Some(path) => load_settings(path)?,
        None => DrawSettings::default(),
    };
    if let Some(m) = methode {
        settings.method = m.into();
    }
    if rapide {
        settings.fast_mode = true;
    }
    if doublons {
        settings.no_duplicate = false;
    }
    if sans_ponderation {
        settings.weighted_probability = false;
    }
    if son.is_some() {
        settings.sound_effect = SoundEffect::File;
    }
    Ok(settings)
}

#[allow(clippy::too_many_arguments)]
fn cmd_tirer(
    lots: &Path,
    participants: &Path,
    theme: &str,
    methode: MethodArg,
    config: Option<&Path>,
    rapide: bool,
    doublons: bool,
    sans_ponderation: bool,
    son: Option<&Path>,
    export: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let prize_text = read_list(lots)?;
    let participant_text = read_list(participants)?;
    let settings = build_settings(config, Some(methode), rapide, doublons, sans_ponderation, son)?;

    let mut session = DrawSession::new(theme, &prize_text, &participant_text, settings.clone());
    let mut rng = make_rng(seed);
    let policy = effects::ritual_policy(&settings, son);

    println!(
        "{} : {} créneau(x), {} participant(s), méthode « {} »",
        theme,
        session.all_slots().len(),
        session.participants().len(),
        settings.method
    );

    while !session.is_exhausted() {
        let mut observer = TerminalRitual::new(&settings, session.results().len());
        let winners = session.draw_action(&mut rng, &policy, &mut observer)?;
        if winners.is_empty() {
            // Bassin épuisé : on garde l'acquis et on s'arrête là.
            break;
        }
    }

    if settings.display_mode == ResultDisplay::InPage {
        display::display_results(session.results(), &settings);
    }

    if let Some(dir) = export {
        match export_csv(session.theme(), session.results(), dir)? {
            Some(path) => println!("Résultats exportés : {}", path.display()),
            None => println!("Aucun résultat à exporter."),
        }
    }
    Ok(())
}

fn cmd_apercu(lots: &Path, participants: &Path, inverse: bool) -> Result<()> {
    let prize_text = read_list(lots)?;
    let participant_text = read_list(participants)?;

    let prizes = tombola_core::parse::parse_prizes(&prize_text);
    let slots = tombola_core::slots::expand_slots(&prizes, inverse);
    let pool = parse_participants(&participant_text);

    display::display_overview(&prizes, &slots, &pool);
    Ok(())
}

fn cmd_simuler(participants: &Path, essais: u32, sans_ponderation: bool, seed: Option<u64>) -> Result<()> {
    let pool = parse_participants(&read_list(participants)?);
    if pool.is_empty() {
        println!("La liste des participants est vide.");
        return Ok(());
    }

    let pb = ProgressBar::new(u64::from(essais));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} essais")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut rng = make_rng(seed);
    let counts = simulate::run(&pool, essais, !sans_ponderation, &mut rng, || pb.inc(1));
    pb.finish_and_clear();

    display::display_frequencies(&counts, essais);
    Ok(())
}

fn cmd_interactif(
    lots: Option<&Path>,
    participants: Option<&Path>,
    theme: &str,
    config: Option<&Path>,
    son: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let prize_text = match lots {
        Some(path) => read_list(path)?,
        None => DEFAULT_PRIZES.to_string(),
    };
    let participant_text = match participants {
        Some(path) => read_list(path)?,
        None => DEFAULT_PARTICIPANTS.to_string(),
    };
    let settings = build_settings(config, None, false, false, false, son)?;

    let mut session = DrawSession::new(theme, &prize_text, &participant_text, settings);
    let mut rng = make_rng(seed);
    interactive::run_interactive(&mut session, &mut rng, son)
}

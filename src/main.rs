//! Flappy Gym demo host
//!
//! Evaluates a population of random single-neuron policies over a few seeded
//! episodes and prints the best of them as JSON. The real optimizer lives
//! outside this crate; this just exercises the environment end to end.
//!
//! Usage: `flappy-gym [seed] [population] [episodes] [config.json]`

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use flappy_gym::hall_of_fame::HallEntry;
use flappy_gym::sim::{Arena, EpisodeOutcome, Entrant, SpriteSet, run_episode_headless};
use flappy_gym::{HallOfFame, LinearPolicy, SimConfig, SimError};

#[derive(Debug, Serialize)]
struct Report {
    config: SimConfig,
    episodes: Vec<EpisodeOutcome>,
    hall_of_fame: HallOfFame,
}

fn arg_or<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn run(
    seed: u64,
    population: usize,
    episodes: u64,
    config_json: Option<&str>,
) -> Result<Report, SimError> {
    let config = match config_json {
        Some(json) => SimConfig::from_json_str(json)?,
        None => SimConfig::default(),
    };
    let arena = Arena::new(config, SpriteSet::builtin())?;
    let max_score = arena.config().max_score;
    let mut rng = Pcg32::seed_from_u64(seed);
    let policies: Vec<LinearPolicy> = (0..population)
        .map(|_| LinearPolicy::random(&mut rng))
        .collect();

    let mut hall_of_fame = HallOfFame::new();
    let mut outcomes = Vec::new();

    for episode in 0..episodes {
        let episode_seed = seed.wrapping_add(episode);
        let mut fitness = vec![0.0; population];
        let outcome = {
            let mut entrants: Vec<Entrant> = policies
                .iter()
                .zip(fitness.iter_mut())
                .map(|(p, f)| Entrant::new(p, f))
                .collect();
            run_episode_headless(&arena, &mut entrants, episode_seed, max_score)?
        };

        log::info!(
            "Episode {}: {:?}, score {}, {} ticks",
            episode,
            outcome.reason,
            outcome.score,
            outcome.ticks
        );

        for (i, (policy, f)) in policies.iter().zip(fitness.iter()).enumerate() {
            let entry = HallEntry {
                agent: i,
                policy: policy.clone(),
                fitness: *f,
                score: outcome.score,
                ticks: outcome.ticks,
                seed: episode_seed,
            };
            if let Some(place) = hall_of_fame.record(entry) {
                log::debug!("Agent {} entered the hall of fame at #{}", i, place);
            }
        }
        outcomes.push(outcome);
    }

    if let Some(best) = hall_of_fame.best() {
        log::info!(
            "Best agent {}: fitness {:.1}, score {} (seed {})",
            best.agent,
            best.fitness,
            best.score,
            best.seed
        );
    }

    Ok(Report {
        config: arena.config().clone(),
        episodes: outcomes,
        hall_of_fame,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Gym starting...");

    let args: Vec<String> = std::env::args().collect();
    let seed = arg_or(&args, 1, 42u64);
    let population = arg_or(&args, 2, 50usize);
    let episodes = arg_or(&args, 3, 3u64);
    let config_json = match args.get(4) {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to read config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    match run(seed, population, episodes, config_json.as_deref()) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to encode report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}

//! Fixed timestep simulation tick
//!
//! Advances an episode by one step and applies the fitness policy to the
//! entrants' accumulators.

use super::collision::{bird_pipe_collision, out_of_bounds};
use super::state::{Arena, Entrant, EpisodeState, Phase, TerminationReason};
use crate::error::SimError;
use crate::policy::Observation;

/// Advance the episode by one tick
///
/// `entrants[i]` drives the bird created for slot `i`. Returns the phase after
/// the tick; ticking a terminated episode does nothing.
pub fn tick(
    state: &mut EpisodeState,
    arena: &Arena,
    entrants: &mut [Entrant<'_>],
) -> Result<Phase, SimError> {
    if entrants.len() != state.population {
        return Err(SimError::PopulationMismatch {
            expected: state.population,
            actual: entrants.len(),
        });
    }
    if state.phase.is_terminated() {
        return Ok(state.phase);
    }

    if state.birds.is_empty() {
        log::info!(
            "Episode (seed {}) ended: all birds eliminated at tick {}, score {}",
            state.seed,
            state.time_ticks,
            state.score
        );
        state.phase = Phase::Terminated(TerminationReason::AllAgentsEliminated);
        return Ok(state.phase);
    }

    state.time_ticks += 1;
    let config = arena.config();
    let sprites = arena.sprites();

    // Everyone looks at the same pipe this tick
    let (lead_top, lead_bottom) = state
        .lead_pipe()
        .map(|p| (p.top, p.bottom))
        .unwrap_or((0.0, config.floor_y));

    // --- MOVE + DECIDE ---
    for bird in &mut state.birds {
        bird.advance(config);
        let entrant = &mut entrants[bird.slot];
        *entrant.fitness += config.survival_reward;

        let observation = Observation::new(bird.pos.y, lead_top, lead_bottom);
        if entrant.policy.decide(observation) {
            bird.jump(config);
        }
    }

    // --- PIPES ---
    // Eliminations are flagged against a stable snapshot and applied afterwards
    let mut eliminated = vec![false; state.birds.len()];
    let mut cleared = false;
    let mut offscreen = Vec::new();

    for pipe in &mut state.pipes {
        for (i, bird) in state.birds.iter().enumerate() {
            if eliminated[i] {
                continue;
            }

            if let Some(contact) = bird_pipe_collision(bird, pipe, sprites) {
                *entrants[bird.slot].fitness -= config.collision_penalty;
                eliminated[i] = true;
                log::debug!(
                    "Tick {}: bird {} hit {:?} of pipe {} at {:?}",
                    state.time_ticks,
                    bird.slot,
                    contact.part,
                    pipe.id,
                    contact.point
                );
            }

            // A bird that just collided still counts toward clearing this pipe
            if pipe.mark_passed(bird.pos.x) {
                cleared = true;
            }
        }

        if pipe.is_offscreen() {
            offscreen.push(pipe.id);
        }
        pipe.advance(config.scroll_velocity);
    }

    if eliminated.iter().any(|&e| e) {
        let mut flags = eliminated.iter();
        state
            .birds
            .retain(|_| !flags.next().copied().unwrap_or(false));
    }

    // --- SCORING ---
    if cleared {
        state.score += 1;
        for bird in &state.birds {
            *entrants[bird.slot].fitness += config.clear_bonus;
        }
        log::debug!(
            "Tick {}: score {} ({} birds alive)",
            state.time_ticks,
            state.score,
            state.birds.len()
        );
        state.spawn_pipe(arena, config.spawn_pipe_x);
    }

    if !offscreen.is_empty() {
        state.pipes.retain(|p| !offscreen.contains(&p.id));
        log::debug!("Tick {}: culled pipes {:?}", state.time_ticks, offscreen);
    }

    // --- GROUND / CEILING ---
    let time_ticks = state.time_ticks;
    state.birds.retain(|bird| {
        let gone = out_of_bounds(bird, sprites, config.floor_y);
        if gone {
            log::debug!(
                "Tick {}: bird {} left the play area at y={}",
                time_ticks,
                bird.slot,
                bird.pos.y
            );
        }
        !gone
    });

    if state.score > state.max_score {
        log::info!(
            "Episode (seed {}) ended: score {} reached at tick {}",
            state.seed,
            state.score,
            state.time_ticks
        );
        state.phase = Phase::Terminated(TerminationReason::ScoreThresholdReached);
        return Ok(state.phase);
    }

    state.floor.advance(config.scroll_velocity);
    for bird in &mut state.birds {
        bird.animate(config);
    }

    log::trace!(
        "Tick {}: {} birds, {} pipes, score {}",
        state.time_ticks,
        state.birds.len(),
        state.pipes.len(),
        state.score
    );

    Ok(state.phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::mask::SpriteSet;

    fn never(_: Observation) -> bool {
        false
    }

    /// Flap whenever the bird sinks below y = 400
    fn hover(obs: Observation) -> bool {
        obs.y > 400.0
    }

    fn near_bottom(obs: Observation) -> bool {
        obs.bottom_distance < 80.0
    }

    fn fixed_gap_arena() -> Arena {
        Arena::new(SimConfig::default().with_fixed_gap(300), SpriteSet::builtin()).unwrap()
    }

    #[test]
    fn test_never_jump_falls_to_floor() {
        let arena = Arena::default();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);
        let mut last_y = state.birds[0].pos.y;

        loop {
            let mut entrants = [Entrant::new(&never, &mut fitness)];
            let phase = tick(&mut state, &arena, &mut entrants).unwrap();
            if phase.is_terminated() {
                break;
            }
            if let Some(bird) = state.birds.first() {
                assert!(bird.pos.y > last_y, "falls monotonically");
                last_y = bird.pos.y;
            }
        }

        assert_eq!(
            state.phase,
            Phase::Terminated(TerminationReason::AllAgentsEliminated)
        );
        // 350 + 1.5 + 6 + 13.5 + 16 * 20 = 691, and 691 + 48 >= 730
        assert_eq!(state.time_ticks, 23);
        assert!((fitness - 2.3).abs() < 1e-9, "fitness = {fitness}");
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hover_reaches_score_cap() {
        let arena = fixed_gap_arena();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 3, 1, 250);

        let phase = loop {
            let mut entrants = [Entrant::new(&hover, &mut fitness)];
            let phase = tick(&mut state, &arena, &mut entrants).unwrap();
            if phase.is_terminated() {
                break phase;
            }
            assert_eq!(state.birds.len(), 1, "bird died at tick {}", state.time_ticks);
        };

        assert_eq!(
            phase,
            Phase::Terminated(TerminationReason::ScoreThresholdReached)
        );
        assert_eq!(state.score, 251);
        assert_eq!(state.birds.len(), 1);
        let expected = state.time_ticks as f64 * 0.1 + 251.0 * 10.0;
        assert!((fitness - expected).abs() < 1e-6);
    }

    #[test]
    fn test_clear_bonus_skips_birds_eliminated_this_tick() {
        let arena = fixed_gap_arena();
        let mut fit_a = 0.0;
        let mut fit_b = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 2, 250);

        // Pipe just past the birds, opening at 300..500
        state.pipes[0].x = 228.0;
        // Bird 0 inside the top pipe, bird 1 in the opening
        state.birds[0].pos.y = 100.0;
        state.birds[1].pos.y = 350.0;

        {
            let mut entrants = [
                Entrant::new(&never, &mut fit_a),
                Entrant::new(&never, &mut fit_b),
            ];
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        assert_eq!(state.score, 1);
        assert_eq!(state.birds.len(), 1);
        assert_eq!(state.birds[0].slot, 1);
        assert!((fit_a - (0.1 - 1.0)).abs() < 1e-9);
        assert!((fit_b - (0.1 + 10.0)).abs() < 1e-9);
        // Cleared pipe triggered exactly one spawn
        assert_eq!(state.pipes.len(), 2);
        assert_eq!(state.pipes[1].x, 600.0);
        assert!(state.pipes[0].has_been_passed());
    }

    #[test]
    fn test_colliding_bird_still_clears_pipe() {
        let arena = fixed_gap_arena();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);

        // The only bird is inside the top pipe as it gets past it
        state.pipes[0].x = 228.0;
        state.birds[0].pos.y = 100.0;

        {
            let mut entrants = [Entrant::new(&never, &mut fitness)];
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        assert!(state.birds.is_empty());
        assert_eq!(state.score, 1);
        assert!(state.pipes[0].has_been_passed());
        assert_eq!(state.pipes.len(), 2);
        // Nobody left alive to collect the clear bonus
        assert!((fitness - (0.1 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_no_double_removal() {
        let arena = fixed_gap_arena();
        let mut fit_a = 0.0;
        let mut fit_b = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 2, 250);

        // Bird 0 is inside the bottom pipe and below the floor line at once
        state.pipes[0].x = 240.0;
        state.birds[0].pos.y = 700.0;

        {
            let mut entrants = [
                Entrant::new(&never, &mut fit_a),
                Entrant::new(&never, &mut fit_b),
            ];
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        // One penalty, one removal; bird 1 untouched
        assert!((fit_a - (0.1 - 1.0)).abs() < 1e-9);
        assert!((fit_b - 0.1).abs() < 1e-9);
        assert_eq!(state.birds.len(), 1);
        assert_eq!(state.birds[0].slot, 1);
    }

    #[test]
    fn test_one_collision_per_bird_across_pipes() {
        let arena = fixed_gap_arena();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);

        // Two overlapping pipes both covering the bird
        state.pipes[0].x = 240.0;
        state.spawn_pipe(&arena, 250.0);
        state.birds[0].pos.y = 100.0;

        {
            let mut entrants = [Entrant::new(&never, &mut fitness)];
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        assert!((fitness - (0.1 - 1.0)).abs() < 1e-9);
        assert!(state.birds.is_empty());
    }

    #[test]
    fn test_ceiling_removal_without_penalty() {
        let arena = Arena::default();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);
        state.birds[0].pos.y = 0.5;

        let always = |_: Observation| true;
        {
            let mut entrants = [Entrant::new(&always, &mut fitness)];
            tick(&mut state, &arena, &mut entrants).unwrap();
            // Jump happens after the move, so the bird drifts down 1.5 first
            assert_eq!(state.birds.len(), 1);
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        assert!(state.birds.is_empty());
        assert!((fitness - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_offscreen_pipe_culled() {
        let arena = Arena::default();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);
        state.pipes[0].x = -105.0;
        state.pipes[0].mark_passed(230.0);
        state.spawn_pipe(&arena, 600.0);
        let keep = state.pipes[1].id;

        {
            let mut entrants = [Entrant::new(&never, &mut fitness)];
            tick(&mut state, &arena, &mut entrants).unwrap();
        }

        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].id, keep);
        assert_eq!(state.pipes[0].x, 595.0);
    }

    #[test]
    fn test_empty_population_terminates() {
        let arena = Arena::default();
        let mut state = EpisodeState::new(&arena, 1, 0, 250);
        let phase = tick(&mut state, &arena, &mut []).unwrap();
        assert_eq!(
            phase,
            Phase::Terminated(TerminationReason::AllAgentsEliminated)
        );
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_population_mismatch() {
        let arena = Arena::default();
        let mut state = EpisodeState::new(&arena, 1, 2, 250);
        let mut fitness = 0.0;
        let mut entrants = [Entrant::new(&never, &mut fitness)];
        assert_eq!(
            tick(&mut state, &arena, &mut entrants),
            Err(SimError::PopulationMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_terminated_is_noop() {
        let arena = Arena::default();
        let mut fitness = 0.0;
        let mut state = EpisodeState::new(&arena, 1, 1, 250);
        state.quit();
        let mut entrants = [Entrant::new(&never, &mut fitness)];
        tick(&mut state, &arena, &mut entrants).unwrap();
        assert_eq!(state.time_ticks, 0);
        assert_eq!(fitness, 0.0);
        assert_eq!(state.birds[0].pos.y, 350.0);
    }

    #[test]
    fn test_determinism() {
        // Two episodes with the same seed produce identical results
        let arena = Arena::default();
        let run = |seed: u64| {
            let mut fitness = [0.0; 3];
            let mut state = EpisodeState::new(&arena, seed, 3, 250);
            let policies: [&dyn crate::policy::Policy; 3] = [&never, &hover, &near_bottom];
            for _ in 0..300 {
                let mut entrants: Vec<Entrant> = policies
                    .iter()
                    .zip(fitness.iter_mut())
                    .map(|(p, f)| Entrant::new(*p, f))
                    .collect();
                tick(&mut state, &arena, &mut entrants).unwrap();
            }
            let ys: Vec<f32> = state.birds.iter().map(|b| b.pos.y).collect();
            let gaps: Vec<f32> = state.pipes.iter().map(|p| p.opening_y).collect();
            (fitness, ys, gaps, state.score, state.time_ticks)
        };

        assert_eq!(run(2024), run(2024));
    }
}

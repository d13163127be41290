#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Rover experience.

mod render;

use anyhow::{bail, Result};
use clap::Parser;
use maze_rover_core::{
    Event, GeneratorConfig, DEFAULT_EXTRA_EXITS, DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS,
};
use maze_rover_session::{MazeSession, SessionConfig};
use maze_rover_world::AUTOPLAY_STEP_QUANTUM;

/// Options accepted by the Maze Rover command-line interface.
#[derive(Debug, Parser)]
#[command(name = "maze-rover", about = "Generates, renders, and solves mazes")]
struct Options {
    /// Number of grid rows; must be odd and at least 5.
    #[arg(long, default_value_t = DEFAULT_GRID_ROWS)]
    rows: u32,

    /// Number of grid columns; must be odd and at least 5.
    #[arg(long, default_value_t = DEFAULT_GRID_COLS)]
    cols: u32,

    /// Extra boundary exits carved beside the primary exit.
    #[arg(long, default_value_t = DEFAULT_EXTRA_EXITS)]
    extra_exits: u32,

    /// Seed for deterministic generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Overlay the solver path on the rendered maze.
    #[arg(long)]
    show_path: bool,

    /// Replay the solver path to completion after rendering.
    #[arg(long)]
    solve: bool,
}

/// Entry point for the Maze Rover command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let generator = GeneratorConfig::new(options.rows, options.cols, options.extra_exits)?;
    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!(
        "generating a {}x{} maze with {} extra exits from seed {seed}",
        options.rows,
        options.cols,
        options.extra_exits
    );

    let mut session = MazeSession::new(SessionConfig::new(generator, seed));
    if options.show_path {
        session.on_toggle_path();
    }
    print!("{}", render::ascii_maze(&session));

    if options.solve {
        let steps = replay_to_completion(&mut session)?;
        println!(
            "solved in {steps} steps; mazes completed: {}",
            session.mazes_solved()
        );
    }

    Ok(())
}

/// Replays the stored path through autoplay, returning the number of steps
/// the agent took before the maze completed.
fn replay_to_completion(session: &mut MazeSession) -> Result<usize> {
    let path_len = session.path().len();
    if path_len == 0 {
        bail!("no exit is reachable from the agent's cell");
    }
    session.on_solve();

    let mut steps = 0usize;
    for _ in 0..path_len {
        let events = session.on_tick(AUTOPLAY_STEP_QUANTUM);
        for event in &events {
            match event {
                Event::AgentMoved { from, to } => {
                    steps += 1;
                    log::debug!(
                        "agent stepped ({}, {}) -> ({}, {})",
                        from.row(),
                        from.col(),
                        to.row(),
                        to.col()
                    );
                }
                Event::MazeCompleted { exit } => {
                    log::info!("maze completed at exit ({}, {})", exit.row(), exit.col());
                    return Ok(steps);
                }
                _ => {}
            }
        }
    }

    bail!("playback exhausted the path without completing the maze");
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Owning session object that wires the world to its systems.
//!
//! A [`MazeSession`] holds the authoritative world, the generation and
//! solving systems, and the solved-maze counter. Event loops talk to it
//! through a small callback surface (`on_tick`, `on_direction_held`, and
//! friends) instead of reaching into shared state. After every submitted
//! command the session pumps system reactions until the world goes quiet,
//! so callers always observe a consistent world with a fresh path.

use std::time::Duration;

use maze_rover_core::{Command, Direction, Event, GeneratorConfig, Grid, GridCoord};
use maze_rover_system_generation::generate;
use maze_rover_system_solving::Solving;
use maze_rover_world::{apply, query, World};

/// Everything needed to start a session: maze shape and the base seed.
///
/// Maze `n` of the session is generated from `seed + n`, so a pinned base
/// seed reproduces the entire run, not just the first maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    generator: GeneratorConfig,
    seed: u64,
}

impl SessionConfig {
    /// Creates a session configuration from a validated generator
    /// configuration and a base seed.
    #[must_use]
    pub const fn new(generator: GeneratorConfig, seed: u64) -> Self {
        Self { generator, seed }
    }

    /// Generator configuration used for every maze of the session.
    #[must_use]
    pub const fn generator(&self) -> GeneratorConfig {
        self.generator
    }

    /// Base seed of the session's seed stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Owns the world and its systems for one uninterrupted play session.
#[derive(Debug)]
pub struct MazeSession {
    world: World,
    solving: Solving,
    generator: GeneratorConfig,
    base_seed: u64,
    mazes_generated: u64,
    mazes_solved: u64,
}

impl MazeSession {
    /// Creates a session and installs its first maze, solved and ready to
    /// play before the first tick arrives.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            world: World::new(),
            solving: Solving,
            generator: config.generator,
            base_seed: config.seed,
            mazes_generated: 0,
            mazes_solved: 0,
        };
        let mut events = Vec::new();
        session.install_next_maze(&mut events);
        session.pump(&mut events, &mut Vec::new());
        session
    }

    /// Advances the simulation by `dt` and returns every event the tick
    /// produced, including regeneration events when the maze was completed.
    pub fn on_tick(&mut self, dt: Duration) -> Vec<Event> {
        self.submit(Command::Tick { dt })
    }

    /// Records the direction the agent should keep attempting.
    pub fn on_direction_held(&mut self, direction: Direction) {
        let _ = self.submit(Command::RequestMove { direction });
    }

    /// Stops the agent's movement attempts.
    pub fn on_direction_released(&mut self) {
        let _ = self.submit(Command::ClearMove);
    }

    /// Discards the current maze and generates the next one in the seed
    /// stream. Completion progress is kept; the solved counter only moves
    /// when a maze is actually finished.
    pub fn on_reset(&mut self) -> Vec<Event> {
        let mut fresh = Vec::new();
        self.install_next_maze(&mut fresh);
        let mut out = Vec::new();
        self.pump(&mut fresh, &mut out);
        out
    }

    /// Arms playback of the currently solved path.
    pub fn on_solve(&mut self) {
        let _ = self.submit(Command::StartAutoplay);
    }

    /// Flips the path-overlay visibility flag.
    pub fn on_toggle_path(&mut self) {
        let visible = !query::path_visible(&self.world);
        let _ = self.submit(Command::SetPathVisible { visible });
    }

    /// Grid of the currently installed maze.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Exit cells of the currently installed maze, primary first.
    #[must_use]
    pub fn exits(&self) -> &[GridCoord] {
        query::exits(&self.world)
    }

    /// Cell the agent currently occupies.
    #[must_use]
    pub fn agent_cell(&self) -> GridCoord {
        query::agent_cell(&self.world)
    }

    /// Shortest path from the agent's cell to the nearest exit. Empty when
    /// no exit is reachable.
    #[must_use]
    pub fn path(&self) -> &[GridCoord] {
        query::path(&self.world)
    }

    /// Whether the path overlay should be drawn.
    #[must_use]
    pub fn path_visible(&self) -> bool {
        query::path_visible(&self.world)
    }

    /// Whether autoplay is currently driving the agent.
    #[must_use]
    pub fn autoplay_active(&self) -> bool {
        query::autoplay_active(&self.world)
    }

    /// Number of mazes the agent has completed this session.
    #[must_use]
    pub fn mazes_solved(&self) -> u64 {
        self.mazes_solved
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        let mut out = Vec::new();
        self.pump(&mut events, &mut out);
        out
    }

    fn install_next_maze(&mut self, out_events: &mut Vec<Event>) {
        let seed = self.base_seed.wrapping_add(self.mazes_generated);
        self.mazes_generated += 1;
        let layout = generate(&self.generator, seed);
        apply(&mut self.world, Command::InstallMaze { layout }, out_events);
    }

    /// Feeds pending events to the systems and applies their command
    /// batches until no further events surface. A completion event inside a
    /// batch bumps the solved counter and swaps in the next maze before the
    /// loop continues; solver reactions to the finished maze are dropped
    /// with it.
    fn pump(&mut self, events: &mut Vec<Event>, out_events: &mut Vec<Event>) {
        while !events.is_empty() {
            let completed = events
                .iter()
                .filter(|event| matches!(event, Event::MazeCompleted { .. }))
                .count() as u64;

            let mut commands = Vec::new();
            if completed == 0 {
                self.solving.handle(
                    events,
                    query::grid(&self.world),
                    query::exits(&self.world),
                    &mut commands,
                );
            }
            out_events.append(events);

            if completed > 0 {
                self.mazes_solved += completed;
                self.install_next_maze(events);
                continue;
            }

            for command in commands {
                apply(&mut self.world, command, events);
            }
        }
    }
}

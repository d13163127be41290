#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state management for Maze Rover.
//!
//! The world owns the installed grid, the exit set, the agent, and the most
//! recently solved path. All mutation flows through [`apply`]; collaborators
//! read state through the [`query`] module and react to the events that
//! `apply` broadcasts.

use std::time::Duration;

use maze_rover_core::{Command, Direction, Event, Grid, GridCoord};

/// Simulated time the agent must accumulate before committing a manual step.
pub const MANUAL_STEP_QUANTUM: Duration = Duration::from_millis(100);

/// Simulated time between successive autoplay placements.
pub const AUTOPLAY_STEP_QUANTUM: Duration = Duration::from_millis(250);

/// Represents the authoritative Maze Rover world state.
///
/// A freshly constructed world holds no maze; it ignores movement and
/// playback commands until the first [`Command::InstallMaze`] arrives.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    exits: Vec<GridCoord>,
    start: GridCoord,
    agent: Agent,
    path: Vec<GridCoord>,
    path_needed: bool,
    path_visible: bool,
    autoplay: Option<Playback>,
    accumulator: Duration,
}

impl World {
    /// Creates a new, empty world awaiting its first maze.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::empty(),
            exits: Vec::new(),
            start: GridCoord::new(0, 0),
            agent: Agent::default(),
            path: Vec::new(),
            path_needed: false,
            path_visible: false,
            autoplay: None,
            accumulator: Duration::ZERO,
        }
    }

    fn has_maze(&self) -> bool {
        !self.grid.is_empty()
    }

    fn is_exit(&self, cell: GridCoord) -> bool {
        self.exits.contains(&cell)
    }

    fn can_move(&self, direction: Direction) -> bool {
        direction
            .step_from(self.agent.cell)
            .map_or(false, |target| self.grid.is_open(target))
    }

    /// Flags the stored path as stale. Returns true when the flag was newly
    /// raised, so callers emit at most one [`Event::PathNeeded`] per lapse.
    fn mark_path_needed(&mut self) -> bool {
        let was_needed = self.path_needed;
        self.path_needed = true;
        !was_needed
    }

    fn commit_pending_step(&mut self, out_events: &mut Vec<Event>) {
        let Some(direction) = self.agent.pending else {
            return;
        };
        let Some(target) = direction.step_from(self.agent.cell) else {
            return;
        };
        if !self.grid.is_open(target) {
            // Bumping a wall is not an error. The direction request is kept
            // so a held key keeps trying.
            return;
        }

        if self.is_exit(target) {
            // The request is consumed by finishing the maze, so the signal
            // fires once even if no collaborator reacts to it.
            self.agent.pending = None;
            out_events.push(Event::MazeCompleted { exit: target });
            return;
        }

        let from = self.agent.cell;
        self.agent.cell = target;
        out_events.push(Event::AgentMoved { from, to: target });

        self.path.clear();
        if self.mark_path_needed() {
            out_events.push(Event::PathNeeded { from: target });
        }
    }

    fn advance_autoplay(&mut self, out_events: &mut Vec<Event>) {
        let Some(playback) = self.autoplay.as_mut() else {
            return;
        };
        let Some(&target) = self.path.get(playback.cursor) else {
            self.autoplay = None;
            out_events.push(Event::AutoplayFinished);
            return;
        };
        playback.cursor += 1;

        let from = self.agent.cell;
        self.agent.cell = target;
        if from != target {
            out_events.push(Event::AgentMoved { from, to: target });
        }

        if self.is_exit(target) {
            self.autoplay = None;
            out_events.push(Event::MazeCompleted { exit: target });
            out_events.push(Event::AutoplayFinished);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Private agent state: logical cell plus the pending movement direction.
///
/// `pending == None` is the idle state; a recorded direction stays pending
/// until cleared, no matter how many commits it fails to pass.
#[derive(Clone, Copy, Debug, Default)]
struct Agent {
    cell: GridCoord,
    pending: Option<Direction>,
}

#[derive(Clone, Copy, Debug)]
struct Playback {
    cursor: usize,
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InstallMaze { layout } => {
            let (grid, exits, start) = layout.into_parts();
            world.grid = grid;
            world.exits = exits;
            world.start = start;
            world.agent = Agent {
                cell: start,
                pending: None,
            };
            world.path.clear();
            world.path_needed = false;
            world.autoplay = None;
            world.accumulator = Duration::ZERO;

            out_events.push(Event::MazeInstalled {
                rows: world.grid.rows(),
                cols: world.grid.cols(),
                exit_count: world.exits.len(),
            });
            if world.mark_path_needed() {
                out_events.push(Event::PathNeeded { from: start });
            }
        }
        Command::RequestMove { direction } => {
            world.agent.pending = Some(direction);
        }
        Command::ClearMove => {
            world.agent.pending = None;
        }
        Command::SetPath { cells } => {
            let anchored = match cells.first() {
                None => true,
                Some(&first) => first == world.agent.cell,
            };
            if anchored {
                world.path = cells;
                world.path_needed = false;
            } else if world.mark_path_needed() {
                out_events.push(Event::PathNeeded {
                    from: world.agent.cell,
                });
            }
        }
        Command::StartAutoplay => {
            if world.has_maze() && !world.path.is_empty() && world.autoplay.is_none() {
                world.autoplay = Some(Playback { cursor: 0 });
                world.accumulator = Duration::ZERO;
            }
        }
        Command::SetPathVisible { visible } => {
            world.path_visible = visible;
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if !world.has_maze() {
                return;
            }

            world.accumulator = world.accumulator.saturating_add(dt);
            if world.autoplay.is_some() {
                if world.accumulator >= AUTOPLAY_STEP_QUANTUM {
                    world.accumulator = world.accumulator.saturating_sub(AUTOPLAY_STEP_QUANTUM);
                    world.advance_autoplay(out_events);
                }
            } else if world.agent.pending.is_none() {
                // Idle time does not bank extra steps.
                world.accumulator = world.accumulator.min(MANUAL_STEP_QUANTUM);
            } else if world.accumulator >= MANUAL_STEP_QUANTUM {
                world.accumulator = world.accumulator.saturating_sub(MANUAL_STEP_QUANTUM);
                world.commit_pending_step(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_rover_core::{Direction, Grid, GridCoord};

    /// Provides read-only access to the installed grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Exit cells of the installed maze, primary exit first.
    #[must_use]
    pub fn exits(world: &World) -> &[GridCoord] {
        &world.exits
    }

    /// Cell the agent starts from after installation or completion.
    #[must_use]
    pub fn start(world: &World) -> GridCoord {
        world.start
    }

    /// Cell the agent currently occupies.
    #[must_use]
    pub fn agent_cell(world: &World) -> GridCoord {
        world.agent.cell
    }

    /// Direction recorded for the next commit, if any.
    #[must_use]
    pub fn pending_direction(world: &World) -> Option<Direction> {
        world.agent.pending
    }

    /// Reports whether the agent's neighboring cell in the given direction
    /// exists within bounds and is open.
    #[must_use]
    pub fn can_move(world: &World, direction: Direction) -> bool {
        world.can_move(direction)
    }

    /// Most recently stored path from the agent's cell to the nearest exit.
    /// Empty when no exit is reachable or no path has been solved yet.
    #[must_use]
    pub fn path(world: &World) -> &[GridCoord] {
        &world.path
    }

    /// Reports whether the stored path has gone stale since the last solve.
    #[must_use]
    pub fn path_needed(world: &World) -> bool {
        world.path_needed
    }

    /// Whether presentation collaborators should draw the path overlay.
    #[must_use]
    pub fn path_visible(world: &World) -> bool {
        world.path_visible
    }

    /// Reports whether path playback is currently driving the agent.
    #[must_use]
    pub fn autoplay_active(world: &World) -> bool {
        world.autoplay.is_some()
    }
}

//! ASCII presentation of the session state.
//!
//! One character per grid cell: `#` wall, space corridor, `*` exit,
//! `+` path overlay (when visible), `@` agent.

use maze_rover_core::GridCoord;
use maze_rover_session::MazeSession;

pub(crate) fn ascii_maze(session: &MazeSession) -> String {
    let grid = session.grid();
    let line_width = usize::try_from(grid.cols()).unwrap_or(0) + 1;
    let height = usize::try_from(grid.rows()).unwrap_or(0);
    let mut out = String::with_capacity(line_width * height);

    let agent = session.agent_cell();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = GridCoord::new(row, col);
            let glyph = if cell == agent {
                '@'
            } else if session.exits().contains(&cell) {
                '*'
            } else if session.path_visible() && session.path().contains(&cell) {
                '+'
            } else if grid.is_open(cell) {
                ' '
            } else {
                '#'
            };
            out.push(glyph);
        }
        out.push('\n');
    }

    out
}

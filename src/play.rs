use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use fifteen_puzzle::{Grid, Move, SolveError, Solver};

/// Moves the blank opposite to the pressed arrow, so the tile next to it
/// slides the way the arrow points.
fn arrow_to_move(code: KeyCode) -> Option<Move> {
    match code {
        KeyCode::Up => Some(Move::Down),
        KeyCode::Down => Some(Move::Up),
        KeyCode::Left => Some(Move::Right),
        KeyCode::Right => Some(Move::Left),
        _ => None,
    }
}

struct Session {
    grid: Grid,
    moves: u32,
    started: Instant,
    finished: Option<Duration>,
    status: String,
}

impl Session {
    fn new(grid: Grid) -> Self {
        Self {
            grid,
            moves: 0,
            started: Instant::now(),
            finished: None,
            status: String::new(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }

    fn make_move(&mut self, movement: Move) {
        if self.finished.is_some() || !self.grid.apply_move(movement) {
            return;
        }
        self.moves += 1;
        if self.grid.is_solved() {
            let elapsed = self.elapsed();
            self.finished = Some(elapsed);
            self.status = format!("Solved in {} moves", self.moves);
        }
    }

    fn draw(&self, out: &mut Stdout) -> io::Result<()> {
        let secs = self.elapsed().as_secs();
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        for (row, line) in self.grid.to_string().lines().enumerate() {
            queue!(out, MoveTo(2, row as u16 + 1), Print(line))?;
        }
        queue!(
            out,
            MoveTo(2, 6),
            Print(format!("Moves: {}   Time: {:02}:{:02}", self.moves, secs / 60, secs % 60)),
            MoveTo(2, 7),
            Print(&self.status),
            MoveTo(2, 9),
            Print("arrows: slide  s: solve  r: restart  q: quit"),
        )?;
        out.flush()
    }
}

/// Runs the interactive session until the player quits.
pub fn run(grid: Grid, delay: Duration) -> io::Result<()> {
    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut out, grid, delay);

    execute!(out, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn event_loop(out: &mut Stdout, grid: Grid, delay: Duration) -> io::Result<()> {
    let mut session = Session::new(grid);
    let solver = Solver::default();

    loop {
        session.draw(out)?;
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('r') => {
                let mut grid = Grid::new();
                grid.scramble();
                session = Session::new(grid);
            }
            KeyCode::Char('s') if session.finished.is_none() => {
                session.status = "Solving...".to_string();
                session.draw(out)?;
                match solver.solve(&session.grid) {
                    Ok(moves) => {
                        for movement in moves {
                            thread::sleep(delay);
                            session.make_move(movement);
                            session.draw(out)?;
                        }
                    }
                    Err(SolveError::Unsolvable) => session.status = "Not solvable".to_string(),
                    Err(err) => session.status = err.to_string(),
                }
            }
            code => {
                if let Some(movement) = arrow_to_move(code) {
                    session.make_move(movement);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_slide_the_neighbouring_tile() {
        let mut session = Session::new(Grid::new());
        // blank is bottom-right; pressing Down pulls tile 12 down into it
        session.make_move(arrow_to_move(KeyCode::Down).unwrap());
        assert_eq!(session.grid.blank_index(), 11);
        assert_eq!(session.moves, 1);
        assert_eq!(Move::Up.arrow_key(), "ArrowDown");
    }

    #[test]
    fn solving_freezes_the_clock() {
        let mut grid = Grid::new();
        grid.apply_move(Move::Left);
        let mut session = Session::new(grid);
        session.make_move(Move::Right);
        assert!(session.finished.is_some());
        assert_eq!(session.status, "Solved in 1 moves");

        session.make_move(Move::Up);
        assert_eq!(session.moves, 1);
    }
}

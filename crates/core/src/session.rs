//! Session module - gravity, lock delay, levels and the game lifecycle
//!
//! Ties the board, the active piece and the supply queue together. The
//! session is driven entirely from outside: the orchestrator calls
//! [`Session::tick`] once per frame with the elapsed time and delivers
//! commands in between. Nothing here sleeps or reads a clock.
//!
//! Per frame:
//!
//! 1. advance the millisecond clock and the frame counter
//! 2. every `ticks_per_fall` frames, try to move the piece down one row
//! 3. if the piece rests and no lock deadline is armed, arm one
//!    `lock_delay_ms` in the future
//! 4. if the deadline has passed and the piece still rests, lock it
//!
//! Only a successful downward move cancels the deadline. Sliding or rotating
//! off a ledge and back onto it leaves the original deadline in place. Locking deposits the
//! piece, clears full lines, consults the level table and spawns the next
//! piece unless the deposit overflowed.

use tracing::{debug, info};

use crate::board::{Board, RowSet};
use crate::config::{ConfigError, LevelEntry, SessionConfig, DEFAULT_LEVELS};
use crate::piece::Piece;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, Grid};
use crate::types::{Direction, GameAction};

/// Modal state owned by the session so the orchestrator never blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    /// Instructions/pause screen; waiting for a resume.
    Paused,
}

/// Per-piece state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Free to fall and move.
    Falling,
    /// Resting on something; deposits at `deadline_ms` unless it moves down first.
    Locking { deadline_ms: u64 },
    /// The board overflowed. Terminal.
    GameOver,
}

/// What happened when a piece locked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Rows that were full, by their index before clearing.
    pub rows: RowSet,
    pub points: u32,
    pub level_up: bool,
    pub game_over: bool,
    /// The grid right after the deposit, full rows still in place.
    /// Only recorded when rows were cleared.
    pub stack_before_clear: Option<Grid>,
}

impl LockEvent {
    /// `current` with the pre-clear grid and no active piece, for flashing
    /// the cleared rows before they disappear.
    pub fn flash_frame(&self, current: &GameSnapshot) -> Option<GameSnapshot> {
        let stack = self.stack_before_clear?;
        Some(GameSnapshot {
            board: stack,
            active: None,
            ..current.clone()
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    board: Board,
    piece: Option<Piece>,
    mode: Mode,
    phase: Phase,
    clock_ms: u64,
    frames: u32,
    level_idx: usize,
    seed: u32,
    last_event: Option<LockEvent>,
}

impl Session {
    /// New game with the default tuning.
    pub fn new(seed: u32) -> Self {
        Self::build(SessionConfig::default(), seed)
    }

    /// New game with a custom tuning. The config is validated first.
    pub fn with_config(config: SessionConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: SessionConfig, seed: u32) -> Self {
        let mut board = Board::new(seed);
        let piece = board.next_piece();
        Self {
            config,
            board,
            piece: Some(piece),
            mode: Mode::Playing,
            phase: Phase::Falling,
            clock_ms: 0,
            frames: 0,
            level_idx: 0,
            seed,
            last_event: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for setting up positions.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The active piece, `None` once the game is over.
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    /// Replace the active piece (setups and tests). Cancels any lock deadline.
    pub fn set_piece(&mut self, mut piece: Piece) {
        if self.is_game_over() {
            return;
        }
        piece.project_ghost(&self.board);
        self.piece = Some(piece);
        self.phase = Phase::Falling;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn lines(&self) -> u32 {
        self.board.lines_cleared()
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.mode == Mode::Paused
    }

    fn playable(&self) -> bool {
        self.mode == Mode::Playing && !self.is_game_over()
    }

    fn level_entry(&self) -> LevelEntry {
        self.config
            .levels
            .get(self.level_idx)
            .copied()
            .unwrap_or(DEFAULT_LEVELS[0])
    }

    pub fn level(&self) -> u32 {
        self.level_entry().level
    }

    /// Frames between gravity steps at the current level.
    pub fn ticks_per_fall(&self) -> u32 {
        self.level_entry().ticks_per_fall
    }

    /// Advance one frame. Returns true if the piece moved or locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.playable() {
            return false;
        }

        self.clock_ms += u64::from(elapsed_ms);
        self.frames += 1;

        let mut changed = false;
        if self.frames >= self.ticks_per_fall() {
            self.frames = 0;
            changed |= self.tick_gravity();
        }

        let Some(piece) = self.piece else {
            return changed;
        };

        // Only a successful downward move cancels an armed deadline.
        if piece.can_move(&self.board, 0, 1) {
            return changed;
        }

        if self.phase == Phase::Falling {
            self.phase = Phase::Locking {
                deadline_ms: self.clock_ms + u64::from(self.config.lock_delay_ms),
            };
        }

        if let Phase::Locking { deadline_ms } = self.phase {
            if self.clock_ms >= deadline_ms {
                self.lock_active();
                changed = true;
            }
        }

        changed
    }

    /// One gravity step: move down if possible.
    pub fn tick_gravity(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Translate the active piece. A successful downward move cancels the lock deadline.
    pub fn move_piece(&mut self, dcol: i8, drow: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        let moved = piece.move_by(&self.board, dcol, drow);
        if moved && drow > 0 {
            self.phase = Phase::Falling;
        }
        moved
    }

    pub fn rotate(&mut self, direction: Direction) -> bool {
        if !self.playable() {
            return false;
        }
        match self.piece.as_mut() {
            Some(piece) => piece.rotate(&self.board, direction),
            None => false,
        }
    }

    /// Drop to the lowest reachable row and lock immediately.
    pub fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.piece.as_mut() else {
            return false;
        };
        let distance = piece.drop_distance(&self.board);
        if distance > 0 {
            piece.move_by(&self.board, 0, distance);
        }
        self.lock_active();
        true
    }

    /// Swap the active piece with the hold slot (once per piece).
    pub fn hold(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.piece.take() else {
            return false;
        };
        if !piece.can_hold() {
            self.piece = Some(piece);
            return false;
        }
        self.piece = Some(self.board.hold(piece));
        self.phase = Phase::Falling;
        true
    }

    /// Deposit the active piece and resolve everything that follows.
    fn lock_active(&mut self) {
        let Some(piece) = self.piece.take() else {
            return;
        };

        piece.deposit(&mut self.board);
        let stack_before_clear =
            (!self.board.full_rows().is_empty()).then(|| self.board.to_grid());
        let clear = self.board.clear_full_lines();
        let level_up = self.advance_level();
        let game_over = self.board.is_game_over();

        self.last_event = Some(LockEvent {
            lines_cleared: clear.count(),
            rows: clear.rows,
            points: clear.points,
            level_up,
            game_over,
            stack_before_clear,
        });

        if game_over {
            info!(score = self.board.score(), lines = self.board.lines_cleared(), "game over");
            self.phase = Phase::GameOver;
            return;
        }

        self.piece = Some(self.board.next_piece());
        self.phase = Phase::Falling;
    }

    /// Step through every level whose threshold has been reached.
    fn advance_level(&mut self) -> bool {
        let lines = self.board.lines_cleared();
        let mut advanced = false;
        while let Some(next) = self.config.levels.get(self.level_idx + 1) {
            if lines < next.lines_required {
                break;
            }
            self.level_idx += 1;
            advanced = true;
            debug!(
                level = next.level,
                ticks_per_fall = next.ticks_per_fall,
                lines,
                "level up"
            );
        }
        advanced
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.mode = match self.mode {
            Mode::Playing => Mode::Paused,
            Mode::Paused => Mode::Playing,
        };
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.is_game_over() || self.mode == Mode::Paused {
            return false;
        }
        self.mode = Mode::Paused;
        true
    }

    /// Leave the paused modal. Exactly one resume is needed.
    pub fn resume(&mut self) -> bool {
        if self.mode == Mode::Playing {
            return false;
        }
        self.mode = Mode::Playing;
        true
    }

    /// Start over with the same tuning and a fresh piece sequence.
    pub fn restart(&mut self) {
        let seed = self.board.supply().seed();
        debug!(seed, "restart");
        *self = Self::build(self.config.clone(), seed);
    }

    /// Closing animation after game over: clear the bottom row once.
    pub fn drain_step(&mut self) -> bool {
        if !self.is_game_over() {
            return false;
        }
        self.board.drain_step();
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(-1, 0),
            GameAction::MoveRight => self.move_piece(1, 0),
            GameAction::SoftDrop => self.move_piece(0, 1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(Direction::Clockwise),
            GameAction::RotateCcw => self.rotate(Direction::CounterClockwise),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.copy_into(&mut out.board);
        out.active = self.piece.map(|mut piece| {
            piece.project_ghost(&self.board);
            ActiveSnapshot::from(piece)
        });
        out.held = self.board.held().map(Piece::shape);
        out.can_hold = self.piece.is_some_and(|p| p.can_hold());
        out.preview.clear();
        out.preview
            .extend(self.board.preview(self.config.preview_len));
        out.paused = self.mode == Mode::Paused;
        out.game_over = self.is_game_over();
        out.score = self.board.score();
        out.lines = self.board.lines_cleared();
        out.level = self.level();
        out.ticks_per_fall = self.ticks_per_fall();
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Shape, BOARD_WIDTH, LOCK_DELAY_MS, TICK_MS};

    fn fast_config() -> SessionConfig {
        SessionConfig {
            levels: vec![
                LevelEntry::new(1, 2, 0),
                LevelEntry::new(2, 1, 1),
                LevelEntry::new(3, 1, 2),
            ],
            ..SessionConfig::default()
        }
    }

    fn fill_row_except(session: &mut Session, row: i8, gap: i8) {
        for col in 0..BOARD_WIDTH as i8 {
            if col != gap {
                session.board_mut().set(col, row, Some(Shape::Z));
            }
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::new(12345);
        assert_eq!(session.mode(), Mode::Playing);
        assert_eq!(session.phase(), Phase::Falling);
        assert!(session.piece().is_some());
        assert_eq!(session.level(), 1);
        assert_eq!(session.ticks_per_fall(), 60);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_gravity_every_ticks_per_fall_frames() {
        let mut session = Session::new(1);
        let start = session.piece().unwrap().cells()[0].row;
        for _ in 0..59 {
            session.tick(TICK_MS);
        }
        assert_eq!(session.piece().unwrap().cells()[0].row, start);
        session.tick(TICK_MS);
        assert_eq!(session.piece().unwrap().cells()[0].row, start + 1);
    }

    #[test]
    fn test_lock_deadline_armed_once_then_locks() {
        let mut session = Session::new(7);
        session.set_piece(Piece::at(Shape::O, 0, 18));
        session.tick(TICK_MS);
        let Phase::Locking { deadline_ms } = session.phase() else {
            panic!("expected locking, got {:?}", session.phase());
        };
        assert_eq!(deadline_ms, u64::from(TICK_MS + LOCK_DELAY_MS));

        // Sideways moves do not re-arm.
        session.move_piece(1, 0);
        session.tick(TICK_MS);
        assert_eq!(session.phase(), Phase::Locking { deadline_ms });

        while session.clock_ms() + u64::from(TICK_MS) < deadline_ms {
            session.tick(TICK_MS);
            assert!(session.take_last_event().is_none());
        }
        session.tick(TICK_MS);
        let event = session.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 0);
        assert_eq!(session.board().occupied_count(), 4);
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_moving_down_cancels_deadline() {
        let mut session = Session::new(7);
        session.board_mut().set(4, 10, Some(Shape::I));
        session.board_mut().set(5, 10, Some(Shape::I));
        session.set_piece(Piece::at(Shape::O, 0, 8));
        session.tick(TICK_MS);
        assert!(matches!(session.phase(), Phase::Locking { .. }));

        // Slide off the ledge and fall.
        assert!(session.move_piece(-2, 0));
        assert!(session.move_piece(0, 1));
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_shuffling_over_ledge_keeps_deadline() {
        let mut session = Session::new(7);
        session.board_mut().set(4, 19, Some(Shape::T));
        session.set_piece(Piece::at(Shape::O, 0, 17));
        session.tick(TICK_MS);
        let armed = session.phase();
        assert_eq!(
            armed,
            Phase::Locking {
                deadline_ms: u64::from(TICK_MS + LOCK_DELAY_MS)
            }
        );

        // Off the bump (free to fall) and back on, without falling.
        assert!(session.move_piece(1, 0));
        session.tick(TICK_MS);
        assert_eq!(session.phase(), armed);
        assert!(session.move_piece(-1, 0));
        session.tick(TICK_MS);
        assert_eq!(session.phase(), armed);

        // The original deadline still decides when it locks.
        while session.take_last_event().is_none() {
            session.tick(TICK_MS);
        }
        assert_eq!(session.clock_ms(), 33 * u64::from(TICK_MS));
    }

    #[test]
    fn test_hard_drop_locks_and_spawns() {
        let mut session = Session::new(3);
        let next = session.board().supply().peek().unwrap();
        assert!(session.apply_action(GameAction::HardDrop));
        let event = session.take_last_event().unwrap();
        assert!(!event.game_over);
        assert!(event.stack_before_clear.is_none());
        assert!(event.flash_frame(&session.snapshot()).is_none());
        assert_eq!(session.board().occupied_count(), 4);
        assert_eq!(session.piece().unwrap().shape(), next);
        assert!(session.take_last_event().is_none());
    }

    #[test]
    fn test_line_clear_event_and_level_up() {
        let mut session = Session::with_config(fast_config(), 9).unwrap();
        fill_row_except(&mut session, 19, 9);
        // Vertical I in column 9.
        let mut piece = Piece::at(Shape::I, 0, 5);
        let board = Board::default();
        assert!(piece.rotate(&board, Direction::Clockwise));
        while piece.move_by(&board, 1, 0) {}
        session.set_piece(piece);

        session.hard_drop();
        let event = session.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.rows.as_slice(), &[19]);
        assert_eq!(event.points, 100);
        assert!(event.level_up);
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 100);

        // The flash frame still shows the full row and the I piece on top of it.
        let stack = event.stack_before_clear.unwrap();
        assert!(stack[19].iter().all(|c| c.is_some()));
        assert_eq!(stack[16][9], Some(Shape::I));
        let frame = event.flash_frame(&session.snapshot()).unwrap();
        assert_eq!(frame.board, stack);
        assert!(frame.active.is_none());
        assert_eq!(frame.score, 100);
    }

    #[test]
    fn test_level_table_skips_multiple_thresholds() {
        let mut session = Session::with_config(fast_config(), 9).unwrap();
        fill_row_except(&mut session, 19, 0);
        fill_row_except(&mut session, 18, 0);
        let mut piece = Piece::at(Shape::I, 0, 5);
        piece.rotate(&Board::default(), Direction::Clockwise);
        while piece.move_by(&Board::default(), -1, 0) {}
        session.set_piece(piece);
        session.hard_drop();
        assert_eq!(session.lines(), 2);
        assert_eq!(session.level(), 3);
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut session = Session::new(12345);
        let first = session.piece().unwrap().shape();
        assert!(session.hold());
        assert_eq!(session.board().held().unwrap().shape(), first);
        let second = session.piece().unwrap().shape();
        assert!(session.piece().unwrap().can_hold());

        // Swap back: the restored piece may not be held again.
        assert!(session.hold());
        assert_eq!(session.piece().unwrap().shape(), first);
        assert!(!session.piece().unwrap().can_hold());
        let before = *session.piece().unwrap();
        assert!(!session.hold());
        assert_eq!(*session.piece().unwrap(), before);
        assert_eq!(session.board().held().unwrap().shape(), second);
    }

    #[test]
    fn test_hold_cancels_deadline() {
        let mut session = Session::new(5);
        session.set_piece(Piece::at(Shape::T, 0, 18));
        session.tick(TICK_MS);
        assert!(matches!(session.phase(), Phase::Locking { .. }));
        assert!(session.hold());
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_paused_ignores_ticks_and_commands() {
        let mut session = Session::new(1);
        assert!(session.apply_action(GameAction::Pause));
        assert!(session.is_paused());
        let before = *session.piece().unwrap();
        for _ in 0..200 {
            assert!(!session.tick(TICK_MS));
        }
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(!session.apply_action(GameAction::HardDrop));
        assert_eq!(*session.piece().unwrap(), before);
        assert_eq!(session.clock_ms(), 0);

        assert!(session.resume());
        assert!(!session.resume());
        assert!(session.apply_action(GameAction::MoveLeft));
    }

    #[test]
    fn test_game_over_from_overflow() {
        let mut session = Session::new(2);
        for row in 0..20 {
            session.board_mut().set(4, row, Some(Shape::I));
            session.board_mut().set(5, row, Some(Shape::I));
        }
        session.set_piece(Piece::at(Shape::O, 0, -2));
        session.hard_drop();
        assert!(session.is_game_over());
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(session.piece().is_none());
        assert!(session.take_last_event().unwrap().game_over);
    }

    #[test]
    fn test_commands_after_game_over_are_noops() {
        let mut session = Session::new(2);
        for row in 0..20 {
            session.board_mut().set(4, row, Some(Shape::I));
            session.board_mut().set(5, row, Some(Shape::I));
        }
        session.set_piece(Piece::at(Shape::O, 0, -2));
        session.hard_drop();
        let score = session.score();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::RotateCcw,
            GameAction::Hold,
            GameAction::Pause,
        ] {
            assert!(!session.apply_action(action), "{action:?}");
        }
        assert!(!session.tick(TICK_MS));
        assert_eq!(session.score(), score);
        assert!(session.is_game_over());
    }

    #[test]
    fn test_drain_only_after_game_over() {
        let mut session = Session::new(2);
        session.board_mut().set(0, 19, Some(Shape::L));
        assert!(!session.drain_step());
        assert_eq!(session.board().occupied_count(), 1);

        for row in 0..20 {
            session.board_mut().set(4, row, Some(Shape::I));
        }
        session.set_piece(Piece::at(Shape::O, -1, -2));
        session.hard_drop();
        assert!(session.is_game_over());
        for _ in 0..20 {
            assert!(session.drain_step());
        }
        assert!(session.board().is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = Session::new(4);
        session.apply_action(GameAction::HardDrop);
        session.apply_action(GameAction::Hold);
        session.restart();
        assert!(session.board().is_empty());
        assert!(session.board().held().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.clock_ms(), 0);
        assert!(session.piece().is_some());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = Session::new(8);
        session.board_mut().set(2, 19, Some(Shape::S));
        let snap = session.snapshot();
        assert_eq!(snap.cell(2, 19), Some(Some(Shape::S)));
        assert_eq!(snap.preview.len(), 5);
        assert_eq!(snap.level, 1);
        assert!(snap.playable());
        let active = snap.active.unwrap();
        assert_eq!(active.cells, session.piece().unwrap().cells());
        assert!(active.ghost.iter().all(|g| g.row >= 17));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = SessionConfig {
            levels: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(Session::with_config(config, 1).is_err());
    }
}

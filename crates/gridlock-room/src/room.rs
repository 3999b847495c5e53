//! A single game room: seats, board, turn, and move application.
//!
//! Everything here is plain synchronous state. The registry decides what
//! to broadcast; the room only says what happened.

use gridlock_protocol::{BOARD_SIZE, Board, Mark, PlayerId, RoomId, RoomSnapshot};

use crate::board::{check_winner, is_full};
use crate::{RoomError, RoomPhase};

/// Seats per room. The first player plays X, the second O.
pub const MAX_PLAYERS: usize = 2;

/// Why a move was dropped without touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// No room with the given id.
    RoomNotFound,
    /// The game already ended.
    GameOver,
    /// The cell index is not in `0..9`.
    OutOfRange,
    /// The cell already holds a mark.
    Occupied,
}

/// Result of applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mark was placed and the turn passed to `next`.
    Placed { next: Mark },
    /// The mark completed a line; the game is over.
    Won(Mark),
    /// The mark filled the board without a line; the game is over.
    Draw,
    /// Nothing changed.
    Rejected(MoveRejection),
}

impl MoveOutcome {
    /// Returns `true` if the board changed.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// State of one room.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    players: Vec<PlayerId>,
    board: Board,
    turn: Mark,
    game_over: bool,
}

impl Room {
    /// Opens a room with `creator` in the X seat and an empty board.
    pub fn new(id: RoomId, creator: PlayerId) -> Self {
        Self {
            id,
            players: vec![creator],
            board: [None; BOARD_SIZE],
            turn: Mark::X,
            game_over: false,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        if self.game_over {
            RoomPhase::Finished
        } else if self.players.len() >= MAX_PLAYERS {
            RoomPhase::InProgress
        } else {
            RoomPhase::WaitingForOpponent
        }
    }

    /// Copies the room into its wire form.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            players: self.players.clone(),
            board: self.board,
            turn: self.turn,
            game_over: self.game_over,
        }
    }

    /// Seats `player` in the next free slot.
    ///
    /// Only capacity is checked. A connection that is already seated may
    /// take the second seat too; it then plays both marks.
    pub fn seat(&mut self, player: PlayerId) -> Result<(), RoomError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull(self.id.clone()));
        }
        self.players.push(player);
        Ok(())
    }

    /// Removes every seat held by `player`. Returns `true` if any was.
    pub fn unseat(&mut self, player: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| *p != player);
        self.players.len() != before
    }

    /// Places the current turn's mark at `index` and evaluates the board.
    ///
    /// The mover's identity is not consulted: whoever sends a legal move
    /// plays the mark whose turn it is.
    pub fn apply_move(&mut self, index: usize) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::Rejected(MoveRejection::GameOver);
        }
        let Some(cell) = self.board.get_mut(index) else {
            return MoveOutcome::Rejected(MoveRejection::OutOfRange);
        };
        if cell.is_some() {
            return MoveOutcome::Rejected(MoveRejection::Occupied);
        }
        *cell = Some(self.turn);

        if let Some(winner) = check_winner(&self.board) {
            self.game_over = true;
            MoveOutcome::Won(winner)
        } else if is_full(&self.board) {
            self.game_over = true;
            MoveOutcome::Draw
        } else {
            self.turn = self.turn.opponent();
            MoveOutcome::Placed { next: self.turn }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::new(RoomId::from("r"), PlayerId(1))
    }

    fn play(room: &mut Room, moves: &[usize]) -> MoveOutcome {
        let mut last = MoveOutcome::Rejected(MoveRejection::OutOfRange);
        for &i in moves {
            last = room.apply_move(i);
        }
        last
    }

    #[test]
    fn test_new_room_starts_empty_with_x_to_move() {
        let r = room();
        assert_eq!(r.players(), &[PlayerId(1)]);
        assert!(r.board().iter().all(Option::is_none));
        assert_eq!(r.turn(), Mark::X);
        assert!(!r.is_game_over());
        assert_eq!(r.phase(), RoomPhase::WaitingForOpponent);
    }

    #[test]
    fn test_seat_fills_two_slots_then_rejects() {
        let mut r = room();
        r.seat(PlayerId(2)).unwrap();
        assert_eq!(r.phase(), RoomPhase::InProgress);
        assert_eq!(
            r.seat(PlayerId(3)),
            Err(RoomError::RoomFull(RoomId::from("r")))
        );
        assert_eq!(r.player_count(), 2);
    }

    #[test]
    fn test_unseat_is_idempotent() {
        let mut r = room();
        r.seat(PlayerId(2)).unwrap();
        assert!(r.unseat(PlayerId(2)));
        assert!(!r.unseat(PlayerId(2)));
        assert_eq!(r.players(), &[PlayerId(1)]);
    }

    #[test]
    fn test_move_places_mark_and_toggles_turn() {
        let mut r = room();
        assert_eq!(r.apply_move(4), MoveOutcome::Placed { next: Mark::O });
        assert_eq!(r.board()[4], Some(Mark::X));
        assert_eq!(r.apply_move(0), MoveOutcome::Placed { next: Mark::X });
        assert_eq!(r.board()[0], Some(Mark::O));
    }

    #[test]
    fn test_move_on_occupied_cell_changes_nothing() {
        let mut r = room();
        r.apply_move(4);
        let board = *r.board();
        let turn = r.turn();

        let outcome = r.apply_move(4);

        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::Occupied));
        assert!(!outcome.is_applied());
        assert_eq!(*r.board(), board);
        assert_eq!(r.turn(), turn);
    }

    #[test]
    fn test_move_out_of_range_is_rejected() {
        let mut r = room();
        assert_eq!(
            r.apply_move(9),
            MoveOutcome::Rejected(MoveRejection::OutOfRange)
        );
        assert_eq!(r.turn(), Mark::X);
    }

    #[test]
    fn test_winning_move_ends_game_without_toggling_turn() {
        let mut r = room();
        // X: 0 1 2, O: 4 5
        let outcome = play(&mut r, &[0, 4, 1, 5, 2]);
        assert_eq!(outcome, MoveOutcome::Won(Mark::X));
        assert!(r.is_game_over());
        assert_eq!(r.turn(), Mark::X);
        assert_eq!(r.phase(), RoomPhase::Finished);
    }

    #[test]
    fn test_no_move_after_win_mutates_board() {
        let mut r = room();
        play(&mut r, &[0, 4, 1, 5, 2]);
        let frozen = *r.board();
        for i in 0..BOARD_SIZE {
            assert_eq!(
                r.apply_move(i),
                MoveOutcome::Rejected(MoveRejection::GameOver)
            );
        }
        assert_eq!(*r.board(), frozen);
    }

    #[test]
    fn test_nine_moves_without_line_is_a_draw() {
        let mut r = room();
        // X O X
        // X O O
        // O X X
        let outcome = play(&mut r, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(outcome, MoveOutcome::Draw);
        assert!(r.is_game_over());
        assert!(r.board().iter().all(Option::is_some));
    }

    #[test]
    fn test_win_on_last_cell_is_a_win_not_a_draw() {
        let mut r = room();
        // X O X
        // O X O
        // O X X   (X completes the 0-4-8 diagonal on the ninth move)
        let outcome = play(&mut r, &[0, 1, 2, 3, 4, 5, 7, 6, 8]);
        assert_eq!(outcome, MoveOutcome::Won(Mark::X));
    }

    #[test]
    fn test_any_distinct_nine_moves_end_the_game() {
        // Rotate the cell order so each run visits all nine cells once.
        for start in 0..BOARD_SIZE {
            let mut r = room();
            for k in 0..BOARD_SIZE {
                r.apply_move((start + k * 2) % BOARD_SIZE);
            }
            assert!(r.is_game_over(), "order starting at {start}");
        }
    }
}

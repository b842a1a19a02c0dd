//! 回合控制
//!
//! 每回合先给出一个首选候选（搜索或启发式），交给裁判核验；
//! 被拒绝或超时后改用随机候选重试，直到达到尝试上限。

use std::fmt;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ttc_core::{
    Action, Alignment, Board, MoveGenerator, Piece, PieceType, Position, Referee, Side, Verdict,
    BOARD_SIZE, PAWN_FORWARD,
};

use crate::config::AiConfig;
use crate::error::{AiError, Result};
use crate::evaluate::Evaluator;
use crate::search::{AiEngine, PawnDirections};
use crate::session::Session;

/// 开局放子时优先占用的格子：底行，然后中心四格
const PREFERRED_CELLS: [(u8, u8); 8] = [
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
    (1, 1),
    (1, 2),
    (2, 1),
    (2, 2),
];

/// 回合阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// 己方四种棋子尚未全部上盘
    Placement,
    /// 四种棋子均已上盘
    Movement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Placement => write!(f, "placement"),
            Phase::Movement => write!(f, "movement"),
        }
    }
}

/// 候选行动的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateSource {
    /// Minimax 搜索
    Search,
    /// 开局放子启发式
    Heuristic,
    /// 堵截对方三连
    Block,
    /// 随机兜底
    Random,
}

/// 一个回合的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// 走完后的棋盘
    pub board: Board,
    pub phase: Phase,
    pub verdict: Verdict,
    pub action: Action,
    /// 第几次尝试被接受（从 1 开始）
    pub attempts: u32,
    pub source: CandidateSource,
}

/// 回合控制器
pub struct TurnController {
    config: AiConfig,
    engine: AiEngine,
    rng: ChaCha8Rng,
}

impl TurnController {
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            engine: AiEngine::new(&config),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 走一个回合
    ///
    /// 返回被裁判接受的新棋盘；尝试次数用尽时返回
    /// [`AiError::NoValidTransition`]，绝不返回原棋盘。
    pub fn play_turn(&mut self, session: &mut Session, board: &Board) -> Result<TurnReport> {
        board.validate()?;
        let side = session.begin_turn(board)?;
        let phase = if session.is_placing() {
            Phase::Placement
        } else {
            Phase::Movement
        };

        let started = Instant::now();
        let time_limit = Duration::from_millis(self.config.time_limit_ms);

        for attempt in 1..=self.config.max_attempts {
            let degraded = started.elapsed() >= time_limit;
            if degraded && attempt == 1 {
                warn!(
                    "{} turn {}: time budget exhausted, random fallback only",
                    side, session.turn_count
                );
            }

            let candidate = if attempt == 1 && !degraded {
                match self.first_candidate(session, board, side, phase)? {
                    Some(candidate) => Some(candidate),
                    None => self.random_candidate(session, board, side, phase)?,
                }
            } else {
                self.random_candidate(session, board, side, phase)?
            };

            let Some((action, source)) = candidate else {
                warn!("{} turn {}: no candidate (attempt {})", side, session.turn_count, attempt);
                continue;
            };

            let next = action.applied_to(board);
            let mut budget = session.budget;
            let judged = Referee::judge(board, &next, budget).and_then(|verdict| {
                if verdict == Verdict::Capture {
                    budget.consume()?;
                }
                Ok(verdict)
            });

            match judged {
                Ok(verdict) => {
                    session.budget = budget;
                    let placed_pawn = matches!(action, Action::Place { .. })
                        && action.piece().piece_type == PieceType::Pawn;
                    if placed_pawn {
                        session.pawn_direction = PAWN_FORWARD;
                    }
                    session.end_turn(&next)?;

                    info!(
                        "{} turn {}: {} {:?} {} via {:?} (attempt {}, captures left {})",
                        side,
                        session.turn_count,
                        phase,
                        verdict,
                        action,
                        source,
                        attempt,
                        session.captures_remaining()
                    );

                    return Ok(TurnReport {
                        board: next,
                        phase,
                        verdict,
                        action,
                        attempts: attempt,
                        source,
                    });
                }
                Err(rejection) => {
                    warn!(
                        "{} turn {}: rejected {} (attempt {}): {}",
                        side, session.turn_count, action, attempt, rejection
                    );
                }
            }
        }

        error!(
            "{} turn {}: no valid transition after {} attempts",
            side, session.turn_count, self.config.max_attempts
        );
        Err(AiError::NoValidTransition {
            attempts: self.config.max_attempts,
        })
    }

    /// 首选候选
    fn first_candidate(
        &mut self,
        session: &Session,
        board: &Board,
        side: Side,
        phase: Phase,
    ) -> Result<Option<(Action, CandidateSource)>> {
        let pawns = session.pawn_directions()?;
        let allow_captures = session.budget.can_capture();

        match phase {
            Phase::Placement => {
                if self.config.search_placements && session.own_present.count() >= 2 {
                    let outcome = self.engine.search(board, side, pawns, allow_captures)?;
                    if let Some(action) = outcome.action {
                        return Ok(Some((action, CandidateSource::Search)));
                    }
                }
                Ok(self.heuristic_placement(session, board, side))
            }
            Phase::Movement => {
                let outcome = self.engine.search(board, side, pawns, allow_captures)?;
                if let Some(action) = outcome.action {
                    if Evaluator::is_win(outcome.score) {
                        return Ok(Some((action, CandidateSource::Search)));
                    }
                }
                if let Some(action) = self.block_move(session, board, side, pawns)? {
                    return Ok(Some((action, CandidateSource::Block)));
                }
                Ok(outcome.action.map(|action| (action, CandidateSource::Search)))
            }
        }
    }

    /// 放子启发式：先堵对方三连，再补己方的线，最后按开局顺序占位
    fn heuristic_placement(
        &mut self,
        session: &Session,
        board: &Board,
        side: Side,
    ) -> Option<(Action, CandidateSource)> {
        let own_missing = session.own_present.missing();
        let lowest = *own_missing.first()?;

        let mine = Alignment::max_aligned(board, side);
        let theirs = Alignment::max_aligned(board, side.opponent());

        if theirs.count == BOARD_SIZE - 1 && mine.count != BOARD_SIZE - 1 {
            if let Some(to) = theirs.empty_missing_cells(board).next() {
                return Some((place(lowest, side, to), CandidateSource::Block));
            }
        }

        if mine.count >= 1 {
            let fill = mine.missing.iter().find(|t| own_missing.contains(*t));
            let cell = mine.empty_missing_cells(board).next();
            if let (Some(&piece_type), Some(to)) = (fill, cell) {
                return Some((place(piece_type, side, to), CandidateSource::Heuristic));
            }
        }

        let piece_type = self
            .config
            .opening_order
            .iter()
            .copied()
            .find(|t| own_missing.contains(t))
            .unwrap_or(lowest);
        let preferred = PREFERRED_CELLS
            .iter()
            .map(|&(row, col)| Position::new_unchecked(row, col))
            .find(|&pos| board.is_empty_at(pos));
        let to = match preferred {
            Some(pos) => pos,
            None => *board.empty_cells().choose(&mut self.rng)?,
        };
        Some((place(piece_type, side, to), CandidateSource::Heuristic))
    }

    /// 对方已三连而己方没有时，找一步能堵住的走法
    ///
    /// 走到对方缺口的空格上，或在还有吃子次数时吃掉线上的对方棋子；
    /// 走完后对方仍能一步连线的不算。
    fn block_move(
        &self,
        session: &Session,
        board: &Board,
        side: Side,
        pawns: PawnDirections,
    ) -> Result<Option<Action>> {
        let opponent = side.opponent();
        let theirs = Alignment::max_aligned(board, opponent);
        let threatened = theirs.count == BOARD_SIZE - 1
            && Alignment::max_aligned_count(board, side) < BOARD_SIZE - 1;
        if !threatened {
            return Ok(None);
        }

        let gaps: Vec<Position> = theirs.empty_missing_cells(board).collect();
        let can_capture = session.budget.can_capture();

        for mv in MoveGenerator::generate_moves(board, side, pawns.get(side))? {
            let blocks = if mv.is_capture() {
                can_capture && theirs.aligned_cells.contains(&mv.to)
            } else {
                gaps.contains(&mv.to)
            };
            if !blocks {
                continue;
            }

            let action = Action::Move(mv);
            let next = action.applied_to(board);
            if !Self::can_win_next(&next, opponent, pawns.get(opponent))? {
                return Ok(Some(action));
            }
        }
        Ok(None)
    }

    /// `side` 能否一步连线
    fn can_win_next(board: &Board, side: Side, pawn_direction: i8) -> Result<bool> {
        let actions = MoveGenerator::generate_actions(board, side, pawn_direction)?;
        Ok(actions
            .iter()
            .any(|action| Alignment::has_aligned(&action.applied_to(board), side)))
    }

    /// 随机候选
    ///
    /// 放子：随机空格 + 随机未上盘的棋子；走子：随机不吃子的走法，
    /// 只有没有任何不吃子走法且还有吃子次数时才随机吃子。
    fn random_candidate(
        &mut self,
        session: &Session,
        board: &Board,
        side: Side,
        phase: Phase,
    ) -> Result<Option<(Action, CandidateSource)>> {
        let action = match phase {
            Phase::Placement => {
                let missing = session.own_present.missing();
                let cells = board.empty_cells();
                match (cells.choose(&mut self.rng), missing.choose(&mut self.rng)) {
                    (Some(&to), Some(&piece_type)) => Some(place(piece_type, side, to)),
                    _ => None,
                }
            }
            Phase::Movement => {
                let (captures, quiet): (Vec<_>, Vec<_>) =
                    MoveGenerator::generate_moves(board, side, session.pawn_direction)?
                        .into_iter()
                        .partition(|mv| mv.is_capture());
                if !quiet.is_empty() {
                    quiet.choose(&mut self.rng).copied().map(Action::Move)
                } else if session.budget.can_capture() {
                    captures.choose(&mut self.rng).copied().map(Action::Move)
                } else {
                    None
                }
            }
        };
        Ok(action.map(|action| (action, CandidateSource::Random)))
    }
}

fn place(piece_type: PieceType, side: Side, to: Position) -> Action {
    Action::Place {
        piece: Piece::new(piece_type, side),
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use ttc_core::{CaptureBudget, Fen, Move};

    fn pos(row: u8, col: u8) -> Position {
        Position::new_unchecked(row, col)
    }

    fn controller() -> TurnController {
        TurnController::new(AiConfig::from_difficulty(Difficulty::Medium).with_seed(7))
    }

    fn session(side: Side) -> Session {
        let mut session = Session::default();
        session.set_color(side);
        session
    }

    #[test]
    fn test_color_not_set() {
        let mut controller = controller();
        let mut session = Session::default();
        let result = controller.play_turn(&mut session, &Board::empty());
        assert_eq!(result, Err(AiError::ColorNotSet));
    }

    #[test]
    fn test_first_placement() {
        let mut controller = controller();
        let mut session = session(Side::White);
        let report = controller.play_turn(&mut session, &Board::empty()).unwrap();

        assert_eq!(session.turn_count, 0);
        assert_eq!(report.phase, Phase::Placement);
        assert_eq!(report.verdict, Verdict::Placement);
        assert_eq!(Board::empty().diff(&report.board).len(), 1);
        // 开局顺序第一个是象，放在底行第一格
        assert_eq!(report.action, place(PieceType::Bishop, Side::White, pos(3, 0)));
    }

    #[test]
    fn test_placement_blocks_three() {
        let mut controller = controller();
        let mut session = session(Side::White);
        let board = Fen::parse("B3/4/4/pbn1").unwrap();
        let report = controller.play_turn(&mut session, &board).unwrap();

        assert_eq!(report.source, CandidateSource::Block);
        assert_eq!(report.action, place(PieceType::Pawn, Side::White, pos(3, 3)));
    }

    #[test]
    fn test_placement_completes_line() {
        let mut controller = controller();
        let mut session = session(Side::White);
        let board = Fen::parse("PBN1/4/4/b3").unwrap();
        let report = controller.play_turn(&mut session, &board).unwrap();

        assert_eq!(report.action, place(PieceType::Rook, Side::White, pos(0, 3)));
        assert_eq!(Alignment::winner(&report.board), Some(Side::White));
    }

    #[test]
    fn test_movement_takes_win() {
        let mut controller = controller();
        let mut session = session(Side::White);
        let board = Fen::parse("PBN1/4/n3/bp1R").unwrap();
        let report = controller.play_turn(&mut session, &board).unwrap();

        assert_eq!(report.phase, Phase::Movement);
        assert_eq!(report.verdict, Verdict::Move);
        assert_eq!(
            report.action,
            Action::Move(Move::new(Piece::new(PieceType::Rook, Side::White), pos(3, 3), pos(0, 3)))
        );
        assert!(Alignment::has_aligned(&report.board, Side::White));
    }

    #[test]
    fn test_capture_blocks_three() {
        // 黑方第 3 行三子，(3,3) 白方走不到，只能吃掉线上的马
        let mut controller = controller();
        let mut session = session(Side::White);
        let board = Fen::parse("3r/R1P1/NB2/pbn1").unwrap();
        let report = controller.play_turn(&mut session, &board).unwrap();

        assert_eq!(report.source, CandidateSource::Block);
        assert_eq!(report.verdict, Verdict::Capture);
        assert_eq!(
            report.action,
            Action::Move(Move::with_capture(
                Piece::new(PieceType::Knight, Side::White),
                pos(2, 0),
                pos(3, 2),
                Piece::new(PieceType::Knight, Side::Black),
            ))
        );
        assert_eq!(session.captures_remaining(), 4);
    }

    #[test]
    fn test_no_capture_block_without_budget() {
        let controller = controller();
        let mut session = session(Side::White);
        let board = Fen::parse("3r/R1P1/NB2/pbn1").unwrap();
        let pawns = PawnDirections::default();

        assert!(controller.block_move(&session, &board, Side::White, pawns).unwrap().is_some());

        session.budget = CaptureBudget::new(0);
        assert_eq!(controller.block_move(&session, &board, Side::White, pawns).unwrap(), None);
    }

    #[test]
    fn test_skips_losing_block() {
        // 象可以走到 (3,3) 堵住，但黑车会沿第 3 列吃掉它完成连线
        let controller = controller();
        let session = session(Side::White);
        let board = Fen::parse("RN1r/1B2/P3/pbn1").unwrap();
        let pawns = PawnDirections::default();

        let bishop = Piece::new(PieceType::Bishop, Side::White);
        let bishop_block = Move::new(bishop, pos(1, 1), pos(3, 3));
        let moves = MoveGenerator::generate_moves(&board, Side::White, -1).unwrap();
        assert!(moves.contains(&bishop_block));

        assert_eq!(controller.block_move(&session, &board, Side::White, pawns).unwrap(), None);
    }

    #[test]
    fn test_capture_consumes_budget() {
        let mut controller = controller();
        let mut session = session(Side::White);
        session.budget = CaptureBudget::new(1);

        // 白方没有不吃子的走法
        let board = Fen::parse("RPb1/NB2/n1r1/1p2").unwrap();
        let report = controller.play_turn(&mut session, &board).unwrap();
        assert_eq!(report.verdict, Verdict::Capture);
        assert_eq!(session.captures_remaining(), 0);
    }

    #[test]
    fn test_exhausted_budget_gives_up() {
        let mut config = AiConfig::from_difficulty(Difficulty::Easy).with_seed(1);
        config.max_attempts = 20;
        let mut controller = TurnController::new(config);
        let mut session = session(Side::White);
        session.budget = CaptureBudget::new(0);

        let board = Fen::parse("RPb1/NB2/n1r1/1p2").unwrap();
        let result = controller.play_turn(&mut session, &board);
        assert_eq!(result, Err(AiError::NoValidTransition { attempts: 20 }));
        assert_eq!(session.captures_remaining(), 0);
    }

    #[test]
    fn test_zero_time_limit_still_moves() {
        let mut config = AiConfig::from_difficulty(Difficulty::Medium).with_seed(3);
        config.time_limit_ms = 0;
        let mut controller = TurnController::new(config);
        let mut session = session(Side::Black);

        let report = controller.play_turn(&mut session, &Board::empty()).unwrap();
        assert_eq!(report.source, CandidateSource::Random);
        assert_eq!(report.verdict, Verdict::Placement);
    }

    #[test]
    fn test_seeded_turns_repeat() {
        let board = Fen::parse("B2n/1P2/2r1/N2b").unwrap();

        let mut first = controller();
        let mut first_session = session(Side::White);
        let a = first.play_turn(&mut first_session, &board).unwrap();

        let mut second = controller();
        let mut second_session = session(Side::White);
        let b = second.play_turn(&mut second_session, &board).unwrap();

        assert_eq!(a, b);
    }
}

//! 4x4 井字象棋（Tic-Tac-Chess）规则库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 走法生成
//! - 连线（胜负）判定与连线分析
//! - 走子分类与吃子次数限制
//! - 棋盘记谱

mod alignment;
mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod piece;
mod referee;

pub use alignment::{Alignment, AlignmentReport};
pub use board::{Board, Line, LineKind, PiecePresence};
pub use constants::*;
pub use error::{Result, RuleError};
pub use fen::{Fen, EMPTY_FEN};
pub use moves::{Action, Move, MoveGenerator, PieceMoves};
pub use piece::{is_inside, same_side, Piece, PieceType, Position, Side};
pub use referee::{CaptureBudget, Referee, Rejection, Transition, Verdict};

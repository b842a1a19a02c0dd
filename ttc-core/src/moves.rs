//! 走法生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{PAWN_FORWARD, PAWN_HOME_ROW, PAWN_TURN_ROW};
use crate::error::{Result, RuleError};
use crate::piece::{same_side, Piece, PieceType, Position, Side};

/// 象的四个斜向：左上、右上、左下、右下
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 车的四个方向：上、右、下、左
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// 马的八个日字偏移
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 走动的棋子
    pub piece: Piece,
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 被吃的棋子（如果有）
    pub captured: Option<Piece>,
}

impl Move {
    /// 创建新走法
    pub fn new(piece: Piece, from: Position, to: Position) -> Self {
        Self {
            piece,
            from,
            to,
            captured: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(piece: Piece, from: Position, to: Position, captured: Piece) -> Self {
        Self {
            piece,
            from,
            to,
            captured: Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.is_capture() { "x" } else { "->" };
        write!(f, "{} {} {} {}", self.piece.to_fen_char(), self.from, sep, self.to)
    }
}

/// 一步行动：放子或走子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// 把尚未上盘的棋子放到空格上
    Place { piece: Piece, to: Position },
    /// 移动已在盘上的棋子（可能吃子）
    Move(Move),
}

impl Action {
    pub fn piece(&self) -> Piece {
        match self {
            Action::Place { piece, .. } => *piece,
            Action::Move(mv) => mv.piece,
        }
    }

    pub fn to(&self) -> Position {
        match self {
            Action::Place { to, .. } => *to,
            Action::Move(mv) => mv.to,
        }
    }

    pub fn is_capture(&self) -> bool {
        matches!(self, Action::Move(mv) if mv.is_capture())
    }

    /// 在棋盘上执行
    pub fn apply(&self, board: &mut Board) {
        match self {
            Action::Place { piece, to } => board.set(*to, Some(*piece)),
            Action::Move(mv) => {
                board.move_piece(mv.from, mv.to);
            }
        }
    }

    /// 撤销 [`Action::apply`]
    pub fn undo(&self, board: &mut Board) {
        match self {
            Action::Place { to, .. } => board.set(*to, None),
            Action::Move(mv) => {
                board.set(mv.from, Some(mv.piece));
                board.set(mv.to, mv.captured);
            }
        }
    }

    /// 执行后的新棋盘
    pub fn applied_to(&self, board: &Board) -> Board {
        let mut next = *board;
        self.apply(&mut next);
        next
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Place { piece, to } => write!(f, "{} @ {}", piece.to_fen_char(), to),
            Action::Move(mv) => mv.fmt(f),
        }
    }
}

/// 单个棋子的全部目标格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMoves {
    pub piece: Piece,
    pub from: Position,
    pub destinations: Vec<Position>,
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 指定格子上那枚棋子的合法目标格（只看占位，不考虑其他规则）
    ///
    /// `pawn_direction` 为兵前进一步的行增量（+1 或 -1），其他棋子忽略。
    pub fn destinations(
        board: &Board,
        pos: Position,
        code: i8,
        pawn_direction: i8,
    ) -> Result<Vec<Position>> {
        let piece = Piece::from_code(code)?.ok_or(RuleError::NoPiece {
            row: pos.row,
            col: pos.col,
        })?;

        let mut destinations = Vec::with_capacity(8);
        match piece.piece_type {
            PieceType::Pawn => {
                Self::pawn_destinations(board, pos, code, pawn_direction, &mut destinations)
            }
            PieceType::Bishop => {
                Self::slide_destinations(board, pos, code, &BISHOP_DIRECTIONS, &mut destinations)
            }
            PieceType::Knight => Self::knight_destinations(board, pos, code, &mut destinations),
            PieceType::Rook => {
                Self::slide_destinations(board, pos, code, &ROOK_DIRECTIONS, &mut destinations)
            }
        }
        Ok(destinations)
    }

    /// 兵：向前一格（须为空），斜前方只能吃子
    fn pawn_destinations(
        board: &Board,
        pos: Position,
        code: i8,
        direction: i8,
        out: &mut Vec<Position>,
    ) {
        if let Some(to) = pos.offset(direction, 0) {
            if board.is_empty_at(to) {
                out.push(to);
            }
        }

        for d_col in [-1i8, 1i8] {
            if let Some(to) = pos.offset(direction, d_col) {
                let target = board.code_at(to);
                if target != 0 && !same_side(code, target) {
                    out.push(to);
                }
            }
        }
    }

    /// 象和车：沿方向滑行，按距离由近到远、方向交替的顺序生成
    ///
    /// 遇到对方棋子可吃并停下，遇到己方棋子直接停下。
    fn slide_destinations(
        board: &Board,
        pos: Position,
        code: i8,
        directions: &[(i8, i8); 4],
        out: &mut Vec<Position>,
    ) {
        let mut blocked = [false; 4];

        for distance in 1..=3i8 {
            for (i, (d_row, d_col)) in directions.iter().enumerate() {
                if blocked[i] {
                    continue;
                }
                let Some(to) = pos.offset(d_row * distance, d_col * distance) else {
                    blocked[i] = true;
                    continue;
                };
                let target = board.code_at(to);
                if target != 0 {
                    if !same_side(code, target) {
                        out.push(to);
                    }
                    blocked[i] = true;
                } else {
                    out.push(to);
                }
            }
        }
    }

    /// 马：八个日字位置，不能落在己方棋子上
    fn knight_destinations(board: &Board, pos: Position, code: i8, out: &mut Vec<Position>) {
        for (d_row, d_col) in KNIGHT_OFFSETS {
            if let Some(to) = pos.offset(d_row, d_col) {
                if !same_side(code, board.code_at(to)) {
                    out.push(to);
                }
            }
        }
    }

    /// 指定阵营每枚棋子的目标格（行优先）
    pub fn all_legal_moves(
        board: &Board,
        side: Side,
        pawn_direction: i8,
    ) -> Result<Vec<PieceMoves>> {
        let mut result = Vec::with_capacity(4);
        for pos in Position::all() {
            let code = board.code_at(pos);
            if !side.owns(code) {
                continue;
            }
            let piece = Piece::from_code(code)?.ok_or(RuleError::NoPiece {
                row: pos.row,
                col: pos.col,
            })?;
            let destinations = Self::destinations(board, pos, code, pawn_direction)?;
            result.push(PieceMoves {
                piece,
                from: pos,
                destinations,
            });
        }
        Ok(result)
    }

    /// 指定阵营的所有走法
    pub fn generate_moves(board: &Board, side: Side, pawn_direction: i8) -> Result<Vec<Move>> {
        let mut moves = Vec::with_capacity(32);
        for piece_moves in Self::all_legal_moves(board, side, pawn_direction)? {
            for to in piece_moves.destinations {
                let mv = match Piece::from_code(board.code_at(to))? {
                    Some(captured) => {
                        Move::with_capture(piece_moves.piece, piece_moves.from, to, captured)
                    }
                    None => Move::new(piece_moves.piece, piece_moves.from, to),
                };
                moves.push(mv);
            }
        }
        Ok(moves)
    }

    /// 指定阵营的所有放子行动：每个空格 × 每种未上盘的棋子
    pub fn generate_placements(board: &Board, side: Side) -> Vec<Action> {
        let missing = board.presence(side).missing();
        let mut placements = Vec::with_capacity(missing.len() * 16);
        for to in board.empty_cells() {
            for &piece_type in &missing {
                placements.push(Action::Place {
                    piece: Piece::new(piece_type, side),
                    to,
                });
            }
        }
        placements
    }

    /// 根据兵在棋盘上的位置更新它的朝向
    ///
    /// 兵走到顶行后折返（+1），回到底行后重新向上（-1），其余情况不变。
    pub fn next_pawn_direction(board: &Board, side: Side, current: i8) -> i8 {
        let Some(pos) = board.find(Piece::new(PieceType::Pawn, side)) else {
            return current;
        };
        match pos.row as usize {
            PAWN_TURN_ROW => -PAWN_FORWARD,
            PAWN_HOME_ROW => PAWN_FORWARD,
            _ => current,
        }
    }

    /// 指定阵营当前阶段的全部行动
    ///
    /// 四种棋子未全部上盘时只能放子，否则只能走子。
    pub fn generate_actions(board: &Board, side: Side, pawn_direction: i8) -> Result<Vec<Action>> {
        if board.presence(side).is_complete() {
            Ok(Self::generate_moves(board, side, pawn_direction)?
                .into_iter()
                .map(Action::Move)
                .collect())
        } else {
            Ok(Self::generate_placements(board, side))
        }
    }
}

//! 棋子、阵营与位置定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::{Result, RuleError};

/// 棋子类型，取值即棋子编码的绝对值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 兵
    Pawn = 1,
    /// 象
    Bishop = 2,
    /// 马
    Knight = 3,
    /// 车
    Rook = 4,
}

impl PieceType {
    /// 按编码绝对值升序排列的全部棋子类型
    pub const ALL: [PieceType; 4] = [
        PieceType::Pawn,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];

    /// 编码绝对值（1..=4）
    pub fn magnitude(&self) -> i8 {
        *self as i8
    }

    /// 从编码绝对值解析
    pub fn from_magnitude(magnitude: i8) -> Result<PieceType> {
        match magnitude {
            1 => Ok(PieceType::Pawn),
            2 => Ok(PieceType::Bishop),
            3 => Ok(PieceType::Knight),
            4 => Ok(PieceType::Rook),
            _ => Err(RuleError::UnknownPiece { code: magnitude }),
        }
    }

    /// 记谱字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从记谱字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            'r' => PieceType::Rook,
            _ => return None,
        };
        Some((piece_type, side))
    }
}

/// 阵营，取值即棋子编码的符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（正编码）
    White,
    /// 黑方（负编码）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 编码符号：白方 +1，黑方 -1
    pub fn sign(&self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// 从符号解析（只看正负）
    pub fn from_sign(sign: i8) -> Option<Side> {
        match sign.signum() {
            1 => Some(Side::White),
            -1 => Some(Side::Black),
            _ => None,
        }
    }

    /// 编码是否属于本方
    pub fn owns(&self, code: i8) -> bool {
        code != 0 && code.signum() == self.sign()
    }

    /// 数组下标：白方 0，黑方 1
    pub fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 棋盘编码（带符号）
    pub fn code(&self) -> i8 {
        self.piece_type.magnitude() * self.side.sign()
    }

    /// 从棋盘编码解析，0 表示空格
    pub fn from_code(code: i8) -> Result<Option<Piece>> {
        if code == 0 {
            return Ok(None);
        }
        let piece_type = PieceType::from_magnitude(code.checked_abs().unwrap_or(i8::MAX))
            .map_err(|_| RuleError::UnknownPiece { code })?;
        let side = if code > 0 { Side::White } else { Side::Black };
        Ok(Some(Piece::new(piece_type, side)))
    }

    /// 获取记谱字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }

    /// 从记谱字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, side)| Piece { piece_type, side })
    }
}

/// 两个编码是否同属一方（均非空且同号）
pub fn same_side(a: i8, b: i8) -> bool {
    (a < 0 && b < 0) || (a > 0 && b > 0)
}

/// 坐标是否在棋盘内
pub fn is_inside(row: i8, col: i8) -> bool {
    (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col)
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-3)，0 为顶行
    pub row: u8,
    /// 列 (0-3)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 获取偏移后的位置，越界返回 None
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if is_inside(row, col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引（行优先）
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 行优先遍历全部格子
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Position {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_codes() {
        let white_rook = Piece::new(PieceType::Rook, Side::White);
        assert_eq!(white_rook.code(), 4);

        let black_pawn = Piece::new(PieceType::Pawn, Side::Black);
        assert_eq!(black_pawn.code(), -1);

        assert_eq!(Piece::from_code(-3), Ok(Some(Piece::new(PieceType::Knight, Side::Black))));
        assert_eq!(Piece::from_code(0), Ok(None));
    }

    #[test]
    fn test_unknown_piece_code() {
        assert_eq!(Piece::from_code(5), Err(RuleError::UnknownPiece { code: 5 }));
        assert_eq!(Piece::from_code(-7), Err(RuleError::UnknownPiece { code: -7 }));
        assert_eq!(Piece::from_code(i8::MIN), Err(RuleError::UnknownPiece { code: i8::MIN }));
    }

    #[test]
    fn test_piece_fen_char() {
        assert_eq!(Piece::new(PieceType::Bishop, Side::White).to_fen_char(), 'B');
        assert_eq!(Piece::new(PieceType::Knight, Side::Black).to_fen_char(), 'n');
        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceType::Rook, Side::White))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_same_side() {
        assert!(same_side(1, 4));
        assert!(same_side(-2, -3));
        assert!(!same_side(1, -1));
        assert!(!same_side(0, 2));
        assert!(!same_side(0, 0));
    }

    #[test]
    fn test_position_valid() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(3, 3).is_some());
        assert!(Position::new(4, 0).is_none());
        assert!(Position::new(0, 4).is_none());
        assert!(is_inside(3, 0));
        assert!(!is_inside(-1, 2));
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new_unchecked(0, 3);
        assert_eq!(pos.offset(1, -1), Some(Position::new_unchecked(1, 2)));
        assert_eq!(pos.offset(-1, 0), None);
        assert_eq!(pos.offset(0, 1), None);
    }

    #[test]
    fn test_position_index_roundtrip() {
        for pos in Position::all() {
            assert_eq!(Position::from_index(pos.to_index()), Some(pos));
        }
        assert_eq!(Position::all().count(), 16);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(Side::from_sign(-4), Some(Side::Black));
        assert_eq!(Side::from_sign(0), None);
        assert!(Side::White.owns(2));
        assert!(!Side::White.owns(-2));
    }
}

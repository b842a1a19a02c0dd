//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, PIECE_KINDS};
use crate::error::{Result, RuleError};
use crate::piece::{Piece, PieceType, Position, Side};

/// 4x4 棋盘
///
/// 每格存放带符号的棋子编码：符号为阵营，绝对值为棋子类型，0 为空。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[i8; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self::default()
    }

    /// 直接包装外部传入的棋盘快照（不做校验）
    pub fn new(cells: [[i8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// 从快照创建棋盘并校验编码与“每方每种一枚”约束
    pub fn try_from_rows(cells: [[i8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self> {
        let board = Self { cells };
        board.validate()?;
        Ok(board)
    }

    /// 校验棋盘
    pub fn validate(&self) -> Result<()> {
        let mut seen = [[false; PIECE_KINDS + 1]; 2];
        for pos in Position::all() {
            let code = self.code_at(pos);
            if let Some(piece) = Piece::from_code(code)? {
                let slot = &mut seen[piece.side.index()][piece.piece_type.magnitude() as usize];
                if *slot {
                    return Err(RuleError::DuplicatePiece { code });
                }
                *slot = true;
            }
        }
        Ok(())
    }

    /// 原始编码矩阵
    pub fn rows(&self) -> [[i8; BOARD_SIZE]; BOARD_SIZE] {
        self.cells
    }

    /// 获取指定位置的编码
    pub fn code_at(&self, pos: Position) -> i8 {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Result<Option<Piece>> {
        Piece::from_code(self.code_at(pos))
    }

    /// 设置指定位置的编码
    pub fn set_code(&mut self, pos: Position, code: i8) {
        self.cells[pos.row as usize][pos.col as usize] = code;
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.set_code(pos, piece.map_or(0, |p| p.code()));
    }

    /// 是否为空格
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.code_at(pos) == 0
    }

    /// 移动棋子（不检查规则），返回被吃掉的编码（0 表示没有）
    pub fn move_piece(&mut self, from: Position, to: Position) -> i8 {
        let moving = self.code_at(from);
        let captured = self.code_at(to);
        self.set_code(from, 0);
        self.set_code(to, moving);
        captured
    }

    /// 查找指定棋子的位置
    pub fn find(&self, piece: Piece) -> Option<Position> {
        let code = piece.code();
        Position::all().find(|&pos| self.code_at(pos) == code)
    }

    /// 获取指定阵营的所有棋子（行优先）
    pub fn pieces(&self, side: Side) -> Result<Vec<(Position, Piece)>> {
        let mut result = Vec::with_capacity(PIECE_KINDS);
        for pos in Position::all() {
            if side.owns(self.code_at(pos)) {
                if let Some(piece) = self.get(pos)? {
                    result.push((pos, piece));
                }
            }
        }
        Ok(result)
    }

    /// 所有空格（行优先）
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all().filter(|&pos| self.is_empty_at(pos)).collect()
    }

    /// 指定阵营在棋盘上的棋子种类
    pub fn presence(&self, side: Side) -> PiecePresence {
        let mut presence = PiecePresence::default();
        for pos in Position::all() {
            // 非法编码不计入
            if let Ok(Some(piece)) = self.get(pos) {
                if piece.side == side {
                    presence.mark(piece.piece_type);
                }
            }
        }
        presence
    }

    /// 与另一棋盘相比发生变化的格子（行优先）
    pub fn diff(&self, other: &Board) -> Vec<Position> {
        Position::all()
            .filter(|&pos| self.code_at(pos) != other.code_at(pos))
            .collect()
    }

    /// 一条线上的四个编码，序号越界时为 None
    pub fn line(&self, line: Line) -> Option<[i8; BOARD_SIZE]> {
        line.positions().map(|cells| cells.map(|pos| self.code_at(pos)))
    }

    /// 按种类与序号取一条线的四个编码
    pub fn line_values(&self, kind: LineKind, index: usize) -> Option<[i8; BOARD_SIZE]> {
        Line::from_kind(kind, index).and_then(|line| self.line(line))
    }
}

impl From<[[i8; BOARD_SIZE]; BOARD_SIZE]> for Board {
    fn from(cells: [[i8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self::new(cells)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|c| format!("{:>2}", c)).collect();
            write!(f, "[{}]", cells.join(", "))?;
            if i + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// 线的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Row,
    Column,
    MainDiagonal,
    AntiDiagonal,
}

/// 棋盘上的一条线（行、列或对角线）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row(u8),
    Column(u8),
    /// 左上到右下
    MainDiagonal,
    /// 右上到左下
    AntiDiagonal,
}

impl Line {
    /// 全部十条线，按声明顺序：各行、各列、主对角线、副对角线
    pub const ALL: [Line; 10] = [
        Line::Row(0),
        Line::Row(1),
        Line::Row(2),
        Line::Row(3),
        Line::Column(0),
        Line::Column(1),
        Line::Column(2),
        Line::Column(3),
        Line::MainDiagonal,
        Line::AntiDiagonal,
    ];

    /// 按种类与序号构造；对角线忽略序号
    pub fn from_kind(kind: LineKind, index: usize) -> Option<Line> {
        match kind {
            LineKind::Row if index < BOARD_SIZE => Some(Line::Row(index as u8)),
            LineKind::Column if index < BOARD_SIZE => Some(Line::Column(index as u8)),
            LineKind::MainDiagonal => Some(Line::MainDiagonal),
            LineKind::AntiDiagonal => Some(Line::AntiDiagonal),
            _ => None,
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            Line::Row(_) => LineKind::Row,
            Line::Column(_) => LineKind::Column,
            Line::MainDiagonal => LineKind::MainDiagonal,
            Line::AntiDiagonal => LineKind::AntiDiagonal,
        }
    }

    /// 行、列序号是否在棋盘内
    pub fn is_valid(&self) -> bool {
        match *self {
            Line::Row(index) | Line::Column(index) => (index as usize) < BOARD_SIZE,
            Line::MainDiagonal | Line::AntiDiagonal => true,
        }
    }

    /// 线上四个格子的位置，序号越界时为 None
    pub fn positions(&self) -> Option<[Position; BOARD_SIZE]> {
        if !self.is_valid() {
            return None;
        }
        let last = (BOARD_SIZE - 1) as u8;
        Some(std::array::from_fn(|i| {
            let i = i as u8;
            match *self {
                Line::Row(r) => Position::new_unchecked(r, i),
                Line::Column(c) => Position::new_unchecked(i, c),
                Line::MainDiagonal => Position::new_unchecked(i, i),
                Line::AntiDiagonal => Position::new_unchecked(i, last - i),
            }
        }))
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {}", r),
            Line::Column(c) => write!(f, "column {}", c),
            Line::MainDiagonal => write!(f, "main diagonal"),
            Line::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// 一方在棋盘上已有的棋子种类，下标为编码绝对值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PiecePresence {
    present: [bool; PIECE_KINDS + 1],
}

impl PiecePresence {
    pub fn mark(&mut self, piece_type: PieceType) {
        self.present[piece_type.magnitude() as usize] = true;
    }

    pub fn contains(&self, piece_type: PieceType) -> bool {
        self.present[piece_type.magnitude() as usize]
    }

    /// 已在棋盘上的种类数
    pub fn count(&self) -> usize {
        PieceType::ALL.iter().filter(|&&t| self.contains(t)).count()
    }

    /// 四种棋子是否都已上盘
    pub fn is_complete(&self) -> bool {
        self.count() == PIECE_KINDS
    }

    /// 尚未上盘的种类（按编码绝对值升序）
    pub fn missing(&self) -> Vec<PieceType> {
        PieceType::ALL
            .into_iter()
            .filter(|&t| !self.contains(t))
            .collect()
    }

    pub fn clear(&mut self) {
        self.present = [false; PIECE_KINDS + 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        Board::new([
            [-1, 0, 1, 0],
            [0, 0, -2, 0],
            [0, 4, 0, 0],
            [3, 0, 2, 0],
        ])
    }

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert_eq!(board.empty_cells().len(), 16);
        assert!(board.presence(Side::White).missing().len() == 4);
    }

    #[test]
    fn test_pieces_row_major() {
        let board = sample();
        let white = board.pieces(Side::White).unwrap();
        let codes: Vec<i8> = white.iter().map(|(_, p)| p.code()).collect();
        assert_eq!(codes, vec![1, 4, 3, 2]);

        let black = board.pieces(Side::Black).unwrap();
        assert_eq!(black.len(), 2);
        assert_eq!(black[0].0, Position::new_unchecked(0, 0));
    }

    #[test]
    fn test_move_piece() {
        let mut board = sample();
        let captured =
            board.move_piece(Position::new_unchecked(2, 1), Position::new_unchecked(0, 1));
        assert_eq!(captured, 0);
        assert_eq!(board.code_at(Position::new_unchecked(0, 1)), 4);
        assert!(board.is_empty_at(Position::new_unchecked(2, 1)));

        let captured =
            board.move_piece(Position::new_unchecked(0, 1), Position::new_unchecked(0, 0));
        assert_eq!(captured, -1);
    }

    #[test]
    fn test_lines() {
        let board = sample();
        assert_eq!(board.line(Line::Row(0)), Some([-1, 0, 1, 0]));
        assert_eq!(board.line(Line::Column(2)), Some([1, -2, 0, 2]));
        assert_eq!(board.line(Line::MainDiagonal), Some([-1, 0, 0, 0]));
        assert_eq!(board.line(Line::AntiDiagonal), Some([0, -2, 4, 3]));
        assert_eq!(board.line_values(LineKind::Row, 3), Some([3, 0, 2, 0]));
        assert_eq!(board.line_values(LineKind::Column, 4), None);
    }

    #[test]
    fn test_anti_diagonal_positions() {
        let positions = Line::AntiDiagonal.positions().unwrap();
        assert_eq!(positions[0], Position::new_unchecked(0, 3));
        assert_eq!(positions[3], Position::new_unchecked(3, 0));
    }

    #[test]
    fn test_line_out_of_range() {
        let board = sample();
        assert!(!Line::Row(4).is_valid());
        assert_eq!(Line::Column(7).positions(), None);
        assert_eq!(board.line(Line::Row(4)), None);
        assert_eq!(board.line(Line::Column(200)), None);
        assert!(Line::ALL.iter().all(|line| line.is_valid()));
    }

    #[test]
    fn test_presence_skips_bad_code() {
        let mut board = Board::new([[0; BOARD_SIZE]; BOARD_SIZE]);
        board.set_code(Position::new_unchecked(0, 0), i8::MIN);
        board.set_code(Position::new_unchecked(1, 1), -2);
        let black = board.presence(Side::Black);
        assert_eq!(black.count(), 1);
        assert!(black.contains(PieceType::Bishop));
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_presence() {
        let board = sample();
        let white = board.presence(Side::White);
        assert!(white.is_complete());

        let black = board.presence(Side::Black);
        assert_eq!(black.count(), 2);
        assert_eq!(black.missing(), vec![PieceType::Knight, PieceType::Rook]);
    }

    #[test]
    fn test_validate() {
        assert!(Board::try_from_rows(sample().rows()).is_ok());

        let duplicate = [[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]];
        assert_eq!(
            Board::try_from_rows(duplicate),
            Err(RuleError::DuplicatePiece { code: 1 })
        );

        let unknown = [[0, 0, 0, 9], [0; 4], [0; 4], [0; 4]];
        assert_eq!(
            Board::try_from_rows(unknown),
            Err(RuleError::UnknownPiece { code: 9 })
        );
    }

    #[test]
    fn test_diff() {
        let old = sample();
        let mut new = old;
        new.move_piece(Position::new_unchecked(3, 0), Position::new_unchecked(1, 1));
        assert_eq!(
            old.diff(&new),
            vec![Position::new_unchecked(1, 1), Position::new_unchecked(3, 0)]
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let board = sample();
        let json = serde_json::to_string(&board).unwrap();
        let decoded: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, board);
    }
}

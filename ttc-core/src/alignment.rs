//! 连线（胜负）判定与连线分析

use serde::{Deserialize, Serialize};

use crate::board::{Board, Line};
use crate::constants::BOARD_SIZE;
use crate::piece::{PieceType, Position, Side};

/// 一方最长连线的分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// 同一条线上己方棋子的最大数量
    pub count: usize,
    /// 取得最大数量的第一条线（没有己方棋子时为 None）
    pub line: Option<Line>,
    /// 这条线上已有的棋子种类（升序）
    pub aligned: Vec<PieceType>,
    /// 这条线还缺的棋子种类（升序，低价值的棋子优先用来补位或堵截）
    pub missing: Vec<PieceType>,
    /// 这条线上还不属于己方的格子（行优先）
    pub missing_cells: Vec<Position>,
    /// 这条线上已属于己方的格子（行优先）
    pub aligned_cells: Vec<Position>,
}

impl AlignmentReport {
    fn none() -> Self {
        Self {
            count: 0,
            line: None,
            aligned: Vec::new(),
            missing: PieceType::ALL.to_vec(),
            missing_cells: Vec::new(),
            aligned_cells: Vec::new(),
        }
    }

    fn from_line(board: &Board, side: Side, line: Line) -> Self {
        let mut aligned = Vec::with_capacity(4);
        let mut aligned_cells = Vec::with_capacity(4);
        let mut missing_cells = Vec::with_capacity(4);

        for pos in line.positions().into_iter().flatten() {
            let code = board.code_at(pos);
            if side.owns(code) {
                if let Ok(Some(piece)) = board.get(pos) {
                    aligned.push(piece.piece_type);
                }
                aligned_cells.push(pos);
            } else {
                missing_cells.push(pos);
            }
        }

        aligned.sort();
        aligned_cells.sort();
        missing_cells.sort();
        let missing = PieceType::ALL
            .into_iter()
            .filter(|t| !aligned.contains(t))
            .collect();

        Self {
            count: aligned_cells.len(),
            line: Some(line),
            aligned,
            missing,
            missing_cells,
            aligned_cells,
        }
    }

    /// 缺口格中仍为空的格子
    pub fn empty_missing_cells<'a>(
        &'a self,
        board: &'a Board,
    ) -> impl Iterator<Item = Position> + 'a {
        self.missing_cells
            .iter()
            .copied()
            .filter(move |&pos| board.is_empty_at(pos))
    }
}

/// 连线分析
pub struct Alignment;

impl Alignment {
    /// 指定阵营是否已有四子连线
    pub fn has_aligned(board: &Board, side: Side) -> bool {
        Line::ALL
            .iter()
            .any(|&line| Self::owned_on_line(board, side, line) == BOARD_SIZE)
    }

    /// 已连线的一方（白方优先检查）
    pub fn winner(board: &Board) -> Option<Side> {
        [Side::White, Side::Black]
            .into_iter()
            .find(|&side| Self::has_aligned(board, side))
    }

    /// 指定阵营的最长连线
    ///
    /// 按行、列、主对角线、副对角线的顺序扫描，数量相同时取先出现的线。
    pub fn max_aligned(board: &Board, side: Side) -> AlignmentReport {
        let mut best_line = None;
        let mut best_count = 0;

        for line in Line::ALL {
            let count = Self::owned_on_line(board, side, line);
            if count > best_count {
                best_count = count;
                best_line = Some(line);
            }
        }

        match best_line {
            Some(line) => AlignmentReport::from_line(board, side, line),
            None => AlignmentReport::none(),
        }
    }

    /// 只取最长连线的数量
    pub fn max_aligned_count(board: &Board, side: Side) -> usize {
        Line::ALL
            .iter()
            .map(|&line| Self::owned_on_line(board, side, line))
            .max()
            .unwrap_or(0)
    }

    fn owned_on_line(board: &Board, side: Side, line: Line) -> usize {
        board
            .line(line)
            .map_or(0, |cells| cells.iter().filter(|&&code| side.owns(code)).count())
    }
}

//! 棋局评估函数

use ttc_core::{Alignment, Board, Side};

/// 胜负分值，远大于任何启发式分值
pub const WIN_SCORE: i32 = 1000;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 终局评估（`side` 视角）
    ///
    /// 己方连线得 `WIN_SCORE - depth`，越快赢越好；
    /// 对方连线得 `-WIN_SCORE + depth`，输也要输得越晚越好。
    pub fn terminal(board: &Board, side: Side, depth: u8) -> Option<i32> {
        if Alignment::has_aligned(board, side) {
            Some(WIN_SCORE - depth as i32)
        } else if Alignment::has_aligned(board, side.opponent()) {
            Some(-WIN_SCORE + depth as i32)
        } else {
            None
        }
    }

    /// 启发式评估：双方最长连线数量之差
    pub fn heuristic(board: &Board, side: Side) -> i32 {
        let mine = Alignment::max_aligned_count(board, side) as i32;
        let theirs = Alignment::max_aligned_count(board, side.opponent()) as i32;
        mine - theirs
    }

    /// 终局优先，否则用启发式
    pub fn evaluate(board: &Board, side: Side, depth: u8) -> i32 {
        Self::terminal(board, side, depth).unwrap_or_else(|| Self::heuristic(board, side))
    }

    /// 分数是否表示己方必胜
    pub fn is_win(score: i32) -> bool {
        score > WIN_SCORE / 2
    }

    /// 分数是否表示己方必败
    pub fn is_loss(score: i32) -> bool {
        score < -WIN_SCORE / 2
    }
}

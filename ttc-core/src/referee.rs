//! 棋盘变化判定与吃子次数限制

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::constants::INITIAL_CAPTURES;
use crate::piece::Position;

/// 两个棋盘之间的走子分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// 不是一次走子（无变化、变化格数不为 2 或模式不符）
    None,
    /// 普通走子
    Move,
    /// 吃子
    Capture,
}

/// 被接受的棋盘变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// 放子：恰好一个空格变成棋子
    Placement,
    /// 普通走子
    Move,
    /// 吃子
    Capture,
}

/// 被拒绝的棋盘变化
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("board change is not a single placement or move")]
    NoOp,

    #[error("capture attempted with no captures remaining")]
    CaptureBudgetExhausted,
}

/// 吃子次数预算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureBudget {
    remaining: u8,
}

impl CaptureBudget {
    pub fn new(remaining: u8) -> Self {
        Self { remaining }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn can_capture(&self) -> bool {
        self.remaining > 0
    }

    /// 消耗一次吃子机会，预算耗尽时拒绝
    pub fn consume(&mut self) -> Result<(), Rejection> {
        if self.remaining == 0 {
            return Err(Rejection::CaptureBudgetExhausted);
        }
        self.remaining -= 1;
        Ok(())
    }
}

impl Default for CaptureBudget {
    fn default() -> Self {
        Self::new(INITIAL_CAPTURES)
    }
}

/// 裁判
pub struct Referee;

impl Referee {
    /// 判断从 `old` 到 `new` 是普通走子、吃子还是无效变化
    ///
    /// 只有恰好两个格子变化时才可能是走子：一格由 v 变为 0，
    /// 另一格由 0 变为 v（普通走子）或由非零的 u 变为 v（吃子）。
    pub fn classify_transition(old: &Board, new: &Board) -> Transition {
        let changed = old.diff(new);
        let [a, b] = changed.as_slice() else {
            return Transition::None;
        };

        if Self::is_capture(old, new, *a, *b) || Self::is_capture(old, new, *b, *a) {
            Transition::Capture
        } else if Self::is_quiet(old, new, *a, *b) || Self::is_quiet(old, new, *b, *a) {
            Transition::Move
        } else {
            Transition::None
        }
    }

    /// `from` 上的棋子走到 `to`，`to` 原本为空
    fn is_quiet(old: &Board, new: &Board, from: Position, to: Position) -> bool {
        let moving = old.code_at(from);
        moving != 0
            && new.code_at(from) == 0
            && old.code_at(to) == 0
            && new.code_at(to) == moving
    }

    /// `from` 上的棋子走到 `to`，吃掉 `to` 上原有的棋子
    fn is_capture(old: &Board, new: &Board, from: Position, to: Position) -> bool {
        let moving = old.code_at(from);
        moving != 0
            && new.code_at(from) == 0
            && old.code_at(to) != 0
            && new.code_at(to) == moving
    }

    /// 是否恰好是一次放子
    pub fn is_placement(old: &Board, new: &Board) -> bool {
        let changed = old.diff(new);
        matches!(changed.as_slice(), [pos] if old.code_at(*pos) == 0 && new.code_at(*pos) != 0)
    }

    /// 审核一次棋盘变化，吃子须有剩余次数
    ///
    /// 这里只做判定，不扣减预算；扣减由调用方在接受后进行。
    pub fn judge(old: &Board, new: &Board, budget: CaptureBudget) -> Result<Verdict, Rejection> {
        if Self::is_placement(old, new) {
            return Ok(Verdict::Placement);
        }
        match Self::classify_transition(old, new) {
            Transition::None => Err(Rejection::NoOp),
            Transition::Move => Ok(Verdict::Move),
            Transition::Capture if budget.can_capture() => Ok(Verdict::Capture),
            Transition::Capture => Err(Rejection::CaptureBudgetExhausted),
        }
    }
}

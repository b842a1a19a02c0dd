//! 单方对局状态
//!
//! 由一个玩家实例独占，只在自己的回合里修改

use serde::{Deserialize, Serialize};
use ttc_core::{Board, CaptureBudget, MoveGenerator, PiecePresence, PieceType, Side, PAWN_FORWARD};

use crate::error::{AiError, Result};
use crate::search::PawnDirections;

/// 单方对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 己方阵营，开局时固定
    pub color: Option<Side>,
    /// 己方兵前进一步的行增量
    pub pawn_direction: i8,
    /// 对方兵前进一步的行增量（由观察到的棋盘推断）
    pub opponent_pawn_direction: i8,
    /// 已走回合数，首次走棋后为 0
    pub turn_count: i32,
    /// 剩余吃子次数
    pub budget: CaptureBudget,
    /// 己方在盘上的棋子种类（每回合重新统计）
    pub own_present: PiecePresence,
    /// 对方在盘上的棋子种类（每回合重新统计）
    pub enemy_present: PiecePresence,
}

impl Session {
    pub fn new(initial_captures: u8) -> Self {
        Self {
            color: None,
            pawn_direction: PAWN_FORWARD,
            opponent_pawn_direction: PAWN_FORWARD,
            turn_count: -1,
            budget: CaptureBudget::new(initial_captures),
            own_present: PiecePresence::default(),
            enemy_present: PiecePresence::default(),
        }
    }

    pub fn set_color(&mut self, side: Side) {
        self.color = Some(side);
    }

    /// 开始新的一局（保留阵营）
    pub fn reset(&mut self, initial_captures: u8) {
        self.pawn_direction = PAWN_FORWARD;
        self.opponent_pawn_direction = PAWN_FORWARD;
        self.turn_count = -1;
        self.budget = CaptureBudget::new(initial_captures);
        self.own_present.clear();
        self.enemy_present.clear();
    }

    pub fn color(&self) -> Result<Side> {
        self.color.ok_or(AiError::ColorNotSet)
    }

    pub fn captures_remaining(&self) -> u8 {
        self.budget.remaining()
    }

    /// 回合开始：回合数加一，重新统计双方棋子，并根据对方刚走完的棋盘推断对方兵的朝向
    pub fn begin_turn(&mut self, board: &Board) -> Result<Side> {
        let side = self.color()?;
        self.turn_count += 1;
        let enemy_had_pawn = self.enemy_present.contains(PieceType::Pawn);
        self.own_present = board.presence(side);
        self.enemy_present = board.presence(side.opponent());
        // 对方的兵刚放上棋盘（或被吃后重新放回）
        if !enemy_had_pawn && self.enemy_present.contains(PieceType::Pawn) {
            self.opponent_pawn_direction = PAWN_FORWARD;
        }
        self.opponent_pawn_direction = MoveGenerator::next_pawn_direction(
            board,
            side.opponent(),
            self.opponent_pawn_direction,
        );
        Ok(side)
    }

    /// 双方兵的朝向
    pub fn pawn_directions(&self) -> Result<PawnDirections> {
        let side = self.color()?;
        let mut pawns = PawnDirections::default();
        pawns.set(side, self.pawn_direction);
        pawns.set(side.opponent(), self.opponent_pawn_direction);
        Ok(pawns)
    }

    /// 己方兵的朝向按走完后的棋盘更新
    pub fn update_pawn_direction(&mut self, board: &Board) -> Result<()> {
        let side = self.color()?;
        self.pawn_direction = MoveGenerator::next_pawn_direction(board, side, self.pawn_direction);
        Ok(())
    }

    /// 回合结束：按交出去的棋盘更新己方兵的朝向和双方棋子统计
    ///
    /// 己方吃掉对方的兵后，下回合才能认出对方重新放上的兵。
    pub fn end_turn(&mut self, board: &Board) -> Result<()> {
        let side = self.color()?;
        self.update_pawn_direction(board)?;
        self.own_present = board.presence(side);
        self.enemy_present = board.presence(side.opponent());
        Ok(())
    }

    /// 是否处于放子阶段
    pub fn is_placing(&self) -> bool {
        !self.own_present.is_complete()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ttc_core::INITIAL_CAPTURES)
    }
}

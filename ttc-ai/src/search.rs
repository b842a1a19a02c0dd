//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝，放子阶段和走子阶段共用一棵搜索树

use serde::{Deserialize, Serialize};
use tracing::debug;
use ttc_core::{Action, Board, MoveGenerator, PieceType, Side, PAWN_FORWARD};

use crate::config::AiConfig;
use crate::error::Result;
use crate::evaluate::Evaluator;

/// 双方兵的朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnDirections {
    directions: [i8; 2],
}

impl PawnDirections {
    pub fn new(white: i8, black: i8) -> Self {
        Self {
            directions: [white, black],
        }
    }

    pub fn get(&self, side: Side) -> i8 {
        self.directions[side.index()]
    }

    pub fn set(&mut self, side: Side, direction: i8) {
        self.directions[side.index()] = direction;
    }

    /// 执行 `action` 后更新走子方兵的朝向
    ///
    /// 新放上的兵先恢复初始朝向，再按所在行判断是否折返。
    pub fn after_action(&mut self, board: &Board, action: &Action) {
        let piece = action.piece();
        if piece.piece_type != PieceType::Pawn {
            return;
        }
        if matches!(action, Action::Place { .. }) {
            self.set(piece.side, PAWN_FORWARD);
        }
        let next = MoveGenerator::next_pawn_direction(board, piece.side, self.get(piece.side));
        self.set(piece.side, next);
    }
}

impl Default for PawnDirections {
    fn default() -> Self {
        Self::new(PAWN_FORWARD, PAWN_FORWARD)
    }
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// 最佳行动，没有任何合法行动时为 None
    pub action: Option<Action>,
    /// 执行最佳行动后的棋盘
    pub board: Option<Board>,
    /// 最佳行动的分数（搜索方视角）
    pub score: i32,
    /// 本次搜索的节点数
    pub nodes: u64,
}

/// 搜索节点：在同一块草稿棋盘上执行、递归、撤销
struct Node {
    board: Board,
    pawns: PawnDirections,
}

impl Node {
    fn apply(&mut self, action: &Action) -> PawnDirections {
        let saved = self.pawns;
        action.apply(&mut self.board);
        self.pawns.after_action(&self.board, action);
        saved
    }

    fn undo(&mut self, action: &Action, saved: PawnDirections) {
        action.undo(&mut self.board);
        self.pawns = saved;
    }
}

/// AI 引擎
pub struct AiEngine {
    max_depth: u8,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: &AiConfig) -> Self {
        Self {
            max_depth: config.max_depth.max(1),
            nodes_searched: 0,
        }
    }

    /// 指定搜索深度
    pub fn with_depth(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
            nodes_searched: 0,
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// 为 `side` 搜索最佳行动
    ///
    /// `allow_captures` 为 false 时己方不考虑吃子（对方不受限制）。
    /// 分数相同时取行优先顺序中第一个遇到的行动。
    pub fn search(
        &mut self,
        board: &Board,
        side: Side,
        pawns: PawnDirections,
        allow_captures: bool,
    ) -> Result<SearchOutcome> {
        self.nodes_searched = 0;

        let mut node = Node { board: *board, pawns };
        let actions = self.expand(&node, side, side, allow_captures)?;

        let mut best_action = None;
        let mut best_score = i32::MIN;
        let mut alpha = i32::MIN;
        let beta = i32::MAX;

        for action in actions {
            let saved = node.apply(&action);
            let score = self.minimax(&mut node, side, allow_captures, 1, alpha, beta, false);
            node.undo(&action, saved);
            let score = score?;

            if score > best_score {
                best_score = score;
                best_action = Some(action);
            }
            alpha = alpha.max(score);
        }

        debug!(
            "search {}: depth={}, nodes={}, score={}, best={:?}",
            side,
            self.max_depth,
            self.nodes_searched,
            best_score,
            best_action.map(|a| a.to_string())
        );

        Ok(SearchOutcome {
            action: best_action,
            board: best_action.map(|a| a.applied_to(board)),
            score: best_score,
            nodes: self.nodes_searched,
        })
    }

    /// Minimax + Alpha-Beta
    ///
    /// `maximizing` 为 true 时轮到 `side` 走子。
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        node: &mut Node,
        side: Side,
        allow_captures: bool,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32> {
        self.nodes_searched += 1;

        if let Some(score) = Evaluator::terminal(&node.board, side, depth) {
            return Ok(score);
        }
        if depth >= self.max_depth {
            return Ok(Evaluator::heuristic(&node.board, side));
        }

        let mover = if maximizing { side } else { side.opponent() };
        let actions = self.expand(node, mover, side, allow_captures)?;

        // 无子可动
        if actions.is_empty() {
            return Ok(Evaluator::heuristic(&node.board, side));
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for action in actions {
            let saved = node.apply(&action);
            let score =
                self.minimax(node, side, allow_captures, depth + 1, alpha, beta, !maximizing);
            node.undo(&action, saved);
            let score = score?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }

            if beta <= alpha {
                break; // 剪枝
            }
        }

        Ok(best)
    }

    /// 生成 `mover` 在当前节点的全部行动
    fn expand(
        &self,
        node: &Node,
        mover: Side,
        side: Side,
        allow_captures: bool,
    ) -> Result<Vec<Action>> {
        let mut actions =
            MoveGenerator::generate_actions(&node.board, mover, node.pawns.get(mover))?;
        if mover == side && !allow_captures {
            actions.retain(|a| !a.is_capture());
        }
        Ok(actions)
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

//! AI 配置

use serde::{Deserialize, Serialize};
use ttc_core::{PieceType, DEFAULT_MAX_ATTEMPTS, INITIAL_CAPTURES};

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：depth=2
    Easy,
    /// 中等：depth=3
    Medium,
    /// 困难：depth=4，放子阶段也用搜索
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 搜索到这一层时改用启发式评估
    pub max_depth: u8,
    /// 每回合的软时间限制，超过后只做随机走子
    pub time_limit_ms: u64,
    /// 每回合寻找合法变化的最大尝试次数
    pub max_attempts: u32,
    /// 每局可吃子次数
    pub initial_captures: u8,
    /// 己方已有至少两枚棋子后，放子是否也交给搜索
    pub search_placements: bool,
    /// 开局放子顺序
    pub opening_order: [PieceType; 4],
    /// 随机数种子，None 表示每次取系统熵
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let base = Self {
            difficulty,
            max_depth: 3,
            time_limit_ms: 2000,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_captures: INITIAL_CAPTURES,
            search_placements: false,
            opening_order: [
                PieceType::Bishop,
                PieceType::Pawn,
                PieceType::Rook,
                PieceType::Knight,
            ],
            seed: None,
        };

        match difficulty {
            Difficulty::Easy => Self {
                max_depth: 2,
                time_limit_ms: 1000,
                ..base
            },
            Difficulty::Medium => base,
            Difficulty::Hard => Self {
                max_depth: 4,
                time_limit_ms: 3000,
                search_placements: true,
                ..base
            },
        }
    }

    /// 固定随机数种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

//! Tic-Tac-Chess AI 引擎
//!
//! 包含:
//! - 棋局评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 单方对局状态（吃子次数、兵的朝向）
//! - 回合控制：首选候选 + 裁判核验 + 随机兜底重试

mod config;
mod error;
mod evaluate;
mod player;
mod search;
mod session;
mod turn;

pub use config::{AiConfig, Difficulty};
pub use error::{AiError, Result};
pub use evaluate::{Evaluator, WIN_SCORE};
pub use player::Player;
pub use search::{AiEngine, PawnDirections, SearchOutcome};
pub use session::Session;
pub use turn::{CandidateSource, Phase, TurnController, TurnReport};

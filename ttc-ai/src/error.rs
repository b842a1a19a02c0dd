//! 引擎错误类型

use thiserror::Error;
use ttc_core::RuleError;

/// 引擎错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// 未调用 set_color 就开始走棋
    #[error("Player color has not been set")]
    ColorNotSet,

    /// 棋盘数据违反规则
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// 尝试次数用尽仍找不到合法的棋盘变化
    #[error("No valid transition found after {attempts} attempts")]
    NoValidTransition { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, AiError>;

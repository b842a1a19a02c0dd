//! 错误类型定义

use thiserror::Error;

/// 规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 无法识别的棋子编码（绝对值超出 1..=4）
    #[error("Piece {code} not recognized")]
    UnknownPiece { code: i8 },

    /// 无效的位置
    #[error("Invalid position: ({row}, {col})")]
    InvalidPosition { row: i8, col: i8 },

    /// 同一方同种棋子出现多次
    #[error("Piece {code} appears more than once on the board")]
    DuplicatePiece { code: i8 },

    /// 没有棋子
    #[error("No piece at position ({row}, {col})")]
    NoPiece { row: u8, col: u8 },

    /// 无效的棋盘记谱
    #[error("Invalid board notation: {reason}")]
    InvalidNotation { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RuleError>;

//! 棋盘记谱解析和生成
//!
//! 格式：自上而下四行，以 `/` 分隔；白方 `P B N R` 大写，黑方小写，
//! 数字 1-4 表示连续空格数。
//!
//! 示例：`B3/4/4/PNR1`

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::RuleError;
use crate::piece::{Piece, Position};

/// 空棋盘记谱
pub const EMPTY_FEN: &str = "4/4/4/4";

/// 记谱处理
pub struct Fen;

impl Fen {
    /// 解析记谱为棋盘（会校验每方每种一枚）
    pub fn parse(fen: &str) -> Result<Board, RuleError> {
        let fen = fen.trim();
        if fen.is_empty() {
            return Err(RuleError::InvalidNotation {
                reason: "Empty board string".to_string(),
            });
        }

        let rows: Vec<&str> = fen.split('/').collect();
        if rows.len() != BOARD_SIZE {
            return Err(RuleError::InvalidNotation {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut board = Board::empty();
        for (row_idx, row) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in row.chars() {
                if col >= BOARD_SIZE {
                    return Err(RuleError::InvalidNotation {
                        reason: format!("Row {} has too many columns", row_idx),
                    });
                }

                if let Some(empty_count) = c.to_digit(10) {
                    if empty_count == 0 {
                        return Err(RuleError::InvalidNotation {
                            reason: format!("Row {} has a zero-length gap", row_idx),
                        });
                    }
                    col += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Position::new_unchecked(row_idx as u8, col as u8), Some(piece));
                    col += 1;
                } else {
                    return Err(RuleError::InvalidNotation {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if col != BOARD_SIZE {
                return Err(RuleError::InvalidNotation {
                    reason: format!("Row {} has {} columns, expected {}", row_idx, col, BOARD_SIZE),
                });
            }
        }

        board.validate()?;
        Ok(board)
    }

    /// 将棋盘转换为记谱
    pub fn to_string(board: &Board) -> Result<String, RuleError> {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row_idx in 0..BOARD_SIZE {
            let mut row = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row_idx as u8, col as u8);
                if let Some(piece) = board.get(pos)? {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }
            rows.push(row);
        }

        Ok(rows.join("/"))
    }
}

//! 玩家：对外的整局入口，持有回合控制器与本方状态

use ttc_core::{Board, Side, BOARD_SIZE};

use crate::config::AiConfig;
use crate::error::Result;
use crate::session::Session;
use crate::turn::{TurnController, TurnReport};

/// AI 玩家
pub struct Player {
    name: String,
    controller: TurnController,
    session: Session,
}

impl Player {
    pub fn new(name: impl Into<String>, config: AiConfig) -> Self {
        let session = Session::new(config.initial_captures);
        Self {
            name: name.into(),
            controller: TurnController::new(config),
            session,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设定阵营，开局前调用一次
    pub fn set_color(&mut self, side: Side) {
        self.session.set_color(side);
    }

    pub fn color(&self) -> Option<Side> {
        self.session.color
    }

    /// 开始新的一局
    pub fn reset(&mut self) {
        let initial_captures = self.controller.config().initial_captures;
        self.session.reset(initial_captures);
    }

    /// 走一步，返回新棋盘
    pub fn play(&mut self, board: &Board) -> Result<Board> {
        Ok(self.play_turn(board)?.board)
    }

    /// 走一步，返回完整的回合结果
    pub fn play_turn(&mut self, board: &Board) -> Result<TurnReport> {
        self.controller.play_turn(&mut self.session, board)
    }

    /// 以原始数组形式走一步
    pub fn play_rows(
        &mut self,
        rows: [[i8; BOARD_SIZE]; BOARD_SIZE],
    ) -> Result<[[i8; BOARD_SIZE]; BOARD_SIZE]> {
        let board = Board::try_from_rows(rows)?;
        Ok(self.play(&board)?.rows())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::error::AiError;

    fn player() -> Player {
        Player::new("alice", AiConfig::from_difficulty(Difficulty::Easy).with_seed(11))
    }

    #[test]
    fn test_play_requires_color() {
        let mut player = player();
        assert_eq!(player.play(&Board::empty()), Err(AiError::ColorNotSet));
        assert_eq!(player.session().turn_count, -1);
    }

    #[test]
    fn test_play_rows() {
        let mut player = player();
        player.set_color(Side::Black);

        let rows = player.play_rows([[0; 4]; 4]).unwrap();
        let placed: Vec<i8> = rows.iter().flatten().copied().filter(|&c| c != 0).collect();
        assert_eq!(placed.len(), 1);
        assert!(placed[0] < 0);
    }

    #[test]
    fn test_play_rows_rejects_bad_code() {
        let mut player = player();
        player.set_color(Side::White);

        let mut rows = [[0; 4]; 4];
        rows[1][2] = 9;
        assert!(matches!(player.play_rows(rows), Err(AiError::Rule(_))));
    }

    #[test]
    fn test_reset() {
        let mut player = player();
        player.set_color(Side::White);
        player.play(&Board::empty()).unwrap();
        assert_eq!(player.session().turn_count, 0);

        player.reset();
        assert_eq!(player.color(), Some(Side::White));
        assert_eq!(player.session().turn_count, -1);
        assert_eq!(player.session().captures_remaining(), 5);
        assert_eq!(player.name(), "alice");
    }
}

//! 自对弈演示
//!
//! 运行方式:
//! ```bash
//! RUST_LOG=ttc_ai=info cargo run -p ttc-ai --example self_play
//! ```

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttc_ai::{AiConfig, AiError, Difficulty, Player};
use ttc_core::{Alignment, Board, Fen, Side};

const MAX_PLIES: usize = 200;

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("ttc_ai=info".parse()?))
        .init();

    let white_config = AiConfig::from_difficulty(Difficulty::Medium).with_seed(1);
    let black_config = AiConfig::from_difficulty(Difficulty::Easy).with_seed(2);
    let mut white = Player::new("white", white_config);
    let mut black = Player::new("black", black_config);
    white.set_color(Side::White);
    black.set_color(Side::Black);

    let mut board = Board::empty();
    for ply in 0..MAX_PLIES {
        let player = if ply % 2 == 0 { &mut white } else { &mut black };
        board = match player.play(&board) {
            Ok(next) => next,
            Err(AiError::NoValidTransition { attempts }) => {
                info!("{} 无合法变化（尝试 {} 次），对局结束", player.name(), attempts);
                break;
            }
            Err(e) => return Err(e.into()),
        };

        println!("第 {} 手 {}: {}", ply + 1, player.name(), Fen::to_string(&board)?);

        if let Some(winner) = Alignment::winner(&board) {
            println!("\n{}\n{} 获胜", board, winner);
            return Ok(());
        }
    }

    println!("\n{}\n未分胜负", board);
    Ok(())
}

//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 4;

/// 棋盘格子总数
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 每方棋子种类数（兵、象、马、车各一枚）
pub const PIECE_KINDS: usize = 4;

/// 每局初始可吃子次数
pub const INITIAL_CAPTURES: u8 = 5;

/// 每回合寻找合法变化的最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// 兵的出发行（最底行）
pub const PAWN_HOME_ROW: usize = BOARD_SIZE - 1;

/// 兵的折返行（最顶行）
pub const PAWN_TURN_ROW: usize = 0;

/// 兵初始朝向（向上走，行号减一）
pub const PAWN_FORWARD: i8 = -1;

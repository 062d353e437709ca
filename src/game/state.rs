use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 回合计数，等于当前图案长度。
pub type Level = u32;

/// 四个按钮颜色，顺序固定。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Yellow => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = SimonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "a" => Ok(Color::Red),
            "blue" | "b" => Ok(Color::Blue),
            "green" | "c" => Ok(Color::Green),
            "yellow" | "d" => Ok(Color::Yellow),
            _ => Err(SimonError::UnknownColor {
                value: s.to_string(),
            }),
        }
    }
}

/// 游戏阶段：Idle → Playing → Ended → Idle。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Playing,
    Ended,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Playing => "Playing",
            GamePhase::Ended => "Ended",
        }
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// 进程内最高分，只增不减。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    high_score: Level,
}

impl Scoreboard {
    pub fn high_score(&self) -> Level {
        self.high_score
    }

    /// 记录一局结束的得分，返回最高分。
    pub fn record(&mut self, score: Level) -> Level {
        self.high_score = self.high_score.max(score);
        self.high_score
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    AttemptTooLong { attempt: usize, pattern: usize },
    AttemptNotPrefix { index: usize },
    LevelMismatch { level: Level, pattern: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SimonError {
    UnknownColor { value: String },
    InvalidConfig { message: String },
    IntegrityViolation { error: IntegrityError },
}

impl fmt::Display for SimonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimonError::UnknownColor { value } => write!(f, "unknown color `{value}`"),
            SimonError::InvalidConfig { message } => write!(f, "invalid config: {message}"),
            SimonError::IntegrityViolation { error } => {
                write!(f, "snapshot integrity violated: {error:?}")
            }
        }
    }
}

impl std::error::Error for SimonError {}

/// 对外暴露的游戏状态快照。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub level: Level,
    pub high_score: Level,
    #[serde(default)]
    pub pattern: Vec<Color>,
    #[serde(default)]
    pub attempt: Vec<Color>,
    #[serde(default)]
    pub generation: u64,
    #[serde(default)]
    pub awaiting_advance: bool,
}

impl GameSnapshot {
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        if self.attempt.len() > self.pattern.len() {
            return Err(IntegrityError::AttemptTooLong {
                attempt: self.attempt.len(),
                pattern: self.pattern.len(),
            });
        }

        if self.level as usize != self.pattern.len() {
            return Err(IntegrityError::LevelMismatch {
                level: self.level,
                pattern: self.pattern.len(),
            });
        }

        if self.is_playing() {
            if let Some(index) = self
                .attempt
                .iter()
                .zip(self.pattern.iter())
                .position(|(entered, expected)| entered != expected)
            {
                return Err(IntegrityError::AttemptNotPrefix { index });
            }
        }

        Ok(())
    }
}

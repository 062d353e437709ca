//! 游戏核心逻辑模块（图案生成、输入比对、状态机）。

pub mod config;
pub mod judge;
pub mod lifecycle;
pub mod presentation;
pub mod sequence;
pub mod state;
pub mod tracker;

pub use config::GameConfig;
pub use judge::{RoundJudge, Verdict};
pub use lifecycle::{GameLifecycle, GameOverSummary, PendingAdvance, RoundTicket, TurnOutcome};
pub use presentation::{
    CueRecorder,
    EffectsMode,
    HighlightStyle,
    PresentationCue,
    PresentationPort,
    SoundCue,
};
pub use sequence::{ColorSource, RandomColors, ScriptedColors, SequenceEngine};
pub use state::{
    Color,
    GamePhase,
    GameSnapshot,
    IntegrityError,
    Level,
    Scoreboard,
    SimonError,
};
pub use tracker::InputTracker;

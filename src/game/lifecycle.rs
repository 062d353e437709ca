use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::judge::{RoundJudge, Verdict};
use super::presentation::{CueRecorder, PresentationPort};
use super::sequence::{ColorSource, RandomColors, SequenceEngine};
use super::state::{Color, GamePhase, GameSnapshot, Level, Scoreboard};
use super::tracker::InputTracker;
use crate::utils;

/// 标识一次延迟的“进入下一回合”。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundTicket {
    pub generation: u64,
    pub level: Level,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAdvance {
    pub ticket: RoundTicket,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOverSummary {
    pub level_reached: Level,
    pub score: Level,
    pub high_score: Level,
}

/// 一次玩家点击的处理结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TurnOutcome {
    Ignored,
    AwaitingMore,
    RoundComplete { next: PendingAdvance },
    GameOver(GameOverSummary),
}

impl TurnOutcome {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            TurnOutcome::Ignored => None,
            TurnOutcome::AwaitingMore => Some(Verdict::AwaitingMore),
            TurnOutcome::RoundComplete { .. } => Some(Verdict::RoundComplete),
            TurnOutcome::GameOver(_) => Some(Verdict::Mismatch),
        }
    }
}

/// 游戏状态机，持有图案、输入、分数与渲染端口。
pub struct GameLifecycle<S, P> {
    config: GameConfig,
    phase: GamePhase,
    sequence: SequenceEngine<S>,
    tracker: InputTracker,
    level: Level,
    scoreboard: Scoreboard,
    generation: u64,
    pending: Option<RoundTicket>,
    presentation: P,
}

impl GameLifecycle<RandomColors, CueRecorder> {
    pub fn from_config(config: GameConfig) -> Self {
        let source = RandomColors::from_seed(config.seed);
        let recorder = CueRecorder::new(config.effects_mode());
        Self::new(config, source, recorder)
    }
}

impl<S: ColorSource, P: PresentationPort> GameLifecycle<S, P> {
    pub fn new(config: GameConfig, source: S, presentation: P) -> Self {
        Self {
            config,
            phase: GamePhase::Idle,
            sequence: SequenceEngine::new(source),
            tracker: InputTracker::new(),
            level: 0,
            scoreboard: Scoreboard::default(),
            generation: 0,
            pending: None,
            presentation,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn high_score(&self) -> Level {
        self.scoreboard.high_score()
    }

    pub fn pattern(&self) -> &[Color] {
        self.sequence.pattern()
    }

    pub fn attempt(&self) -> &[Color] {
        self.tracker.attempt()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_advance(&self) -> Option<RoundTicket> {
        self.pending
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            level: self.level,
            high_score: self.scoreboard.high_score(),
            pattern: self.sequence.pattern().to_vec(),
            attempt: self.tracker.attempt().to_vec(),
            generation: self.generation,
            awaiting_advance: self.pending.is_some(),
        }
    }

    /// 开始新游戏；进行中返回 `false`，结束状态下等同于重新开始。
    pub fn start(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => false,
            GamePhase::Ended => self.restart(),
            GamePhase::Idle => {
                self.phase = GamePhase::Playing;
                self.level = 0;
                self.generation += 1;
                self.pending = None;
                self.sequence.reset();
                utils::log(&format!("simon: 第 {} 局开始", self.generation));
                self.start_round();
                true
            }
        }
    }

    /// 从 `Ended` 经 `Idle` 立即重新开始。
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::Ended {
            return false;
        }
        self.phase = GamePhase::Idle;
        self.start()
    }

    pub fn player_selected(&mut self, color: Color) -> TurnOutcome {
        if self.phase != GamePhase::Playing {
            return TurnOutcome::Ignored;
        }

        self.tracker.record(color);
        self.presentation.indicate_press(color);

        match RoundJudge::evaluate(self.sequence.pattern(), self.tracker.attempt()) {
            Verdict::AwaitingMore => TurnOutcome::AwaitingMore,
            Verdict::RoundComplete => {
                self.presentation.indicate_success();
                let ticket = RoundTicket {
                    generation: self.generation,
                    level: self.level,
                };
                self.pending = Some(ticket);
                TurnOutcome::RoundComplete {
                    next: PendingAdvance {
                        ticket,
                        delay_ms: self.config.round_delay_ms,
                    },
                }
            }
            Verdict::Mismatch => TurnOutcome::GameOver(self.end_game()),
        }
    }

    /// 执行延迟的回合推进，过期的凭据直接丢弃。
    pub fn advance_round(&mut self, ticket: RoundTicket) -> bool {
        if self.phase != GamePhase::Playing || self.pending != Some(ticket) {
            utils::warn(&format!(
                "simon: 丢弃过期的回合推进（第 {} 局，第 {} 回合）",
                ticket.generation, ticket.level
            ));
            return false;
        }
        self.pending = None;
        self.start_round();
        true
    }

    fn start_round(&mut self) {
        self.level += 1;
        let color = self.sequence.extend();
        self.tracker.reset();
        self.presentation.announce_level(self.level);
        self.presentation.showcase_step(color);
    }

    fn end_game(&mut self) -> GameOverSummary {
        let level_reached = self.level;
        let score = level_reached.saturating_sub(1);
        let high_score = self.scoreboard.record(score);

        self.phase = GamePhase::Ended;
        self.presentation.indicate_failure(score, high_score);

        self.level = 0;
        self.sequence.reset();
        self.tracker.reset();
        self.pending = None;
        self.generation += 1;
        self.presentation.prompt_restart();

        utils::log(&format!(
            "simon: 游戏结束，第 {level_reached} 回合，得分 {score}，最高分 {high_score}"
        ));

        GameOverSummary {
            level_reached,
            score,
            high_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::presentation::{EffectsMode, PresentationCue};
    use crate::game::sequence::ScriptedColors;

    fn scripted(script: Vec<Color>) -> GameLifecycle<ScriptedColors, CueRecorder> {
        GameLifecycle::new(
            GameConfig::default(),
            ScriptedColors::new(script),
            CueRecorder::new(EffectsMode::Full),
        )
    }

    fn complete_round(
        game: &mut GameLifecycle<ScriptedColors, CueRecorder>,
    ) -> PendingAdvance {
        let pattern = game.pattern().to_vec();
        let mut last = TurnOutcome::Ignored;
        for color in pattern {
            last = game.player_selected(color);
        }
        match last {
            TurnOutcome::RoundComplete { next } => next,
            other => panic!("round should complete, got {other:?}"),
        }
    }

    #[test]
    fn start_opens_first_round() {
        let mut game = scripted(vec![Color::Red]);
        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.level(), 1);
        assert_eq!(game.pattern(), &[Color::Red]);

        let cues = game.presentation_mut().drain();
        assert!(matches!(cues[0], PresentationCue::LevelStarted { level: 1, .. }));
        assert!(matches!(
            cues[1],
            PresentationCue::Showcase {
                color: Color::Red,
                ..
            }
        ));
    }

    #[test]
    fn second_start_is_noop() {
        let mut game = scripted(vec![Color::Blue]);
        game.start();
        let before = game.snapshot();
        assert!(!game.start());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn success_notifies_before_scheduling() {
        let mut game = scripted(vec![Color::Green]);
        game.start();
        game.presentation_mut().drain();

        let next = complete_round(&mut game);
        assert_eq!(next.delay_ms, 1000);
        assert_eq!(next.ticket.level, 1);
        let cues = game.presentation_mut().drain();
        assert_eq!(cues.last(), Some(&PresentationCue::Celebrate));
        assert!(game.snapshot().awaiting_advance);
    }

    #[test]
    fn extra_click_while_advance_pending_ends_game() {
        let mut game = scripted(vec![Color::Red, Color::Red]);
        game.start();
        let first = complete_round(&mut game);
        game.advance_round(first.ticket);
        let stale = complete_round(&mut game).ticket;
        game.presentation_mut().drain();

        let outcome = game.player_selected(Color::Blue);
        assert_eq!(
            outcome,
            TurnOutcome::GameOver(GameOverSummary {
                level_reached: 2,
                score: 1,
                high_score: 1,
            })
        );
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(game.pending_advance().is_none());
        assert!(game.snapshot().integrity_check().is_ok());

        let cues = game.presentation_mut().drain();
        assert!(matches!(
            cues.as_slice(),
            [
                PresentationCue::Press { color: Color::Blue, .. },
                PresentationCue::Failure { score: 1, .. },
                PresentationCue::RestartPrompt,
            ]
        ));
        assert!(!game.advance_round(stale), "pending advance dies with the game");
    }

    #[test]
    fn advance_extends_pattern_and_clears_attempt() {
        let mut game = scripted(vec![Color::Red, Color::Yellow]);
        game.start();
        let next = complete_round(&mut game);
        assert!(game.advance_round(next.ticket));
        assert_eq!(game.level(), 2);
        assert_eq!(game.pattern(), &[Color::Red, Color::Yellow]);
        assert!(game.attempt().is_empty());
        assert!(!game.advance_round(next.ticket), "ticket is single use");
    }

    #[test]
    fn stale_ticket_from_previous_game_is_dropped() {
        let mut game = scripted(vec![Color::Red, Color::Blue]);
        game.start();
        let stale = complete_round(&mut game).ticket;
        game.advance_round(stale);

        // lose, then restart before the old continuation fires
        game.player_selected(Color::Green);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(game.restart());

        let before = game.snapshot();
        assert!(!game.advance_round(stale));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn mismatch_ends_game_and_resets_round_state() {
        let mut game = scripted(vec![Color::Red, Color::Blue]);
        game.start();
        let next = complete_round(&mut game);
        game.advance_round(next.ticket);
        game.presentation_mut().drain();

        assert_eq!(game.player_selected(Color::Red), TurnOutcome::AwaitingMore);
        let outcome = game.player_selected(Color::Green);
        assert_eq!(
            outcome,
            TurnOutcome::GameOver(GameOverSummary {
                level_reached: 2,
                score: 1,
                high_score: 1,
            })
        );
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.level(), 0);
        assert!(game.pattern().is_empty());

        let cues = game.presentation_mut().drain();
        assert!(matches!(
            cues.as_slice(),
            [
                PresentationCue::Press { color: Color::Red, .. },
                PresentationCue::Press { color: Color::Green, .. },
                PresentationCue::Failure { score: 1, high_score: 1, .. },
                PresentationCue::RestartPrompt,
            ]
        ));
    }

    #[test]
    fn input_while_idle_or_ended_is_ignored() {
        let mut game = scripted(vec![Color::Red]);
        assert_eq!(game.player_selected(Color::Red), TurnOutcome::Ignored);
        assert!(game.presentation().cues().is_empty());

        game.start();
        game.player_selected(Color::Blue);
        game.presentation_mut().drain();
        let ended = game.snapshot();
        assert_eq!(game.player_selected(Color::Red), TurnOutcome::Ignored);
        assert_eq!(game.snapshot(), ended);
        assert!(game.presentation().cues().is_empty());
    }

    #[test]
    fn start_while_ended_restarts() {
        let mut game = scripted(vec![Color::Yellow]);
        game.start();
        game.player_selected(Color::Red);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn restart_outside_ended_is_rejected() {
        let mut game = scripted(vec![Color::Yellow]);
        assert!(!game.restart());
        game.start();
        assert!(!game.restart());
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn outcome_maps_back_to_verdict() {
        assert_eq!(TurnOutcome::Ignored.verdict(), None);
        assert_eq!(
            TurnOutcome::AwaitingMore.verdict(),
            Some(Verdict::AwaitingMore)
        );
    }
}

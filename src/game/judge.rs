use serde::{Deserialize, Serialize};

use super::state::Color;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Mismatch,
    RoundComplete,
    AwaitingMore,
}

/// 逐步比对玩家输入与目标图案。
pub struct RoundJudge;

impl RoundJudge {
    /// 只比对最近一次输入；输入比图案长视为不匹配。
    pub fn evaluate(pattern: &[Color], attempt: &[Color]) -> Verdict {
        if let Some(last) = attempt.len().checked_sub(1) {
            match pattern.get(last) {
                Some(expected) if *expected == attempt[last] => {}
                _ => return Verdict::Mismatch,
            }
        }

        if attempt.len() == pattern.len() {
            Verdict::RoundComplete
        } else {
            Verdict::AwaitingMore
        }
    }
}

use super::state::Color;

/// 记录玩家本回合的点击序列。
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    attempt: Vec<Color>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.attempt.clear();
    }

    /// 追加一次点击，返回当前输入长度。
    pub fn record(&mut self, color: Color) -> usize {
        self.attempt.push(color);
        self.attempt.len()
    }

    pub fn attempt(&self) -> &[Color] {
        &self.attempt
    }

    pub fn len(&self) -> usize {
        self.attempt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempt.is_empty()
    }
}

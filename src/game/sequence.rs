use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::state::Color;

/// 颜色来源，方便在测试中替换随机数。
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

/// 均匀随机选择颜色，可重复。
pub struct RandomColors {
    rng: SmallRng,
}

impl RandomColors {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Color {
        let index = self.rng.gen_range(0..Color::ALL.len());
        Color::ALL[index]
    }
}

/// 按固定脚本循环给出颜色。
#[derive(Debug, Clone, Default)]
pub struct ScriptedColors {
    script: Vec<Color>,
    cursor: usize,
}

impl ScriptedColors {
    pub fn new(script: Vec<Color>) -> Self {
        Self { script, cursor: 0 }
    }

    pub fn repeating(color: Color) -> Self {
        Self::new(vec![color])
    }
}

impl ColorSource for ScriptedColors {
    fn next_color(&mut self) -> Color {
        if self.script.is_empty() {
            return Color::Red;
        }
        let color = self.script[self.cursor % self.script.len()];
        self.cursor = self.cursor.wrapping_add(1);
        color
    }
}

/// 持有目标图案，每回合追加一步。
pub struct SequenceEngine<S> {
    source: S,
    pattern: Vec<Color>,
}

impl<S: ColorSource> SequenceEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pattern: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.pattern.clear();
    }

    pub fn extend(&mut self) -> Color {
        let color = self.source.next_color();
        self.pattern.push(color);
        color
    }

    pub fn pattern(&self) -> &[Color] {
        &self.pattern
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

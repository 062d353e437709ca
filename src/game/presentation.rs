use serde::{Deserialize, Serialize};

use super::state::{Color, Level};

const FULL_VOLUME: u8 = 100;
const REDUCED_VOLUME: u8 = 30;
const FAILURE_SOUND: &str = "wrong";

/// 渲染层接口：核心只向外调用，从不读取返回值。
pub trait PresentationPort {
    fn announce_level(&mut self, _level: Level) {}
    fn showcase_step(&mut self, color: Color);
    fn indicate_press(&mut self, color: Color);
    fn indicate_success(&mut self);
    fn indicate_failure(&mut self, final_score: Level, high_score: Level);
    fn prompt_restart(&mut self);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EffectsMode {
    Full,
    Reduced,
}

impl EffectsMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Full
        } else {
            Self::Reduced
        }
    }

    pub fn is_full(self) -> bool {
        self == Self::Full
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Full => Self::Reduced,
            Self::Reduced => Self::Full,
        }
    }
}

impl Default for EffectsMode {
    fn default() -> Self {
        Self::Full
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoundCue {
    pub name: String,
    pub volume_percent: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    Flash,
    Fade,
}

/// 交给前端的渲染指令。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PresentationCue {
    LevelStarted {
        level: Level,
        animate: bool,
    },
    Showcase {
        color: Color,
        style: HighlightStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        sound: Option<SoundCue>,
    },
    Press {
        color: Color,
        #[serde(skip_serializing_if = "Option::is_none")]
        sound: Option<SoundCue>,
    },
    Celebrate,
    Failure {
        score: Level,
        high_score: Level,
        shake: bool,
        sound: SoundCue,
    },
    RestartPrompt,
    EffectsToggled {
        enabled: bool,
    },
}

/// 把渲染调用记录成可序列化的指令队列。
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    mode: EffectsMode,
    cues: Vec<PresentationCue>,
}

impl CueRecorder {
    pub fn new(mode: EffectsMode) -> Self {
        Self {
            mode,
            cues: Vec::new(),
        }
    }

    pub fn mode(&self) -> EffectsMode {
        self.mode
    }

    pub fn toggle_effects(&mut self) -> EffectsMode {
        self.mode = self.mode.toggled();
        self.cues.push(PresentationCue::EffectsToggled {
            enabled: self.mode.is_full(),
        });
        self.mode
    }

    pub fn cues(&self) -> &[PresentationCue] {
        &self.cues
    }

    pub fn drain(&mut self) -> Vec<PresentationCue> {
        std::mem::take(&mut self.cues)
    }

    fn color_sound(&self, color: Color) -> Option<SoundCue> {
        self.mode.is_full().then(|| SoundCue {
            name: color.name().to_string(),
            volume_percent: FULL_VOLUME,
        })
    }

    fn failure_sound(&self) -> SoundCue {
        SoundCue {
            name: FAILURE_SOUND.to_string(),
            volume_percent: if self.mode.is_full() {
                FULL_VOLUME
            } else {
                REDUCED_VOLUME
            },
        }
    }
}

impl PresentationPort for CueRecorder {
    fn announce_level(&mut self, level: Level) {
        self.cues.push(PresentationCue::LevelStarted {
            level,
            animate: self.mode.is_full(),
        });
    }

    fn showcase_step(&mut self, color: Color) {
        let style = if self.mode.is_full() {
            HighlightStyle::Flash
        } else {
            HighlightStyle::Fade
        };
        let sound = self.color_sound(color);
        self.cues.push(PresentationCue::Showcase {
            color,
            style,
            sound,
        });
    }

    fn indicate_press(&mut self, color: Color) {
        let sound = self.color_sound(color);
        self.cues.push(PresentationCue::Press { color, sound });
    }

    fn indicate_success(&mut self) {
        if self.mode.is_full() {
            self.cues.push(PresentationCue::Celebrate);
        }
    }

    fn indicate_failure(&mut self, final_score: Level, high_score: Level) {
        let sound = self.failure_sound();
        self.cues.push(PresentationCue::Failure {
            score: final_score,
            high_score,
            shake: self.mode.is_full(),
            sound,
        });
    }

    fn prompt_restart(&mut self) {
        self.cues.push(PresentationCue::RestartPrompt);
    }
}

pub mod game;
pub mod utils;

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_json;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::Function;

pub use game::{
    Color, ColorSource, CueRecorder, EffectsMode, GameConfig, GameLifecycle, GameOverSummary,
    GamePhase, GameSnapshot, HighlightStyle, InputTracker, IntegrityError, Level, PendingAdvance,
    PresentationCue, PresentationPort, RandomColors, RoundJudge, RoundTicket, Scoreboard,
    ScriptedColors, SequenceEngine, SimonError, SoundCue, TurnOutcome, Verdict,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

type Session = GameLifecycle<RandomColors, CueRecorder>;
type Listener = Rc<RefCell<Option<Function>>>;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: SimonError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// 一次调用后交给前端的快照与渲染指令。
#[derive(Serialize)]
struct Resolution {
    snapshot: GameSnapshot,
    cues: Vec<PresentationCue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<TurnOutcome>,
}

impl Resolution {
    fn capture(session: &mut Session, outcome: Option<TurnOutcome>) -> Self {
        Self {
            snapshot: session.snapshot(),
            cues: session.presentation_mut().drain(),
            outcome,
        }
    }
}

fn make_resolution_json(resolution: &Resolution) -> Result<String, JsValue> {
    serde_json::to_string(resolution).map_err(serde_to_js_error)
}

fn notify(listener: &Listener, resolution: &Resolution) {
    let callback = listener.borrow().clone();
    let Some(callback) = callback else {
        return;
    };
    let payload = match make_resolution_json(resolution) {
        Ok(json) => JsValue::from_str(&json),
        Err(error) => {
            utils::warn(&format!("simon: 无法序列化推送结果: {error:?}"));
            return;
        }
    };
    if let Err(error) = callback.call1(&JsValue::NULL, &payload) {
        utils::warn(&format!("simon: 回调执行失败: {error:?}"));
    }
}

#[wasm_bindgen]
pub struct SimonEngine {
    session: Rc<RefCell<Session>>,
    listener: Listener,
}

#[wasm_bindgen]
impl SimonEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SimonEngine, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(to_js_error)?,
            None => GameConfig::default(),
        };
        Ok(SimonEngine {
            session: Rc::new(RefCell::new(GameLifecycle::from_config(config))),
            listener: Rc::new(RefCell::new(None)),
        })
    }

    /// 注册回调，延迟开始的新回合通过它推送给前端。
    pub fn set_listener(&self, listener: Function) {
        *self.listener.borrow_mut() = Some(listener);
    }

    pub fn clear_listener(&self) {
        self.listener.borrow_mut().take();
    }

    pub fn start(&self) -> Result<String, JsValue> {
        let mut session = self.session.borrow_mut();
        session.start();
        make_resolution_json(&Resolution::capture(&mut session, None))
    }

    pub fn restart(&self) -> Result<String, JsValue> {
        let mut session = self.session.borrow_mut();
        session.restart();
        make_resolution_json(&Resolution::capture(&mut session, None))
    }

    pub fn player_selected(&self, color: &str) -> Result<String, JsValue> {
        let color = Color::from_str(color).map_err(to_js_error)?;
        let resolution = {
            let mut session = self.session.borrow_mut();
            let outcome = session.player_selected(color);
            Resolution::capture(&mut session, Some(outcome))
        };

        if let Some(TurnOutcome::RoundComplete { next }) = resolution.outcome {
            self.schedule_advance(next);
        }
        make_resolution_json(&resolution)
    }

    pub fn toggle_effects(&self) -> Result<String, JsValue> {
        let mut session = self.session.borrow_mut();
        session.presentation_mut().toggle_effects();
        make_resolution_json(&Resolution::capture(&mut session, None))
    }

    pub fn effects_enabled(&self) -> bool {
        self.session.borrow().presentation().mode().is_full()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().snapshot()).map_err(serde_to_js_error)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.borrow().snapshot()).map_err(JsValue::from)
    }

    pub fn level(&self) -> Level {
        self.session.borrow().level()
    }

    pub fn high_score(&self) -> Level {
        self.session.borrow().high_score()
    }

    pub fn phase(&self) -> String {
        self.session.borrow().phase().as_str().to_string()
    }

    fn schedule_advance(&self, pending: PendingAdvance) {
        let session = Rc::clone(&self.session);
        let listener = Rc::clone(&self.listener);
        spawn_local(async move {
            TimeoutFuture::new(pending.delay_ms).await;
            let resolution = {
                let mut session = session.borrow_mut();
                if !session.advance_round(pending.ticket) {
                    return;
                }
                Resolution::capture(&mut session, None)
            };
            notify(&listener, &resolution);
        });
    }
}

/// 纯函数判定：给定图案与输入，返回本次点击的结论。
#[wasm_bindgen(js_name = "evaluateRound")]
pub fn evaluate_round(pattern: JsValue, attempt: JsValue) -> Result<JsValue, JsValue> {
    let pattern: Vec<Color> = from_value(pattern).map_err(JsValue::from)?;
    let attempt: Vec<Color> = from_value(attempt).map_err(JsValue::from)?;
    to_value(&RoundJudge::evaluate(&pattern, &attempt)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateSnapshot")]
pub fn validate_snapshot(snapshot: JsValue) -> Result<(), JsValue> {
    let snapshot: GameSnapshot = from_value(snapshot).map_err(JsValue::from)?;
    snapshot
        .integrity_check()
        .map_err(|error| to_js_error(SimonError::IntegrityViolation { error }))
}

#[wasm_bindgen(js_name = "colorNames")]
pub fn color_names() -> Result<JsValue, JsValue> {
    let names: Vec<&str> = Color::ALL.iter().map(|color| color.name()).collect();
    to_value(&names).map_err(JsValue::from)
}

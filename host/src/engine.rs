//! # Engine 模块
//!
//! 引擎门面：把脚本驱动、对话状态机、资产缓存和合成器
//! 组装成一个宿主循环可以驱动的对象。
//!
//! ## 宿主循环契约
//!
//! ```text
//! let mut engine = Engine::new(config);
//! engine.init()?;                    // 加载字体，失败即致命
//! engine.load_script(path)?;
//! loop {
//!     for event in 平台事件 { engine.handle_event(event); }
//!     engine.tick(dt);
//!     let ops = engine.draw();       // 有序绘制指令
//!     if !engine.is_running() || engine.is_finished() { break; }
//! }
//! engine.shutdown();
//! ```
//!
//! 脚本指令的执行错误（背景缺失、立绘缺失、非法指令）只记录日志，
//! 画面保持不变，引擎继续运行。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use vn_core::{
    compose, CharacterSprite, DialogueSnapshot, DialogueState, DrawOp, FrameSnapshot, ParseError,
    Script, ScriptCommand, ScriptDriver, Viewport,
};

use crate::assets::{AssetCache, AssetKey, TextSlot};
use crate::config::AppConfig;
use crate::input::{map_event, EngineAction, Event};
use crate::text::TextRasterizer;

/// 名字文字颜色
const SPEAKER_COLOR: [u8; 4] = [242, 217, 153, 255];
/// 对话文字颜色
const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
/// 文本框底色
const TEXT_BOX_FILL: [u8; 4] = [20, 20, 40, 220];
/// 名字框底色
const NAME_BOX_FILL: [u8; 4] = [40, 40, 80, 240];

/// 初始化错误，均为致命错误
#[derive(Error, Debug)]
pub enum InitError {
    #[error("字体文件读取失败 {path:?}: {message}")]
    FontRead { path: PathBuf, message: String },

    #[error("字体解析失败: {message}")]
    FontParse { message: String },
}

/// 脚本加载错误
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("脚本文件读取失败 {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("脚本解析失败: {0}")]
    Parse(#[from] ParseError),
}

/// 引擎门面
#[derive(Debug)]
pub struct Engine {
    config: AppConfig,
    cache: AssetCache,
    rasterizer: TextRasterizer,
    dialogue: DialogueState,
    driver: Option<ScriptDriver>,
    viewport: Viewport,
    running: bool,
    /// 上次栅格化对话文字时的已显示字符数，用于跳过重复栅格化
    rendered_reveal: Option<usize>,
}

impl Engine {
    /// 创建引擎并生成固定的底色纹理
    pub fn new(config: AppConfig) -> Self {
        let mut cache = AssetCache::new(config.assets_root.clone());
        let viewport = Viewport::new(config.window.width as f32, config.window.height as f32);

        let box_h = (viewport.height * vn_core::presenter::TEXT_BOX_HEIGHT_RATIO) as u32;
        cache.create_solid_fill(
            AssetKey::TextBox,
            config.window.width.max(1),
            box_h.max(1),
            TEXT_BOX_FILL,
        );
        cache.create_solid_fill(
            AssetKey::NameBox,
            vn_core::presenter::NAME_BOX_WIDTH as u32,
            vn_core::presenter::NAME_BOX_HEIGHT as u32,
            NAME_BOX_FILL,
        );

        Self {
            rasterizer: TextRasterizer::new(config.text.font_px),
            dialogue: DialogueState::with_speed(config.text.chars_per_second),
            driver: None,
            viewport,
            running: true,
            rendered_reveal: None,
            cache,
            config,
        }
    }

    /// 加载字体
    ///
    /// 字体是文字显示的前提，失败视为致命错误。
    pub fn init(&mut self) -> Result<(), InitError> {
        let path = self.config.font_path();
        let bytes = fs::read(&path).map_err(|e| InitError::FontRead {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.rasterizer
            .load_font_bytes(&bytes)
            .map_err(|e| InitError::FontParse {
                message: e.to_string(),
            })?;
        info!(path = %path.display(), "字体已加载");
        Ok(())
    }

    /// 读取并解析脚本，执行位置指向开头
    pub fn load_script(&mut self, path: &Path) -> Result<(), ScriptError> {
        let source = fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script".to_string());
        let script = Script::parse(id, &source)?;
        info!(path = %path.display(), commands = script.len(), "脚本已加载");
        self.driver = Some(ScriptDriver::new(script));
        Ok(())
    }

    /// 直接挂载已解析的脚本
    pub fn set_script(&mut self, script: Script) {
        self.driver = Some(ScriptDriver::new(script));
    }

    /// 处理一个平台事件
    pub fn handle_event(&mut self, event: Event) {
        match map_event(event) {
            EngineAction::Quit => {
                self.running = false;
            }
            EngineAction::Advance => {
                self.dialogue.advance_input();
                self.pump_script();
            }
            EngineAction::None => {}
        }
    }

    /// 推进一帧
    pub fn tick(&mut self, dt: f32) {
        self.dialogue.tick(dt);
        self.pump_script();
    }

    /// 合成当前帧的绘制指令列表
    pub fn draw(&mut self) -> Vec<DrawOp> {
        self.refresh_text_textures();

        let snapshot = FrameSnapshot {
            background: self
                .cache
                .texture_for(&AssetKey::Background)
                .map(|t| t.size()),
            characters: self
                .cache
                .characters()
                .map(|(id, texture)| {
                    let (width, height) = texture.size();
                    CharacterSprite {
                        id: id.to_string(),
                        width,
                        height,
                    }
                })
                .collect(),
            dialogue: self.dialogue.line().map(|line| DialogueSnapshot {
                speaker_visible: !line.is_narration(),
                name_size: self
                    .cache
                    .texture_for(&AssetKey::GeneratedText(TextSlot::SpeakerName))
                    .map(|t| t.size()),
                text_size: self
                    .cache
                    .texture_for(&AssetKey::GeneratedText(TextSlot::DialogueLine))
                    .map(|t| t.size()),
            }),
        };

        compose(&snapshot, self.viewport)
    }

    /// 宿主是否应继续运行
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 脚本执行完且最后一行对话已消除
    pub fn is_finished(&self) -> bool {
        self.driver
            .as_ref()
            .is_none_or(|driver| driver.is_finished())
            && self.dialogue.is_idle()
    }

    /// 回到脚本开头，清空场景
    pub fn reset(&mut self) {
        if let Some(driver) = &mut self.driver {
            driver.reset();
        }
        self.dialogue = DialogueState::with_speed(self.config.text.chars_per_second);
        self.rendered_reveal = None;

        let visible: Vec<String> = self
            .cache
            .characters()
            .map(|(id, _)| id.to_string())
            .collect();
        for id in visible {
            self.cache.hide_character(&id);
        }
        self.cache.clear_background();
        self.cache.set_text(TextSlot::SpeakerName, None);
        self.cache.set_text(TextSlot::DialogueLine, None);
    }

    /// 释放全部资产，幂等
    pub fn shutdown(&mut self) {
        self.cache.teardown();
        self.driver = None;
    }

    /// 对话状态（只读）
    pub fn dialogue(&self) -> &DialogueState {
        &self.dialogue
    }

    /// 资产缓存（只读）
    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// 对话空闲时推进脚本，执行到阻塞指令或脚本结束
    fn pump_script(&mut self) {
        if !self.dialogue.is_idle() {
            return;
        }
        let Some(driver) = &mut self.driver else {
            return;
        };
        if driver.is_finished() {
            return;
        }

        let result = driver.pump();
        for (line, err) in &result.skipped {
            warn!(line = *line, error = %err, "跳过非法指令");
        }
        for command in result.commands {
            self.execute(command);
        }
    }

    /// 执行单条指令，错误只记录日志
    fn execute(&mut self, command: ScriptCommand) {
        match command {
            ScriptCommand::ShowBackground { path } => {
                if let Err(e) = self.cache.load_background(&path) {
                    warn!(error = %e, "背景加载失败，保留当前背景");
                }
            }
            ScriptCommand::ShowCharacter { id, pose } => {
                if let Err(e) = self.cache.show_character(&id, &pose) {
                    warn!(error = %e, "立绘加载失败，场景不变");
                }
            }
            ScriptCommand::HideCharacter { id } => {
                if !self.cache.hide_character(&id) {
                    warn!(%id, "隐藏的角色不可见，忽略");
                }
            }
            ScriptCommand::Say {
                speaker,
                display_name,
                text,
            } => {
                let name_texture = if speaker.is_empty() {
                    None
                } else {
                    self.rasterizer.rasterize(&display_name, SPEAKER_COLOR)
                };
                self.cache.set_text(TextSlot::SpeakerName, name_texture);
                self.cache.set_text(TextSlot::DialogueLine, None);
                self.rendered_reveal = None;
                self.dialogue.set_line(speaker, display_name, text);
            }
        }
    }

    /// 按打字机进度重绘对话文字纹理
    ///
    /// 已显示字符数未变时跳过，避免每帧栅格化。
    fn refresh_text_textures(&mut self) {
        if self.dialogue.is_idle() {
            if self.rendered_reveal.is_some() {
                self.cache.set_text(TextSlot::SpeakerName, None);
                self.cache.set_text(TextSlot::DialogueLine, None);
                self.rendered_reveal = None;
            }
            return;
        }

        let revealed = self.dialogue.revealed_count();
        if self.rendered_reveal == Some(revealed) {
            return;
        }

        let texture = self
            .dialogue
            .revealed_text()
            .and_then(|text| self.rasterizer.rasterize(text, TEXT_COLOR));
        self.cache.set_text(TextSlot::DialogueLine, texture);
        self.rendered_reveal = Some(revealed);
    }
}

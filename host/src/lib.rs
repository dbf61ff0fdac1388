//! # host
//!
//! vn-core 的宿主层：资产加载、文本栅格化、配置、输入映射，
//! 以及把它们组装起来的引擎门面。
//!
//! - [`assets`]：纹理缓存与生命周期管理
//! - [`text`]：fontdue 文本栅格化
//! - [`config`]：JSON 配置
//! - [`input`]：事件到引擎动作的映射
//! - [`engine`]：引擎门面，宿主循环的唯一入口

pub mod assets;
pub mod config;
pub mod engine;
pub mod input;
pub mod text;

pub use assets::{AssetCache, AssetKey, LoadError, TextSlot, Texture, TextureId};
pub use config::{AppConfig, ConfigError};
pub use engine::{Engine, InitError, ScriptError};
pub use input::{map_event, Event, EngineAction, KeyCode};
pub use text::{FontError, TextRasterizer};

//! # Assets 模块
//!
//! 纹理的加载与生命周期管理。
//!
//! ## 设计说明
//!
//! - 纹理存放在槽位竞技场中，[`TextureId`] 携带代号，
//!   释放后复用槽位不会让旧句柄指到新纹理
//! - 逻辑资产（背景、立绘、生成文字）通过 [`AssetKey`] 定位，
//!   替换语义由各加载方法保证：加载失败时保留旧资产
//! - 立绘记录显示顺序，遍历顺序与 `show` 指令的先后一致

mod error;
mod path;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::debug;

pub use error::LoadError;
pub use path::{asset_path, background_path, character_path};

/// CPU 侧 RGBA8 纹理
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// 从解码后的图像创建
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// 创建纯色填充纹理
    pub fn from_solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let image = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 尺寸（像素，f32 便于直接参与布局计算）
    pub fn size(&self) -> (f32, f32) {
        (self.image.width() as f32, self.image.height() as f32)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// 纹理句柄
///
/// 槽位下标 + 代号。槽位被释放并复用后代号递增，
/// 旧句柄的 [`AssetCache::get`] 返回 `None` 而不是错误的纹理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId {
    slot: usize,
    generation: u32,
}

/// 引擎生成的文字纹理槽
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    /// 名字框文字
    SpeakerName,
    /// 对话文字（随打字机进度重绘）
    DialogueLine,
}

/// 逻辑资产键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// 当前背景图
    Background,
    /// 文本框底色
    TextBox,
    /// 名字框底色
    NameBox,
    /// 某个角色的立绘
    Character(String),
    /// 引擎生成的文字纹理
    GeneratedText(TextSlot),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    texture: Option<Texture>,
}

/// 纹理缓存
#[derive(Debug)]
pub struct AssetCache {
    /// 资产根目录
    root: PathBuf,
    slots: Vec<Slot>,
    free: Vec<usize>,
    keys: HashMap<AssetKey, TextureId>,
    /// 可见立绘的显示顺序
    character_order: Vec<String>,
}

impl AssetCache {
    /// 创建空缓存
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            slots: Vec::new(),
            free: Vec::new(),
            keys: HashMap::new(),
            character_order: Vec::new(),
        }
    }

    /// 资产根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 加载并切换背景图
    ///
    /// 成功后才替换旧背景；失败时返回错误且当前背景不变。
    pub fn load_background(&mut self, name: &str) -> Result<TextureId, LoadError> {
        let path = background_path(&self.root, name);
        let texture = load_texture_file(&path)?;
        debug!(name, "背景已加载");
        Ok(self.replace(AssetKey::Background, texture))
    }

    /// 加载并显示角色立绘
    ///
    /// 同一角色已可见时先隐藏旧立绘再显示新的（切换姿态）。
    /// 失败时返回错误且场景不变。
    pub fn show_character(&mut self, id: &str, pose: &str) -> Result<TextureId, LoadError> {
        let path = character_path(&self.root, id, pose);
        let texture = load_texture_file(&path)?;

        self.hide_character(id);
        let texture_id = self.replace(AssetKey::Character(id.to_string()), texture);
        self.character_order.push(id.to_string());
        debug!(id, pose, "立绘已显示");
        Ok(texture_id)
    }

    /// 隐藏角色立绘并释放其纹理
    ///
    /// 角色不可见时无操作，返回 `false`。
    pub fn hide_character(&mut self, id: &str) -> bool {
        let removed = self.remove(&AssetKey::Character(id.to_string()));
        if removed {
            self.character_order.retain(|c| c != id);
        }
        removed
    }

    /// 移除当前背景（场景重置）
    pub fn clear_background(&mut self) -> bool {
        self.remove(&AssetKey::Background)
    }

    /// 创建纯色填充资产（文本框、名字框底色）
    pub fn create_solid_fill(
        &mut self,
        key: AssetKey,
        width: u32,
        height: u32,
        rgba: [u8; 4],
    ) -> TextureId {
        self.replace(key, Texture::from_solid(width, height, rgba))
    }

    /// 替换生成文字纹理
    ///
    /// `None` 表示清除该槽（空文本、无字体）。
    pub fn set_text(&mut self, slot: TextSlot, texture: Option<Texture>) -> Option<TextureId> {
        let key = AssetKey::GeneratedText(slot);
        match texture {
            Some(texture) => Some(self.replace(key, texture)),
            None => {
                self.remove(&key);
                None
            }
        }
    }

    /// 句柄解引用，代号不匹配（已释放）时返回 `None`
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        let slot = self.slots.get(id.slot)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.texture.as_ref()
    }

    /// 逻辑键当前指向的句柄
    pub fn lookup(&self, key: &AssetKey) -> Option<TextureId> {
        self.keys.get(key).copied()
    }

    /// 逻辑键当前指向的纹理
    pub fn texture_for(&self, key: &AssetKey) -> Option<&Texture> {
        self.get(self.lookup(key)?)
    }

    /// 可见立绘，按显示顺序
    pub fn characters(&self) -> impl Iterator<Item = (&str, &Texture)> {
        self.character_order.iter().filter_map(|id| {
            let texture = self.texture_for(&AssetKey::Character(id.clone()))?;
            Some((id.as_str(), texture))
        })
    }

    /// 可见立绘数
    pub fn character_count(&self) -> usize {
        self.character_order.len()
    }

    /// 存活纹理数
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 释放全部纹理，幂等
    pub fn teardown(&mut self) {
        let keys: Vec<AssetKey> = self.keys.keys().cloned().collect();
        for key in keys {
            self.remove(&key);
        }
        self.character_order.clear();
    }

    /// 把纹理写入逻辑键，旧纹理（如有）被释放
    fn replace(&mut self, key: AssetKey, texture: Texture) -> TextureId {
        self.remove(&key);
        let id = self.alloc(texture);
        self.keys.insert(key, id);
        id
    }

    fn alloc(&mut self, texture: Texture) -> TextureId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.texture = Some(texture);
                TextureId {
                    slot: index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    texture: Some(texture),
                });
                TextureId {
                    slot: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn remove(&mut self, key: &AssetKey) -> bool {
        let Some(id) = self.keys.remove(key) else {
            return false;
        };
        let slot = &mut self.slots[id.slot];
        // 代号递增使存量句柄失效
        slot.texture = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        true
    }
}

/// 读取并解码一个纹理文件
fn load_texture_file(path: &Path) -> Result<Texture, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let image = image::load_from_memory(&bytes).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Texture::from_image(image.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    /// 生成测试用资产目录，带若干真实 PNG
    fn asset_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("bg")).unwrap();
        fs::create_dir_all(root.join("characters")).unwrap();

        write_png(&root.join("bg/forest.png"), 16, 9);
        write_png(&root.join("bg/night.png"), 8, 8);
        write_png(&root.join("characters/alice_center.png"), 4, 12);
        write_png(&root.join("characters/alice_happy.png"), 6, 12);
        write_png(&root.join("characters/bob_center.png"), 4, 12);
        dir
    }

    fn write_png(path: &Path, w: u32, h: u32) {
        let img = RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_load_background() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let id = cache.load_background("forest.png").unwrap();
        let texture = cache.get(id).unwrap();
        assert_eq!((texture.width(), texture.height()), (16, 9));
        assert_eq!(cache.lookup(&AssetKey::Background), Some(id));
    }

    #[test]
    fn test_background_replace_frees_old() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let old = cache.load_background("forest.png").unwrap();
        let new = cache.load_background("night.png").unwrap();

        // 旧句柄失效，新句柄有效
        assert!(cache.get(old).is_none());
        assert_eq!(cache.get(new).unwrap().width(), 8);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_previous_background() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let id = cache.load_background("forest.png").unwrap();
        let err = cache.load_background("missing.png").unwrap_err();

        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(cache.lookup(&AssetKey::Background), Some(id));
        assert!(cache.get(id).is_some());
    }

    #[test]
    fn test_decode_error() {
        let dir = asset_dir();
        fs::write(dir.path().join("bg/bad.png"), b"not a png").unwrap();
        let mut cache = AssetCache::new(dir.path());

        let err = cache.load_background("bad.png").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_show_and_hide_character() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let id = cache.show_character("alice", "center").unwrap();
        assert_eq!(cache.character_count(), 1);
        assert!(cache.get(id).is_some());

        assert!(cache.hide_character("alice"));
        assert_eq!(cache.character_count(), 0);
        assert!(cache.get(id).is_none());

        // 重复隐藏幂等
        assert!(!cache.hide_character("alice"));
    }

    #[test]
    fn test_show_same_character_replaces_pose() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let old = cache.show_character("alice", "center").unwrap();
        let new = cache.show_character("alice", "happy").unwrap();

        assert!(cache.get(old).is_none());
        assert_eq!(cache.get(new).unwrap().width(), 6);
        assert_eq!(cache.character_count(), 1);
    }

    #[test]
    fn test_characters_iterate_in_display_order() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        cache.show_character("bob", "center").unwrap();
        cache.show_character("alice", "center").unwrap();

        let order: Vec<&str> = cache.characters().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["bob", "alice"]);

        // 重新显示已可见角色会移到队尾
        cache.show_character("bob", "center").unwrap();
        let order: Vec<&str> = cache.characters().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["alice", "bob"]);
    }

    #[test]
    fn test_failed_character_load_keeps_scene() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        cache.show_character("alice", "center").unwrap();
        let err = cache.show_character("alice", "missing").unwrap_err();

        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(cache.character_count(), 1);
        assert!(
            cache
                .texture_for(&AssetKey::Character("alice".to_string()))
                .is_some()
        );
    }

    #[test]
    fn test_solid_fill_and_generated_text() {
        let mut cache = AssetCache::new("unused");

        let id = cache.create_solid_fill(AssetKey::TextBox, 300, 60, [20, 20, 40, 220]);
        let texture = cache.get(id).unwrap();
        assert_eq!(texture.image().get_pixel(0, 0).0, [20, 20, 40, 220]);

        let text_id = cache
            .set_text(
                TextSlot::SpeakerName,
                Some(Texture::from_solid(100, 36, [255, 255, 255, 255])),
            )
            .unwrap();
        assert!(cache.get(text_id).is_some());

        // 清除后句柄失效
        assert!(cache.set_text(TextSlot::SpeakerName, None).is_none());
        assert!(cache.get(text_id).is_none());
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        let old = cache.load_background("forest.png").unwrap();
        cache.load_background("night.png").unwrap();
        // forest 的槽位被释放，可能被下一次分配复用
        cache.show_character("alice", "center").unwrap();

        assert!(cache.get(old).is_none());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let dir = asset_dir();
        let mut cache = AssetCache::new(dir.path());

        cache.load_background("forest.png").unwrap();
        cache.show_character("alice", "center").unwrap();
        cache.create_solid_fill(AssetKey::TextBox, 10, 10, [0, 0, 0, 255]);

        cache.teardown();
        assert!(cache.is_empty());
        assert_eq!(cache.character_count(), 0);

        cache.teardown();
        assert!(cache.is_empty());
    }
}

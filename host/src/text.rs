//! # Text 模块
//!
//! 基于 fontdue 的文本栅格化：把一行文字渲染为 RGBA 纹理。
//!
//! 字体未加载或文本为空时栅格化返回 `None`，
//! 调用方把它当作"无文字纹理"处理，不是错误。

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::RgbaImage;
use thiserror::Error;

use crate::assets::Texture;

/// 字体解析错误
#[derive(Error, Debug)]
pub enum FontError {
    #[error("字体解析失败: {message}")]
    Parse { message: String },
}

/// 文本栅格化器
///
/// 持有至多一个字体和固定的字号。
pub struct TextRasterizer {
    font: Option<Font>,
    px: f32,
}

impl TextRasterizer {
    /// 创建无字体的栅格化器
    pub fn new(px: f32) -> Self {
        Self { font: None, px }
    }

    /// 从字节加载 TrueType/OpenType 字体
    pub fn load_font_bytes(&mut self, bytes: &[u8]) -> Result<(), FontError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            FontError::Parse {
                message: e.to_string(),
            }
        })?;
        self.font = Some(font);
        Ok(())
    }

    /// 是否已加载字体
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// 字号（像素）
    pub fn px(&self) -> f32 {
        self.px
    }

    /// 把一行文字栅格化为纹理
    ///
    /// 空文本、无字体或文本不含可见字形时返回 `None`。
    pub fn rasterize(&self, text: &str, color: [u8; 4]) -> Option<Texture> {
        let font = self.font.as_ref()?;
        if text.is_empty() {
            return None;
        }

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, self.px, 0));

        let glyphs = layout.glyphs();
        let width = glyphs
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0f32, f32::max)
            .ceil() as u32;
        let height = layout.height().ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let mut image = RgbaImage::new(width, height);
        for glyph in glyphs {
            if !glyph.char_data.rasterize() || glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            let origin_x = glyph.x.max(0.0) as u32;
            let origin_y = glyph.y.max(0.0) as u32;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let x = origin_x + col as u32;
                    let y = origin_y + row as u32;
                    if x >= width || y >= height {
                        continue;
                    }
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    // 字形覆盖率调制文字颜色的透明度
                    let a = (alpha as u16 * color[3] as u16 / 255) as u8;
                    image.put_pixel(x, y, image::Rgba([color[0], color[1], color[2], a]));
                }
            }
        }

        Some(Texture::from_image(image))
    }
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("has_font", &self.font.is_some())
            .field("px", &self.px)
            .finish()
    }
}

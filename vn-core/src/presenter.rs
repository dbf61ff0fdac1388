//! # Presenter 模块
//!
//! 纯函数合成器：把一帧的场景快照转换为有序的绘制指令列表。
//!
//! ## 设计说明
//!
//! - 不持有任何纹理，只根据快照中的尺寸信息计算目标矩形
//! - 输出顺序即绘制顺序：背景 -> 立绘 -> 文本框 -> 名字框 -> 文字
//! - 同一快照在同一视口下的输出完全确定，便于快照测试

use serde::{Deserialize, Serialize};

/// 立绘起始横向位置（视口宽度比例）
pub const CHARACTER_START_RATIO: f32 = 0.1;
/// 相邻立绘的横向间距（视口宽度比例）
pub const CHARACTER_SPACING_RATIO: f32 = 0.3;
/// 立绘高度（视口高度比例），宽度按原图比例缩放
pub const CHARACTER_HEIGHT_RATIO: f32 = 0.8;
/// 文本框高度（视口高度比例），贴底、占满宽度
pub const TEXT_BOX_HEIGHT_RATIO: f32 = 0.25;
/// 名字框尺寸（像素）
pub const NAME_BOX_WIDTH: f32 = 300.0;
pub const NAME_BOX_HEIGHT: f32 = 60.0;
/// 名字框相对视口左缘的偏移（像素）
pub const NAME_BOX_OFFSET_X: f32 = 40.0;
/// 对话文字相对文本框的内边距（像素）
pub const TEXT_MARGIN: f32 = 70.0;

/// 目标视口
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 目标矩形（左上角 + 尺寸，像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// 绘制指令的种类
///
/// 指令只携带逻辑标识，纹理句柄的解析由宿主层完成。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawKind {
    /// 背景图，拉伸到整个视口
    Background,
    /// 角色立绘
    Character { id: String },
    /// 对话文本框底色
    TextBox,
    /// 名字框底色
    NameBox,
    /// 名字文字
    NameText,
    /// 对话文字
    DialogueText,
}

/// 一条绘制指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    pub kind: DrawKind,
    pub dest: Rect,
}

/// 场景中一个可见立绘的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSprite {
    /// 角色标识
    pub id: String,
    /// 原图尺寸（像素）
    pub width: f32,
    pub height: f32,
}

/// 对话区域的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueSnapshot {
    /// 是否显示名字框（旁白行不显示）
    pub speaker_visible: bool,
    /// 名字文字纹理的尺寸（无名字或空名字时为 None）
    pub name_size: Option<(f32, f32)>,
    /// 对话文字纹理的尺寸（尚未显示任何字符时为 None）
    pub text_size: Option<(f32, f32)>,
}

/// 一帧的场景快照
///
/// 立绘按显示顺序排列，位置由它在列表中的下标决定。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// 背景图尺寸（未设置背景时为 None）
    pub background: Option<(f32, f32)>,
    /// 可见立绘，按显示顺序
    pub characters: Vec<CharacterSprite>,
    /// 当前对话（无对话行时为 None）
    pub dialogue: Option<DialogueSnapshot>,
}

/// 合成一帧的绘制指令列表
pub fn compose(snapshot: &FrameSnapshot, viewport: Viewport) -> Vec<DrawOp> {
    let mut ops = Vec::new();
    let vw = viewport.width;
    let vh = viewport.height;

    if snapshot.background.is_some() {
        ops.push(DrawOp {
            kind: DrawKind::Background,
            dest: Rect::new(0.0, 0.0, vw, vh),
        });
    }

    for (index, sprite) in snapshot.characters.iter().enumerate() {
        ops.push(DrawOp {
            kind: DrawKind::Character {
                id: sprite.id.clone(),
            },
            dest: character_rect(sprite, index, viewport),
        });
    }

    if let Some(dialogue) = &snapshot.dialogue {
        let box_h = vh * TEXT_BOX_HEIGHT_RATIO;
        let box_y = vh - box_h;

        ops.push(DrawOp {
            kind: DrawKind::TextBox,
            dest: Rect::new(0.0, box_y, vw, box_h),
        });

        if dialogue.speaker_visible {
            let name_rect = Rect::new(
                NAME_BOX_OFFSET_X,
                box_y - NAME_BOX_HEIGHT,
                NAME_BOX_WIDTH,
                NAME_BOX_HEIGHT,
            );
            ops.push(DrawOp {
                kind: DrawKind::NameBox,
                dest: name_rect,
            });

            if let Some((name_w, name_h)) = dialogue.name_size {
                // 名字文字在名字框内居中
                ops.push(DrawOp {
                    kind: DrawKind::NameText,
                    dest: Rect::new(
                        name_rect.x + (name_rect.w - name_w) / 2.0,
                        name_rect.y + (name_rect.h - name_h) / 2.0,
                        name_w,
                        name_h,
                    ),
                });
            }
        }

        if let Some((text_w, text_h)) = dialogue.text_size {
            // 超宽时等比缩小到可用宽度，从不放大
            let available = vw - 2.0 * TEXT_MARGIN;
            let scale = if text_w > available && text_w > 0.0 {
                available / text_w
            } else {
                1.0
            };
            ops.push(DrawOp {
                kind: DrawKind::DialogueText,
                dest: Rect::new(
                    TEXT_MARGIN,
                    box_y + (box_h - text_h * scale) / 2.0,
                    text_w * scale,
                    text_h * scale,
                ),
            });
        }
    }

    ops
}

/// 第 `index` 个立绘的目标矩形
///
/// 高度固定为视口高度的 [`CHARACTER_HEIGHT_RATIO`]，宽度按原图比例缩放，
/// 贴底对齐。
fn character_rect(sprite: &CharacterSprite, index: usize, viewport: Viewport) -> Rect {
    let h = viewport.height * CHARACTER_HEIGHT_RATIO;
    let w = if sprite.height > 0.0 {
        sprite.width * (h / sprite.height)
    } else {
        0.0
    };
    let x = viewport.width * (CHARACTER_START_RATIO + CHARACTER_SPACING_RATIO * index as f32);
    Rect::new(x, viewport.height - h, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn kinds(ops: &[DrawOp]) -> Vec<&DrawKind> {
        ops.iter().map(|op| &op.kind).collect()
    }

    #[test]
    fn test_empty_snapshot_draws_nothing() {
        let ops = compose(&FrameSnapshot::default(), viewport());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_background_fills_viewport() {
        let snapshot = FrameSnapshot {
            background: Some((1920.0, 1080.0)),
            ..Default::default()
        };
        let ops = compose(&snapshot, viewport());

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, DrawKind::Background);
        assert_eq!(ops[0].dest, Rect::new(0.0, 0.0, 1280.0, 720.0));
    }

    #[test]
    fn test_character_placement_and_scaling() {
        let snapshot = FrameSnapshot {
            characters: vec![
                CharacterSprite {
                    id: "alice".to_string(),
                    width: 300.0,
                    height: 900.0,
                },
                CharacterSprite {
                    id: "bob".to_string(),
                    width: 300.0,
                    height: 900.0,
                },
            ],
            ..Default::default()
        };
        let ops = compose(&snapshot, viewport());
        assert_eq!(ops.len(), 2);

        // 高度 = 720 * 0.8 = 576，宽度按比例 = 300 * (576/900) = 192
        let first = &ops[0].dest;
        assert_eq!(first.h, 576.0);
        assert_eq!(first.w, 192.0);
        assert_eq!(first.x, 128.0);
        // 贴底对齐
        assert_eq!(first.y + first.h, 720.0);

        // 第二个立绘右移 0.3 * 1280 = 384
        assert_eq!(ops[1].dest.x, 128.0 + 384.0);
    }

    #[test]
    fn test_dialogue_layout_with_speaker() {
        let snapshot = FrameSnapshot {
            dialogue: Some(DialogueSnapshot {
                speaker_visible: true,
                name_size: Some((120.0, 40.0)),
                text_size: Some((400.0, 40.0)),
            }),
            ..Default::default()
        };
        let ops = compose(&snapshot, viewport());

        assert_eq!(
            kinds(&ops),
            vec![
                &DrawKind::TextBox,
                &DrawKind::NameBox,
                &DrawKind::NameText,
                &DrawKind::DialogueText
            ]
        );

        // 文本框高度 = 720 * 0.25 = 180，贴底
        let text_box = &ops[0].dest;
        assert_eq!(*text_box, Rect::new(0.0, 540.0, 1280.0, 180.0));

        // 名字框在文本框上缘
        let name_box = &ops[1].dest;
        assert_eq!(*name_box, Rect::new(40.0, 480.0, 300.0, 60.0));

        // 名字文字在名字框内居中
        let name_text = &ops[2].dest;
        assert_eq!(name_text.x, 40.0 + (300.0 - 120.0) / 2.0);
        assert_eq!(name_text.y, 480.0 + (60.0 - 40.0) / 2.0);

        // 对话文字未超宽，不缩放
        let text = &ops[3].dest;
        assert_eq!(text.x, TEXT_MARGIN);
        assert_eq!(text.w, 400.0);
        assert_eq!(text.h, 40.0);
    }

    #[test]
    fn test_narration_has_no_name_box() {
        let snapshot = FrameSnapshot {
            dialogue: Some(DialogueSnapshot {
                speaker_visible: false,
                name_size: None,
                text_size: Some((200.0, 40.0)),
            }),
            ..Default::default()
        };
        let ops = compose(&snapshot, viewport());

        assert_eq!(kinds(&ops), vec![&DrawKind::TextBox, &DrawKind::DialogueText]);
    }

    #[test]
    fn test_wide_text_scales_down_never_up() {
        let vp = viewport();
        let available = vp.width - 2.0 * TEXT_MARGIN;

        let wide = FrameSnapshot {
            dialogue: Some(DialogueSnapshot {
                speaker_visible: false,
                name_size: None,
                text_size: Some((2280.0, 40.0)),
            }),
            ..Default::default()
        };
        let ops = compose(&wide, vp);
        let text = ops
            .iter()
            .find(|op| op.kind == DrawKind::DialogueText)
            .unwrap();
        assert!((text.dest.w - available).abs() < 1e-3);
        assert!(text.dest.h < 40.0);

        // 窄文本保持原尺寸
        let narrow = FrameSnapshot {
            dialogue: Some(DialogueSnapshot {
                speaker_visible: false,
                name_size: None,
                text_size: Some((100.0, 40.0)),
            }),
            ..Default::default()
        };
        let ops = compose(&narrow, vp);
        assert_eq!(ops[1].dest.w, 100.0);
        assert_eq!(ops[1].dest.h, 40.0);
    }

    #[test]
    fn test_draw_order_full_scene() {
        let snapshot = FrameSnapshot {
            background: Some((1920.0, 1080.0)),
            characters: vec![CharacterSprite {
                id: "alice".to_string(),
                width: 300.0,
                height: 900.0,
            }],
            dialogue: Some(DialogueSnapshot {
                speaker_visible: true,
                name_size: Some((100.0, 40.0)),
                text_size: Some((300.0, 40.0)),
            }),
        };
        let ops = compose(&snapshot, viewport());

        assert_eq!(
            kinds(&ops),
            vec![
                &DrawKind::Background,
                &DrawKind::Character {
                    id: "alice".to_string()
                },
                &DrawKind::TextBox,
                &DrawKind::NameBox,
                &DrawKind::NameText,
                &DrawKind::DialogueText
            ]
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let snapshot = FrameSnapshot {
            background: Some((800.0, 600.0)),
            characters: vec![CharacterSprite {
                id: "alice".to_string(),
                width: 200.0,
                height: 800.0,
            }],
            dialogue: Some(DialogueSnapshot {
                speaker_visible: true,
                name_size: Some((80.0, 30.0)),
                text_size: Some((250.0, 30.0)),
            }),
        };
        let vp = viewport();
        assert_eq!(compose(&snapshot, vp), compose(&snapshot, vp));
    }

    #[test]
    fn test_serialization_round_trip() {
        let ops = compose(
            &FrameSnapshot {
                background: Some((800.0, 600.0)),
                ..Default::default()
            },
            viewport(),
        );
        let json = serde_json::to_string(&ops).unwrap();
        let restored: Vec<DrawOp> = serde_json::from_str(&json).unwrap();
        assert_eq!(ops, restored);
    }
}

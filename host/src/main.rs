//! aster：无头宿主
//!
//! 以固定步长驱动引擎，对话显示完毕后自动推进，
//! 把每行对话和每帧的绘制指令数写入日志。
//! 用于脚本调试和在没有图形后端的环境里验证引擎行为。

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use host::{AppConfig, Engine, Event, KeyCode};
use vn_core::DialoguePhase;

/// 固定步长（秒）
const FIXED_DT: f32 = 1.0 / 60.0;
/// 帧数上限，防止失控脚本让进程挂死
const MAX_FRAMES: u64 = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "aster", version, about = "视觉小说引擎的无头宿主")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 启动脚本，覆盖配置中的设置
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 对话显示完毕后自动推进前的停留时间（秒）
    #[arg(long, default_value_t = 0.5)]
    advance_delay: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let config = AppConfig::load(&args.config);
    config.validate().context("配置无效")?;

    let script_path = args
        .script
        .clone()
        .unwrap_or_else(|| config.start_script_path());

    let mut engine = Engine::new(config);
    engine.init().context("引擎初始化失败")?;
    if let Err(e) = engine.load_script(&script_path) {
        // 脚本加载失败不致命：引擎以空场景运行并立即结束
        warn!(error = %e, "脚本加载失败");
    }

    run(&mut engine, args.advance_delay);

    engine.shutdown();
    info!("退出");
    Ok(())
}

/// 固定步长的无头主循环
fn run(engine: &mut Engine, advance_delay: f32) {
    let mut frames: u64 = 0;
    let mut dwell = 0.0f32;
    let mut last_logged: Option<String> = None;

    while engine.is_running() && !engine.is_finished() {
        engine.tick(FIXED_DT);
        let ops = engine.draw();
        debug!(frame = frames, ops = ops.len(), "帧已合成");

        if engine.dialogue().phase() == DialoguePhase::FullyRevealed {
            if let Some(line) = engine.dialogue().line() {
                if last_logged.as_deref() != Some(line.text.as_str()) {
                    info!(speaker = %line.display_name, text = %line.text, "对话");
                    last_logged = Some(line.text.clone());
                }
            }
            // 停留片刻再自动推进，模拟玩家确认
            dwell += FIXED_DT;
            if dwell >= advance_delay {
                engine.handle_event(Event::KeyDown(KeyCode::Space));
                dwell = 0.0;
            }
        } else {
            dwell = 0.0;
        }

        frames += 1;
        if frames >= MAX_FRAMES {
            warn!("达到帧数上限，中止");
            break;
        }
    }
}

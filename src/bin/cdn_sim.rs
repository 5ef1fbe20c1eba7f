//! 分层 CDN 仿真（无界面）
//!
//! 构建 Origin → CDN → Fog → User 四层树，用 Zipf 负载驱动若干帧，打印命中率与往返时延。

use clap::Parser;
use cdnsim_rs::sim::{Engine, RequestWorkload, SimConfig};
use cdnsim_rs::viz::{Severity, VizLogger};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cdn-sim", about = "分层 CDN 缓存仿真：Zipf 请求负载 + FIFO 缓存")]
struct Args {
    /// SimConfig JSON 文件；未给出的字段使用默认值
    #[arg(long)]
    config: Option<PathBuf>,
    /// 运行多少帧
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// 每帧推进的 tick 数（可为小数）
    #[arg(long, default_value_t = 1.0)]
    tick_rate: f64,
    #[arg(long)]
    cdns: Option<usize>,
    #[arg(long)]
    fogs: Option<usize>,
    #[arg(long)]
    users: Option<usize>,
    /// Zipf 指数
    #[arg(long)]
    alpha: Option<f64>,
    /// 视频目录大小
    #[arg(long)]
    catalog: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// 两次观看会话之间的 tick 数
    #[arg(long)]
    interval_ticks: Option<u64>,
    /// 输出事件 JSON
    #[arg(long)]
    viz_json: Option<PathBuf>,
    /// 事件最低级别：debug / info / warn / error
    #[arg(long, default_value = "info")]
    viz_level: String,
    /// 输出统计 JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

fn parse_level(s: &str) -> Severity {
    match s.to_ascii_lowercase().as_str() {
        "debug" => Severity::Debug,
        "warn" => Severity::Warn,
        "error" => Severity::Error,
        _ => Severity::Info,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("read config json");
            SimConfig::from_json(&raw).expect("parse config json")
        }
        None => SimConfig::default(),
    };
    if let Some(v) = args.cdns {
        cfg.cdn_per_origin = v;
    }
    if let Some(v) = args.fogs {
        cfg.fog_per_cdn = v;
    }
    if let Some(v) = args.users {
        cfg.user_per_fog = v;
    }
    if let Some(v) = args.alpha {
        cfg.alpha = v;
    }
    if let Some(v) = args.catalog {
        cfg.catalog_size = v;
    }
    if let Some(v) = args.seed {
        cfg.seed = v;
    }
    if let Some(v) = args.interval_ticks {
        cfg.request_interval_ticks = v;
    }
    let cfg = cfg.sanitized();

    let mut engine = if args.viz_json.is_some() {
        Engine::with_viz(cfg.clone(), VizLogger::new(parse_level(&args.viz_level)))
    } else {
        Engine::new(cfg.clone())
    };
    engine.set_tick_rate(args.tick_rate);
    let mut workload = RequestWorkload::from_config(&cfg);

    for _ in 0..args.frames {
        workload.drive(&mut engine);
        engine.advance_frame();
    }

    let stats = engine.stats();
    let mean_rtt = stats
        .mean_round_trip_ticks()
        .map(|t| format!("{t:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "done @ tick={}, nodes={}, sessions={}, requests={}, responses={}, delivered={}, hit_rate={:.3}, mean_rtt_ticks={}, in_flight={}",
        engine.now().0,
        engine.list_nodes().len(),
        workload.sessions(),
        stats.requests_created,
        stats.responses_spawned,
        stats.delivered_pkts,
        stats.hit_rate(),
        mean_rtt,
        engine.list_packets().len(),
    );

    if let Some(path) = args.stats_json {
        let json = serde_json::to_string_pretty(engine.stats()).expect("serialize stats");
        fs::write(&path, json).expect("write stats json");
        eprintln!("wrote stats to {}", path.display());
    }

    if let Some(path) = args.viz_json {
        if let Some(v) = engine.take_viz() {
            let json = v.to_json().expect("serialize viz events");
            fs::write(&path, json).expect("write viz json");
            eprintln!("wrote viz events to {}", path.display());
        }
    }
}

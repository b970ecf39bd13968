// ==========================================
// 动态停车定价系统 - 命令行入口
// ==========================================
// 子命令: quote / health / config
// 输出: stdout 只输出结果 JSON, 日志走 stderr
// ==========================================

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use parking_pricing::api::QuoteRequest;
use parking_pricing::app::{get_default_db_path, AppState, DataSources};
use parking_pricing::config::ConfigManager;
use parking_pricing::logging::{self, LogFormat};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "parking-pricing",
    about = "动态停车定价系统 - 报价与改道建议",
    version,
    propagate_version = true
)]
struct Cli {
    /// 配置库路径 (默认读取 PARKING_PRICING_DB_PATH)
    #[arg(long, global = true)]
    config_db: Option<String>,

    /// 日志格式
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对一次停车请求报价
    Quote {
        /// 停车场编号 (SystemCodeNumber)
        #[arg(long, allow_negative_numbers = true)]
        lot: i64,
        /// ISO-8601 时间戳
        #[arg(long)]
        timestamp: String,
        /// 车型 (0=cycle, 1=bike, 2=car, 3=truck)
        #[arg(long, allow_negative_numbers = true)]
        vehicle: i64,
        /// 同时输出特征与定价来源
        #[arg(long)]
        explain: bool,
        #[command(flatten)]
        data: DataArgs,
    },
    /// 加载数据并输出健康状态
    Health {
        #[command(flatten)]
        data: DataArgs,
    },
    /// 查看或修改引擎参数
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct DataArgs {
    /// 快照 CSV 路径 (覆盖 data/snapshot_csv_path)
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// 停车场 CSV 路径 (覆盖 data/lot_csv_path)
    #[arg(long)]
    lots: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 列出全部配置项
    List,
    /// 写入配置项
    Set { key: String, value: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_format.into());

    tracing::info!("{} v{}", parking_pricing::APP_NAME, parking_pricing::VERSION);

    let db_path = cli.config_db.unwrap_or_else(get_default_db_path);

    match cli.command {
        Commands::Quote {
            lot,
            timestamp,
            vehicle,
            explain,
            data,
        } => {
            let state = load_state(db_path, data)?;
            let request = QuoteRequest {
                lot_id: lot,
                timestamp,
                vehicle_type: vehicle,
            };

            let result = if explain {
                state
                    .quote_api
                    .explain(&request)
                    .and_then(|explanation| to_json(&explanation))
            } else {
                state
                    .quote_api
                    .quote(&request)
                    .and_then(|response| to_json(&response))
            };

            match result {
                Ok(json) => {
                    println!("{}", json);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    tracing::warn!("报价失败: {}", err);
                    println!("{}", serde_json::json!({ "error": err.to_string() }));
                    // 客户端错误与服务端错误使用不同退出码
                    Ok(if err.is_client_error() {
                        ExitCode::from(2)
                    } else {
                        ExitCode::FAILURE
                    })
                }
            }
        }
        Commands::Health { data } => {
            let state = load_state(db_path, data)?;
            println!("{}", serde_json::to_string_pretty(&state.quote_api.health())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            let manager = ConfigManager::new(&db_path)
                .map_err(|e| anyhow!("无法打开配置库 {}: {}", db_path, e))?;

            match action {
                ConfigAction::List => {
                    let snapshot = manager
                        .get_config_snapshot()
                        .map_err(|e| anyhow!("读取配置失败: {}", e))?;
                    println!("{}", snapshot);
                }
                ConfigAction::Set { key, value } => {
                    // 改道阈值在写入前校验, 被拒绝的值不会落库
                    manager
                        .set_config_value(&key, &value)
                        .map_err(|e| anyhow!("写入配置失败: {}", e))?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_state(db_path: String, data: DataArgs) -> anyhow::Result<AppState> {
    AppState::new(
        db_path,
        DataSources {
            snapshot_csv: data.snapshot,
            lot_csv: data.lots,
        },
    )
    .context("初始化失败")
}

fn to_json<T: Serialize>(value: &T) -> parking_pricing::api::ApiResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| parking_pricing::api::ApiError::InternalError(e.to_string()))
}

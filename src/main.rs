// ==========================================
// POS 交易通知中继 - 命令行入口
// ==========================================
// 子命令: send（上传文件并推送）/ resubmit（重推失败记录）
// 输出: stdout 为批次结果 JSON,日志写 stderr
// 退出码: 0 完成 / 1 请求失败 / 2 空结果（BadRequest）
// ==========================================

use anyhow::Context;
use clap::{Parser, Subcommand};
use pos_txn_relay::{
    logging, BatchResult, ConfigManager, IntakeApi, IntakeResponse, IntakeStatus,
    TransactionRecord, UploadedFile,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pos-txn-relay", version, about = "POS 交易流水导入并逐笔推送下游通知接口")]
struct Cli {
    /// JSON 配置文件（缺省时读取 POS_TXN_RELAY_CONFIG）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 导入 Excel/CSV 文件并逐笔推送
    Send {
        file: PathBuf,
        /// 失败记录写出路径（可用于 resubmit）
        #[arg(long)]
        failed_out: Option<PathBuf>,
    },
    /// 重推此前失败的记录
    Resubmit {
        /// 失败记录 JSON（记录数组或完整批次结果）
        input: PathBuf,
        #[arg(long)]
        failed_out: Option<PathBuf>,
    },
}

/// resubmit 输入: 裸记录数组或 send 输出的批次结果
fn parse_resubmit_input(content: &[u8]) -> serde_json::Result<Vec<TransactionRecord>> {
    let is_array = content
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[');

    if is_array {
        serde_json::from_slice(content)
    } else {
        serde_json::from_slice::<BatchResult>(content).map(|batch| batch.failed_data)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("错误: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::info!("{} v{}", pos_txn_relay::APP_NAME, pos_txn_relay::VERSION);

    let config = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    let api = IntakeApi::from_config(&config)
        .await
        .context("初始化接收API失败")?;

    let (response, failed_out) = match cli.command {
        Command::Send { file, failed_out } => {
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("读取文件失败: {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());

            let response = api
                .upload_and_dispatch(Some(UploadedFile::new(file_name, content)))
                .await
                .with_context(|| format!("处理文件失败: {}", file.display()))?;
            (response, failed_out)
        }
        Command::Resubmit { input, failed_out } => {
            let content = tokio::fs::read(&input)
                .await
                .with_context(|| format!("读取文件失败: {}", input.display()))?;
            let records = parse_resubmit_input(&content)
                .with_context(|| format!("失败记录格式错误: {}", input.display()))?;

            (api.resubmit(records).await, failed_out)
        }
    };

    if let Some(path) = failed_out {
        write_failed(&path, &response).await?;
    }

    println!("{}", serde_json::to_string_pretty(&response.body)?);

    Ok(match response.status {
        IntakeStatus::Ok => ExitCode::SUCCESS,
        IntakeStatus::BadRequest => ExitCode::from(2),
    })
}

async fn write_failed(path: &Path, response: &IntakeResponse) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(&response.body.failed_data)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("写出失败记录失败: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        count = response.body.failed_data.len(),
        "失败记录已写出"
    );
    Ok(())
}

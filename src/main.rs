// 命令行入口 - 解析参数、初始化日志、运行对比分析

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use tracing::error;

use comment_analyzer::models::RunOverrides;

struct CliArgs {
    config_path: PathBuf,
    log_dir: PathBuf,
    overrides: RunOverrides,
}

fn print_usage() {
    println!(
        "用法: comment-analyzer [选项]\n\
         \n\
         选项:\n\
           --config <路径>        配置文件路径 (默认: config.json)\n\
           --log-dir <路径>       日志目录 (默认: logs)\n\
           --live                 实时从YouTube拉取评论并刷新缓存\n\
           --max-comments <数量>  每个视频的评论上限\n\
           -h, --help             显示本帮助"
    );
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut parsed = CliArgs {
        config_path: PathBuf::from("config.json"),
        log_dir: PathBuf::from("logs"),
        overrides: RunOverrides::default(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--live" => parsed.overrides.use_live_source = Some(true),
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config 需要一个路径参数"))?;
                parsed.config_path = PathBuf::from(value);
            }
            "--log-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-dir 需要一个路径参数"))?;
                parsed.log_dir = PathBuf::from(value);
            }
            "--max-comments" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--max-comments 需要一个数字参数"))?;
                let max = value
                    .parse::<usize>()
                    .map_err(|_| anyhow!("--max-comments 参数无效: {}", value))?;
                parsed.overrides.max_comments = Some(max);
            }
            other => return Err(anyhow!("未知参数: {}", other)),
        }
    }

    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("参数错误: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = comment_analyzer::logger::init(args.log_dir) {
        eprintln!("日志初始化失败: {}", e);
        return ExitCode::FAILURE;
    }

    match comment_analyzer::run(args.config_path, args.overrides).await {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("分析失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

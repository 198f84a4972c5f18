mod commands;

use clap::{Parser, Subcommand};
use commands::TargetArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nacl")]
#[command(about = "宣言した通りに、VPC のネットワーク ACL を収束させる。", long_about = None)]
struct Cli {
    /// ログを詳細に出力 (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// desired state に収束させる（state: absent なら削除）
    Apply {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// 実行される provider 呼び出しを表示（変更はしない）
    Plan {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// desired state ファイルを検証（AWS には接続しない）
    Validate {
        /// desired state ファイル（省略時は自動検出）
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout は結果 JSON 専用、ログは stderr に出力
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Apply { target } => commands::apply::handle(&target).await?,
        Commands::Plan { target } => commands::plan::handle(&target).await?,
        Commands::Validate { file } => commands::validate::handle(file.as_deref())?,
        Commands::Version => {
            println!("naclflow {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

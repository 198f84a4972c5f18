pub mod apply;
pub mod plan;
pub mod validate;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use naclflow_cloud_aws::{ConnectOptions, Ec2AclProvider};
use naclflow_config::DesiredState;
use std::path::{Path, PathBuf};

/// 対象 ACL と接続先の指定
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// desired state ファイル（省略時は自動検出）
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// AWS リージョン（ファイルの region より優先）
    #[arg(long)]
    pub region: Option<String>,

    /// AWS プロファイル（ファイルの profile より優先）
    #[arg(long)]
    pub profile: Option<String>,
}

/// desired state ファイルを探して読み込む（検証込み）
pub fn load_desired_state(file: Option<&Path>) -> anyhow::Result<DesiredState> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => naclflow_config::find_desired_file()?,
    };

    let state = naclflow_config::load_desired_state(&path)
        .with_context(|| format!("{} の読み込みに失敗しました", path.display()))?;
    tracing::debug!("Loaded desired state from {}", path.display());

    eprintln!("{} {}", "設定ファイル:".bold(), path.display().to_string().cyan());
    Ok(state)
}

/// EC2 に接続する（呼び出しごとに新しいクライアント）
pub async fn connect(target: &TargetArgs, state: &DesiredState) -> anyhow::Result<Ec2AclProvider> {
    let options = ConnectOptions {
        region: target.region.clone().or_else(|| state.region.clone()),
        profile: target.profile.clone().or_else(|| state.profile.clone()),
    };

    let provider = Ec2AclProvider::connect(&options).await?;
    eprintln!("{} {}", "リージョン:".bold(), provider.region().cyan());
    Ok(provider)
}

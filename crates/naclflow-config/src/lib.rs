pub mod error;

pub use error::*;

use naclflow_cloud::{DesiredAcl, DesiredRule, Tag, resolve_rules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// desired state ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "NACLFLOW_CONFIG_PATH";

const CANDIDATES: [&str; 5] = [
    "acl.local.yaml",
    ".acl.local.yaml",
    "acl.yaml",
    ".acl.yaml",
    "acl.yml",
];

/// ACL を存在させるか削除するか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclState {
    Present,
    Absent,
}

impl std::fmt::Display for AclState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AclState::Present => write!(f, "present"),
            AclState::Absent => write!(f, "absent"),
        }
    }
}

/// desired state ファイルの内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredState {
    pub state: AclState,

    /// VPC 内での ACL の論理名（Name タグ）
    pub name: String,

    pub vpc_id: String,

    /// 省略時はルールを管理しない
    #[serde(default)]
    pub rules: Vec<DesiredRule>,

    /// 追加・上書きのみ（既存タグは削除しない）
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// 省略時は AWS の標準設定チェーンから解決
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub profile: Option<String>,
}

impl DesiredState {
    /// provider に触れずに検証できる項目をすべて検証する
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name が空です".to_string()));
        }
        if self.vpc_id.trim().is_empty() {
            return Err(ConfigError::Invalid("vpc_id が空です".to_string()));
        }
        resolve_rules(&self.rules)?;
        Ok(())
    }

    pub fn desired_acl(&self) -> DesiredAcl {
        DesiredAcl {
            name: self.name.clone(),
            vpc_id: self.vpc_id.clone(),
            rules: self.rules.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// YAML（JSON も可）をパースして検証する
pub fn parse_desired_state(content: &str) -> Result<DesiredState> {
    let state: DesiredState = serde_yaml::from_str(content)?;
    state.validate()?;
    Ok(state)
}

/// desired state ファイルを読み込む
pub fn load_desired_state(path: &Path) -> Result<DesiredState> {
    let content = std::fs::read_to_string(path)?;
    parse_desired_state(&content)
}

/// desired state ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 NACLFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: acl.local.yaml, .acl.local.yaml, acl.yaml, .acl.yaml, acl.yml
/// 3. ./.naclflow/ ディレクトリ内: 同様の順序
pub fn find_desired_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリで検索
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.naclflow/ ディレクトリで検索
    let naclflow_dir = current_dir.join(".naclflow");
    if naclflow_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = naclflow_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    Err(ConfigError::DesiredFileNotFound)
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "desired state ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: acl.local.yaml, .acl.local.yaml, acl.yaml, .acl.yaml, acl.yml\n\
        - ./.naclflow/ ディレクトリ\n\
        または NACLFLOW_CONFIG_PATH 環境変数、--file オプションで直接指定できます"
    )]
    DesiredFileNotFound,

    #[error("設定が不正です: {0}")]
    Invalid(String),

    #[error("ルールが不正です: {0}")]
    Rule(#[from] naclflow_cloud::CloudError),

    #[error("YAML パースエラー: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

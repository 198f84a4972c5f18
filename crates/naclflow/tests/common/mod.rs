use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_desired(&self, content: &str) -> PathBuf {
        let path = self.root.path().join("acl.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}

pub const VALID_DESIRED: &str = r#"
state: present
name: web
vpc_id: vpc-0123
rules:
  - number: 100
    direction: ingress
    protocol: TCP
    action: allow
    cidr_block: 0.0.0.0/0
    port_range: { from: 443, to: 443 }
  - number: 100
    direction: egress
    protocol: ALL
    action: allow
    cidr_block: 0.0.0.0/0
tags:
  - key: env
    value: prod
"#;

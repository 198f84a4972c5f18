use colored::Colorize;
use naclflow_cloud::Direction;
use std::path::Path;

pub fn handle(file: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "desired state を検証中...".blue());

    let state = super::load_desired_state(file)?;

    let count = |direction: Direction| {
        state
            .rules
            .iter()
            .filter(|r| r.direction == direction)
            .count()
    };

    println!("{}", "✓ 設定は有効です".green());
    println!("  ACL:     {} ({})", state.name.cyan(), state.vpc_id);
    println!("  state:   {}", state.state);
    println!(
        "  rules:   ingress {} / egress {}",
        count(Direction::Ingress),
        count(Direction::Egress)
    );
    println!("  tags:    {}", state.tags.len());
    Ok(())
}

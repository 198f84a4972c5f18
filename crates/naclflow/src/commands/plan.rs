use super::TargetArgs;
use colored::Colorize;
use naclflow_cloud::{Action, ActionType, Reconciler};
use naclflow_config::AclState;

pub async fn handle(target: &TargetArgs) -> anyhow::Result<()> {
    let state = super::load_desired_state(target.file.as_deref())?;
    let provider = super::connect(target, &state).await?;
    let mut reconciler = Reconciler::new(&provider, state.desired_acl());

    let plan = match state.state {
        AclState::Present => reconciler.plan_present().await?,
        AclState::Absent => reconciler.plan_absent().await?,
    };

    println!();
    match plan.acl_id.as_deref() {
        Some(id) => println!("{} {} ({})", "ACL:".bold(), state.name.cyan(), id),
        None => println!("{} {} (未作成)", "ACL:".bold(), state.name.cyan()),
    }

    if !plan.has_changes() {
        println!("{}", "✓ 変更はありません".green());
        return Ok(());
    }

    // 計画時に取得済みの ACL（再問い合わせはしない）
    let live = reconciler.find_acl().await?.cloned();

    for action in &plan.actions {
        let marker = match action.action_type() {
            ActionType::Create => "+".green(),
            ActionType::Update => "~".yellow(),
            ActionType::Delete => "-".red(),
        };
        println!("  {} {}", marker, action);

        let current = match action {
            Action::ReplaceEntry(entry) => live
                .as_ref()
                .and_then(|acl| acl.entry(entry.number, entry.direction)),
            Action::DeleteEntry { number, direction } => live
                .as_ref()
                .and_then(|acl| acl.entry(*number, *direction)),
            _ => None,
        };
        if let Some(current) = current {
            println!("      {} {}", "現在:".dimmed(), current);
        }
    }

    println!();
    println!("{} {}", "Plan:".bold(), plan.summary());
    Ok(())
}

use super::TargetArgs;
use colored::Colorize;
use naclflow_cloud::Reconciler;
use naclflow_config::AclState;

pub async fn handle(target: &TargetArgs) -> anyhow::Result<()> {
    let state = super::load_desired_state(target.file.as_deref())?;
    eprintln!(
        "{} {} ({}) → {}",
        "ACL:".bold(),
        state.name.cyan(),
        state.vpc_id,
        state.state.to_string().yellow()
    );

    let provider = super::connect(target, &state).await?;
    let mut reconciler = Reconciler::new(&provider, state.desired_acl());

    let outcome = match state.state {
        AclState::Present => reconciler.ensure_present().await?,
        AclState::Absent => reconciler.ensure_absent().await?,
    };

    if outcome.id.is_empty() {
        eprintln!("{}", "ℹ ACL は存在しません".yellow());
    } else {
        eprintln!("{} {}", "✓ 完了:".green(), outcome.id);
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

//! Agent listing: `landreg agents`.

use anyhow::Result;
use console::style;

use landreg::config::LandregConfig;
use landreg::controller::SubmitOutcome;
use landreg::ui::icons::{CROSS, PERSON};
use landreg::ui::spinner;

use super::{AppContext, cancel_on_ctrl_c, finish};

pub async fn cmd_agents(config: &LandregConfig) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let cancel = cancel_on_ctrl_c();

    let bar = spinner("Loading agents...");
    let outcome = ctx.controller.fetch_agents(&cancel).await;
    bar.finish_and_clear();

    if let SubmitOutcome::Failed(message) = &outcome {
        eprintln!("{}{}", CROSS, style(message).red().bold());
    }
    if !outcome.is_success() {
        return finish(outcome, "Loading agents");
    }

    let agents = ctx.controller.store().read(|s| s.agents.agents.clone());
    if agents.is_empty() {
        println!("No agents available.");
        return Ok(());
    }
    for agent in &agents {
        println!(
            "{}{} {} {}",
            PERSON,
            style(agent.full_name()).bold(),
            style(format!("<{}>", agent.email)).dim(),
            style(&agent.id).dim()
        );
    }
    Ok(())
}

//! Property request commands: `landreg requests list|new`.

use std::path::PathBuf;

use anyhow::Result;
use console::{Term, style};
use dialoguer::{Input, Select, theme::ColorfulTheme};
use tokio_util::sync::CancellationToken;

use landreg::config::LandregConfig;
use landreg::controller::SubmitOutcome;
use landreg::form::{Attachment, FieldStore, InputEvent, RequestForm};
use landreg::i18n::Locale;
use landreg::models::{PropertyRequest, RequestStatus, Urgency};
use landreg::ui::icons::{CROSS, DOCUMENT};
use landreg::ui::{print_field_errors, spinner};

use super::super::RequestsCommands;
use super::{AppContext, cancel_on_ctrl_c, finish};

pub async fn cmd_requests(config: &LandregConfig, command: Option<RequestsCommands>) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let cancel = cancel_on_ctrl_c();

    match command {
        None | Some(RequestsCommands::List) => list(&ctx, &cancel, config.locale).await,
        Some(RequestsCommands::New {
            property_type,
            location,
            description,
            urgency,
            agent,
            documents,
        }) => {
            let draft = Draft {
                property_type,
                location,
                description,
                urgency,
                agent,
                documents,
            };
            submit(&ctx, &cancel, config.locale, draft).await
        }
    }
}

async fn list(ctx: &AppContext, cancel: &CancellationToken, locale: Locale) -> Result<()> {
    let bar = spinner("Loading requests...");
    let outcome = ctx.controller.fetch_requests(cancel).await;
    bar.finish_and_clear();

    if let SubmitOutcome::Failed(message) = &outcome {
        eprintln!("{}{}", CROSS, style(message).red().bold());
    }
    if !outcome.is_success() {
        return finish(outcome, "Loading requests");
    }

    let items = ctx.controller.store().read(|s| s.requests.items.clone());
    if items.is_empty() {
        println!("No requests yet. Create one with 'landreg requests new'.");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        style(format!(
            "  {:<14} {:<16} {:<20} {:<8} {:<12} {}",
            "NUMBER", "TYPE", "LOCATION", "URGENCY", "STATUS", "SUBMITTED"
        ))
        .dim()
    );
    for request in &items {
        print_row(request, locale);
    }
    println!();
    Ok(())
}

fn print_row(request: &PropertyRequest, locale: Locale) {
    let status = format!("{:<12}", request.status.label(locale));
    let status = match request.status {
        RequestStatus::Pending => style(status).yellow(),
        RequestStatus::InProgress => style(status).cyan(),
        RequestStatus::Completed => style(status).green(),
        RequestStatus::Rejected => style(status).red(),
    };
    println!(
        "{}{:<14} {:<16} {:<20} {:<8} {} {}",
        DOCUMENT,
        request.request_number,
        request.property_type,
        request.location.as_deref().unwrap_or("-"),
        request.urgency.as_str(),
        status,
        request.created_at.format("%Y-%m-%d"),
    );
    if let Some(agent) = &request.agent {
        println!("    agent: {}", agent.display_name());
    }
}

/// Values given on the command line for `requests new`.
struct Draft {
    property_type: Option<String>,
    location: Option<String>,
    description: Option<String>,
    urgency: Urgency,
    agent: Option<String>,
    documents: Vec<PathBuf>,
}

async fn submit(
    ctx: &AppContext,
    cancel: &CancellationToken,
    locale: Locale,
    draft: Draft,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut form = FieldStore::new(RequestForm::default(), locale);

    let prompted = [
        ("propertyType", "Property type", draft.property_type),
        ("location", "Location", draft.location),
        ("description", "Description", draft.description),
    ];
    for (name, prompt, given) in prompted {
        let value = or_prompt(&theme, given, prompt)?;
        form.apply_input(InputEvent::text(name, value))?;
    }
    form.apply_input(InputEvent::text("urgency", draft.urgency.as_str()))?;

    let agent = match draft.agent {
        Some(agent) => agent,
        None if Term::stdout().is_term() => pick_agent(ctx, cancel, &theme).await?,
        None => String::new(),
    };
    form.apply_input(InputEvent::text("agent", agent))?;

    let documents = draft
        .documents
        .iter()
        .map(|path| Attachment::from_path(path))
        .collect::<Result<Vec<_>>>()?;
    form.apply_input(InputEvent::files("documents", documents))?;

    let bar = spinner("Submitting request...");
    let outcome = ctx.controller.create_request(&mut form, cancel).await;
    bar.finish_and_clear();

    if outcome == SubmitOutcome::Invalid {
        print_field_errors(form.errors());
    }
    finish(outcome, "Request")
}

fn or_prompt(theme: &ColorfulTheme, given: Option<String>, prompt: &str) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Offer the agent list; an unavailable list means no agent.
async fn pick_agent(
    ctx: &AppContext,
    cancel: &CancellationToken,
    theme: &ColorfulTheme,
) -> Result<String> {
    let outcome = ctx.controller.fetch_agents(cancel).await;
    let agents = ctx.controller.store().read(|s| s.agents.agents.clone());
    if !outcome.is_success() || agents.is_empty() {
        return Ok(String::new());
    }

    let mut items = vec!["(no agent)".to_string()];
    items.extend(
        agents
            .iter()
            .map(|a| format!("{} <{}>", a.full_name(), a.email)),
    );
    let selected = Select::with_theme(theme)
        .with_prompt("Assign an agent")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match selected {
        0 => String::new(),
        n => agents[n - 1].id.clone(),
    })
}

use std::io::{self, BufRead, Write};

use anyhow::Context;

use super::args::Command;
use super::state::{AppState, DynGroupRepository};
use super::terminal::{write_panel, TerminalTarget};
use super::events::print_events;
use crate::application::render::{PanelContent, PanelView, RenderContext};
use crate::application::service::{FetchOutcome, GroupService};
use crate::domain::error::DomainError;
use crate::domain::model::{GroupDetails, GroupId};

type Service = GroupService<DynGroupRepository>;

/// Run one command, then show the notices it produced.
pub async fn execute(command: Command, state: &mut AppState) -> anyhow::Result<()> {
    let result = dispatch(command, &state.group_service).await;
    print_events(&state.drain_events());
    result
}

async fn dispatch(command: Command, service: &Service) -> anyhow::Result<()> {
    match command {
        Command::Browse { filters } => {
            let filters = filters.to_filters();
            let mut groups = TerminalTarget::new();
            let mut recommendations = TerminalTarget::new();
            let outcome = service
                .refresh_browse(&filters, &mut groups, &mut recommendations)
                .await;
            write_listing(&mut io::stdout().lock(), &outcome, &[&groups, &recommendations])?;
            outcome_result(outcome)
        }
        Command::Recommend {
            filters,
            server_side,
        } => {
            let mut recommendations = TerminalTarget::new();
            if server_side {
                let outcome = service.server_matches(&mut recommendations).await;
                recommendations.print()?;
                return outcome_result(outcome);
            }

            let mut groups = TerminalTarget::new();
            let outcome = service
                .refresh_browse(&filters.to_filters(), &mut groups, &mut recommendations)
                .await;
            // on failure the listing panel holds the message
            let panel = if matches!(outcome, FetchOutcome::Rendered(_)) {
                &recommendations
            } else {
                &groups
            };
            write_listing(&mut io::stdout().lock(), &outcome, &[panel])?;
            outcome_result(outcome)
        }
        Command::Join { group_id, filters } => {
            let mut groups = TerminalTarget::new();
            let mut recommendations = TerminalTarget::new();
            service
                .join(
                    &GroupId::new(group_id),
                    &filters.to_filters(),
                    &mut groups,
                    &mut recommendations,
                )
                .await?;
            groups.print()?;
            recommendations.print()?;
            Ok(())
        }
        Command::Create(args) => {
            service.create(args.into()).await?;
            Ok(())
        }
        Command::Mine { search } => {
            let mut target = TerminalTarget::new();
            let outcome = service.load_my_groups(&mut target).await;
            if let (FetchOutcome::Rendered(_), Some(term)) = (&outcome, search) {
                service.search_my_groups(&term, &mut target);
            }
            target.print()?;
            outcome_result(outcome)
        }
        Command::Delete { group_id, yes } => {
            let id = GroupId::new(group_id);
            if !yes && !confirm(&format!("Delete group {}? [y/N] ", id))? {
                println!("Cancelled");
                return Ok(());
            }
            let mut target = TerminalTarget::new();
            service.delete(&id, &mut target).await?;
            target.print()?;
            Ok(())
        }
        Command::Show { group_id } => {
            let details = service.group_details(&GroupId::new(group_id)).await?;
            print_details(service, &details)?;
            Ok(())
        }
        Command::Options => {
            let options = service.filter_options().await;
            println!("Subjects:");
            for (code, name) in &options.subjects {
                println!("  {:<14} {}", code, name);
            }
            println!("Goals:");
            for (code, name) in &options.goals {
                println!("  {:<14} {}", code, name);
            }
            Ok(())
        }
        Command::Whoami => {
            let user = service.current_user().await?;
            let role = if user.is_admin { " (admin)" } else { "" };
            println!("{} [id {}]{}", user.name, user.id, role);
            Ok(())
        }
    }
}

/// Writes the browse panels unless the backend asked for a login. The
/// listing is still mid-load then, and the login notice stands in for it.
fn write_listing<W: Write>(
    out: &mut W,
    outcome: &FetchOutcome,
    panels: &[&TerminalTarget],
) -> io::Result<()> {
    if matches!(outcome, FetchOutcome::AuthRequired) {
        return Ok(());
    }
    for panel in panels {
        panel.write_to(out)?;
    }
    Ok(())
}

fn outcome_result(outcome: FetchOutcome) -> anyhow::Result<()> {
    match outcome {
        FetchOutcome::Rendered(_) | FetchOutcome::Stale => Ok(()),
        FetchOutcome::AuthRequired => Err(DomainError::AuthRequired.into()),
        FetchOutcome::Failed(message) => Err(DomainError::Transport(message).into()),
    }
}

fn print_details(service: &Service, details: &GroupDetails) -> io::Result<()> {
    let card = service
        .renderer()
        .card(&details.group, RenderContext::MyGroups);
    let view = PanelView {
        context: RenderContext::MyGroups,
        content: PanelContent::Cards(vec![card]),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_panel(&mut out, &view)?;
    writeln!(out, "Members ({}):", details.members.len())?;
    for member in &details.members {
        writeln!(out, "  - {} ({})", member.name, member.student_id)?;
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

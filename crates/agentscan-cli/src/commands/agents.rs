use anyhow::Result;
use cliclack::confirm;
use console::style;

use agentscan::client::{AgentscanClient, AgentsSource};
use agentscan::models::listing::AgentInstance;
use agentscan::paginate::{CursorPaginator, ListFilter};

use crate::render;

pub async fn run(client: AgentscanClient) -> Result<()> {
    let mut paginator = CursorPaginator::new(AgentsSource::new(client)).with_exclude_seen();
    paginator.reset(ListFilter::default()).await?;

    println!("{}\n", style("Recently Active Agents").bold());
    let mut printed = print_from(paginator.items(), 0);

    while paginator.has_more() {
        if !confirm("Load more?").initial_value(true).interact()? {
            break;
        }
        if let Err(err) = paginator.load_more().await {
            // No automatic retry; the next confirmation re-triggers.
            println!("{}", style(format!("Failed to load agents: {err}")).red());
            continue;
        }
        printed = print_from(paginator.items(), printed);
    }
    Ok(())
}

fn print_from(items: &[AgentInstance], from: usize) -> usize {
    for instance in &items[from..] {
        print_instance(instance);
    }
    items.len()
}

fn print_instance(instance: &AgentInstance) {
    println!(
        "{}  {}",
        style(&instance.agent.name).bold(),
        style(&instance.id).dim()
    );
    if let Some(timestamp) = instance.timestamp {
        println!(
            "  {}",
            style(format!("Active {}", render::relative_time(timestamp))).dim()
        );
    }
    if !instance.agent.description.is_empty() {
        println!("  {}", instance.agent.description);
    }
    println!();
}

use anyhow::Result;
use cliclack::confirm;
use console::style;

use agentscan::client::{AgentscanClient, InstancesSource};
use agentscan::models::listing::AgentInstance;
use agentscan::paginate::{CursorPaginator, ListFilter};

pub async fn run(client: AgentscanClient, agent_id: String) -> Result<()> {
    let mut paginator = CursorPaginator::new(InstancesSource::new(client));
    paginator.reset(ListFilter::agent(&agent_id)).await?;

    if paginator.items().is_empty() {
        println!("No instances found for agent {}", style(&agent_id).cyan());
        return Ok(());
    }

    println!(
        "{}\n",
        style(format!("Instances of agent {agent_id}")).bold()
    );
    let mut printed = print_from(paginator.items(), 0);

    while paginator.has_more() {
        if !confirm("Load more?").initial_value(true).interact()? {
            break;
        }
        if let Err(err) = paginator.load_more().await {
            println!("{}", style(format!("Failed to load instances: {err}")).red());
            continue;
        }
        printed = print_from(paginator.items(), printed);
    }

    println!(
        "{}",
        style("Chat with one of these via `agentscan chat --instance <id>`").dim()
    );
    Ok(())
}

fn print_from(items: &[AgentInstance], from: usize) -> usize {
    for instance in &items[from..] {
        println!(
            "{}  {}",
            style(&instance.id).cyan(),
            instance.agent.name
        );
        if !instance.agent.description.is_empty() {
            println!("  {}", style(&instance.agent.description).dim());
        }
    }
    items.len()
}

use anyhow::Result;
use cliclack::confirm;
use console::style;

use agentscan::client::{AgentscanClient, TransactionsSource};
use agentscan::models::listing::Transaction;
use agentscan::paginate::{CursorPaginator, ListFilter};

use crate::render;

pub async fn run(client: AgentscanClient, chain: Option<String>) -> Result<()> {
    let filter = match chain {
        Some(chain) => ListFilter::chain(chain),
        None => ListFilter::default(),
    };

    let mut paginator = CursorPaginator::new(TransactionsSource::new(client));
    paginator.reset(filter).await?;

    println!("{}\n", style("Recent Transactions by Agents").bold());
    let mut printed = print_from(paginator.items(), 0);

    while paginator.has_more() {
        if !confirm("Load more?").initial_value(true).interact()? {
            break;
        }
        if let Err(err) = paginator.load_more().await {
            println!("{}", style(format!("Failed to load transactions: {err}")).red());
            continue;
        }
        printed = print_from(paginator.items(), printed);
    }
    Ok(())
}

fn print_from(items: &[Transaction], from: usize) -> usize {
    for transaction in &items[from..] {
        print_transaction(transaction);
    }
    items.len()
}

fn print_transaction(transaction: &Transaction) {
    println!(
        "{}  {}",
        style(&transaction.agent_instance.agent.name).bold(),
        style(format!(
            "[{}] {}",
            transaction.chain,
            render::relative_time(transaction.timestamp)
        ))
        .dim()
    );
    println!("  {}", style(&transaction.transaction_hash).dim());
    if !transaction.link.is_empty() {
        println!("  {}", style(&transaction.link).blue().underlined());
    }
    println!();
}

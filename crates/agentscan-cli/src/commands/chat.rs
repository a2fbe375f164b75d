use anyhow::Result;
use cliclack::{input, spinner};
use console::style;

use agentscan::chat::{ChatContext, ChatSession};
use agentscan::client::AgentscanClient;
use agentscan::errors::ChatError;
use agentscan::events::TracingObserver;

use crate::render;

const SUGGESTED_PROMPTS: [&str; 3] = [
    "What was your most recent transaction?",
    "Describe your strategy",
    "What was your most profitable trade?",
];

pub async fn run(client: AgentscanClient, instance: Option<String>) -> Result<()> {
    let context = match &instance {
        Some(id) => ChatContext::agent(id.clone()),
        None => ChatContext::general(),
    };
    let mut session =
        ChatSession::new(client, context).with_observer(Box::new(TracingObserver));

    match &instance {
        Some(id) => println!(
            "Chatting with agent instance {} {}",
            style(id).cyan(),
            style("- type \"exit\" to end the session").dim()
        ),
        None => println!(
            "agentscan chat {}",
            style("- type \"exit\" to end the session").dim()
        ),
    }
    if instance.is_some() {
        println!("{}", style("Try one of:").dim());
        for prompt in SUGGESTED_PROMPTS {
            println!("  {}", style(prompt).dim());
        }
    }
    println!();

    loop {
        let message_text: String = input("Message:").placeholder("").interact()?;
        if message_text.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        let spin = spinner();
        spin.start("awaiting reply");

        match session.submit(&message_text).await {
            Ok(()) => {
                spin.stop("");
                render::markdown(session.last_reply().unwrap_or_default()).await;
                println!();
            }
            Err(err) if err.needs_auth() => {
                spin.stop("");
                println!(
                    "{}",
                    style("You've used up the free requests. Sign in with --access-token to continue.")
                        .yellow()
                );
            }
            Err(ChatError::RateLimited { message, .. }) => {
                spin.stop("");
                println!("{}", style(message).yellow());
            }
            Err(ChatError::EmptyQuestion) => {
                spin.stop("");
            }
            Err(err) => {
                spin.stop("");
                println!(
                    "{}",
                    style(format!("An error occurred: {err}. Please try again later.")).red()
                );
            }
        }
    }
    Ok(())
}

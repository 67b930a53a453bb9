use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cricketchat_chat::{SessionManager, SubmitOutcome};
use cricketchat_logging::TranscriptLogger;

use super::setup::AppContext;
use crate::render;

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /history  - Show or hide your recent questions");
    println!("  /clear    - Clear the conversation here and on the server");
    println!("  /help     - Show this help");
    println!("  /quit     - Exit");
    println!("  Anything else is sent as a question.");
}

/// Run interactive REPL mode
pub async fn run_repl_mode(ctx: &AppContext) -> Result<()> {
    let (session, resolved) = ctx.open_session()?;

    println!("{}", "🏏 Cricket Stats Chat".bright_cyan().bold());
    match ctx.auth.current() {
        Some(auth) if !resolved.is_anonymous() => {
            println!("{}", format!("Signed in as {}", auth.display_name()).bright_black())
        }
        _ => println!(
            "{}",
            "Anonymous session: this conversation will not be available after you exit.".yellow()
        ),
    }
    println!("{}", "Type /help for commands, /quit to exit\n".bright_black());

    let mut transcript = ctx.open_transcript().await;

    let messages = session.messages();
    if messages.is_empty() {
        render::print_welcome();
    } else {
        for message in &messages {
            render::print_message(message);
        }
        println!();
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    "/quit" | "/exit" | "exit" | "quit" => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    "/help" => print_help(),
                    "/history" => {
                        if session.toggle_history().await {
                            render::print_history(&session.history());
                        } else {
                            println!("{}", "History hidden.".bright_black());
                        }
                    }
                    "/clear" => {
                        session.clear_memory().await;
                        println!("{} Conversation cleared.", "🧹".bright_green());
                        render::print_welcome();
                    }
                    command if command.starts_with('/') => {
                        eprintln!("{} Unknown command '{}'. Type /help.", "❌".bright_red(), command);
                    }
                    question => {
                        ask_and_print(&session, question, resolved.identity.as_str(), &mut transcript).await;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C (type /quit to exit)".bright_yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red(), err);
                break;
            }
        }
    }

    Ok(())
}

async fn ask_and_print(
    session: &SessionManager,
    question: &str,
    identity: &str,
    transcript: &mut Option<TranscriptLogger>,
) {
    println!("{}", "Thinking...".bright_black());
    match session.submit(question).await {
        SubmitOutcome::Replied(reply) => {
            render::print_message(&reply);
            println!();
            if let Some(logger) = transcript.as_mut() {
                for message in session.messages().iter().rev().take(2).rev() {
                    logger.log(identity, message).await;
                }
            }
        }
        SubmitOutcome::Busy => {
            println!("{}", "Still answering your last question...".yellow());
        }
        SubmitOutcome::Discarded => {
            println!("{}", "Conversation was cleared; answer dropped.".bright_black());
        }
        SubmitOutcome::EmptyInput => {}
    }
}

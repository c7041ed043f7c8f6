//! A terminal front-end for the operations agent.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ops_agent::command::{self, Command, HELP};
use ops_agent::config::Config;
use ops_agent::core::{ConversationId, Message, Role};
use ops_agent::{Error, Session, SessionBuilder, export, seed};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Reply(ConversationId, Message),
}

const BAR_CHAR: &str = "▎";

type Input = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let session = SessionBuilder::from_config(&config)
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_reply({
            let event_tx = event_tx.clone();
            move |conversation, message| {
                event_tx
                    .send(SessionEvent::Reply(
                        conversation.clone(),
                        message.clone(),
                    ))
                    .ok();
            }
        })
        .build();
    let session = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    if let Err(err) = run(&session, event_rx).await {
        eprintln!("{err}");
    }
    session.shutdown();
}

async fn run(
    session: &Session,
    mut event_rx: mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<(), Error> {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut input = BufReader::new(io::stdin()).lines();

    let model = session.current_model().await?;
    println!(
        "{} {}",
        "Operations agent".bright_white().bold(),
        format!("({}, /help for commands)", model.name).dimmed()
    );
    print_history(session).await?;

    loop {
        // Replies that arrived while nobody was waiting for them.
        while let Ok(event) = event_rx.try_recv() {
            if let SessionEvent::Reply(conversation, message) = event {
                print_reply(&conversation, &message);
            }
        }

        if session.snapshot().await?.messages.is_empty() {
            print_suggestions();
        }

        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut input).await else {
            break;
        };
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err.bright_red());
                continue;
            }
        };

        let text = match command {
            Command::Send(text) => text,
            Command::Suggest(Some(n)) => match seed::SUGGESTIONS.get(n - 1) {
                Some(suggestion) => (*suggestion).to_owned(),
                None => {
                    println!("{}", "no such suggestion".bright_red());
                    continue;
                }
            },
            Command::Quit => break,
            command => {
                handle_command(session, command).await?;
                continue;
            }
        };

        if text.trim().is_empty() {
            continue;
        }
        if session.send_message(text).await? {
            let open = wait_for_replies(&mut event_rx, &progress_style).await;
            if !open {
                break;
            }
        }
    }

    Ok(())
}

async fn handle_command(session: &Session, command: Command) -> Result<(), Error> {
    match command {
        Command::New => {
            let id = session.create_conversation().await?;
            println!("{}", format!("started conversation {id}").dimmed());
        }
        Command::List => {
            let snapshot = session.snapshot().await?;
            for (i, conversation) in snapshot.conversations.iter().enumerate() {
                let active = snapshot.active_id.as_ref() == Some(&conversation.id);
                let marker = if active { "*" } else { " " };
                println!(
                    "{marker} #{:<3} {}  {}",
                    i + 1,
                    conversation.title.bright_white(),
                    format!(
                        "({} messages, {}, id {})",
                        conversation.message_count,
                        conversation.last_activity,
                        conversation.id
                    )
                    .dimmed()
                );
            }
        }
        Command::Open(target) => {
            let snapshot = session.snapshot().await?;
            let Some(id) = target.resolve(&snapshot.conversations) else {
                println!("{}", "no such conversation".bright_red());
                return Ok(());
            };
            session.select_conversation(id).await?;
            print_history(session).await?;
        }
        Command::Rename(target, title) => {
            let snapshot = session.snapshot().await?;
            let Some(id) = target.resolve(&snapshot.conversations) else {
                println!("{}", "no such conversation".bright_red());
                return Ok(());
            };
            if !session.rename_conversation(id, title).await? {
                println!("{}", "the title must not be blank".bright_red());
            }
        }
        Command::Delete(target) => {
            let snapshot = session.snapshot().await?;
            let Some(id) = target.resolve(&snapshot.conversations) else {
                println!("{}", "no such conversation".bright_red());
                return Ok(());
            };
            session.delete_conversation(id.clone()).await?;
            println!("{}", format!("deleted conversation {id}").dimmed());
        }
        Command::History => print_history(session).await?,
        Command::Models => {
            let current = session.current_model().await?;
            for model in session.models().await?.iter() {
                let marker = if model.id == current.id { "●" } else { " " };
                println!(
                    "{marker} {:<20} {} {}",
                    model.id,
                    model.name.bright_white(),
                    format!("[{}] {}", model.badge, model.description).dimmed()
                );
            }
        }
        Command::Model(id) => match session.select_model(id).await {
            Ok(model) => {
                println!("{}", format!("now using {}", model.name).dimmed())
            }
            Err(Error::UnknownModel(err)) => {
                println!("{}", format!("{err} (see /models)").bright_red())
            }
            Err(err) => return Err(err),
        },
        Command::Suggest(_) => print_suggestions(),
        Command::Export => {
            let snapshot = session.snapshot().await?;
            let Some(id) = snapshot.active_id else {
                return Ok(());
            };
            let Some(conversation) = session.conversation(id).await? else {
                return Ok(());
            };
            match export::to_json(&conversation, &snapshot.model) {
                Ok(json) => println!("{json}"),
                Err(err) => error!("failed to export conversation: {err}"),
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Send(_) | Command::Quit => {}
    }
    Ok(())
}

/// Shows a spinner until no reply is in flight. Returns `false` if the
/// session went away in the meantime.
async fn wait_for_replies(
    event_rx: &mut mpsc::UnboundedReceiver<SessionEvent>,
    progress_style: &ProgressStyle,
) -> bool {
    let mut progress_bar = None;

    loop {
        // Create a new progress bar if it has been finished.
        progress_bar
            .get_or_insert_with(|| {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.set_style(progress_style.clone());
                progress_bar.set_message("🤔 Thinking...");
                progress_bar
            })
            .inc(1);

        let sleep = sleep(Duration::from_millis(100));
        let event = select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    return false;
                };
                event
            },
            _ = sleep => {
                continue;
            }
        };

        // Finish the progress bar before printing anything else.
        if let Some(progress_bar) = &progress_bar {
            progress_bar.finish_and_clear();
        }
        progress_bar = None;

        match event {
            SessionEvent::Reply(conversation, message) => {
                print_reply(&conversation, &message);
            }
            SessionEvent::Idle => return true,
        }
    }
}

async fn print_history(session: &Session) -> Result<(), Error> {
    let snapshot = session.snapshot().await?;
    if let Some(active) = snapshot
        .conversations
        .iter()
        .find(|c| snapshot.active_id.as_ref() == Some(&c.id))
    {
        println!("{}", format!("# {}", active.title).bright_white().bold());
    }
    for message in &snapshot.messages {
        print_message(message);
    }
    Ok(())
}

fn print_reply(conversation: &ConversationId, message: &Message) {
    debug!("reply {} in conversation {conversation}", message.id());
    print_message(message);
}

fn print_message(message: &Message) {
    let timestamp = message.timestamp();
    let time = timestamp.dimmed();
    match message.role() {
        Role::User => println!(
            "{}🧑 {} {time}",
            BAR_CHAR.bright_green(),
            message.content()
        ),
        Role::Assistant => println!(
            "{}🤖 {} {time}",
            BAR_CHAR.bright_cyan(),
            message.content().bright_white()
        ),
    }
}

fn print_suggestions() {
    println!("{}", "Try one of these (/suggest <n>):".dimmed());
    for (i, suggestion) in seed::SUGGESTIONS.iter().enumerate() {
        println!("  {} {suggestion}", format!("{}.", i + 1).dimmed());
    }
}

async fn read_line(input: &mut Input) -> Option<String> {
    match input.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

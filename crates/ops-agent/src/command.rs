//! Commands understood by the terminal front-end.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use ops_agent_core::{ConversationId, ConversationSummary};

/// Usage text printed by `/help`.
pub const HELP: &str = "\
Type a message and press enter to send it. Other commands:
  /new                   start a new conversation
  /list                  list conversations
  /open <id|#n>          switch to a conversation
  /rename <id|#n> <title> rename a conversation
  /delete <id|#n>        delete a conversation
  /history               show messages of the active conversation
  /models                list models
  /model <id>            select a model
  /suggest [n]           list suggested prompts, or send the n-th
  /export                print the active conversation as JSON
  /help                  show this help
  /quit                  leave
Start a line with // to send a message beginning with /.";

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send the text as a message.
    Send(String),
    /// Start a new conversation.
    New,
    /// List conversations.
    List,
    /// Switch to a conversation.
    Open(Target),
    /// Rename a conversation.
    Rename(Target, String),
    /// Delete a conversation.
    Delete(Target),
    /// Show the active conversation's messages.
    History,
    /// List models.
    Models,
    /// Select a model.
    Model(String),
    /// List suggested prompts, or send one (1-based).
    Suggest(Option<usize>),
    /// Print the active conversation as JSON.
    Export,
    /// Show usage.
    Help,
    /// Leave.
    Quit,
}

/// Refers to a conversation by id or by its 1-based position in the
/// list (`#2`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Position in the conversation list, starting at 1.
    Position(usize),
    /// Conversation id.
    Id(ConversationId),
}

impl Target {
    fn parse(arg: &str) -> Self {
        let position = arg
            .strip_prefix('#')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n > 0);
        match position {
            Some(n) => Target::Position(n),
            None => Target::Id(ConversationId::new(arg)),
        }
    }

    /// Finds the conversation this target refers to.
    pub fn resolve(
        &self,
        conversations: &[ConversationSummary],
    ) -> Option<ConversationId> {
        match self {
            Target::Position(n) => n
                .checked_sub(1)
                .and_then(|i| conversations.get(i))
                .map(|c| c.id.clone()),
            Target::Id(id) => conversations
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.id.clone()),
        }
    }
}

/// An input line that looks like a command but isn't a valid one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError(String);

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ParseError {}

/// Parses one input line.
///
/// Lines not starting with `/` are messages, sent as typed.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(rest) = line.strip_prefix("//") {
        return Ok(Command::Send(format!("/{rest}")));
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(line.to_owned()));
    };

    let rest = rest.trim();
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "new" => Command::New,
        "list" | "ls" => Command::List,
        "open" => Command::Open(Target::parse(required(name, args)?)),
        "rename" => {
            let args = required(name, args)?;
            let Some((target, title)) = args.split_once(char::is_whitespace)
            else {
                return Err(ParseError("usage: /rename <id|#n> <title>".to_owned()));
            };
            Command::Rename(Target::parse(target), title.trim().to_owned())
        }
        "delete" | "rm" => Command::Delete(Target::parse(required(name, args)?)),
        "history" => Command::History,
        "models" => Command::Models,
        "model" => Command::Model(required(name, args)?.to_owned()),
        "suggest" => {
            if args.is_empty() {
                Command::Suggest(None)
            } else {
                let n = args
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| {
                        ParseError(format!("not a suggestion number: {args}"))
                    })?;
                Command::Suggest(Some(n))
            }
        }
        "export" => Command::Export,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(ParseError(format!(
                "unknown command: /{name} (try /help)"
            )));
        }
    };
    Ok(command)
}

#[inline]
fn required<'a>(name: &str, args: &'a str) -> Result<&'a str, ParseError> {
    if args.is_empty() {
        return Err(ParseError(format!("/{name} needs an argument")));
    }
    Ok(args)
}

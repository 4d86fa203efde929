//! Turning an input line into a [`Command`].

/// Marker that starts the tag list of `new`.
const TAG_MARKER: &str = "+t";

/// A parsed REPL or one-shot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New { name: Option<String>, tags: Vec<String> },
    Edit(Option<String>),
    Delete(Option<String>),
    Peek(Option<String>),
    Tag { target: Option<String>, tags: Vec<String> },
    Untag { target: Option<String>, tags: Vec<String> },
    Search(String),
    List,
    Info(Option<String>),
    Tags,
    Config(Vec<String>),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses `action parameter(s)`. An empty line is [`Command::Help`].
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(action) = words.next() else {
            return Self::Help;
        };
        let params: Vec<String> = words.map(str::to_string).collect();
        let first = params.first().cloned();
        let rest = || params.iter().skip(1).cloned().collect::<Vec<_>>();

        match action.to_lowercase().as_str() {
            "new" | "create" | "n" | "c" => {
                let tags = params
                    .iter()
                    .position(|p| p == TAG_MARKER)
                    .map(|i| params[i + 1..].to_vec())
                    .unwrap_or_default();
                Self::New {
                    name: first.filter(|p| p != TAG_MARKER),
                    tags,
                }
            }
            "edit" | "open" | "e" | "o" => Self::Edit(first),
            "delete" | "d" | "rm" => Self::Delete(first),
            "peek" | "p" => Self::Peek(first),
            "tag" | "t" => Self::Tag { target: first, tags: rest() },
            "untag" | "ut" => Self::Untag { target: first, tags: rest() },
            "search" | "find" | "s" | "f" => Self::Search(params.join(" ")),
            "list" | "l" | "ls" => Self::List,
            "info" | "i" => Self::Info(first),
            "tags" => Self::Tags,
            "config" => Self::Config(params),
            "help" | "h" => Self::Help,
            "quit" | "exit" | "close" | "q" => Self::Quit,
            _ => Self::Unknown(action.to_string()),
        }
    }
}

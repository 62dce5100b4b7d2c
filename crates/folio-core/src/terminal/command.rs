use super::PromptIdentity;
use super::HOME_MARKER;

/// Static listing printed by `ls`.
pub const LS_OUTPUT: &str = "about.md  projects.json  skills.ts  experience.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandVerb {
    Ls,
    Pwd,
    Whoami,
    Date,
    Clear,
    Help,
    Echo,
    Cd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub verb: CommandVerb,
}

pub const COMMANDS: [CommandSpec; 8] = [
    CommandSpec {
        name: "ls",
        usage: "ls",
        verb: CommandVerb::Ls,
    },
    CommandSpec {
        name: "pwd",
        usage: "pwd",
        verb: CommandVerb::Pwd,
    },
    CommandSpec {
        name: "whoami",
        usage: "whoami",
        verb: CommandVerb::Whoami,
    },
    CommandSpec {
        name: "date",
        usage: "date",
        verb: CommandVerb::Date,
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        verb: CommandVerb::Clear,
    },
    CommandSpec {
        name: "help",
        usage: "help",
        verb: CommandVerb::Help,
    },
    CommandSpec {
        name: "echo",
        usage: "echo [text]",
        verb: CommandVerb::Echo,
    },
    CommandSpec {
        name: "cd",
        usage: "cd [dir]",
        verb: CommandVerb::Cd,
    },
];

/// Read-only view of the session a command runs against.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub cwd: &'a str,
    pub identity: &'a PromptIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    ClearHistory,
    ChangeDirectory(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub output: Option<String>,
    pub effect: Option<SessionEffect>,
}

impl CommandOutcome {
    fn output(text: impl Into<String>) -> Self {
        Self {
            output: Some(text.into()),
            effect: None,
        }
    }
}

pub fn help_text() -> String {
    let usages: Vec<&str> = COMMANDS.iter().map(|spec| spec.usage).collect();
    format!("Available commands: {}", usages.join(", "))
}

pub fn not_found_text(input: &str) -> String {
    format!("Command not found: {input}. Type 'help' for available commands.")
}

/// Splits a trimmed line into its verb and the argument tail.
///
/// The tail is everything after the verb and a single separating space, so
/// `echo  a` keeps the leading space of ` a`.
fn split_verb(line: &str) -> (&str, Option<&str>) {
    match line.split_once(' ') {
        Some((verb, rest)) => (verb, Some(rest)),
        None => (line, None),
    }
}

pub fn lookup(verb: &str) -> Option<CommandSpec> {
    COMMANDS
        .iter()
        .copied()
        .find(|spec| spec.name.eq_ignore_ascii_case(verb))
}

/// Runs one line against a session. Returns `None` for blank input.
pub fn execute(session: SessionView<'_>, raw: &str) -> Option<CommandOutcome> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, tail) = split_verb(line);
    let Some(spec) = lookup(verb) else {
        return Some(CommandOutcome::output(not_found_text(line)));
    };

    let outcome = match (spec.verb, tail) {
        (CommandVerb::Ls, None) => CommandOutcome::output(LS_OUTPUT),
        (CommandVerb::Pwd, None) => CommandOutcome::output(absolute_path(session)),
        (CommandVerb::Whoami, None) => CommandOutcome::output(session.identity.user.clone()),
        (CommandVerb::Date, None) => CommandOutcome::output(current_date()),
        (CommandVerb::Clear, None) => CommandOutcome {
            output: None,
            effect: Some(SessionEffect::ClearHistory),
        },
        (CommandVerb::Help, None) => CommandOutcome::output(help_text()),
        (CommandVerb::Echo, Some(text)) => CommandOutcome::output(text),
        (CommandVerb::Cd, Some(target)) => {
            let next = resolve_cd(session.cwd, target);
            CommandOutcome {
                output: Some(format!("Changed directory to {next}")),
                effect: Some(SessionEffect::ChangeDirectory(next)),
            }
        }
        // Argument-less `echo`/`cd` and argument-carrying fixed verbs are not
        // part of the command set.
        _ => CommandOutcome::output(not_found_text(line)),
    };
    Some(outcome)
}

pub fn absolute_path(session: SessionView<'_>) -> String {
    let root = session.identity.root();
    let cwd = session.cwd;
    if cwd == HOME_MARKER {
        return root;
    }
    let suffix = cwd.strip_prefix("~/").unwrap_or(cwd).trim_start_matches('/');
    if suffix.is_empty() {
        root
    } else {
        format!("{root}/{suffix}")
    }
}

pub fn resolve_cd(cwd: &str, target: &str) -> String {
    if target != ".." {
        return target.to_string();
    }
    if cwd == HOME_MARKER {
        return HOME_MARKER.to_string();
    }
    match cwd.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => HOME_MARKER.to_string(),
    }
}

fn current_date() -> String {
    chrono::Local::now()
        .format("%a %b %d %Y %H:%M:%S GMT%z")
        .to_string()
}

//! Line input for the finance shell: a rustyline editor with history and completion when
//! attached to a terminal user, or plain stdin lines in script mode.

use std::{
    borrow::Cow,
    io::{self, Lines, StdinLock},
    path::PathBuf,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::{debug, warn};

use crate::cli::context::{CliMode, LoopControl, ShellContext};
use crate::cli::error::{CliError, CommandError};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandRegistry;
use crate::domain::ExpenseCategory;

/// Set to run commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "EXPENSE_CORE_CLI_SCRIPT";
const HISTORY_FILE: &str = "history.txt";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;
    let mut source = match mode {
        CliMode::Interactive => LineSource::editor(&context)?,
        CliMode::Script => LineSource::Script(io::stdin().lines()),
    };

    loop {
        match source.read(&context.prompt())? {
            Input::Line(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                source.remember(line);
                match handle_line(&mut context, line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => break,
        }
    }

    source.close();
    Ok(())
}

enum Input {
    Line(String),
    Interrupted,
    Closed,
}

enum LineSource {
    Editor {
        editor: Box<Editor<CommandHelper, DefaultHistory>>,
        history: PathBuf,
    },
    Script(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn editor(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::from_registry(&context.registry)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        let history = context.app_dir.join(HISTORY_FILE);
        if editor.load_history(&history).is_err() {
            debug!(path = %history.display(), "no shell history yet");
        }
        cli_io::print_info("Type `help` to see available commands.");
        Ok(LineSource::Editor {
            editor: Box::new(editor),
            history,
        })
    }

    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self {
            LineSource::Editor { editor, .. } => match editor.readline(prompt) {
                Ok(line) => Ok(Input::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                Err(ReadlineError::Eof) => {
                    cli_io::print_info("Exiting shell.");
                    Ok(Input::Closed)
                }
                Err(err) => Err(err.into()),
            },
            LineSource::Script(lines) => match lines.next() {
                Some(line) => Ok(Input::Line(line?)),
                None => Ok(Input::Closed),
            },
        }
    }

    fn remember(&mut self, line: &str) {
        if let LineSource::Editor { editor, .. } = self {
            editor.add_history_entry(line).ok();
        }
    }

    fn close(self) {
        if let LineSource::Editor {
            mut editor,
            history,
        } = self
        {
            if let Err(err) = editor.save_history(&history) {
                warn!(error = %err, "failed to save shell history");
            }
        }
    }
}

pub(crate) fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(message) => {
            cli_io::print_warning(message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Splits a line the way a POSIX shell would, so descriptions can be quoted.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, String> {
    shell_words::split(input).map_err(|err| format!("could not parse input: {err}"))
}

struct CompletionTarget {
    name: &'static str,
    subcommands: &'static [&'static str],
    category_args: bool,
}

/// Completes command names, then subcommands, then expense category labels.
struct CommandHelper {
    targets: Vec<CompletionTarget>,
}

impl CommandHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut targets: Vec<CompletionTarget> = registry
            .entries()
            .map(|entry| CompletionTarget {
                name: entry.name,
                subcommands: entry.subcommands,
                category_args: entry.category_args,
            })
            .collect();
        targets.sort_by_key(|target| target.name);
        Self { targets }
    }

    /// Byte offset of the word being completed and the words that may replace it.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let word = prefix[start..].to_ascii_lowercase();
        let before: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();

        let pool: Vec<&str> = match before.as_slice() {
            [] => self.targets.iter().map(|target| target.name).collect(),
            [command] if command == "help" => {
                self.targets.iter().map(|target| target.name).collect()
            }
            [command, rest @ ..] => match self.target(command) {
                Some(target) if rest.is_empty() && !target.subcommands.is_empty() => {
                    target.subcommands.to_vec()
                }
                Some(target) if target.category_args && !starts_numeric(&word) => {
                    ExpenseCategory::ALL
                        .iter()
                        .map(|category| category.label())
                        .collect()
                }
                _ => Vec::new(),
            },
        };

        let matches = pool
            .into_iter()
            .map(str::to_ascii_lowercase)
            .filter(|candidate| candidate.starts_with(&word))
            .collect();
        (start, matches)
    }

    fn target(&self, name: &str) -> Option<&CompletionTarget> {
        self.targets.iter().find(|target| target.name == name)
    }
}

fn starts_numeric(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

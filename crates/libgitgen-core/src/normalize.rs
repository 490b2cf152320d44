//! Event log -> canonical command sequence
//!
//! Normalization is a pure left fold over the log. The only state is the
//! commit counter, which lives in the fold accumulator and is scoped to a
//! single call.

use crate::config::{AuthorDefaults, GitConf};
use crate::error::EventLogError;
use crate::types::command::{
    Command, CommitInfo, Pathspec, TagCommand, DEFAULT_AUTHOR, DEFAULT_BRANCH, DEFAULT_EMAIL,
};
use crate::types::event::{
    parse_shorthand, AddFields, AppendFields, Event, EventKind, EventObject, FileFields,
    InitFields, MergeFields, PartialCommitInfo, TagFields,
};

/// Compile an event log into canonical commands.
///
/// Stops at the first invalid event and returns its 1-based line.
pub fn normalize(conf: &GitConf) -> Result<Vec<Command>, EventLogError> {
    let defaults = Defaults::from(conf.conf.as_ref());
    let folded = conf
        .log
        .iter()
        .enumerate()
        .try_fold(Fold::default(), |acc, (i, event)| {
            acc.step(&defaults, i + 1, event)
        })?;
    Ok(folded.commands)
}

/// Authorship fallbacks resolved once per call
struct Defaults<'a> {
    author: &'a str,
    email: &'a str,
}

impl<'a> From<Option<&'a AuthorDefaults>> for Defaults<'a> {
    fn from(conf: Option<&'a AuthorDefaults>) -> Self {
        Self {
            author: conf
                .and_then(|c| c.author.as_deref())
                .unwrap_or(DEFAULT_AUTHOR),
            email: conf
                .and_then(|c| c.email.as_deref())
                .unwrap_or(DEFAULT_EMAIL),
        }
    }
}

impl Defaults<'_> {
    fn commit_info(&self, message: String, author: Option<&str>, email: Option<&str>) -> CommitInfo {
        CommitInfo {
            message,
            author: author.unwrap_or(self.author).to_string(),
            email: email.unwrap_or(self.email).to_string(),
        }
    }
}

/// Fold accumulator
#[derive(Default)]
struct Fold {
    commit_counter: u32,
    commands: Vec<Command>,
}

impl Fold {
    fn step(mut self, defaults: &Defaults<'_>, line: usize, event: &Event) -> Result<Self, EventLogError> {
        let command = match event {
            Event::Shorthand(s) => self.shorthand(defaults, line, s)?,
            Event::Object(obj) => self.object(defaults, line, obj)?,
            Event::Unrecognized(value) => {
                return Err(match EventObject::rejection(value) {
                    Some((kind, reason)) => kind_error(line, kind, &reason),
                    None => EventLogError::new(line, format!("unrecognized event {}", value)),
                });
            }
        };
        if command.creates_commit() {
            self.commit_counter += 1;
        }
        self.commands.push(command);
        Ok(self)
    }

    fn next_commit_message(&self) -> String {
        format!("commit {}", self.commit_counter + 1)
    }

    fn shorthand(&self, defaults: &Defaults<'_>, line: usize, raw: &str) -> Result<Command, EventLogError> {
        let ev = parse_shorthand(raw).ok_or_else(|| {
            EventLogError::new(line, format!("unrecognized event \"{}\"", raw.trim()))
        })?;
        let arg = ev.arg;

        let command = match ev.kind {
            EventKind::Init => {
                no_argument(line, ev.kind, arg)?;
                Command::Init {
                    default_branch: DEFAULT_BRANCH.to_string(),
                }
            }
            EventKind::Commit => {
                no_argument(line, ev.kind, arg)?;
                Command::Commit(defaults.commit_info(self.next_commit_message(), None, None))
            }
            EventKind::Add => {
                no_argument(line, ev.kind, arg)?;
                Command::Add(Pathspec::All)
            }
            EventKind::Branch => Command::Branch {
                name: required(line, ev.kind, "missing branch name", Some(arg))?,
            },
            EventKind::Checkout => Command::Checkout {
                reference: required(line, ev.kind, "missing ref", Some(arg))?,
            },
            EventKind::Merge => {
                let theirs = required(line, ev.kind, "missing branch", Some(arg))?;
                let info = defaults.commit_info(format!("merge branch {}", theirs), None, None);
                Command::Merge { theirs, info }
            }
            EventKind::Tag => Command::Tag(TagCommand {
                name: required(line, ev.kind, "missing tag name", Some(arg))?,
                annotation: None,
            }),
            EventKind::CreateFile => {
                let file = required(line, ev.kind, "missing file name", Some(arg))?;
                Command::CreateFile {
                    content: file.clone(),
                    file,
                }
            }
            EventKind::ChangeContent | EventKind::AppendContent => {
                // Object-only kinds never come out of parse_shorthand
                return Err(EventLogError::new(
                    line,
                    format!("\"{}\": object form required", ev.kind.keyword()),
                ));
            }
        };
        Ok(command)
    }

    fn object(&self, defaults: &Defaults<'_>, line: usize, obj: &EventObject) -> Result<Command, EventLogError> {
        let kind = obj.kind();
        let command = match obj {
            EventObject::Init(InitFields { default_branch }) => {
                let default_branch = match default_branch {
                    None => DEFAULT_BRANCH.to_string(),
                    Some(_) => required(line, kind, "missing default branch", default_branch.as_deref())?,
                };
                Command::Init { default_branch }
            }
            EventObject::Commit(PartialCommitInfo { message, author, email }) => {
                let message = message.clone().unwrap_or_else(|| self.next_commit_message());
                Command::Commit(defaults.commit_info(message, author.as_deref(), email.as_deref()))
            }
            EventObject::Merge(MergeFields { theirs, message, author, email }) => {
                let theirs = required(line, kind, "missing branch", theirs.as_deref())?;
                let message = message
                    .clone()
                    .unwrap_or_else(|| format!("merge branch {}", theirs));
                let info = defaults.commit_info(message, author.as_deref(), email.as_deref());
                Command::Merge { theirs, info }
            }
            EventObject::Tag(TagFields { name, annotated, message, author, email }) => {
                let name = required(line, kind, "missing tag name", name.as_deref())?;
                let annotation = annotated.then(|| {
                    let message = message
                        .clone()
                        .unwrap_or_else(|| format!("create tag {}", name));
                    defaults.commit_info(message, author.as_deref(), email.as_deref())
                });
                Command::Tag(TagCommand { name, annotation })
            }
            EventObject::CreateFile(FileFields { file, content }) => {
                let file = required(line, kind, "missing file name", file.as_deref())?;
                Command::CreateFile {
                    content: content.clone().unwrap_or_else(|| file.clone()),
                    file,
                }
            }
            EventObject::ChangeContent(FileFields { file, content }) => Command::ChangeContent {
                file: required(line, kind, "missing file name", file.as_deref())?,
                content: content
                    .clone()
                    .ok_or_else(|| kind_error(line, kind, "missing content"))?,
            },
            EventObject::Add(AddFields { file, all }) => match (file, all) {
                (_, true) => Command::Add(Pathspec::All),
                (file, false) => Command::Add(Pathspec::File(required(
                    line,
                    kind,
                    "missing file name",
                    file.as_deref(),
                )?)),
            },
            EventObject::AppendContent(AppendFields { file, content, new_line }) => {
                Command::AppendContent {
                    file: required(line, kind, "missing file name", file.as_deref())?,
                    content: content
                        .clone()
                        .ok_or_else(|| kind_error(line, kind, "missing content"))?,
                    new_line: *new_line,
                }
            }
        };
        Ok(command)
    }
}

fn kind_error(line: usize, kind: EventKind, reason: &str) -> EventLogError {
    EventLogError::new(line, format!("\"{}\": {}", kind.keyword(), reason))
}

/// A required argument; absent or blank is an error
fn required(line: usize, kind: EventKind, reason: &str, value: Option<&str>) -> Result<String, EventLogError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(kind_error(line, kind, reason)),
    }
}

fn no_argument(line: usize, kind: EventKind, arg: &str) -> Result<(), EventLogError> {
    if arg.is_empty() {
        Ok(())
    } else {
        Err(kind_error(line, kind, &format!("unexpected argument \"{}\"", arg)))
    }
}

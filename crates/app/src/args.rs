use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use course_core::model::{CourseId, LearnerId, LessonId, ParseIdError, QuizId};

pub const DEFAULT_DB_URL: &str = "sqlite://knowledgeflow.sqlite3";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
    InvalidOption { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid id: {raw:?}"),
            ArgsError::InvalidOption { raw } => write!(f, "option must be a number: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login(LearnerId),
    Logout,
    Whoami,
    Courses {
        category: Option<String>,
        search: Option<String>,
    },
    Enroll(CourseId),
    Enrolled,
    Show(CourseId),
    Lesson {
        course: CourseId,
        lesson: LessonId,
    },
    LessonsDone(CourseId),
    Answer {
        course: CourseId,
        quiz: QuizId,
        option: usize,
    },
    Submit {
        course: CourseId,
        quiz: QuizId,
    },
    SubmitAll(CourseId),
    Complete(CourseId),
    Next {
        course: CourseId,
        from: Option<LessonId>,
    },
}

#[derive(Debug, Default)]
struct Flags {
    category: Option<String>,
    search: Option<String>,
    from: Option<LessonId>,
}

#[derive(Debug)]
pub struct Args {
    pub db_url: String,
    pub api_url: Option<String>,
    pub command: Command,
}

impl Args {
    /// Parse process arguments, with `KNOWLEDGEFLOW_DB_URL` as the database default.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        Self::parse_with(argv, std::env::var("KNOWLEDGEFLOW_DB_URL").ok())
    }

    fn parse_with(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| normalize_sqlite_url(DEFAULT_DB_URL), |v| normalize_sqlite_url(&v));
        let mut api_url = None;
        let mut flags = Flags::default();
        let mut words = VecDeque::new();
        let mut help = false;

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(&value);
                }
                "--api" => api_url = Some(require_value(&mut args, "--api")?),
                "--category" => flags.category = Some(require_value(&mut args, "--category")?),
                "--search" => flags.search = Some(require_value(&mut args, "--search")?),
                "--from" => flags.from = Some(parse_id(require_value(&mut args, "--from")?)?),
                "--help" | "-h" => help = true,
                other if other.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => words.push_back(arg),
            }
        }

        let command = if help {
            Command::Help
        } else {
            Command::from_words(words, flags)?
        };

        Ok(Self {
            db_url,
            api_url,
            command,
        })
    }
}

impl Command {
    fn from_words(mut words: VecDeque<String>, flags: Flags) -> Result<Self, ArgsError> {
        let Some(name) = words.pop_front() else {
            return Ok(Self::Help);
        };

        let command = match name.as_str() {
            "help" => Self::Help,
            "login" => Self::Login(next_id(&mut words, "username")?),
            "logout" => Self::Logout,
            "whoami" => Self::Whoami,
            "courses" => Self::Courses {
                category: flags.category,
                search: flags.search,
            },
            "enroll" => Self::Enroll(next_id(&mut words, "course")?),
            "enrolled" => Self::Enrolled,
            "show" => Self::Show(next_id(&mut words, "course")?),
            "lesson" => Self::Lesson {
                course: next_id(&mut words, "course")?,
                lesson: next_id(&mut words, "lesson")?,
            },
            "lessons-done" => Self::LessonsDone(next_id(&mut words, "course")?),
            "answer" => Self::Answer {
                course: next_id(&mut words, "course")?,
                quiz: next_id(&mut words, "quiz")?,
                option: next_option(&mut words)?,
            },
            "submit" => Self::Submit {
                course: next_id(&mut words, "course")?,
                quiz: next_id(&mut words, "quiz")?,
            },
            "submit-all" => Self::SubmitAll(next_id(&mut words, "course")?),
            "complete" => Self::Complete(next_id(&mut words, "course")?),
            "next" => Self::Next {
                course: next_id(&mut words, "course")?,
                from: flags.from,
            },
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        if let Some(extra) = words.pop_front() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(command)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_id<T: FromStr<Err = ParseIdError>>(raw: String) -> Result<T, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidId { raw: raw.clone() })
}

fn next_id<T: FromStr<Err = ParseIdError>>(
    words: &mut VecDeque<String>,
    name: &'static str,
) -> Result<T, ArgsError> {
    let raw = words
        .pop_front()
        .ok_or(ArgsError::MissingArgument { name })?;
    parse_id(raw)
}

fn next_option(words: &mut VecDeque<String>) -> Result<usize, ArgsError> {
    let raw = words
        .pop_front()
        .ok_or(ArgsError::MissingArgument { name: "option" })?;
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidOption { raw: raw.clone() })
}

/// Turn a path or `sqlite:` URL into an absolute `sqlite://` URL that creates
/// the file on first use.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw == "sqlite::memory:" || raw.contains("mode=memory") {
        return raw.to_owned();
    }

    let url = if raw.starts_with("sqlite://") {
        raw.to_owned()
    } else {
        let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw);
        let path = std::path::Path::new(path_str);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join(path)
        };
        format!("sqlite://{}", absolute.display())
    };

    if url.contains('?') {
        url
    } else {
        format!("{url}?mode=rwc")
    }
}

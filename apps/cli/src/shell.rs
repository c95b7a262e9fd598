//! Line-oriented study shell.
//!
//! One input line is one command. Parsing is separate from execution so the
//! grammar can be tested without a database.

use crate::commands::{self, CommandError};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use study_core::{Card, Grade, GradeOutcome};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  add <front> | <back>          add a card (due immediately)
  edit <id> <front> | <back>    replace card text (leave a side empty to keep it)
  rm <id>                       remove a card (id or unique prefix)
  list                          list all cards
  due                           list cards due now
  study                         start a new session
  show                          show the current card
  flip                          reveal the back of the current card
  grade <1-4>                   grade the current card (or again|hard|good|easy)
  stats                         session and lifetime statistics
  note <title> | <body>         suggest a category and tags for a note
  export                        print the deck as JSON
  help                          this text
  quit                          leave";

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid grade '{0}' (expected 1-4 or again|hard|good|easy)")]
    InvalidGrade(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add { front: String, back: String },
    Edit { id: String, front: Option<String>, back: Option<String> },
    Remove { id: String },
    List,
    Due,
    Study,
    Show,
    Flip,
    Grade(u8),
    Stats,
    Note { title: String, body: String },
    Export,
    Help,
    Quit,
}

/// What the loop should do after a command ran.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "add" => {
            let (front, back) = split_sides(rest).ok_or(ParseError::Usage("add <front> | <back>"))?;
            ShellCommand::Add {
                front: front.to_string(),
                back: back.to_string(),
            }
        }
        "edit" => {
            const USAGE: &str = "edit <id> <front> | <back>";
            let (id, text) = rest.split_once(char::is_whitespace).ok_or(ParseError::Usage(USAGE))?;
            let (front, back) = split_sides(text).ok_or(ParseError::Usage(USAGE))?;
            let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
            if front.is_empty() && back.is_empty() {
                return Err(ParseError::Usage(USAGE));
            }
            ShellCommand::Edit {
                id: id.to_string(),
                front: non_empty(front),
                back: non_empty(back),
            }
        }
        "rm" | "remove" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("rm <id>"));
            }
            ShellCommand::Remove { id: rest.to_string() }
        }
        "list" | "ls" => ShellCommand::List,
        "due" => ShellCommand::Due,
        "study" => ShellCommand::Study,
        "show" => ShellCommand::Show,
        "flip" => ShellCommand::Flip,
        "grade" => ShellCommand::Grade(parse_grade(rest)?),
        "again" | "hard" | "good" | "easy" => ShellCommand::Grade(parse_grade(word)?),
        "stats" => ShellCommand::Stats,
        "note" => {
            let (title, body) = match split_sides(rest) {
                Some((title, body)) => (title, body),
                None if !rest.is_empty() => (rest, ""),
                None => return Err(ParseError::Usage("note <title> | <body>")),
            };
            ShellCommand::Note {
                title: title.to_string(),
                body: body.to_string(),
            }
        }
        "export" => ShellCommand::Export,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn split_sides(text: &str) -> Option<(&str, &str)> {
    text.split_once('|').map(|(a, b)| (a.trim(), b.trim()))
}

/// Grades are validated again by the scheduler; only the syntax is checked
/// here so out-of-range numbers reach the core's range check.
fn parse_grade(text: &str) -> Result<u8, ParseError> {
    let text = text.trim().to_lowercase();
    if let Ok(value) = text.parse::<u8>() {
        return Ok(value);
    }
    Grade::ALL
        .iter()
        .find(|grade| grade.as_str() == text)
        .map(|grade| grade.to_value())
        .ok_or(ParseError::InvalidGrade(text))
}

/// Interactive state that only matters for display.
#[derive(Debug, Default)]
pub struct Shell {
    revealed: bool,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one command against the application state.
    pub fn execute(
        &mut self,
        state: &mut AppState,
        command: ShellCommand,
        now: DateTime<Utc>,
    ) -> Result<Flow, CommandError> {
        let output = match command {
            ShellCommand::Add { front, back } => {
                let card = commands::add_card(state, &front, &back, now)?;
                format!("added {} ({})", short_id(&card), card.front)
            }
            ShellCommand::Edit { id, front, back } => {
                let card = commands::edit_card(state, &id, front.as_deref(), back.as_deref())?;
                format!("updated {}: {} | {}", short_id(&card), card.front, card.back)
            }
            ShellCommand::Remove { id } => {
                let card = commands::remove_card(state, &id, now)?;
                self.revealed = false;
                format!("removed {} ({})", short_id(&card), card.front)
            }
            ShellCommand::List => render_cards(&commands::list_cards(state), now, "no cards yet"),
            ShellCommand::Due => {
                render_cards(&commands::get_due_cards(state, now), now, "nothing is due")
            }
            ShellCommand::Study => {
                self.revealed = false;
                let current = commands::start_study(state, now);
                let due = state.deck.due_cards(now).len();
                match current {
                    Some(card) => format!("session started, {due} due\n{}", render_front(&card)),
                    None => format!("session started, {due} due"),
                }
            }
            ShellCommand::Show => match commands::get_current_card(state, now) {
                Some(card) if self.revealed => render_back(state, &card, now),
                Some(card) => render_front(&card),
                None => "no cards to study".to_string(),
            },
            ShellCommand::Flip => match commands::get_current_card(state, now) {
                Some(card) => {
                    self.revealed = true;
                    render_back(state, &card, now)
                }
                None => "no cards to study".to_string(),
            },
            ShellCommand::Grade(value) => {
                let outcome = commands::grade_current_card(state, value, now)?;
                self.revealed = false;
                render_outcome(&outcome, now)
            }
            ShellCommand::Stats => render_stats(&commands::get_study_stats(state, now)),
            ShellCommand::Note { title, body } => {
                let note = commands::classify_note(&title, &body, &[]);
                let tags = if note.tags.is_empty() {
                    "-".to_string()
                } else {
                    note.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" ")
                };
                format!("category: {}\ntags: {tags}", note.category.as_str())
            }
            ShellCommand::Export => commands::export_deck(state)?,
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(output))
    }
}

fn short_id(card: &Card) -> String {
    card.id.to_string()[..8].to_string()
}

fn render_due(card: &Card, now: DateTime<Utc>) -> String {
    match card.next_review {
        Some(at) if at > now => format!("due {}", at.format("%Y-%m-%d")),
        _ => "due now".to_string(),
    }
}

fn render_cards(cards: &[Card], now: DateTime<Utc>, empty: &str) -> String {
    if cards.is_empty() {
        return empty.to_string();
    }
    cards
        .iter()
        .map(|card| {
            format!(
                "{}  {} | {}  [ease {:.1}, {}d, {} reviews, {}%, {}]",
                short_id(card),
                card.front,
                card.back,
                card.ease,
                card.interval,
                card.total_reviews,
                card.accuracy(),
                render_due(card, now),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_front(card: &Card) -> String {
    format!("Q: {}", card.front)
}

fn render_back(state: &AppState, card: &Card, now: DateTime<Utc>) -> String {
    let previews = commands::preview_grades(state, now)
        .iter()
        .map(|p| format!("{}={} ({}d)", p.value, p.grade, p.interval_days))
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "Q: {}\nA: {}\nease {:.1} | interval {}d | reviews {}\n{}",
        card.front, card.back, card.ease, card.interval, card.total_reviews, previews
    )
}

fn render_outcome(outcome: &GradeOutcome, now: DateTime<Utc>) -> String {
    let card = &outcome.updated_card;
    let mut out = format!(
        "next review in {}d ({}) | session {}/{} | streak {}",
        card.interval,
        render_due(card, now),
        outcome.session.correct,
        outcome.session.studied,
        outcome.lifetime.streak,
    );
    if let Some(next) = &outcome.next_card {
        out.push('\n');
        out.push_str(&render_front(next));
    }
    out
}

fn render_stats(stats: &commands::StudyStats) -> String {
    let s = &stats.summary;
    format!(
        "cards {} | due {}\n\
         session: {} studied, {} correct, {}% accuracy, {} min\n\
         lifetime: {} reviews, {} correct, {}% accuracy, streak {} (best {})",
        s.total_cards,
        s.due_cards,
        stats.session.studied,
        stats.session.correct,
        s.session_accuracy,
        stats.session_minutes,
        stats.lifetime.cards_studied,
        stats.lifetime.correct_answers,
        s.overall_accuracy,
        s.streak,
        s.longest_streak,
    )
}

use std::fmt::{self, Display};

use log::{debug, warn};

use crate::contract::SearchHandoff;
use crate::model::{BlogItem, QnaItem, SearchResultPayload, VideoItem};
use crate::navigation::Route;
use crate::query::submittable_term;
use crate::ticket::{SearchTicket, TicketIssuer};

pub const FALLBACK_TERMS_SHOWN: usize = 6;
pub const AWAITING_ANSWER_TEXT: &str = "Waiting for answer from our scholars...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsState {
    /// No search has been issued for this view.
    Prompt,
    Loading { term: String },
    Loaded { term: String, payload: SearchResultPayload },
    Failed { term: String, message: String },
}

#[derive(Debug)]
pub struct ResultsView {
    state: ResultsState,
    popular_terms: Vec<String>,
    tickets: TicketIssuer,
}

impl ResultsView {
    /// Builds the view from whatever the router handed over. A present
    /// payload is treated as already fetched.
    pub fn from_navigation(handoff: Option<SearchHandoff>, popular_terms: Vec<String>) -> Self {
        let state = match handoff {
            Some(handoff) => ResultsState::Loaded {
                term: handoff.search_term,
                payload: handoff.search_data,
            },
            None => ResultsState::Prompt,
        };

        Self {
            state,
            popular_terms,
            tickets: TicketIssuer::default(),
        }
    }

    pub fn state(&self) -> &ResultsState {
        &self.state
    }

    pub fn term(&self) -> Option<&str> {
        match &self.state {
            ResultsState::Prompt => None,
            ResultsState::Loading { term }
            | ResultsState::Loaded { term, .. }
            | ResultsState::Failed { term, .. } => Some(term),
        }
    }

    /// Starts a fresh search from inside the view. Blank terms leave the
    /// view untouched.
    pub fn reenter(&mut self, term: &str) -> Option<SearchTicket> {
        let term = submittable_term(term)?;
        let ticket = self.tickets.issue(term);
        debug!("results view re-entry #{} for '{term}'", ticket.id());
        self.state = ResultsState::Loading {
            term: term.to_string(),
        };
        Some(ticket)
    }

    /// Applies a search outcome. Returns `false` for superseded tickets.
    pub fn resolve<E: Display>(
        &mut self,
        ticket: SearchTicket,
        result: Result<SearchResultPayload, E>,
    ) -> bool {
        if !self.tickets.is_current(&ticket) {
            return false;
        }
        self.tickets.invalidate();

        let term = ticket.term().to_string();
        self.state = match result {
            Ok(payload) => ResultsState::Loaded { term, payload },
            Err(error) => {
                warn!("results view search for '{term}' failed: {error}");
                ResultsState::Failed {
                    term,
                    message: format!("Search failed: {error}"),
                }
            }
        };
        true
    }

    pub fn render(&self) -> ResultsPage {
        match &self.state {
            ResultsState::Prompt => ResultsPage::Prompt,
            ResultsState::Loading { term } => ResultsPage::Loading { term: term.clone() },
            ResultsState::Failed { term, message } => ResultsPage::Failed {
                term: term.clone(),
                message: message.clone(),
            },
            ResultsState::Loaded { term, payload } if payload.is_empty() => ResultsPage::Empty {
                term: term.clone(),
                fallback_terms: self
                    .popular_terms
                    .iter()
                    .take(FALLBACK_TERMS_SHOWN)
                    .cloned()
                    .collect(),
                actions: vec![
                    Link::new("Contact Our Scholars", Route::Contact),
                    Link::new("Ask a Question", Route::Questions),
                ],
            },
            ResultsState::Loaded { term, payload } => ResultsPage::Results {
                term: term.clone(),
                total_results: payload.total_results,
                sections: sections(payload),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    pub fn new(label: &str, route: Route) -> Self {
        Self {
            label: label.to_string(),
            href: route.path(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Blogs,
    Videos,
    Qna,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Blogs => "Islamic Content",
            Self::Videos => "Islamic Videos",
            Self::Qna => "Q&A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerState {
    Answered(String),
    Awaiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Blog {
        title: String,
        href: String,
        excerpt: Option<String>,
    },
    Video {
        title: String,
        href: String,
        description: Option<String>,
        thumbnail: Option<String>,
    },
    Question {
        question: String,
        answer: AnswerState,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn title(&self) -> String {
        format!("{} ({})", self.kind.label(), self.entries.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsPage {
    Prompt,
    Loading {
        term: String,
    },
    Failed {
        term: String,
        message: String,
    },
    Empty {
        term: String,
        fallback_terms: Vec<String>,
        actions: Vec<Link>,
    },
    Results {
        term: String,
        total_results: u64,
        sections: Vec<Section>,
    },
}

fn sections(payload: &SearchResultPayload) -> Vec<Section> {
    let results = &payload.results;
    let mut sections = Vec::with_capacity(3);

    if !results.blogs.is_empty() {
        sections.push(Section {
            kind: SectionKind::Blogs,
            entries: results.blogs.iter().map(blog_entry).collect(),
        });
    }
    if !results.videos.is_empty() {
        sections.push(Section {
            kind: SectionKind::Videos,
            entries: results.videos.iter().map(video_entry).collect(),
        });
    }
    if !results.qna.is_empty() {
        sections.push(Section {
            kind: SectionKind::Qna,
            entries: results.qna.iter().map(question_entry).collect(),
        });
    }

    sections
}

fn blog_entry(blog: &BlogItem) -> Entry {
    Entry::Blog {
        title: blog.title.clone(),
        href: blog.path(),
        excerpt: blog.excerpt(),
    }
}

fn video_entry(video: &VideoItem) -> Entry {
    Entry::Video {
        title: video.title.clone(),
        href: video.path(),
        description: video.description.clone().filter(|d| !d.trim().is_empty()),
        thumbnail: video.thumbnail.clone().filter(|t| !t.trim().is_empty()),
    }
}

fn question_entry(item: &QnaItem) -> Entry {
    Entry::Question {
        question: item.question.clone(),
        answer: match item.answer() {
            Some(answer) => AnswerState::Answered(answer.to_string()),
            None => AnswerState::Awaiting,
        },
    }
}

fn result_count(total: u64) -> String {
    if total == 1 {
        "Found 1 result".to_string()
    } else {
        format!("Found {total} results")
    }
}

impl Display for ResultsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt => {
                writeln!(f, "Search Islamic Content")?;
                writeln!(
                    f,
                    "Use the search bar to find answers to your questions about Islam, browse educational content, and discover valuable resources."
                )?;
                writeln!(f, "Back to Home: {}", Route::Home.path())
            }
            Self::Loading { term } => writeln!(f, "Searching for \"{term}\"..."),
            Self::Failed { term, message } => {
                writeln!(f, "Search Results for \"{term}\"")?;
                writeln!(f, "{message}")?;
                writeln!(f, "Submit the search again to retry.")
            }
            Self::Empty {
                term,
                fallback_terms,
                actions,
            } => {
                writeln!(f, "Search Results for \"{term}\"")?;
                writeln!(f, "{}", result_count(0))?;
                writeln!(f)?;
                writeln!(f, "Nothing found with your query")?;
                writeln!(
                    f,
                    "We couldn't find any content matching \"{term}\". Try different keywords or ask our scholars directly."
                )?;
                for action in actions {
                    writeln!(f, "  {} -> {}", action.label, action.href)?;
                }
                writeln!(f, "Try these popular searches: {}", fallback_terms.join(", "))?;
                writeln!(f, "Back to Home: {}", Route::Home.path())
            }
            Self::Results {
                term,
                total_results,
                sections,
            } => {
                writeln!(f, "Search Results for \"{term}\"")?;
                writeln!(f, "{}", result_count(*total_results))?;
                for section in sections {
                    writeln!(f)?;
                    writeln!(f, "{}", section.title())?;
                    for entry in &section.entries {
                        write_entry(f, entry)?;
                    }
                }
                writeln!(f)?;
                writeln!(f, "Back to Home: {}", Route::Home.path())
            }
        }
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &Entry) -> fmt::Result {
    match entry {
        Entry::Blog {
            title,
            href,
            excerpt,
        } => {
            writeln!(f, "  - {title} [{href}]")?;
            if let Some(excerpt) = excerpt {
                writeln!(f, "    {excerpt}")?;
            }
            Ok(())
        }
        Entry::Video {
            title,
            href,
            description,
            thumbnail,
        } => {
            writeln!(f, "  - {title} [{href}]")?;
            if let Some(description) = description {
                writeln!(f, "    {description}")?;
            }
            if let Some(thumbnail) = thumbnail {
                writeln!(f, "    thumbnail: {thumbnail}")?;
            }
            Ok(())
        }
        Entry::Question { question, answer } => {
            writeln!(f, "  Q: {question}")?;
            match answer {
                AnswerState::Answered(answer) => writeln!(f, "  A: {answer}"),
                AnswerState::Awaiting => writeln!(f, "  {AWAITING_ANSWER_TEXT}"),
            }
        }
    }
}

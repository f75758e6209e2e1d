use std::io::{self, BufRead, Write};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::domain::ticket::{Priority, TicketDraft, TicketRecord};
use crate::error::AppResult;
use crate::services::{DraftSurface, ErrorScope, ViewRenderer};

pub const BUSY_MESSAGE: &str = "Processing your ticket with AI...";
pub const EMPTY_HISTORY_MESSAGE: &str = "No tickets found. Submit your first ticket!";

const RESPONSE_TITLE: &str = "AI Assistant Response";
const HISTORY_TITLE: &str = "Ticket History";

/// Renders each UI region as a titled block on a text sink.
pub struct TerminalView<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sink(&self) -> MutexGuard<'_, W> {
        self.out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_region(&self, title: &str, body: &str) {
        let mut out = self.sink();
        if let Err(err) = write_block(&mut *out, title, body) {
            warn!(error = %err, region = title, "failed to render region");
        }
    }
}

fn write_block<W: Write>(out: &mut W, title: &str, body: &str) -> io::Result<()> {
    writeln!(out, "== {title} ==")?;
    writeln!(out, "{body}")?;
    writeln!(out)?;
    out.flush()
}

impl<W: Write + Send> ViewRenderer for TerminalView<W> {
    fn render_busy(&self, active: bool) {
        debug!(active, "busy state changed");
        if active {
            self.write_region(RESPONSE_TITLE, BUSY_MESSAGE);
        }
    }

    fn render_ai_response(&self, text: &str) {
        self.write_region(RESPONSE_TITLE, text);
    }

    fn render_history(&self, records: &[TicketRecord]) {
        if records.is_empty() {
            self.write_region(HISTORY_TITLE, EMPTY_HISTORY_MESSAGE);
            return;
        }

        let body = records
            .iter()
            .map(|record| {
                format!(
                    "- {} [{}]\n  {}",
                    record.subject, record.priority, record.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.write_region(HISTORY_TITLE, &body);
    }

    fn render_error(&self, scope: ErrorScope, message: &str) {
        let title = match scope {
            ErrorScope::Response => RESPONSE_TITLE,
            ErrorScope::History => HISTORY_TITLE,
        };
        self.write_region(title, &format!("Error: {message}"));
    }
}

/// Field values currently entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

/// Line-based ticket form.
///
/// Values survive a failed submission so the user can resend with Enter;
/// `reset` clears them once a submission went through.
pub struct PromptForm {
    fields: Mutex<FormFields>,
}

impl PromptForm {
    pub fn new(initial: FormFields) -> Self {
        Self {
            fields: Mutex::new(initial),
        }
    }

    pub fn fields(&self) -> FormFields {
        self.lock().clone()
    }

    /// Prompts for every field, offering the current value as default.
    /// Returns `None` when input is exhausted.
    pub fn read_draft<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Option<TicketDraft>> {
        self.fill(input, output, true)
    }

    /// Prompts only for fields that have no value yet.
    pub fn complete_draft<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Option<TicketDraft>> {
        self.fill(input, output, false)
    }

    fn fill<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
        ask_all: bool,
    ) -> AppResult<Option<TicketDraft>> {
        let mut fields = self.fields();

        let subject = match fields.subject.clone().filter(|_| !ask_all) {
            Some(subject) => subject,
            None => match prompt_text(input, output, "Subject", fields.subject.as_deref())? {
                Some(subject) => subject,
                None => return Ok(None),
            },
        };
        fields.subject = Some(subject.clone());

        let description = match fields.description.clone().filter(|_| !ask_all) {
            Some(description) => description,
            None => match prompt_text(
                input,
                output,
                "Description",
                fields.description.as_deref(),
            )? {
                Some(description) => description,
                None => return Ok(None),
            },
        };
        fields.description = Some(description.clone());

        let priority = match fields.priority.filter(|_| !ask_all) {
            Some(priority) => priority,
            None => match prompt_priority(input, output, fields.priority.unwrap_or_default())? {
                Some(priority) => priority,
                None => return Ok(None),
            },
        };
        fields.priority = Some(priority);

        *self.lock() = fields;

        Ok(Some(TicketDraft {
            subject,
            description,
            priority,
        }))
    }

    fn lock(&self) -> MutexGuard<'_, FormFields> {
        self.fields
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DraftSurface for PromptForm {
    fn reset(&self) {
        debug!("ticket form cleared");
        *self.lock() = FormFields::default();
    }
}

fn read_line<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Required text field: blank input keeps the current value or asks again.
fn prompt_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &str,
    current: Option<&str>,
) -> AppResult<Option<String>> {
    loop {
        match current {
            Some(value) => write!(output, "{field} [{value}]: ")?,
            None => write!(output, "{field}: ")?,
        }
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if !line.is_empty() {
            return Ok(Some(line));
        }
        if let Some(value) = current {
            return Ok(Some(value.to_string()));
        }
        writeln!(output, "{field} is required.")?;
    }
}

fn prompt_priority<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    current: Priority,
) -> AppResult<Option<Priority>> {
    loop {
        write!(output, "Priority (low/medium/high) [{}]: ", current.as_str())?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(current));
        }
        match Priority::from_str(&line) {
            Some(priority) => return Ok(Some(priority)),
            None => writeln!(output, "Unknown priority '{line}'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::Map;

    use super::*;

    fn rendered(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    fn record(subject: &str, description: &str, priority: &str) -> TicketRecord {
        TicketRecord {
            subject: subject.to_string(),
            description: description.to_string(),
            priority: priority.to_string(),
            server_fields: Map::new(),
        }
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let view = TerminalView::new(Vec::new());
        view.render_history(&[]);

        let out = rendered(view);
        assert!(out.contains("== Ticket History =="));
        assert!(out.contains(EMPTY_HISTORY_MESSAGE));
    }

    #[test]
    fn history_lists_subject_and_priority_in_order() {
        let view = TerminalView::new(Vec::new());
        view.render_history(&[
            record("Login issue", "Cannot log in", "high"),
            record("Invoice", "Wrong amount", "low"),
        ]);

        let out = rendered(view);
        let login = out.find("- Login issue [high]").unwrap();
        let invoice = out.find("- Invoice [low]").unwrap();
        assert!(login < invoice);
        assert!(out.contains("  Cannot log in"));
    }

    #[test]
    fn response_is_rendered_verbatim() {
        let view = TerminalView::new(Vec::new());
        view.render_ai_response("Use <b>Forgot Password</b>.");

        assert_eq!(
            rendered(view),
            "== AI Assistant Response ==\nUse <b>Forgot Password</b>.\n\n"
        );
    }

    #[test]
    fn errors_land_in_their_region() {
        let view = TerminalView::new(Vec::new());
        view.render_error(ErrorScope::History, "Error loading ticket history.");

        assert_eq!(
            rendered(view),
            "== Ticket History ==\nError: Error loading ticket history.\n\n"
        );
    }

    #[test]
    fn busy_only_renders_when_active() {
        let view = TerminalView::new(Vec::new());
        view.render_busy(true);
        view.render_busy(false);

        assert_eq!(
            rendered(view),
            format!("== AI Assistant Response ==\n{BUSY_MESSAGE}\n\n")
        );
    }

    #[test]
    fn reads_draft_and_reprompts_required_fields() {
        let form = PromptForm::new(FormFields::default());
        let mut input = Cursor::new("\nLogin issue\nCannot log in\nurgent\nhigh\n");
        let mut output = Vec::new();

        let draft = form.read_draft(&mut input, &mut output).unwrap().unwrap();

        assert_eq!(
            draft,
            TicketDraft {
                subject: "Login issue".to_string(),
                description: "Cannot log in".to_string(),
                priority: Priority::High,
            }
        );
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains("Subject is required."));
        assert!(prompts.contains("Unknown priority 'urgent'."));
    }

    #[test]
    fn blank_input_keeps_previous_values_until_reset() {
        let form = PromptForm::new(FormFields {
            subject: Some("Login issue".to_string()),
            description: Some("Cannot log in".to_string()),
            priority: Some(Priority::Low),
        });
        let mut output = Vec::new();

        let draft = form
            .read_draft(&mut Cursor::new("\n\n\n"), &mut output)
            .unwrap()
            .unwrap();
        assert_eq!(draft.subject, "Login issue");
        assert_eq!(draft.priority, Priority::Low);

        form.reset();
        assert_eq!(form.fields(), FormFields::default());
    }

    #[test]
    fn complete_draft_only_asks_for_missing_fields() {
        let form = PromptForm::new(FormFields {
            subject: Some("Billing".to_string()),
            description: None,
            priority: Some(Priority::Medium),
        });
        let mut output = Vec::new();

        let draft = form
            .complete_draft(&mut Cursor::new("Charged twice\n"), &mut output)
            .unwrap()
            .unwrap();

        assert_eq!(draft.description, "Charged twice");
        assert_eq!(String::from_utf8(output).unwrap(), "Description: ");
    }

    #[test]
    fn exhausted_input_yields_no_draft() {
        let form = PromptForm::new(FormFields::default());
        let mut output = Vec::new();

        let draft = form.read_draft(&mut Cursor::new("Subject only\n"), &mut output);

        assert!(draft.unwrap().is_none());
    }
}

use std::io::{self, ErrorKind};
use std::sync::Arc;

use tracing::info;

use crate::context::AppContext;
use crate::domain::state::WorkflowState;
use crate::domain::ticket::{Priority, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::infra::terminal::{FormFields, PromptForm, TerminalView};
use crate::workflow::submission::{SubmissionOutcome, TicketSubmissionWorkflow};

#[derive(Debug, Clone, Default)]
pub struct SubmitCommandArgs {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

fn terminal_workflow(ctx: &AppContext, form: Arc<PromptForm>) -> TicketSubmissionWorkflow {
    TicketSubmissionWorkflow::from_context(ctx, Arc::new(TerminalView::stdout()), form)
}

fn prompt_draft(form: &PromptForm, ask_all: bool) -> AppResult<Option<TicketDraft>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    if ask_all {
        form.read_draft(&mut input, &mut output)
    } else {
        form.complete_draft(&mut input, &mut output)
    }
}

/// One submission; fields missing from the command line are prompted for.
pub async fn submit(ctx: &AppContext, args: SubmitCommandArgs) -> AppResult<SubmissionOutcome> {
    let form = Arc::new(PromptForm::new(FormFields {
        subject: args.subject.filter(|s| !s.trim().is_empty()),
        description: args.description.filter(|s| !s.trim().is_empty()),
        priority: args.priority,
    }));

    let draft = prompt_draft(&form, false)?.ok_or_else(|| {
        AppError::Io(io::Error::new(
            ErrorKind::UnexpectedEof,
            "input ended before the ticket form was complete",
        ))
    })?;

    let workflow = terminal_workflow(ctx, form);
    let mut state = WorkflowState::idle();
    Ok(workflow.run(&mut state, draft).await)
}

/// Loads history, then keeps accepting tickets until input ends.
pub async fn session(ctx: &AppContext) -> AppResult<()> {
    let form = Arc::new(PromptForm::new(FormFields::default()));
    let workflow = terminal_workflow(ctx, form.clone());
    let mut state = WorkflowState::idle();

    println!("Support backend: {}\n", ctx.config.api_base_url);
    workflow.load_history().await;

    let mut submitted = 0usize;
    loop {
        println!("New ticket (Ctrl-D to quit)");
        let Some(draft) = prompt_draft(&form, true)? else {
            break;
        };
        println!();
        if workflow.run(&mut state, draft).await.is_completed() {
            submitted += 1;
        }
    }

    info!(submitted, "session finished");
    Ok(())
}

/// Unlike the session's initial load, a failed refresh here fails the command.
pub async fn history(ctx: &AppContext) -> AppResult<usize> {
    let workflow = terminal_workflow(ctx, Arc::new(PromptForm::new(FormFields::default())));
    workflow
        .load_history()
        .await
        .ok_or_else(|| AppError::Fetch("ticket history could not be loaded".to_string()))
}

pub async fn show(ctx: &AppContext, id: &str) -> AppResult<()> {
    let record = ctx.ticket_store.fetch(id).await?;

    println!("Subject: {}", record.subject);
    println!("Priority: {}", record.priority);
    println!("Description: {}", record.description);
    let mut extra: Vec<_> = record
        .server_fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in extra {
        match value.as_str() {
            Some(text) => println!("{key}: {text}"),
            None => println!("{key}: {value}"),
        }
    }
    Ok(())
}

pub async fn classify(ctx: &AppContext, text: &str) -> AppResult<()> {
    let result = ctx.assistant.classify(text).await?;
    println!("{}", result.classification);
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use reqwest::Client;
    use serde_json::json;

    use super::*;
    use crate::config::AppConfig;
    use crate::infra::assistant::AiResponseClient;
    use crate::infra::tickets::TicketClient;
    use crate::test_support::spawn_backend;

    fn context_for(base_url: &str) -> AppContext {
        let http = Client::new();
        AppContext::new(
            AppConfig {
                api_base_url: base_url.to_string(),
                request_timeout: None,
            },
            Arc::new(TicketClient::new(http.clone(), base_url)),
            Arc::new(AiResponseClient::new(http, base_url)),
        )
    }

    #[tokio::test]
    async fn history_reports_loaded_count() {
        let router = Router::new().route(
            "/api/tickets",
            get(|| async {
                Json(json!({
                    "tickets": [
                        { "id": 1, "subject": "Login issue", "description": "Cannot log in", "priority": "high" }
                    ]
                }))
            }),
        );
        let ctx = context_for(&spawn_backend(router).await);

        assert_eq!(history(&ctx).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn history_fails_when_backend_is_unreachable() {
        let ctx = context_for("http://127.0.0.1:1");

        let err = history(&ctx).await.unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
    }

    #[tokio::test]
    async fn history_fails_on_server_error() {
        let router = Router::new().route(
            "/api/tickets",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let ctx = context_for(&spawn_backend(router).await);

        assert!(matches!(history(&ctx).await, Err(AppError::Fetch(_))));
    }
}

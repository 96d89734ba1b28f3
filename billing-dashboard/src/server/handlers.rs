use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use billing_core::{export, TariffField};

use super::{page, AppState};
use crate::{
    pipeline::PipelineError,
    presenter::{present, HtmlPresenter},
    session::{Mode, PassOutcome, Session},
    sources::{CsvUpload, ManualEntry},
};

/// One full rendering pass: both modes, each from its own latest input.
async fn render(state: &AppState, session: &Session, tariff_errors: &[String]) -> Html<String> {
    let mut regions = Vec::with_capacity(Mode::ALL.len());
    for mode in Mode::ALL {
        let outcome = session.run_pass(mode).await;
        let mut presenter = HtmlPresenter::new();
        present(&mut presenter, mode, &outcome, &state.currency_symbol);
        regions.push((mode, presenter.into_html()));
    }
    Html(page::render(session, tariff_errors, &regions))
}

pub(super) async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    render(&state, &session, &[]).await
}

/// Applies each submitted tariff field on its own; rejected fields keep their
/// previous value and are listed in the sidebar.
pub(super) async fn update_tariff(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    let mut session = state.session.lock().await;
    let mut errors = Vec::new();

    for field in TariffField::ALL {
        let Some(raw) = fields.get(field.as_str()) else {
            continue;
        };
        let outcome = match raw.trim().parse::<f64>() {
            Ok(value) if value == session.read_tariff().get(field) => Ok(()),
            Ok(value) => session.update_tariff(field, value),
            Err(_) => {
                errors.push(format!("invalid tariff: {field} '{raw}' is not a number"));
                continue;
            }
        };
        if let Err(e) = outcome {
            errors.push(e.to_string());
        }
    }

    render(&state, &session, &errors).await
}

/// Reads the `file` part of a bulk upload form. `None` when no file was picked.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<CsvUpload>, MultipartError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await?;

        // Browsers send an empty, unnamed part when no file was picked.
        if !(filename.is_empty() && contents.is_empty()) {
            upload = Some(CsvUpload::new(filename, &contents[..]));
        }
    }
    Ok(upload)
}

/// An unreadable upload (too large, malformed multipart) still renders the
/// full page, with the failure shown in the bulk region.
pub(super) async fn upload_bulk(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let received = read_upload(&mut multipart).await;

    let mut session = state.session.lock().await;
    let status = match received {
        Ok(upload) => {
            session.submit_bulk(upload);
            StatusCode::OK
        }
        Err(e) => {
            let message = format!("could not read the uploaded file: {}", e.body_text());
            session.reject_bulk(PipelineError::Source(message));
            e.status()
        }
    };
    (status, render(&state, &session, &[]).await)
}

pub(super) async fn clear_bulk(State(state): State<AppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    session.submit_bulk(None);
    render(&state, &session, &[]).await
}

pub(super) async fn submit_manual(State(state): State<AppState>, Form(entry): Form<ManualEntry>) -> Html<String> {
    let mut session = state.session.lock().await;
    session.submit_manual(entry);
    render(&state, &session, &[]).await
}

pub(super) async fn reset_session(State(state): State<AppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    session.end();
    render(&state, &session, &[]).await
}

/// Serves the JSON report of one mode as a file download.
pub(super) async fn export_report(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(mode) = Mode::from_slug(&slug) else {
        return (StatusCode::NOT_FOUND, format!("unknown mode '{slug}'")).into_response();
    };

    let outcome = {
        let session = state.session.lock().await;
        session.run_pass(mode).await
    };

    let report = match outcome {
        PassOutcome::Idle => {
            return (StatusCode::NOT_FOUND, mode.idle_message().to_string()).into_response();
        }
        PassOutcome::Invalid(e) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
        }
        PassOutcome::Computed(report) => report,
    };

    match export(&report.billed) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.json\"", mode.report_type()),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, mode = mode.slug(), "failed to serialize report");
            (StatusCode::INTERNAL_SERVER_ERROR, "report export failed".to_string()).into_response()
        }
    }
}

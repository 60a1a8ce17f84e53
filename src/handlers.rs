use crate::chart::WeightChart;
use crate::errors::AppError;
use crate::models::{ExportView, ImportResponse};
use crate::state::AppState;
use crate::ui::render_index;
use crate::viewer::{Effect, Event};
use crate::view::ViewQuery;
use axum::{
    extract::{rejection::StringRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;

pub async fn index(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Html<String> {
    let viewer = state.viewer.lock().await;
    Html(render_index(&viewer, &query))
}

pub async fn entries(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, AppError> {
    let mut viewer = state.viewer.lock().await;
    match viewer.handle(Event::ViewChanged(query)).pop() {
        Some(Effect::RenderEntries(html)) => Ok(Html(html)),
        other => Err(unexpected(other)),
    }
}

pub async fn get_entries(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, AppError> {
    let viewer = state.viewer.lock().await;
    let view = viewer.view(&query);
    Ok(Json(serde_json::to_value(ExportView { entries: &view })?))
}

pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, AppError> {
    let mut viewer = state.viewer.lock().await;
    match viewer.handle(Event::DownloadRequested(query)).pop() {
        Some(Effect::OfferDownload { file_name, body }) => Ok((
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            body,
        )
            .into_response()),
        other => Err(unexpected(other)),
    }
}

pub async fn import(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    body: Result<String, StringRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    // Oversized or non-UTF-8 uploads fail the same way as unparsable ones.
    let body = body.map_err(|rejection| {
        warn!("rejected upload body: {}", rejection.body_text());
        AppError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
    })?;
    let mut viewer = state.viewer.lock().await;
    let before = viewer.store().len();
    let effects = viewer.handle(Event::UploadSelected {
        view: query,
        text: body,
    });

    let mut html = None;
    for effect in effects {
        match effect {
            Effect::RenderEntries(fragment) => html = Some(fragment),
            Effect::Notify(message) => return Err(AppError::bad_request(message)),
            _ => {}
        }
    }

    let total = viewer.store().len();
    Ok(Json(ImportResponse {
        imported: total - before,
        total,
        html: html.unwrap_or_default(),
    }))
}

pub async fn get_chart(State(state): State<AppState>) -> Result<Json<WeightChart>, AppError> {
    let viewer = state.viewer.lock().await;
    viewer
        .chart()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("no chart drawn"))
}

pub async fn chart_svg(State(state): State<AppState>) -> Result<Response, AppError> {
    let viewer = state.viewer.lock().await;
    let chart = viewer
        .chart()
        .ok_or_else(|| AppError::not_found("no chart drawn"))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], chart.svg.clone()).into_response())
}

pub async fn get_schema(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let viewer = state.viewer.lock().await;
    viewer
        .schema()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("schema not available"))
}

fn unexpected(effect: Option<Effect>) -> AppError {
    let message = match effect {
        Some(Effect::Notify(message)) => message,
        other => format!("unexpected effect: {other:?}"),
    };
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message,
    }
}

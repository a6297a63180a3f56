use axum::{
    Form, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::NamingState;
use crate::error::Result;
use crate::query::{ServiceDetail, ServicePage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusForm {
    doms_status: String,
    #[serde(rename = "clientIP", default)]
    client_ip: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListParams {
    page_no: i64,
    page_size: i64,
    namespace_id: Option<String>,
    #[serde(default)]
    selector: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ServiceParams {
    namespace_id: Option<String>,
    service_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchParams {
    namespace_id: Option<String>,
    expr: String,
}

/// 对端校验和报告，返回 `ok` 或 `fail`
pub(super) async fn service_status(
    State(state): State<NamingState>,
    Form(form): Form<StatusForm>,
) -> Result<&'static str> {
    let outcome = state
        .coordinator
        .handle_status(&form.doms_status, &form.client_ip)?;
    Ok(outcome.status.as_str())
}

pub(super) async fn list(
    State(state): State<NamingState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ServicePage>> {
    let namespace_id = state.namespace_or_default(params.namespace_id);
    let page = state
        .query
        .list(&namespace_id, params.page_no, params.page_size, &params.selector)?;
    Ok(Json(page))
}

pub(super) async fn checksum(
    State(state): State<NamingState>,
    Query(params): Query<ServiceParams>,
) -> Result<Json<Value>> {
    let namespace_id = state.namespace_or_default(params.namespace_id);
    let checksum = state.query.checksum(&namespace_id, &params.service_name)?;
    info!(
        namespace_id = %namespace_id,
        service = %params.service_name,
        checksum = %checksum,
        "Checksum recalculated"
    );
    Ok(Json(json!({ "checksum": checksum })))
}

pub(super) async fn detail(
    State(state): State<NamingState>,
    Query(params): Query<ServiceParams>,
) -> Result<Json<ServiceDetail>> {
    let namespace_id = state.namespace_or_default(params.namespace_id);
    Ok(Json(state.query.detail(&namespace_id, &params.service_name)?))
}

pub(super) async fn search(
    State(state): State<NamingState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>> {
    let namespace_id = state.namespace_or_default(params.namespace_id);
    let doms = state.query.search(&namespace_id, &params.expr)?;
    Ok(Json(json!({ "doms": doms })))
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use models::order;
use service::{
    orders::domain::{parse_order_id, ChangeOrderStatusInput, CreateOrderInput, OrderPaginationInput, OrderView},
    pagination::Paginated,
};

use super::AppState;
use crate::errors::RpcError;

#[utoipa::path(
    post, path = "/orders", tag = "orders",
    request_body = crate::openapi::CreateOrderDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::OrderWithItemsDoc),
        (status = 400, description = "Invalid items or unknown products", body = crate::openapi::RpcErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderView>), RpcError> {
    let Json(input) = payload?;
    let draft = input.validate()?;
    let view = state.orders.create(draft).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get, path = "/orders", tag = "orders",
    params(crate::openapi::OrderListParams),
    responses(
        (status = 200, description = "One page of orders", body = crate::openapi::OrderPageDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::RpcErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<OrderPaginationInput>, QueryRejection>,
) -> Result<Json<Paginated<order::Model>>, RpcError> {
    let Query(input) = query?;
    let filter = input.validate()?;
    Ok(Json(state.orders.find_all(filter).await?))
}

#[utoipa::path(
    get, path = "/orders/{id}", tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with named items", body = crate::openapi::OrderWithItemsDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::RpcErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::RpcErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OrderView>, RpcError> {
    let Path(id) = path?;
    let id = parse_order_id(&id)?;
    Ok(Json(state.orders.find_one(id).await?))
}

#[utoipa::path(
    patch, path = "/orders/{id}", tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = crate::openapi::ChangeOrderStatusDoc,
    responses(
        (status = 200, description = "Order after the change", body = crate::openapi::OrderDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::RpcErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::RpcErrorDoc)
    )
)]
pub async fn change_status(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ChangeOrderStatusInput>, JsonRejection>,
) -> Result<Json<order::Model>, RpcError> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let change = input.validate(&id)?;
    Ok(Json(state.orders.change_status(change).await?))
}

use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RpcErrorDoc { pub status: u16, pub message: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct OrderItemInputDoc {
    pub product_id: String,
    #[schema(minimum = 1)]
    pub quantity: i64,
}

#[derive(ToSchema)]
pub struct CreateOrderDoc { pub items: Vec<OrderItemInputDoc> }

#[derive(ToSchema)]
pub struct ChangeOrderStatusDoc {
    #[schema(example = "PAID")]
    pub status: String,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListParams {
    /// PENDING, PAID, DELIVERED or CANCELLED
    pub status: Option<String>,
    /// 1-based, defaults to 1
    pub page: Option<u64>,
    /// defaults to 10
    pub limit: Option<u64>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct OrderDoc {
    pub id: Uuid,
    pub total_amount: f64,
    pub total_items: i32,
    #[schema(example = "PENDING")]
    pub status: String,
    pub paid: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct OrderItemDoc {
    pub product_id: String,
    pub quantity: i32,
    pub price: f64,
    pub name: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct OrderWithItemsDoc {
    pub id: Uuid,
    pub total_amount: f64,
    pub total_items: i32,
    pub status: String,
    pub paid: bool,
    pub created_at: String,
    pub updated_at: String,
    pub order_items: Vec<OrderItemDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PageMetaDoc {
    pub total: u64,
    pub page: u64,
    pub last_page: u64,
    pub per_page: u64,
}

#[derive(ToSchema)]
pub struct OrderPageDoc {
    pub data: Vec<OrderDoc>,
    pub meta: PageMetaDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::orders::create,
        crate::routes::orders::list,
        crate::routes::orders::get,
        crate::routes::orders::change_status,
    ),
    components(
        schemas(
            HealthResponse,
            RpcErrorDoc,
            OrderItemInputDoc,
            CreateOrderDoc,
            ChangeOrderStatusDoc,
            OrderDoc,
            OrderItemDoc,
            OrderWithItemsDoc,
            PageMetaDoc,
            OrderPageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "orders")
    )
)]
pub struct ApiDoc;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub message: String }

#[derive(utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub company_name: String,
    /// DISTRIBUTOR, MAKER or DEALER
    pub role: String,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    /// Required for MAKER
    pub country: Option<String>,
    pub contact_number: String,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub inn: Option<String>,
    pub bik: Option<String>,
    pub kpp: Option<String>,
    pub payment_account: Option<String>,
    pub legal_address: Option<String>,
    /// Empty string clears it
    pub country: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct UserRecordDoc {
    pub id: i32,
    pub company_name: String,
    pub role: String,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    pub country: Option<String>,
    pub contact_number: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(utoipa::ToSchema)]
pub struct ProductSummaryDoc { pub id: i32, pub name: String, pub price: f64, pub characteristics: String }

#[derive(utoipa::ToSchema)]
pub struct UserRoleViewDoc {
    pub id: i32,
    pub company_name: String,
    pub role: String,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    pub country: Option<String>,
    pub contact_number: String,
    pub products_offered: Vec<ProductSummaryDoc>,
    pub products_manufactured: Vec<ProductSummaryDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::create,
        crate::routes::users::find_all,
        crate::routes::users::find_all_by_role,
        crate::routes::users::find_one,
        crate::routes::users::update,
        crate::routes::users::remove,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            CreateUserRequest,
            UpdateUserRequest,
            UserRecordDoc,
            ProductSummaryDoc,
            UserRoleViewDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;

//! Market service routes

use async_trait::async_trait;
use axum::{
    Form, Json, Router,
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::{Serialize, de::DeserializeOwned};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::{
    error::MarketError,
    models::{
        AddItemRequest, LoginCredentials, ProduceItem, RegisterUserRequest,
        RegisterVendorRequest, UpdateItemRequest, VendorProfile,
    },
    services::UserLogin,
    state::AppState,
};

/// Request body as JSON or a url-encoded form, chosen by content type.
///
/// Malformed input of either kind is reported as a validation error.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// Response carrying only a confirmation message
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for vendor registration
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRegisteredResponse {
    pub message: &'static str,
    pub scanner_code: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct UserLoginResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub login: UserLogin,
}

/// Response for vendor login
#[derive(Serialize)]
pub struct VendorLoginResponse {
    pub message: &'static str,
    pub vendor: VendorProfile,
}

/// Response for adding an item
#[derive(Serialize)]
pub struct VegetablesResponse {
    pub message: &'static str,
    pub vegetables: Vec<ProduceItem>,
}

/// Response for updating an item
#[derive(Serialize)]
pub struct VegetableResponse {
    pub message: &'static str,
    pub vegetable: ProduceItem,
}

/// Create the router for the market service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/user_register", post(register_user))
        .route("/user_login", post(login_user))
        .route("/vendor_register", post(register_vendor))
        .route("/vendor_login", post(login_vendor))
        .route("/vendor_add_vegetable", post(add_vegetable))
        .route("/vendor/:phone/vegetables", get(list_vegetables))
        .route(
            "/vendor/:phone/vegetables/:veg_id",
            put(update_vegetable).delete(remove_vegetable),
        )
        .route("/vendors", get(list_vendors))
        .route("/vegetables", get(list_all_vegetables))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness banner
pub async fn root() -> &'static str {
    "Backend running"
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "service": "market-service"
            })),
        ),
        Ok(false) | Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unavailable",
                "service": "market-service"
            })),
        ),
    }
}

/// User registration endpoint
pub async fn register_user(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterUserRequest>,
) -> Result<impl IntoResponse, MarketError> {
    state.accounts.register_user(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

/// User login endpoint
pub async fn login_user(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginCredentials>,
) -> Result<impl IntoResponse, MarketError> {
    let login = state.accounts.login_user(&payload).await?;

    Ok((
        StatusCode::OK,
        Json(UserLoginResponse {
            message: "User logged in successfully",
            login,
        }),
    ))
}

/// Vendor registration endpoint
pub async fn register_vendor(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterVendorRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let vendor = state.accounts.register_vendor(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(VendorRegisteredResponse {
            message: "Vendor registered successfully",
            scanner_code: vendor.scanner_code,
        }),
    ))
}

/// Vendor login endpoint
pub async fn login_vendor(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginCredentials>,
) -> Result<impl IntoResponse, MarketError> {
    let vendor = state.accounts.login_vendor(&payload).await?;

    Ok((
        StatusCode::OK,
        Json(VendorLoginResponse {
            message: "Vendor logged in successfully",
            vendor,
        }),
    ))
}

/// Add an item to a vendor's catalog
pub async fn add_vegetable(
    State(state): State<AppState>,
    Payload(payload): Payload<AddItemRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let vegetables = state.catalog.add_item(&payload).await?;

    Ok(Json(VegetablesResponse {
        message: "Vegetable added",
        vegetables,
    }))
}

/// List a vendor's items
pub async fn list_vegetables(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, MarketError> {
    let vegetables = state.catalog.list_items(&phone).await?;

    Ok(Json(vegetables))
}

/// Partially update one item
pub async fn update_vegetable(
    State(state): State<AppState>,
    Path((phone, veg_id)): Path<(String, String)>,
    Payload(payload): Payload<UpdateItemRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let vegetable = state.catalog.update_item(&phone, &veg_id, &payload).await?;

    Ok(Json(VegetableResponse {
        message: "Vegetable updated",
        vegetable,
    }))
}

/// Remove one item
pub async fn remove_vegetable(
    State(state): State<AppState>,
    Path((phone, veg_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, MarketError> {
    state.catalog.remove_item(&phone, &veg_id).await?;

    Ok(Json(MessageResponse {
        message: "Vegetable deleted",
    }))
}

/// List every vendor
pub async fn list_vendors(State(state): State<AppState>) -> Result<impl IntoResponse, MarketError> {
    let vendors = state.directory.list_vendors().await.inspect_err(|e| {
        error!("Failed to list vendors: {}", e);
    })?;

    Ok(Json(vendors))
}

/// List every item across all vendors
pub async fn list_all_vegetables(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MarketError> {
    let items = state.directory.list_all_items().await.inspect_err(|e| {
        error!("Failed to list vegetables: {}", e);
    })?;

    Ok(Json(items))
}

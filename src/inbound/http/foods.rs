//! Food catalogue endpoints.
//!
//! Public reads (browse, search, top sellers, detail) need no credential.
//! Vendor reads and every mutation go through the guard, and the
//! caller-supplied vendor identity must match the credential.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{FoodPageQuery, NewFoodItem};
use crate::domain::{Error, FoodItem, FoodItemUpdate, FoodPage, FoodSort, Identity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::{Authenticated, OwnerQuery};
use crate::inbound::http::state::HttpState;

const DEFAULT_PAGE_SIZE: i64 = 9;
const MAX_PAGE_SIZE: i64 = 50;
const TOP_SELLERS_LIMIT: i64 = 6;

/// Query string for the public catalogue listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FoodListQuery {
    /// Case-insensitive pattern matched against the name.
    pub search: Option<String>,
    pub sort: Option<FoodSort>,
    /// 1-based page number.
    pub page: Option<u64>,
    /// Items per page, capped at 50.
    pub size: Option<i64>,
}

impl FoodListQuery {
    fn into_page_query(self) -> Result<FoodPageQuery, Error> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(Error::invalid_request("page starts at 1"));
        }
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(Error::invalid_request(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(FoodPageQuery {
            search: self.search,
            sort: self.sort.unwrap_or_default(),
            skip: (page - 1).saturating_mul(size as u64),
            limit: size,
        })
    }
}

/// Body for creating a listing.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub name: String,
    pub image: String,
    pub category: String,
    /// Price in minor currency units.
    pub price: i64,
    pub quantity: i64,
    pub description: String,
    /// Vendor identity; must match the credential.
    #[schema(value_type = String, example = "vendor@example.com")]
    pub vendor_email: String,
    pub vendor_name: String,
}

fn parse_identity(raw: &str) -> Result<Identity, Error> {
    Identity::new(raw).map_err(|error| Error::invalid_request(format!("email: {error}")))
}

/// Browse the catalogue with search, price sort, and skip/limit paging.
#[utoipa::path(
    get,
    path = "/foods",
    params(FoodListQuery),
    responses(
        (status = 200, description = "Catalogue page", body = FoodPage),
        (status = 400, description = "Invalid query", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "listFoods"
)]
#[get("/foods")]
pub async fn list_foods(
    state: web::Data<HttpState>,
    query: web::Query<FoodListQuery>,
) -> ApiResult<web::Json<FoodPage>> {
    let page = state.foods.page(query.into_inner().into_page_query()?).await?;
    Ok(web::Json(page))
}

/// Best-selling items for the landing page.
#[utoipa::path(
    get,
    path = "/foods/top",
    responses((status = 200, description = "Top sellers", body = [FoodItem])),
    tags = ["foods"],
    operation_id = "topFoods"
)]
#[get("/foods/top")]
pub async fn top_foods(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<FoodItem>>> {
    let items = state.foods.top_sellers(TOP_SELLERS_LIMIT).await?;
    Ok(web::Json(items))
}

/// The authenticated vendor's own listings.
#[utoipa::path(
    get,
    path = "/foods/vendor",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Vendor listings", body = [FoodItem]),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "vendorFoods"
)]
#[get("/foods/vendor")]
pub async fn vendor_foods(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<FoodItem>>> {
    let vendor = query.identity()?;
    auth.require_owner(&vendor)?;
    let items = state.foods.by_vendor(&vendor).await?;
    Ok(web::Json(items))
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/foods/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing", body = FoodItem),
        (status = 404, description = "Unknown id", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "getFood"
)]
#[get("/foods/{id}")]
pub async fn get_food(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<FoodItem>> {
    let item = state.foods.by_id(&id).await?;
    Ok(web::Json(item))
}

/// Create a listing owned by the authenticated vendor.
#[utoipa::path(
    post,
    path = "/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Listing created", body = FoodItem),
        (status = 400, description = "Invalid body", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "createFood"
)]
#[post("/foods")]
pub async fn create_food(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateFoodRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let vendor = parse_identity(&payload.vendor_email)?;
    auth.require_owner(&vendor)?;

    if payload.name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty").into());
    }
    if payload.price < 0 {
        return Err(Error::invalid_request("price must not be negative").into());
    }
    if payload.quantity < 0 {
        return Err(Error::invalid_request("quantity must not be negative").into());
    }

    let item = state
        .foods
        .insert(NewFoodItem {
            name: payload.name,
            image: payload.image,
            category: payload.category,
            price: payload.price,
            quantity: payload.quantity,
            description: payload.description,
            vendor_email: vendor,
            vendor_name: payload.vendor_name,
        })
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// Update the authenticated vendor's own listing.
#[utoipa::path(
    put,
    path = "/foods/{id}",
    params(("id" = String, Path, description = "Listing id"), OwnerQuery),
    request_body = FoodItemUpdate,
    responses(
        (status = 200, description = "Updated listing", body = FoodItem),
        (status = 400, description = "Empty update", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not the vendor's listing", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "updateFood"
)]
#[put("/foods/{id}")]
pub async fn update_food(
    state: web::Data<HttpState>,
    auth: Authenticated,
    id: web::Path<String>,
    query: web::Query<OwnerQuery>,
    payload: web::Json<FoodItemUpdate>,
) -> ApiResult<web::Json<FoodItem>> {
    let vendor = query.identity()?;
    auth.require_owner(&vendor)?;

    let changes = payload.into_inner();
    if changes.is_empty() {
        return Err(Error::invalid_request("update carries no fields").into());
    }
    if changes.price.is_some_and(|price| price < 0) {
        return Err(Error::invalid_request("price must not be negative").into());
    }
    if changes.quantity.is_some_and(|quantity| quantity < 0) {
        return Err(Error::invalid_request("quantity must not be negative").into());
    }

    let item = state.foods.update(&id, &vendor, changes).await?;
    Ok(web::Json(item))
}

/// Delete the authenticated vendor's own listing.
#[utoipa::path(
    delete,
    path = "/foods/{id}",
    params(("id" = String, Path, description = "Listing id"), OwnerQuery),
    responses(
        (status = 204, description = "Listing removed"),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not the vendor's listing", body = crate::inbound::http::ApiError)
    ),
    tags = ["foods"],
    operation_id = "deleteFood"
)]
#[delete("/foods/{id}")]
pub async fn delete_food(
    state: web::Data<HttpState>,
    auth: Authenticated,
    id: web::Path<String>,
    query: web::Query<OwnerQuery>,
) -> ApiResult<HttpResponse> {
    let vendor = query.identity()?;
    auth.require_owner(&vendor)?;
    state.foods.delete(&id, &vendor).await?;
    Ok(HttpResponse::NoContent().finish())
}

//! Order endpoints.
//!
//! Placing an order snapshots the listing's name, image, and price, then
//! shifts the listing's availability and purchase count. Cancelling restores
//! them. Both counter writes are single-document updates with no
//! cross-collection transaction; a crash between the order write and the
//! counter write leaves the count stale, which the catalogue tolerates.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::NewOrder;
use crate::domain::{Error, Identity, Order};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::{Authenticated, OwnerQuery};
use crate::inbound::http::state::HttpState;

/// Body for placing an order.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub food_id: String,
    pub quantity: i64,
    /// Buyer identity; must match the credential.
    #[schema(value_type = String, example = "ada@example.com")]
    pub buyer_email: String,
    pub buyer_name: String,
}

/// Place an order as the authenticated buyer.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Invalid quantity or own listing", body = crate::inbound::http::ApiError),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError),
        (status = 404, description = "Unknown listing", body = crate::inbound::http::ApiError)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<PlaceOrderRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let buyer = Identity::new(payload.buyer_email.clone())
        .map_err(|error| Error::invalid_request(format!("buyerEmail: {error}")))?;
    auth.require_owner(&buyer)?;

    if payload.quantity < 1 {
        return Err(Error::invalid_request("quantity must be at least 1").into());
    }

    let food = state.foods.by_id(&payload.food_id).await?;
    if food.vendor_email == buyer {
        return Err(Error::invalid_request("cannot order your own listing").into());
    }
    if payload.quantity > food.quantity {
        return Err(Error::invalid_request("quantity exceeds availability").into());
    }

    let order = state
        .orders
        .insert(NewOrder {
            food_id: food.id.clone(),
            food_name: food.name,
            food_image: food.image,
            price: food.price,
            quantity: payload.quantity,
            buyer_email: buyer,
            buyer_name: payload.buyer_name,
            vendor_email: food.vendor_email,
            ordered_at: Utc::now(),
        })
        .await?;
    state
        .foods
        .adjust_counters(&food.id, -payload.quantity, payload.quantity)
        .await?;

    Ok(HttpResponse::Created().json(order))
}

/// The authenticated buyer's orders, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Buyer orders", body = [Order]),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<Order>>> {
    let buyer = query.identity()?;
    auth.require_owner(&buyer)?;
    let orders = state.orders.by_buyer(&buyer).await?;
    Ok(web::Json(orders))
}

/// Cancel the authenticated buyer's own order.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = String, Path, description = "Order id"), OwnerQuery),
    responses(
        (status = 204, description = "Order cancelled"),
        (status = 401, description = "No valid credential", body = crate::inbound::http::ApiError),
        (status = 403, description = "Identity mismatch", body = crate::inbound::http::ApiError),
        (status = 404, description = "Not the buyer's order", body = crate::inbound::http::ApiError)
    ),
    tags = ["orders"],
    operation_id = "cancelOrder"
)]
#[delete("/orders/{id}")]
pub async fn cancel_order(
    state: web::Data<HttpState>,
    auth: Authenticated,
    id: web::Path<String>,
    query: web::Query<OwnerQuery>,
) -> ApiResult<HttpResponse> {
    let buyer = query.identity()?;
    auth.require_owner(&buyer)?;

    let order = state.orders.delete(&id, &buyer).await?;
    state
        .foods
        .adjust_counters(&order.food_id, order.quantity, -order.quantity)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use crate::domain::ports::{FoodRepository, MemoryFoodRepository, NewFoodItem};
    use crate::domain::{FoodItem, SigningSecret, credential};
    use crate::inbound::http::guard::{CookiePolicy, GuardSettings, TOKEN_COOKIE};
    use crate::inbound::http::state::HttpStatePorts;

    const VENDOR: &str = "vendor@example.com";
    const BUYER: &str = "ada@example.com";

    fn settings() -> GuardSettings {
        GuardSettings {
            secret: SigningSecret::new("0123456789abcdef0123456789abcdef").expect("secret"),
            cookies: CookiePolicy::development(),
        }
    }

    async fn state_with_listing() -> (web::Data<HttpState>, FoodItem) {
        let foods = Arc::new(MemoryFoodRepository::default());
        let listing = foods
            .insert(NewFoodItem {
                name: "Kacchi Biryani".into(),
                image: "https://img.example.com/kacchi.png".into(),
                category: "Biryani".into(),
                price: 1600,
                quantity: 5,
                description: "weekend special".into(),
                vendor_email: Identity::new(VENDOR).expect("identity"),
                vendor_name: "Arnab".into(),
            })
            .await
            .expect("seed listing");

        let base = HttpState::in_memory(settings());
        let state = HttpState::new(
            base.guard.clone(),
            HttpStatePorts {
                foods,
                orders: base.orders.clone(),
                feedback: base.feedback.clone(),
                payments: base.payments.clone(),
                gateway: base.gateway.clone(),
            },
        );
        (web::Data::new(state), listing)
    }

    fn token(state: &web::Data<HttpState>, email: &str) -> Cookie<'static> {
        let identity = Identity::new(email).expect("identity");
        let token = credential::issue(&identity, &state.guard.secret, Utc::now()).expect("issue");
        Cookie::new(TOKEN_COOKIE, token)
    }

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .service(place_order)
            .service(list_orders)
            .service(cancel_order)
    }

    fn order_body(food_id: &str, quantity: i64) -> Value {
        json!({
            "foodId": food_id,
            "quantity": quantity,
            "buyerEmail": BUYER,
            "buyerName": "Ada",
        })
    }

    #[actix_web::test]
    async fn placing_an_order_shifts_catalogue_counters() {
        let (state, listing) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(token(&state, BUYER))
                .set_json(order_body(&listing.id, 2))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let order: Value = test::read_body_json(res).await;
        assert_eq!(order["price"], 1600);
        assert_eq!(order["vendorEmail"], VENDOR);

        let food = state.foods.by_id(&listing.id).await.expect("fetch");
        assert_eq!(food.quantity, 3);
        assert_eq!(food.purchase_count, 2);
    }

    #[actix_web::test]
    async fn cancelling_restores_catalogue_counters() {
        let (state, listing) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let placed = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(token(&state, BUYER))
                .set_json(order_body(&listing.id, 2))
                .to_request(),
        )
        .await;
        let placed: Value = test::read_body_json(placed).await;
        let order_id = placed["id"].as_str().expect("id").to_owned();

        let cancelled = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/orders/{order_id}?email=ada%40example.com"))
                .cookie(token(&state, BUYER))
                .to_request(),
        )
        .await;
        assert_eq!(cancelled.status(), StatusCode::NO_CONTENT);

        let food = state.foods.by_id(&listing.id).await.expect("fetch");
        assert_eq!(food.quantity, 5);
        assert_eq!(food.purchase_count, 0);
    }

    #[actix_web::test]
    async fn cancel_enforces_ownership_before_touching_data() {
        let (state, listing) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let placed = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(token(&state, BUYER))
                .set_json(order_body(&listing.id, 1))
                .to_request(),
        )
        .await;
        let placed: Value = test::read_body_json(placed).await;
        let order_id = placed["id"].as_str().expect("id").to_owned();

        // Credential for another identity naming the buyer as owner.
        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/orders/{order_id}?email=ada%40example.com"))
                .cookie(token(&state, "mallory@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let remaining = state
            .orders
            .by_buyer(&Identity::new(BUYER).expect("identity"))
            .await
            .expect("list");
        assert_eq!(remaining.len(), 1);
    }

    #[actix_web::test]
    async fn ordering_own_listing_is_rejected() {
        let (state, listing) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(token(&state, VENDOR))
                .set_json(json!({
                    "foodId": listing.id,
                    "quantity": 1,
                    "buyerEmail": VENDOR,
                    "buyerName": "Arnab",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn ordering_more_than_available_is_rejected() {
        let (state, listing) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/orders")
                .cookie(token(&state, BUYER))
                .set_json(order_body(&listing.id, 6))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn listing_orders_for_someone_else_is_forbidden() {
        let (state, _) = state_with_listing().await;
        let app = test::init_service(test_app(state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/orders?email=ada%40example.com")
                .cookie(token(&state, "mallory@example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}

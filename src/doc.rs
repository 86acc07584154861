//! OpenAPI documentation configuration.
//!
//! Generates the document served by Swagger UI in debug builds. The
//! credential cookie is registered as the API-wide security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Feedback, FoodItem, FoodItemUpdate, FoodPage, FoodSort, Order, PaymentIntent, PaymentRecord};
use crate::inbound::http::ApiError;
use crate::inbound::http::feedback::CreateFeedbackRequest;
use crate::inbound::http::foods::CreateFoodRequest;
use crate::inbound::http::orders::PlaceOrderRequest;
use crate::inbound::http::payments::{CreateIntentRequest, RecordPaymentRequest};

/// Register the credential cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Credential cookie issued by POST /jwt.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Dine Portal backend API",
        description = "Food-ordering REST interface with cookie-credential access control."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenCookie" = [])),
    paths(
        crate::inbound::http::tokens::issue_token,
        crate::inbound::http::tokens::logout,
        crate::inbound::http::foods::list_foods,
        crate::inbound::http::foods::top_foods,
        crate::inbound::http::foods::vendor_foods,
        crate::inbound::http::foods::get_food,
        crate::inbound::http::foods::create_food,
        crate::inbound::http::foods::update_food,
        crate::inbound::http::foods::delete_food,
        crate::inbound::http::orders::place_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::cancel_order,
        crate::inbound::http::feedback::list_feedback,
        crate::inbound::http::feedback::create_feedback,
        crate::inbound::http::feedback::delete_feedback,
        crate::inbound::http::payments::create_payment_intent,
        crate::inbound::http::payments::record_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        Error,
        ErrorCode,
        FoodItem,
        FoodItemUpdate,
        FoodPage,
        FoodSort,
        CreateFoodRequest,
        Order,
        PlaceOrderRequest,
        Feedback,
        CreateFeedbackRequest,
        PaymentIntent,
        PaymentRecord,
        CreateIntentRequest,
        RecordPaymentRequest,
    )),
    tags(
        (name = "auth", description = "Credential issuance and revocation"),
        (name = "foods", description = "Catalogue operations"),
        (name = "orders", description = "Order operations"),
        (name = "feedback", description = "Feedback wall"),
        (name = "payments", description = "Payment processing and history"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

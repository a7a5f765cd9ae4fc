// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_admin, Role},
    state::AppState,
    storage::{DeleteResult, InsertOneResult, UpdateResult},
};

pub mod carts;
pub mod classes;
pub mod extract;
pub mod health;
pub mod payments;
pub mod tokens;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/jwt", post(tokens::issue_token))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/admin/{user_ref}",
            get(users::check_admin).merge(promotion(&state, patch(users::make_admin))),
        )
        .route(
            "/users/instructor/{user_ref}",
            get(users::check_instructor).merge(promotion(&state, patch(users::make_instructor))),
        )
        .route("/instructors", get(users::list_instructors))
        .route(
            "/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route("/classes/{id}/status", patch(classes::set_class_status))
        .route("/classes/{id}/feedback", post(classes::set_class_feedback))
        .route("/carts", get(carts::list_cart).post(carts::add_to_cart))
        .route(
            "/carts/{id}",
            get(carts::get_cart_item).delete(carts::remove_from_cart),
        )
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/payments", post(payments::record_payment))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Role promotion routes require an admin token when the lock is on.
fn promotion(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    if state.lock_role_promotion {
        route.route_layer(from_fn_with_state(state.clone(), require_admin))
    } else {
        route
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root,
        health::health,
        health::liveness,
        health::readiness,
        tokens::issue_token,
        users::list_users,
        users::create_user,
        users::check_admin,
        users::check_instructor,
        users::make_admin,
        users::make_instructor,
        users::list_instructors,
        classes::list_classes,
        classes::create_class,
        classes::set_class_status,
        classes::set_class_feedback,
        carts::list_cart,
        carts::add_to_cart,
        carts::get_cart_item,
        carts::remove_from_cart,
        payments::create_payment_intent,
        payments::record_payment
    ),
    components(
        schemas(
            InsertOneResult,
            UpdateResult,
            DeleteResult,
            Role,
            users::CreateUserResponse,
            users::AdminStatus,
            users::InstructorStatus,
            classes::StatusUpdate,
            classes::FeedbackUpdate,
            payments::PaymentIntentRequest,
            payments::PaymentIntentResponse,
            tokens::TokenResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Auth", description = "Access token issuance"),
        (name = "Users", description = "Signup, role checks and promotion"),
        (name = "Classes", description = "Class listings and review"),
        (name = "Carts", description = "Shopping cart items"),
        (name = "Payments", description = "Payment intents and payment records")
    )
)]
struct ApiDoc;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::extract::{JsonBody, QueryParams};
use crate::{
    auth::{AdminOnly, Auth, Role},
    error::ApiError,
    state::AppState,
    storage::{InsertOneResult, NewUser, UpdateResult, User, UserFilter, UserRepository},
};

pub const USER_EXISTS_MESSAGE: &str = "User already exists";

/// `POST /users` answers with the insert result, or a notice when the email
/// is already registered.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Created(InsertOneResult),
    Exists { message: String },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatus {
    pub admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorStatus {
    pub instructor: bool,
}

#[utoipa::path(
    get,
    path = "/users",
    params(UserFilter),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [serde_json::Value]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    AdminOnly(_claims): AdminOnly,
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<UserFilter>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepository::new(&state.storage).list(&filter)?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = serde_json::Value,
    tag = "Users",
    responses(
        (status = 200, body = CreateUserResponse),
        (status = 400, description = "Missing or non-string email")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let email = new_user.email.clone();
    match UserRepository::new(&state.storage).create_if_absent(new_user)? {
        Some(result) => {
            tracing::info!(%email, user_id = %result.inserted_id, "user created");
            Ok(Json(CreateUserResponse::Created(result)))
        }
        None => Ok(Json(CreateUserResponse::Exists {
            message: USER_EXISTS_MESSAGE.to_string(),
        })),
    }
}

#[utoipa::path(
    get,
    path = "/users/admin/{user_ref}",
    params(("user_ref" = String, Path, description = "Email to check; must be the caller's own")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, body = AdminStatus), (status = 401))
)]
pub async fn check_admin(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, ApiError> {
    let admin = caller_has_role(&state, claims.email(), &email, Role::Admin)?;
    Ok(Json(AdminStatus { admin }))
}

#[utoipa::path(
    get,
    path = "/users/instructor/{user_ref}",
    params(("user_ref" = String, Path, description = "Email to check; must be the caller's own")),
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, body = InstructorStatus), (status = 401))
)]
pub async fn check_instructor(
    Auth(claims): Auth,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<InstructorStatus>, ApiError> {
    let instructor = caller_has_role(&state, claims.email(), &email, Role::Instructor)?;
    Ok(Json(InstructorStatus { instructor }))
}

/// Promote a user to admin. Open unless `LOCK_ROLE_PROMOTION` is set.
#[utoipa::path(
    patch,
    path = "/users/admin/{user_ref}",
    params(("user_ref" = String, Path, description = "User `_id`")),
    tag = "Users",
    responses((status = 200, body = UpdateResult))
)]
pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    promote(&state, &id, Role::Admin).map(Json)
}

/// Promote a user to instructor. Open unless `LOCK_ROLE_PROMOTION` is set.
#[utoipa::path(
    patch,
    path = "/users/instructor/{user_ref}",
    params(("user_ref" = String, Path, description = "User `_id`")),
    tag = "Users",
    responses((status = 200, body = UpdateResult))
)]
pub async fn make_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    promote(&state, &id, Role::Instructor).map(Json)
}

#[utoipa::path(
    get,
    path = "/instructors",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [serde_json::Value]), (status = 401))
)]
pub async fn list_instructors(
    Auth(_claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let instructors = UserRepository::new(&state.storage).list_by_role(Role::Instructor)?;
    Ok(Json(instructors))
}

/// A caller may only ask about their own email; asking about anyone else
/// answers `false` without a lookup.
fn caller_has_role(
    state: &AppState,
    caller: Option<&str>,
    email: &str,
    role: Role,
) -> Result<bool, ApiError> {
    if caller != Some(email) {
        return Ok(false);
    }
    Ok(state.role_of(email)? == Some(role))
}

fn promote(state: &AppState, id: &str, role: Role) -> Result<UpdateResult, ApiError> {
    let change = UserRepository::new(&state.storage).set_role(id, role)?;
    if let Some(email) = &change.email {
        state.role_cache.invalidate(email);
        tracing::info!(%email, %role, modified = change.result.modified_count, "role promotion");
    }
    Ok(change.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityClaims, RoleCache, TokenClaims};
    use crate::test_support::{seed_user, test_state};
    use serde_json::json;
    use std::{sync::Arc, time::Duration};

    fn claims_for(email: &str) -> TokenClaims {
        IdentityClaims::with_email(email).into_claims(0, 1)
    }

    fn new_user(body: serde_json::Value) -> JsonBody<NewUser> {
        JsonBody(serde_json::from_value(body).unwrap())
    }

    #[tokio::test]
    async fn create_user_is_idempotent_on_email() {
        let (_dir, state) = test_state();

        let Json(first) = create_user(
            State(state.clone()),
            new_user(json!({"email": "a@example.com", "name": "Ada"})),
        )
        .await
        .unwrap();
        assert!(matches!(first, CreateUserResponse::Created(_)));

        let Json(second) = create_user(
            State(state.clone()),
            new_user(json!({"email": "a@example.com", "name": "Ada again"})),
        )
        .await
        .unwrap();
        assert_eq!(
            serde_json::to_value(second).unwrap(),
            json!({"message": "User already exists"})
        );

        let users = UserRepository::new(&state.storage)
            .list(&UserFilter::default())
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].profile.get("name"), Some(&json!("Ada")));
    }

    #[tokio::test]
    async fn check_admin_only_answers_for_own_email() {
        let (_dir, state) = test_state();
        seed_user(&state, "admin@example.com", Some(Role::Admin));

        let Json(own) = check_admin(
            Auth(claims_for("admin@example.com")),
            State(state.clone()),
            Path("admin@example.com".to_string()),
        )
        .await
        .unwrap();
        assert!(own.admin);

        let Json(other) = check_admin(
            Auth(claims_for("student@example.com")),
            State(state.clone()),
            Path("admin@example.com".to_string()),
        )
        .await
        .unwrap();
        assert!(!other.admin);
    }

    #[tokio::test]
    async fn check_instructor_reflects_stored_role() {
        let (_dir, state) = test_state();
        seed_user(&state, "teach@example.com", Some(Role::Instructor));
        seed_user(&state, "student@example.com", None);

        let Json(status) = check_instructor(
            Auth(claims_for("teach@example.com")),
            State(state.clone()),
            Path("teach@example.com".to_string()),
        )
        .await
        .unwrap();
        assert!(status.instructor);

        let Json(student) = check_instructor(
            Auth(claims_for("student@example.com")),
            State(state.clone()),
            Path("student@example.com".to_string()),
        )
        .await
        .unwrap();
        assert!(!student.instructor);
    }

    #[tokio::test]
    async fn promotion_sets_role_and_lists_instructors() {
        let (_dir, state) = test_state();
        let user = seed_user(&state, "teach@example.com", None);

        let Json(result) = make_instructor(State(state.clone()), Path(user.id.to_string()))
            .await
            .unwrap();
        assert_eq!((result.matched_count, result.modified_count), (1, 1));

        let Json(instructors) = list_instructors(
            Auth(claims_for("anyone@example.com")),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert_eq!(instructors.len(), 1);
        assert_eq!(instructors[0].email, "teach@example.com");

        let Json(missing) = make_admin(State(state), Path("not-an-id".to_string()))
            .await
            .unwrap();
        assert_eq!(missing.matched_count, 0);
    }

    #[tokio::test]
    async fn promotion_invalidates_cached_role() {
        let (_dir, mut state) = test_state();
        state.role_cache = Arc::new(RoleCache::new(16, Duration::from_secs(300)));
        let user = seed_user(&state, "soon@example.com", None);

        assert_eq!(state.role_of("soon@example.com").unwrap(), None);
        make_admin(State(state.clone()), Path(user.id.to_string()))
            .await
            .unwrap();
        assert_eq!(
            state.role_of("soon@example.com").unwrap(),
            Some(Role::Admin)
        );
    }

    #[tokio::test]
    async fn list_users_applies_filters() {
        let (_dir, state) = test_state();
        seed_user(&state, "admin@example.com", Some(Role::Admin));
        seed_user(&state, "teach@example.com", Some(Role::Instructor));
        seed_user(&state, "student@example.com", None);

        let Json(all) = list_users(
            AdminOnly(claims_for("admin@example.com")),
            State(state.clone()),
            QueryParams(UserFilter::default()),
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 3);

        let Json(instructors) = list_users(
            AdminOnly(claims_for("admin@example.com")),
            State(state),
            QueryParams(UserFilter {
                role: Some(Role::Instructor),
                email: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(instructors.len(), 1);
        assert_eq!(instructors[0].email, "teach@example.com");
    }
}

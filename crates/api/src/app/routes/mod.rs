use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod auth;
pub mod serials;
pub mod system;
pub mod users;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/validate-serial", post(serials::validate_serial))
        .route("/subusers/:id", get(users::get_subuser))
}

/// Routes behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(auth::me))
        .route("/users", post(users::create_subuser).get(users::list_subusers))
        .route("/users/:id", delete(users::delete_subuser))
        .route("/generate-serial", post(serials::generate_serial))
}

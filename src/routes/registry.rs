//! CRUD routes for caretakers, children, adopters and adoptions.
//! Every handler takes an `AuthContext`, so each route sits behind the Session Gate.

use crate::handlers::{adopters, adoptions, caretakers, children};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn registry_routes(state: AppState) -> Router {
    Router::new()
        .route("/caretakers", get(caretakers::list).post(caretakers::create))
        .route(
            "/caretakers/:id",
            get(caretakers::read).put(caretakers::update).delete(caretakers::delete),
        )
        .route("/children", get(children::list).post(children::create))
        .route(
            "/children/:id",
            get(children::read).put(children::update).delete(children::delete),
        )
        .route("/adopters", get(adopters::list).post(adopters::create))
        .route(
            "/adopters/:id",
            get(adopters::read).put(adopters::update).delete(adopters::delete),
        )
        .route("/adoptions", get(adoptions::list).post(adoptions::create))
        .route(
            "/adoptions/:id",
            get(adoptions::read).put(adoptions::update).delete(adoptions::delete),
        )
        .with_state(state)
}

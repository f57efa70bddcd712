use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use genvisor_core::InstanceSet;
use genvisor_model::StatusSnapshot;

use crate::index;

/// Build the complete HTTP surface for the given instance set.
///
/// Routes:
/// - `GET /status` - one status object per instance
/// - exactly one instance: the top-level tree serves its public directory
/// - otherwise: `GET /` renders the instance index, and each instance's
///   public directory is nested under `/<name>/` with the prefix stripped
pub fn router(instances: InstanceSet) -> Router {
    let app = Router::new().route("/status", get(status));

    let app = match instances.sole() {
        Some(only) => app.fallback_service(ServeDir::new(&only.spec().public_dir)),
        None => {
            let mut app = app.route("/", get(landing));
            for instance in instances.iter() {
                app = app.nest_service(
                    &format!("/{}", instance.name()),
                    ServeDir::new(&instance.spec().public_dir),
                );
            }
            app
        }
    };

    app.layer(TraceLayer::new_for_http()).with_state(instances)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /status
async fn status(State(instances): State<InstanceSet>) -> Json<Vec<StatusSnapshot>> {
    Json(instances.snapshots())
}

/// GET / (multi-instance layout)
async fn landing(State(instances): State<InstanceSet>) -> Html<String> {
    Html(index::render(&instances.snapshots()))
}

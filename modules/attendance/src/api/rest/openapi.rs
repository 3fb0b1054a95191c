use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "labpresence", description = "Lab attendance tracking API"),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::enter,
        handlers::exit,
        handlers::list_logs,
        handlers::reset,
    ),
    components(schemas(
        dto::UserDto,
        dto::ActionDto,
        dto::LogEntryDto,
        dto::RecordTransitionReq,
        dto::TransitionResponse,
        dto::ResetResponse,
        dto::ErrorBody,
    )),
    tags(
        (name = "users", description = "Presence state and enter/exit transitions"),
        (name = "logs", description = "Activity log"),
        (name = "admin", description = "Maintenance operations")
    )
)]
pub struct AttendanceApiDoc;

/// OpenAPI document for the attendance endpoints; `/api/reset` is dropped
/// when the route is not mounted.
pub fn openapi(enable_reset: bool) -> utoipa::openapi::OpenApi {
    let mut doc = AttendanceApiDoc::openapi();
    if !enable_reset {
        doc.paths.paths.remove("/api/reset");
    }
    doc
}

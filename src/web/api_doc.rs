use utoipa::OpenApi;

use super::api::elements::ElementsResponse;
use super::api::error::ErrorResponse;
use super::api::orbit::OrbitResponse;
use super::api::pass::PassResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::pass::next_pass,
        super::api::elements::current_elements,
        super::api::orbit::orbit,
        super::api::position::position,
    ),
    components(
        schemas(
            PassResponse,
            ElementsResponse,
            OrbitResponse,
            ErrorResponse,
            crate::elements::Provenance,
            crate::predict::OrbitInfo,
            crate::telemetry::IssPosition,
        )
    ),
    info(
        title = "ISS Pass API",
        description = "Next visible ISS pass for an observer, with the orbital data behind it",
        version = "0.1.0"
    ),
    tags(
        (name = "pass", description = "Pass prediction"),
        (name = "elements", description = "Two-line element sets"),
        (name = "orbit", description = "Orbit summary"),
        (name = "telemetry", description = "Live position")
    )
)]
pub struct ApiDoc;

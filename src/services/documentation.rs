use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the pitch-board backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::board_stream,
        crate::routes::session::open_session,
        crate::routes::session::get_session,
        crate::routes::session::close_session,
        crate::routes::session::start_clock,
        crate::routes::session::pause_clock,
        crate::routes::session::resume_clock,
        crate::routes::session::advance_half,
        crate::routes::session::force_sync,
        crate::routes::session::set_injury,
        crate::routes::session::set_fill_in,
        crate::routes::session::override_position,
        crate::routes::plan::schedule_substitutions,
        crate::routes::plan::list_batches,
        crate::routes::plan::open_batch,
        crate::routes::plan::confirm_batch,
        crate::routes::plan::abort_batch,
        crate::routes::plan::skip_batch,
        crate::routes::options::substitution_options,
        crate::routes::discovery::nearby_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::OpenSessionRequest,
            crate::dto::session::PlayerInput,
            crate::dto::session::SessionSummary,
            crate::dto::session::SetInjuryRequest,
            crate::dto::session::SetFillInRequest,
            crate::dto::session::OverridePositionRequest,
            crate::dto::common::ClockSummary,
            crate::dto::common::PlayerSummary,
            crate::dto::common::PlayerRefSummary,
            crate::dto::common::SubStatusDto,
            crate::dto::common::SwapSummary,
            crate::dto::common::PlannedSubSummary,
            crate::dto::common::BatchSummary,
            crate::dto::common::PendingBatchSummary,
            crate::dto::plan::ScheduleSubstitutionsRequest,
            crate::dto::plan::SubstitutionInput,
            crate::dto::plan::BatchRequest,
            crate::dto::plan::ConfirmBatchRequest,
            crate::dto::plan::BatchesResponse,
            crate::dto::plan::SkipResponse,
            crate::dto::options::OptionsResponse,
            crate::dto::options::DirectOptionDto,
            crate::dto::options::SwapOptionDto,
            crate::dto::discovery::NearbyGameResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "session", description = "Session lifecycle and game clock"),
        (name = "plan", description = "Substitution plan and batch confirmation"),
        (name = "options", description = "Substitution option computation"),
        (name = "discovery", description = "Nearby-game discovery"),
    )
)]
pub struct ApiDoc;

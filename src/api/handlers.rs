//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    engine::TimerConfig,
    error::{AppError, AppResult},
    services::CueSettings,
    state::{AppState, Screen, Settings},
    utils::format_time,
    workouts::{
        interval::{is_runnable, total_seconds},
        Interval, IntervalPatch, PhaseKind,
    },
};
use super::responses::{
    ApiResponse, DeleteResponse, ErrorResponse, HealthResponse, IntervalsResponse,
    LoadedWorkoutResponse, StatusResponse, WorkoutsResponse,
};

type ApiResult<T> = Result<Json<T>, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidConfig | AppError::EmptyName => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotEditing => StatusCode::CONFLICT,
            AppError::UnknownInterval(_) | AppError::UnknownWorkout(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Lock(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Raw HIIT form values; normalised before the run starts
#[derive(Debug, Deserialize)]
pub struct StartHiitRequest {
    #[serde(default = "default_work")]
    pub work_seconds: u32,
    #[serde(default = "default_rest")]
    pub rest_seconds: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_work() -> u32 {
    TimerConfig::default().work_seconds
}

fn default_rest() -> u32 {
    TimerConfig::default().rest_seconds
}

fn default_rounds() -> u32 {
    TimerConfig::default().rounds
}

#[derive(Debug, Deserialize)]
pub struct AddIntervalRequest {
    pub kind: PhaseKind,
}

#[derive(Debug, Deserialize)]
pub struct StepRequest {
    pub delta: i32,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub target_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct SaveWorkoutRequest {
    pub name: String,
}

/// Run a state call that reads or writes the store on the blocking pool
async fn blocking<T, F>(state: Arc<AppState>, op: F) -> AppResult<T>
where
    F: FnOnce(&AppState) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state))
        .await
        .map_err(|e| AppError::Task(format!("Blocking task failed: {}", e)))?
}

fn intervals_response(intervals: Vec<Interval>) -> IntervalsResponse {
    let total = total_seconds(&intervals);
    IntervalsResponse {
        runnable: is_runnable(&intervals),
        total_time: format_time(u32::try_from(total).unwrap_or(u32::MAX)),
        total_seconds: total,
        intervals,
    }
}

// ---- timer control ----

/// Handle POST /timer/hiit/start
pub async fn start_hiit_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartHiitRequest>,
) -> ApiResult<ApiResponse> {
    let config = TimerConfig::clamped(req.work_seconds, req.rest_seconds, req.rounds);
    let run = state.start_hiit(config)?;
    Ok(Json(ApiResponse::applied("HIIT timer started", run)))
}

/// Handle POST /timer/custom/start
pub async fn start_custom_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let run = state.start_custom()?;
    Ok(Json(ApiResponse::applied("Custom workout started", run)))
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let (paused, run) = state.pause()?;
    Ok(Json(if paused {
        ApiResponse::applied("Timer paused", run)
    } else {
        ApiResponse::unchanged("Timer is not running", run)
    }))
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let (resumed, run) = state.resume()?;
    Ok(Json(if resumed {
        ApiResponse::applied("Timer resumed", run)
    } else {
        ApiResponse::unchanged("Timer is not paused", run)
    }))
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let run = state.reset()?;
    info!("Timer reset to editing");
    Ok(Json(ApiResponse::applied("Timer reset", run)))
}

/// Handle GET /status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let run = state.snapshot()?;
    let settings = blocking(Arc::clone(&state), |state| state.settings()).await?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        run,
        cues: state.cues.settings(),
        keep_screen_awake: settings.wake_lock.keeps_awake(Screen::Timer),
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ---- custom workout editor ----

/// Handle GET /custom/intervals
pub async fn list_intervals_handler(State(state): State<Arc<AppState>>) -> ApiResult<IntervalsResponse> {
    Ok(Json(intervals_response(state.intervals()?)))
}

/// Handle POST /custom/intervals
pub async fn add_interval_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddIntervalRequest>,
) -> Result<(StatusCode, Json<Interval>), AppError> {
    let interval = state.add_interval(req.kind)?;
    Ok((StatusCode::CREATED, Json(interval)))
}

/// Handle PATCH /custom/intervals/:id
pub async fn update_interval_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(patch): Json<IntervalPatch>,
) -> ApiResult<Interval> {
    Ok(Json(state.update_interval(id, patch)?))
}

/// Handle POST /custom/intervals/:id/step
pub async fn step_interval_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<StepRequest>,
) -> ApiResult<Interval> {
    Ok(Json(state.step_interval(id, req.delta)?))
}

/// Handle POST /custom/intervals/:id/move
pub async fn move_interval_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<MoveRequest>,
) -> ApiResult<IntervalsResponse> {
    Ok(Json(intervals_response(state.move_interval(id, req.target_id)?)))
}

/// Handle DELETE /custom/intervals/:id
pub async fn remove_interval_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<Interval> {
    Ok(Json(state.remove_interval(id)?))
}

// ---- saved workouts ----

/// Handle GET /workouts
pub async fn list_workouts_handler(State(state): State<Arc<AppState>>) -> ApiResult<WorkoutsResponse> {
    let workouts = blocking(state, |state| state.list_workouts()).await?;
    Ok(Json(WorkoutsResponse { workouts }))
}

/// Handle POST /workouts - save the editor's list under a name
pub async fn save_workout_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveWorkoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let saved = blocking(state, move |state| state.save_workout(&req.name)).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Handle POST /workouts/:id/load
pub async fn load_workout_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<LoadedWorkoutResponse> {
    let (intervals, run) = blocking(state, move |state| state.load_workout(&id)).await?;
    Ok(Json(LoadedWorkoutResponse { intervals, run }))
}

/// Handle DELETE /workouts/:id
pub async fn delete_workout_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let deleted = blocking(state, move |state| state.delete_workout(&id)).await?;
    Ok(Json(DeleteResponse { deleted }))
}

// ---- preferences ----

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(blocking(state, |state| state.settings()).await?))
}

/// Handle PUT /settings
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> ApiResult<Settings> {
    Ok(Json(blocking(state, move |state| state.update_settings(settings)).await?))
}

/// Handle GET /cues
pub async fn get_cues_handler(State(state): State<Arc<AppState>>) -> Json<CueSettings> {
    Json(state.cues.settings())
}

/// Handle PUT /cues
pub async fn put_cues_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<CueSettings>,
) -> ApiResult<CueSettings> {
    Ok(Json(state.update_cue_settings(settings)?))
}

//! HTTP request handlers for the Roster Engine API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every request is tagged with a correlation id that appears in each log
//! line it produces.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{Conflict, ShiftSlot, calculate_shift_hours};
use crate::engine::{Caller, NewPayPeriod, ShiftFilter, TimeOffFilter, TimeOffSubmission};
use crate::error::{EngineError, EngineResult};

use super::caller::AuthenticatedCaller;
use super::request::{
    AssignShiftRequest, CalendarQuery, DeclineRequest, DecisionRequest, RecurringRuleRequest,
    RuleQuery, UpdateShiftRequest,
};
use super::response::{ApiError, ApiErrorResponse, ConflictResponse};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/shifts", post(assign_shift).get(list_shifts))
        .route("/shifts/conflicts", post(check_conflicts))
        .route(
            "/shifts/:id",
            get(get_shift).put(update_shift).delete(delete_shift),
        )
        .route("/shifts/:id/accept", post(accept_shift))
        .route("/shifts/:id/decline", post(decline_shift))
        .route(
            "/recurring-rules",
            post(generate_recurring).get(list_recurring),
        )
        .route("/recurring-rules/:id", delete(delete_recurring))
        .route("/time-off", post(submit_time_off).get(list_time_off))
        .route(
            "/time-off/:id",
            get(get_time_off).delete(withdraw_time_off),
        )
        .route("/time-off/:id/approve", post(approve_time_off))
        .route("/time-off/:id/reject", post(reject_time_off))
        .route("/employees/:id/balance", get(get_balance))
        .route("/employees/:id/calendar", get(get_calendar))
        .route("/leave-years/rollover", post(roll_over_leave_year))
        .route("/pay-periods", post(create_pay_period).get(list_pay_periods))
        .route("/pay-periods/:id", get(get_pay_period))
        .route("/pay-periods/:id/preview", get(preview_payroll))
        .route("/pay-periods/:id/payroll", get(get_payroll))
        .route("/pay-periods/:id/close", post(close_pay_period))
        .with_state(state)
}

/// Per-request logging context.
struct RequestLog {
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
}

impl RequestLog {
    fn start(operation: &'static str, caller: &Caller) -> Self {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            operation,
            caller = %caller.employee_id,
            role = ?caller.role,
            "Processing request"
        );
        Self {
            correlation_id,
            operation,
            started: Instant::now(),
        }
    }

    /// Logs the outcome and renders it as JSON with `status` on success.
    fn finish<T: Serialize>(&self, status: StatusCode, result: EngineResult<T>) -> HandlerResult {
        match result {
            Ok(body) => {
                info!(
                    correlation_id = %self.correlation_id,
                    operation = self.operation,
                    status = status.as_u16(),
                    duration_us = self.started.elapsed().as_micros(),
                    "Request completed"
                );
                Ok(json_response(status, body))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: EngineError) -> ApiErrorResponse {
        warn!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            error = %err,
            duration_us = self.started.elapsed().as_micros(),
            "Request failed"
        );
        err.into()
    }

    /// Refuses a creation that collides with existing entries, unless the
    /// caller confirmed it.
    fn gate(&self, confirmed: bool, conflicts: &[Conflict]) -> Option<Response> {
        if conflicts.is_empty() || confirmed {
            if !conflicts.is_empty() {
                info!(
                    correlation_id = %self.correlation_id,
                    conflicts = conflicts.len(),
                    "Proceeding despite confirmed conflicts"
                );
            }
            return None;
        }
        warn!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            conflicts = conflicts.len(),
            "Conflicts detected, request refused"
        );
        Some(ConflictResponse::new(conflicts.to_vec()).into_response())
    }

    /// Unwraps a JSON body or turns the rejection into a 400.
    fn body<T>(&self, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
        let rejection = match payload {
            Ok(Json(body)) => return Ok(body),
            Err(rejection) => rejection,
        };
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                warn!(
                    correlation_id = %self.correlation_id,
                    error = %body_text,
                    "JSON data error"
                );
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                warn!(
                    correlation_id = %self.correlation_id,
                    error = %err,
                    "JSON syntax error"
                );
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
    }

    /// Like [`RequestLog::body`], but a request without a JSON body yields the default.
    fn optional_body<T: Default>(&self, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
        match payload {
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
            other => self.body(other),
        }
    }

    fn query<T>(&self, query: Result<Query<T>, QueryRejection>) -> Result<T, ApiErrorResponse> {
        query.map(|Query(q)| q).map_err(|rejection| {
            warn!(
                correlation_id = %self.correlation_id,
                error = %rejection.body_text(),
                "Invalid query string"
            );
            ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            )
        })
    }

    fn id(&self, raw: &str, entity: &str) -> Result<Uuid, ApiErrorResponse> {
        Uuid::parse_str(raw).map_err(|_| {
            self.fail(EngineError::validation(
                format!("{} id", entity),
                format!("'{}' is not a valid id", raw),
            ))
        })
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

// -----------------------------------------------------------------------------
// Shifts
// -----------------------------------------------------------------------------

/// Handler for POST /shifts.
///
/// Refuses with 409 when the slot conflicts unless `confirm_conflicts` is set.
async fn assign_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<AssignShiftRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("assign_shift", &caller);
    let request = log.body(payload)?;
    let shifts = state.engine().shifts();

    // Checked again by assign; bad input answers 400 before the 409 gate
    caller
        .require_admin("assign shifts")
        .and_then(|_| calculate_shift_hours(request.shift.start_time, request.shift.end_time))
        .map_err(|err| log.fail(err))?;

    let conflicts = shifts.check_conflicts(&request.shift.slot(), None);
    if let Some(refused) = log.gate(request.confirm_conflicts, &conflicts) {
        return Ok(refused);
    }
    log.finish(StatusCode::CREATED, shifts.assign(&caller, request.shift))
}

async fn list_shifts(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    query: Result<Query<ShiftFilter>, QueryRejection>,
) -> HandlerResult {
    let log = RequestLog::start("list_shifts", &caller);
    let filter = log.query(query)?;
    log.finish(StatusCode::OK, state.engine().shifts().list(&caller, &filter))
}

#[derive(Serialize)]
struct ConflictCheck {
    conflicts: Vec<Conflict>,
}

/// Handler for POST /shifts/conflicts. Never refuses; reports only.
async fn check_conflicts(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<ShiftSlot>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("check_conflicts", &caller);
    let slot = log.body(payload)?;
    let result = caller
        .require_owner_or_admin(&slot.employee_id, "check conflicts")
        .map(|_| ConflictCheck {
            conflicts: state.engine().shifts().check_conflicts(&slot, None),
        });
    log.finish(StatusCode::OK, result)
}

async fn get_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("get_shift", &caller);
    let id = log.id(&id, "shift")?;
    log.finish(StatusCode::OK, state.engine().shifts().get(&caller, id))
}

/// Handler for PUT /shifts/:id. Conflict-gated like assignment.
async fn update_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
    payload: Result<Json<UpdateShiftRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("update_shift", &caller);
    let id = log.id(&id, "shift")?;
    let request = log.body(payload)?;
    let shifts = state.engine().shifts();

    // Checked again by update; bad input answers 400 before the 409 gate
    let existing = caller
        .require_admin("edit shifts")
        .and_then(|_| calculate_shift_hours(request.update.start_time, request.update.end_time))
        .and_then(|_| shifts.get(&caller, id))
        .map_err(|err| log.fail(err))?;

    let slot = ShiftSlot {
        employee_id: existing.employee_id,
        date: request.update.date,
        start_time: request.update.start_time,
        end_time: request.update.end_time,
    };
    let conflicts = shifts.check_conflicts(&slot, Some(id));
    if let Some(refused) = log.gate(request.confirm_conflicts, &conflicts) {
        return Ok(refused);
    }
    log.finish(StatusCode::OK, shifts.update(&caller, id, request.update))
}

async fn delete_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("delete_shift", &caller);
    let id = log.id(&id, "shift")?;
    log.finish(StatusCode::OK, state.engine().shifts().delete(&caller, id))
}

async fn accept_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("accept_shift", &caller);
    let id = log.id(&id, "shift")?;
    log.finish(StatusCode::OK, state.engine().shifts().accept(&caller, id))
}

async fn decline_shift(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
    payload: Result<Json<DeclineRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("decline_shift", &caller);
    let id = log.id(&id, "shift")?;
    let request = log.body(payload)?;
    let result = state
        .engine()
        .shifts()
        .decline(&caller, id, request.decline_type, &request.reason);
    log.finish(StatusCode::OK, result)
}

// -----------------------------------------------------------------------------
// Recurring rules
// -----------------------------------------------------------------------------

/// Handler for POST /recurring-rules.
///
/// Every date the rule expands to is checked; any conflict refuses the
/// whole rule with 409 unless `confirm_conflicts` is set.
async fn generate_recurring(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<RecurringRuleRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("generate_recurring", &caller);
    let request = log.body(payload)?;
    let recurring = state.engine().recurring();

    // Checked again by generate; bad input answers 400 before the 409 gate
    let conflicts = caller
        .require_admin("create recurring rules")
        .and_then(|_| recurring.check_conflicts(&request.rule))
        .map_err(|err| log.fail(err))?;
    if let Some(refused) = log.gate(request.confirm_conflicts, &conflicts) {
        return Ok(refused);
    }
    log.finish(StatusCode::CREATED, recurring.generate(&caller, request.rule))
}

async fn list_recurring(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    query: Result<Query<RuleQuery>, QueryRejection>,
) -> HandlerResult {
    let log = RequestLog::start("list_recurring", &caller);
    let query = log.query(query)?;
    let result = state
        .engine()
        .recurring()
        .list(&caller, query.employee_id.as_deref());
    log.finish(StatusCode::OK, result)
}

async fn delete_recurring(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("delete_recurring", &caller);
    let id = log.id(&id, "recurring rule")?;
    log.finish(StatusCode::OK, state.engine().recurring().delete(&caller, id))
}

// -----------------------------------------------------------------------------
// Time off
// -----------------------------------------------------------------------------

async fn submit_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<TimeOffSubmission>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("submit_time_off", &caller);
    let submission = log.body(payload)?;
    log.finish(
        StatusCode::CREATED,
        state.engine().time_off().submit(&caller, submission),
    )
}

async fn list_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    query: Result<Query<TimeOffFilter>, QueryRejection>,
) -> HandlerResult {
    let log = RequestLog::start("list_time_off", &caller);
    let filter = log.query(query)?;
    log.finish(StatusCode::OK, state.engine().time_off().list(&caller, &filter))
}

async fn get_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("get_time_off", &caller);
    let id = log.id(&id, "time-off request")?;
    log.finish(StatusCode::OK, state.engine().time_off().get(&caller, id))
}

async fn withdraw_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("withdraw_time_off", &caller);
    let id = log.id(&id, "time-off request")?;
    log.finish(StatusCode::OK, state.engine().time_off().withdraw(&caller, id))
}

async fn approve_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("approve_time_off", &caller);
    let id = log.id(&id, "time-off request")?;
    let decision = log.optional_body(payload)?;
    log.finish(
        StatusCode::OK,
        state.engine().time_off().approve(&caller, id, decision.note),
    )
}

async fn reject_time_off(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("reject_time_off", &caller);
    let id = log.id(&id, "time-off request")?;
    let decision = log.optional_body(payload)?;
    log.finish(
        StatusCode::OK,
        state.engine().time_off().reject(&caller, id, decision.note),
    )
}

// -----------------------------------------------------------------------------
// Employees and leave
// -----------------------------------------------------------------------------

async fn get_balance(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(employee_id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("get_balance", &caller);
    log.finish(StatusCode::OK, state.engine().balance(&caller, &employee_id))
}

async fn get_calendar(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(employee_id): Path<String>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> HandlerResult {
    let log = RequestLog::start("get_calendar", &caller);
    let range = log.query(query)?;
    let result = state
        .engine()
        .calendar()
        .days(&caller, &employee_id, range.from, range.to);
    log.finish(StatusCode::OK, result)
}

async fn roll_over_leave_year(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let log = RequestLog::start("roll_over_leave_year", &caller);
    log.finish(StatusCode::OK, state.engine().roll_over_year(&caller))
}

// -----------------------------------------------------------------------------
// Pay periods
// -----------------------------------------------------------------------------

async fn create_pay_period(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<NewPayPeriod>, JsonRejection>,
) -> HandlerResult {
    let log = RequestLog::start("create_pay_period", &caller);
    let new_period = log.body(payload)?;
    log.finish(
        StatusCode::CREATED,
        state.engine().pay_periods().create(&caller, new_period),
    )
}

async fn list_pay_periods(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let log = RequestLog::start("list_pay_periods", &caller);
    log.finish(StatusCode::OK, Ok(state.engine().pay_periods().list()))
}

async fn get_pay_period(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("get_pay_period", &caller);
    let id = log.id(&id, "pay period")?;
    log.finish(StatusCode::OK, state.engine().pay_periods().get(id))
}

async fn preview_payroll(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("preview_payroll", &caller);
    let id = log.id(&id, "pay period")?;
    log.finish(StatusCode::OK, state.engine().pay_periods().preview(&caller, id))
}

async fn get_payroll(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("get_payroll", &caller);
    let id = log.id(&id, "pay period")?;
    log.finish(StatusCode::OK, state.engine().pay_periods().payroll(&caller, id))
}

async fn close_pay_period(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<String>,
) -> HandlerResult {
    let log = RequestLog::start("close_pay_period", &caller);
    let id = log.id(&id, "pay period")?;
    log.finish(StatusCode::OK, state.engine().pay_periods().close(&caller, id))
}

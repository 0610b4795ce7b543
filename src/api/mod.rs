//! HTTP API module for the Roster Engine.
//!
//! This module exposes the scheduling engine as JSON over HTTP. The caller
//! identity is taken from the `X-Employee-Id` and `X-Role` headers set by
//! the session layer in front of the service.

mod caller;
mod handlers;
mod request;
mod response;
mod state;

pub use caller::{AuthenticatedCaller, EMPLOYEE_ID_HEADER, ROLE_HEADER};
pub use handlers::create_router;
pub use request::{
    AssignShiftRequest, CalendarQuery, DeclineRequest, DecisionRequest, RecurringRuleRequest,
    RuleQuery, UpdateShiftRequest,
};
pub use response::{ApiError, ApiErrorResponse, ConflictResponse};
pub use state::AppState;

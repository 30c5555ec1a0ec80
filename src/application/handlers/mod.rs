//! Application handlers.
//!
//! Command and query handlers that coordinate the domain orchestrator with
//! the completion service, the session store and the file store.

mod error;
mod get_session;
mod process_turn;
mod reset_session;
mod session_locks;
mod start_session;
mod update_location;
mod update_profile;
mod upload_insurance_document;

pub use error::SessionCommandError;
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, TurnOutcome, TurnSettings,
};
pub use reset_session::{ResetSessionCommand, ResetSessionHandler};
pub use session_locks::{SessionGuard, SessionLocks};
pub use start_session::StartSessionHandler;
pub use update_location::{UpdateLocationCommand, UpdateLocationHandler};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};
pub use upload_insurance_document::{
    UploadInsuranceDocumentCommand, UploadInsuranceDocumentError, UploadInsuranceDocumentHandler,
};

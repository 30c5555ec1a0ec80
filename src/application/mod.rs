//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer drives the domain and coordinates between ports.

pub mod handlers;

pub use handlers::{
    GetSessionHandler, GetSessionQuery, ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler,
    ResetSessionCommand, ResetSessionHandler, SessionCommandError, SessionGuard, SessionLocks,
    StartSessionHandler, TurnOutcome, TurnSettings, UpdateLocationCommand, UpdateLocationHandler,
    UpdateProfileCommand, UpdateProfileHandler, UploadInsuranceDocumentCommand,
    UploadInsuranceDocumentError, UploadInsuranceDocumentHandler,
};

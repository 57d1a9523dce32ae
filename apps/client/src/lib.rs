//! Client-side flow logic for the CV portfolio builder.
//!
//! Everything the web pages do besides painting HTML lives here: the
//! multi-step wizards (template generation, portfolio deployment), the CV
//! section editor, the persisted document store shared across pages, page
//! gating, the backend API client, and the job-matching fallback. The
//! rendering layer is an external collaborator reached only through the
//! view-binding traits in [`view`].

pub mod api;
pub mod config;
pub mod editor;
pub mod errors;
pub mod gate;
pub mod logging;
pub mod matching;
pub mod models;
pub mod progress;
pub mod store;
pub mod view;
pub mod wizard;

pub use api::ApiClient;
pub use config::Config;
pub use errors::AppError;
pub use store::Store;

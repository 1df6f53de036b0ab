//! ComfyUI job submission and completion tracking.
//!
//! Drives a ComfyUI-compatible image-generation service: submit a workflow
//! over HTTP, wait on the WebSocket push channel for the job-scoped
//! completion event, then download the output artifacts via the history
//! endpoint. [`avatar::generate_custom_avatar`] ties the pieces together
//! for the event-pass use case.

pub mod api;
pub mod avatar;
pub mod backoff;
pub mod client;
pub mod messages;
pub mod outputs;
pub mod waiter;
pub mod workflow;

pub use api::{ComfyUIApi, JobHandle};
pub use avatar::AvatarResult;
pub use client::{ComfyUIClient, ComfyUIConnection};
pub use waiter::await_completion;

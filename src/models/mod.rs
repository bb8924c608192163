mod project;
mod status;

pub use project::{HEADER, ProjectRecord, TrackedProject};
pub use status::{STATUS_CHOICES, Status};

// Network acquisition: guarded downloads, submission and endpoint discovery

pub mod assets;
pub mod client;
pub mod drive;
pub mod error;
pub mod guard;
pub mod probe;
pub mod submit;
pub mod transcribe;

pub use assets::{AcquisitionRoute, AssetCollector, candidate_links, route_for};
pub use client::{HttpBody, HttpClient};
pub use drive::{DEFAULT_DRIVE_ENDPOINT, DriveFetcher, drive_file_id};
pub use error::{Error, Result};
pub use guard::{GuardRejection, SsrfGuard, is_forbidden_ip};
pub use probe::{EndpointProber, PROBE_PATHS, ProbeHit};
pub use submit::{SubmitPayload, post_answer};
pub use transcribe::{DEFAULT_TRANSCRIBE_MODEL, DEFAULT_TRANSCRIBE_URL, RemoteTranscriber};

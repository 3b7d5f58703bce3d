//! Typed API client core for the portfolio content service.
//!
//! # Overview
//! Two layers. The lower layer builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network, so request shapes
//! and response handling are fully deterministic and testable. The upper
//! layer (`PortfolioApi`) executes those requests through a pluggable
//! transport, attaching the stored access token and transparently retrying
//! once after a refresh when the server answers 401.
//!
//! # Design
//! - `PortfolioClient` is stateless; it holds only `base_url`. Each
//!   operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `SessionStore` is the single place tokens and the cached profile are
//!   written.
//! - `HttpTransport` is the seam between the client and the network;
//!   production uses `reqwest`, tests script responses.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::PortfolioClient;
pub use error::ApiError;
pub use fallback::{DataSource, Sourced};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use session::PortfolioApi;
pub use store::SessionStore;
pub use transport::ReqwestTransport;
pub use types::{
    AuthTokens, BlogPost, BlogPostInput, BlogPostPatch, BlogStatus, ContactForm, Degree, Education,
    EducationInput, EducationPatch, EmailResponse, Experience, ExperienceInput, ExperiencePatch,
    ListFilter, LoginCredentials, Profile, ProfilePatch, Project, ProjectImage, ProjectImageInput,
    ProjectImagePatch, ProjectInput, ProjectPatch, Stats, Tags, TechStackStats, Testimonial,
    TestimonialInput, TestimonialPatch,
};

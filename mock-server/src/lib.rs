//! In-memory double of the portfolio content API.
//!
//! Serves the same routes, filters, and auth contract as the real service so
//! the client crate's integration tests (and local development) can run
//! against it. State lives behind a single `RwLock`; uuid strings act as
//! opaque access and refresh tokens. DTOs are defined independently from the
//! client crate so schema drift shows up in tests instead of compiling away.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::{net::TcpListener, sync::RwLock};

mod auth;
mod content;

/// Credentials accepted by `/api/auth/login/` on a default state.
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "portfolio-admin";

#[derive(Clone, Debug, Serialize)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub location: String,
    pub skills: Vec<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProjectImage {
    pub id: i64,
    pub image: String,
    pub caption: Option<String>,
    pub order: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub github_url: Option<String>,
    pub live_demo_url: Option<String>,
    pub playstore_url: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub images: Vec<ProjectImage>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Experience {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub responsibilities: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub company_url: Option<String>,
    pub location: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Education {
    pub id: i64,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub details: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Testimonial {
    pub id: i64,
    pub reviewer_name: String,
    pub reviewer_position: String,
    pub reviewer_company: String,
    pub quote: String,
    pub reviewer_image: Option<String>,
    pub reviewer_linkedin: Option<String>,
    pub is_featured: bool,
    pub order: i32,
}

/// Stored with its publication state; the state itself never serializes, so
/// admin and public responses share one record shape.
#[derive(Clone, Debug, Serialize)]
pub struct BlogPost {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub status: String,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == "published"
    }
}

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Whole-server state. Tests construct and seed one directly, then build the
/// router with [`app_with_state`].
#[derive(Debug)]
pub struct MockState {
    pub username: String,
    pub password: String,
    pub access_tokens: HashSet<String>,
    pub refresh_tokens: HashSet<String>,
    pub profile: Profile,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub testimonials: Vec<Testimonial>,
    pub blog_posts: Vec<BlogPost>,
    pub sent_emails: Vec<SentEmail>,
    pub next_project_id: i64,
    pub next_image_id: i64,
    pub next_experience_id: i64,
    pub next_education_id: i64,
    pub next_testimonial_id: i64,
    pub next_blog_id: i64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            access_tokens: HashSet::new(),
            refresh_tokens: HashSet::new(),
            profile: Profile {
                name: "Site Owner".to_string(),
                bio: "Software engineer.".to_string(),
                profile_picture: None,
                location: "Nairobi".to_string(),
                skills: vec!["Rust".to_string(), "Python".to_string()],
                github_url: None,
                linkedin_url: None,
                twitter_url: None,
                website_url: None,
            },
            projects: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            testimonials: Vec::new(),
            blog_posts: Vec::new(),
            sent_emails: Vec::new(),
            next_project_id: 1,
            next_image_id: 1,
            next_experience_id: 1,
            next_education_id: 1,
            next_testimonial_id: 1,
            next_blog_id: 1,
        }
    }
}

pub type SharedState = Arc<RwLock<MockState>>;

/// Router over a fresh default state.
pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(MockState::default())))
}

/// Router over caller-provided (possibly seeded) state.
pub fn app_with_state(state: SharedState) -> Router {
    let admin = Router::new()
        .route("/profile/", patch(content::update_profile))
        .route("/projects/", post(content::create_project))
        .route(
            "/projects/{slug}/",
            patch(content::update_project).delete(content::delete_project),
        )
        .route(
            "/projects/{slug}/images/",
            get(content::list_project_images).post(content::create_project_image),
        )
        .route(
            "/project-images/{id}/",
            patch(content::update_project_image).delete(content::delete_project_image),
        )
        .route("/experience/", post(content::create_experience))
        .route(
            "/experience/{id}/",
            patch(content::update_experience).delete(content::delete_experience),
        )
        .route("/education/", post(content::create_education))
        .route(
            "/education/{id}/",
            patch(content::update_education).delete(content::delete_education),
        )
        .route("/testimonials/", post(content::create_testimonial))
        .route(
            "/testimonials/{id}/",
            patch(content::update_testimonial).delete(content::delete_testimonial),
        )
        .route("/blogs/", post(content::create_blog_post))
        .route(
            "/blogs/{slug}/",
            patch(content::update_blog_post).delete(content::delete_blog_post),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/api/profile/", get(content::get_profile))
        .route("/api/projects/", get(content::list_projects))
        .route("/api/projects/{slug}/", get(content::get_project))
        .route("/api/experience/", get(content::list_experience))
        .route("/api/education/", get(content::list_education))
        .route("/api/testimonials/", get(content::list_testimonials))
        .route("/api/blogs/", get(content::list_blog_posts))
        .route("/api/blogs/{slug}/", get(content::get_blog_post))
        .route("/api/tags/", get(content::get_tags))
        .route("/api/stats/", get(content::get_stats))
        .route("/api/tech-stack/", get(content::get_tech_stack))
        .route("/api/send-email/", post(content::send_email))
        .route("/api/auth/login/", post(auth::login))
        .route("/api/auth/refresh/", post(auth::refresh))
        .route("/api/auth/verify/", post(auth::verify))
        .nest("/api/admin", admin)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

//! Domain DTOs for the portfolio content API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The client and the server double each own their shapes; integration tests
//! catch any drift between the two crates.
//!
//! Records (`Profile`, `Project`, ...) are what the API returns. Each mutable
//! entity also has an input type for creation and a patch type for partial
//! updates. Patch fields are all optional and omitted from the JSON when
//! absent, so the server only touches what the caller set.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The site owner's profile. A singleton on the server side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub location: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// Partial update for the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// An image attached to a project, ordered within its gallery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectImage {
    pub id: i64,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub order: i32,
}

/// Payload for attaching a new image to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectImageInput {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub order: i32,
}

/// Partial update for a project image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectImagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// A portfolio project. The slug is assigned by the server from the title
/// and is the key for lookups and admin mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playstore_url: Option<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
}

/// Payload for creating a project. Slug and id come back from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playstore_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playstore_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

/// A work-experience entry. `end_date` is absent exactly when `is_current`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub responsibilities: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    pub location: String,
}

/// Payload for creating an experience entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceInput {
    pub company_name: String,
    pub position: String,
    pub responsibilities: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    pub location: String,
}

/// Partial update for an experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperiencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Academic degree level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    Bachelor,
    Master,
    Phd,
    Diploma,
    Certificate,
}

/// An education entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub id: i64,
    pub institution: String,
    pub degree: Degree,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Payload for creating an education entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationInput {
    pub institution: String,
    pub degree: Degree,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Partial update for an education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<Degree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A testimonial. `order` is the manual sort key, lowest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub id: i64,
    pub reviewer_name: String,
    pub reviewer_position: String,
    pub reviewer_company: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_linkedin: Option<String>,
    pub is_featured: bool,
    pub order: i32,
}

/// Payload for creating a testimonial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestimonialInput {
    pub reviewer_name: String,
    pub reviewer_position: String,
    pub reviewer_company: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_linkedin: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
}

/// Partial update for a testimonial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestimonialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Publication state for blog posts. Public routes only serve published
/// posts; the state itself is only visible through the admin surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

/// A blog post as served by the public routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
}

/// Payload for creating a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
}

/// Partial update for a blog post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
}

/// Query filters accepted by the project and blog list endpoints. `featured`
/// and the text filters combine; absent fields add nothing to the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub featured: Option<bool>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

/// Tag listings aggregated across projects and blog posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tags {
    pub project_tags: Vec<String>,
    pub blog_tags: Vec<String>,
    pub all_tags: Vec<String>,
}

/// Site-wide counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total_projects: u64,
    pub featured_projects: u64,
    pub total_blog_posts: u64,
    pub featured_blog_posts: u64,
    pub total_experience: u64,
    pub total_education: u64,
    pub total_testimonials: u64,
    pub featured_testimonials: u64,
}

/// Technology usage across projects: the full count map plus the ten most
/// used entries, highest count first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechStackStats {
    pub tech_stack: HashMap<String, u64>,
    pub most_used: Vec<(String, u64)>,
}

/// A contact-form submission. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Acknowledgement returned by the email relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailResponse {
    pub message: String,
}

/// The access/refresh pair issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// Login request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

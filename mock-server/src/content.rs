//! Entity handlers: CRUD, list filters, slug assignment, aggregations, and
//! the contact-form relay.
//!
//! Filter semantics follow the real service: `featured` filters on parameter
//! presence, `tag` and `search` are case-insensitive substring matches.
//! List ordering also mirrors it: projects and blogs newest first,
//! experience and education by start date descending, testimonials by their
//! manual order, images by theirs.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    BlogPost, Education, Experience, Profile, Project, ProjectImage, SentEmail, SharedState,
    Testimonial,
};

/// Query parameters accepted by the project and blog list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub featured: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_tag_contains(tags: &[String], needle: &str) -> bool {
    tags.iter().any(|tag| icontains(tag, needle))
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// Suffix with `-1`, `-2`... until the slug is free in `taken`.
fn unique_slug(title: &str, taken: &[&str]) -> String {
    let base = slugify(title);
    if !taken.contains(&base.as_str()) {
        return base;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

fn dedup(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}

// --- Profile ---

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub website_url: Option<String>,
}

pub async fn get_profile(State(state): State<SharedState>) -> Json<Profile> {
    Json(state.read().await.profile.clone())
}

pub async fn update_profile(
    State(state): State<SharedState>,
    Json(input): Json<ProfileUpdate>,
) -> Json<Profile> {
    let mut state = state.write().await;
    let profile = &mut state.profile;
    if let Some(name) = input.name {
        profile.name = name;
    }
    if let Some(bio) = input.bio {
        profile.bio = bio;
    }
    if let Some(picture) = input.profile_picture {
        profile.profile_picture = Some(picture);
    }
    if let Some(location) = input.location {
        profile.location = location;
    }
    if let Some(skills) = input.skills {
        profile.skills = skills;
    }
    if let Some(url) = input.github_url {
        profile.github_url = Some(url);
    }
    if let Some(url) = input.linkedin_url {
        profile.linkedin_url = Some(url);
    }
    if let Some(url) = input.twitter_url {
        profile.twitter_url = Some(url);
    }
    if let Some(url) = input.website_url {
        profile.website_url = Some(url);
    }
    Json(state.profile.clone())
}

// --- Projects ---

#[derive(Debug, Deserialize)]
pub struct ProjectCreate {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub github_url: Option<String>,
    pub live_demo_url: Option<String>,
    pub playstore_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub github_url: Option<String>,
    pub live_demo_url: Option<String>,
    pub playstore_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

fn project_matches(project: &Project, query: &ListQuery) -> bool {
    if query.featured.is_some() && !project.is_featured {
        return false;
    }
    if let Some(tag) = &query.tag {
        if !any_tag_contains(&project.tags, tag) {
            return false;
        }
    }
    if let Some(search) = &query.search {
        if !icontains(&project.title, search)
            && !icontains(&project.description, search)
            && !any_tag_contains(&project.tags, search)
        {
            return false;
        }
    }
    true
}

fn ordered_project(mut project: Project) -> Project {
    project.images.sort_by_key(|image| image.order);
    project
}

pub async fn list_projects(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Project>> {
    let state = state.read().await;
    let mut projects: Vec<Project> = state
        .projects
        .iter()
        .filter(|project| project_matches(project, &query))
        .cloned()
        .map(ordered_project)
        .collect();
    projects.sort_by(|a, b| b.id.cmp(&a.id));
    Json(projects)
}

pub async fn get_project(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, StatusCode> {
    let state = state.read().await;
    state
        .projects
        .iter()
        .find(|project| project.slug == slug)
        .cloned()
        .map(ordered_project)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_project(
    State(state): State<SharedState>,
    Json(input): Json<ProjectCreate>,
) -> (StatusCode, Json<Project>) {
    let mut state = state.write().await;
    let taken: Vec<&str> = state.projects.iter().map(|p| p.slug.as_str()).collect();
    let slug = unique_slug(&input.title, &taken);
    let id = state.next_project_id;
    state.next_project_id += 1;
    let project = Project {
        id,
        slug,
        title: input.title,
        description: input.description,
        tech_stack: input.tech_stack,
        start_date: input.start_date,
        end_date: input.end_date,
        github_url: input.github_url,
        live_demo_url: input.live_demo_url,
        playstore_url: input.playstore_url,
        tags: input.tags,
        is_featured: input.is_featured,
        images: Vec::new(),
    };
    state.projects.push(project.clone());
    (StatusCode::CREATED, Json(project))
}

pub async fn update_project(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(input): Json<ProjectUpdate>,
) -> Result<Json<Project>, StatusCode> {
    let mut state = state.write().await;
    let project = state
        .projects
        .iter_mut()
        .find(|project| project.slug == slug)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        project.title = title;
    }
    if let Some(description) = input.description {
        project.description = description;
    }
    if let Some(tech_stack) = input.tech_stack {
        project.tech_stack = tech_stack;
    }
    if let Some(start_date) = input.start_date {
        project.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        project.end_date = Some(end_date);
    }
    if let Some(url) = input.github_url {
        project.github_url = Some(url);
    }
    if let Some(url) = input.live_demo_url {
        project.live_demo_url = Some(url);
    }
    if let Some(url) = input.playstore_url {
        project.playstore_url = Some(url);
    }
    if let Some(tags) = input.tags {
        project.tags = tags;
    }
    if let Some(is_featured) = input.is_featured {
        project.is_featured = is_featured;
    }
    Ok(Json(ordered_project(project.clone())))
}

pub async fn delete_project(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    let before = state.projects.len();
    state.projects.retain(|project| project.slug != slug);
    if state.projects.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Project images ---

#[derive(Debug, Deserialize)]
pub struct ProjectImageCreate {
    pub image: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ProjectImageUpdate {
    pub image: Option<String>,
    pub caption: Option<String>,
    pub order: Option<i32>,
}

pub async fn list_project_images(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Json<Vec<ProjectImage>> {
    let state = state.read().await;
    let mut images: Vec<ProjectImage> = state
        .projects
        .iter()
        .filter(|project| project.slug == slug)
        .flat_map(|project| project.images.iter().cloned())
        .collect();
    images.sort_by_key(|image| image.order);
    Json(images)
}

pub async fn create_project_image(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(input): Json<ProjectImageCreate>,
) -> Result<(StatusCode, Json<ProjectImage>), StatusCode> {
    let mut state = state.write().await;
    let id = state.next_image_id;
    let project = state
        .projects
        .iter_mut()
        .find(|project| project.slug == slug)
        .ok_or(StatusCode::NOT_FOUND)?;
    let image = ProjectImage {
        id,
        image: input.image,
        caption: input.caption,
        order: input.order,
    };
    project.images.push(image.clone());
    state.next_image_id += 1;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn update_project_image(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectImageUpdate>,
) -> Result<Json<ProjectImage>, StatusCode> {
    let mut state = state.write().await;
    let image = state
        .projects
        .iter_mut()
        .flat_map(|project| project.images.iter_mut())
        .find(|image| image.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(path) = input.image {
        image.image = path;
    }
    if let Some(caption) = input.caption {
        image.caption = Some(caption);
    }
    if let Some(order) = input.order {
        image.order = order;
    }
    Ok(Json(image.clone()))
}

pub async fn delete_project_image(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    for project in &mut state.projects {
        let before = project.images.len();
        project.images.retain(|image| image.id != id);
        if project.images.len() != before {
            return Ok(StatusCode::NO_CONTENT);
        }
    }
    Err(StatusCode::NOT_FOUND)
}

// --- Experience ---

#[derive(Debug, Deserialize)]
pub struct ExperienceCreate {
    pub company_name: String,
    pub position: String,
    pub responsibilities: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    pub company_url: Option<String>,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceUpdate {
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub responsibilities: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
    pub company_url: Option<String>,
    pub location: Option<String>,
}

pub async fn list_experience(State(state): State<SharedState>) -> Json<Vec<Experience>> {
    let state = state.read().await;
    let mut entries = state.experience.clone();
    entries.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    Json(entries)
}

pub async fn create_experience(
    State(state): State<SharedState>,
    Json(input): Json<ExperienceCreate>,
) -> (StatusCode, Json<Experience>) {
    let mut state = state.write().await;
    let id = state.next_experience_id;
    state.next_experience_id += 1;
    let entry = Experience {
        id,
        company_name: input.company_name,
        position: input.position,
        responsibilities: input.responsibilities,
        start_date: input.start_date,
        end_date: input.end_date,
        is_current: input.is_current,
        company_url: input.company_url,
        location: input.location,
    };
    state.experience.push(entry.clone());
    (StatusCode::CREATED, Json(entry))
}

pub async fn update_experience(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<ExperienceUpdate>,
) -> Result<Json<Experience>, StatusCode> {
    let mut state = state.write().await;
    let entry = state
        .experience
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(company_name) = input.company_name {
        entry.company_name = company_name;
    }
    if let Some(position) = input.position {
        entry.position = position;
    }
    if let Some(responsibilities) = input.responsibilities {
        entry.responsibilities = responsibilities;
    }
    if let Some(start_date) = input.start_date {
        entry.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        entry.end_date = Some(end_date);
    }
    if let Some(is_current) = input.is_current {
        entry.is_current = is_current;
        if is_current {
            entry.end_date = None;
        }
    }
    if let Some(company_url) = input.company_url {
        entry.company_url = Some(company_url);
    }
    if let Some(location) = input.location {
        entry.location = location;
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_experience(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    let before = state.experience.len();
    state.experience.retain(|entry| entry.id != id);
    if state.experience.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Education ---

#[derive(Debug, Deserialize)]
pub struct EducationCreate {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EducationUpdate {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub details: Option<String>,
}

pub async fn list_education(State(state): State<SharedState>) -> Json<Vec<Education>> {
    let state = state.read().await;
    let mut entries = state.education.clone();
    entries.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    Json(entries)
}

pub async fn create_education(
    State(state): State<SharedState>,
    Json(input): Json<EducationCreate>,
) -> (StatusCode, Json<Education>) {
    let mut state = state.write().await;
    let id = state.next_education_id;
    state.next_education_id += 1;
    let entry = Education {
        id,
        institution: input.institution,
        degree: input.degree,
        field_of_study: input.field_of_study,
        start_date: input.start_date,
        end_date: input.end_date,
        grade: input.grade,
        details: input.details,
    };
    state.education.push(entry.clone());
    (StatusCode::CREATED, Json(entry))
}

pub async fn update_education(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<EducationUpdate>,
) -> Result<Json<Education>, StatusCode> {
    let mut state = state.write().await;
    let entry = state
        .education
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(institution) = input.institution {
        entry.institution = institution;
    }
    if let Some(degree) = input.degree {
        entry.degree = degree;
    }
    if let Some(field_of_study) = input.field_of_study {
        entry.field_of_study = field_of_study;
    }
    if let Some(start_date) = input.start_date {
        entry.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        entry.end_date = Some(end_date);
    }
    if let Some(grade) = input.grade {
        entry.grade = Some(grade);
    }
    if let Some(details) = input.details {
        entry.details = Some(details);
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_education(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    let before = state.education.len();
    state.education.retain(|entry| entry.id != id);
    if state.education.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Testimonials ---

#[derive(Debug, Deserialize)]
pub struct TestimonialCreate {
    pub reviewer_name: String,
    pub reviewer_position: String,
    pub reviewer_company: String,
    pub quote: String,
    pub reviewer_image: Option<String>,
    pub reviewer_linkedin: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct TestimonialUpdate {
    pub reviewer_name: Option<String>,
    pub reviewer_position: Option<String>,
    pub reviewer_company: Option<String>,
    pub quote: Option<String>,
    pub reviewer_image: Option<String>,
    pub reviewer_linkedin: Option<String>,
    pub is_featured: Option<bool>,
    pub order: Option<i32>,
}

pub async fn list_testimonials(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Testimonial>> {
    let state = state.read().await;
    let mut entries: Vec<Testimonial> = state
        .testimonials
        .iter()
        .filter(|entry| query.featured.is_none() || entry.is_featured)
        .cloned()
        .collect();
    entries.sort_by(|a, b| a.order.cmp(&b.order).then(b.id.cmp(&a.id)));
    Json(entries)
}

pub async fn create_testimonial(
    State(state): State<SharedState>,
    Json(input): Json<TestimonialCreate>,
) -> (StatusCode, Json<Testimonial>) {
    let mut state = state.write().await;
    let id = state.next_testimonial_id;
    state.next_testimonial_id += 1;
    let entry = Testimonial {
        id,
        reviewer_name: input.reviewer_name,
        reviewer_position: input.reviewer_position,
        reviewer_company: input.reviewer_company,
        quote: input.quote,
        reviewer_image: input.reviewer_image,
        reviewer_linkedin: input.reviewer_linkedin,
        is_featured: input.is_featured,
        order: input.order,
    };
    state.testimonials.push(entry.clone());
    (StatusCode::CREATED, Json(entry))
}

pub async fn update_testimonial(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<TestimonialUpdate>,
) -> Result<Json<Testimonial>, StatusCode> {
    let mut state = state.write().await;
    let entry = state
        .testimonials
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(reviewer_name) = input.reviewer_name {
        entry.reviewer_name = reviewer_name;
    }
    if let Some(reviewer_position) = input.reviewer_position {
        entry.reviewer_position = reviewer_position;
    }
    if let Some(reviewer_company) = input.reviewer_company {
        entry.reviewer_company = reviewer_company;
    }
    if let Some(quote) = input.quote {
        entry.quote = quote;
    }
    if let Some(reviewer_image) = input.reviewer_image {
        entry.reviewer_image = Some(reviewer_image);
    }
    if let Some(reviewer_linkedin) = input.reviewer_linkedin {
        entry.reviewer_linkedin = Some(reviewer_linkedin);
    }
    if let Some(is_featured) = input.is_featured {
        entry.is_featured = is_featured;
    }
    if let Some(order) = input.order {
        entry.order = order;
    }
    Ok(Json(entry.clone()))
}

pub async fn delete_testimonial(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    let before = state.testimonials.len();
    state.testimonials.retain(|entry| entry.id != id);
    if state.testimonials.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Blog posts ---

#[derive(Debug, Deserialize)]
pub struct BlogPostCreate {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlogPostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub is_featured: Option<bool>,
    pub status: Option<String>,
}

fn blog_matches(post: &BlogPost, query: &ListQuery) -> bool {
    if query.featured.is_some() && !post.is_featured {
        return false;
    }
    if let Some(tag) = &query.tag {
        if !any_tag_contains(&post.tags, tag) {
            return false;
        }
    }
    if let Some(search) = &query.search {
        if !icontains(&post.title, search)
            && !icontains(&post.content, search)
            && !icontains(&post.excerpt, search)
            && !any_tag_contains(&post.tags, search)
        {
            return false;
        }
    }
    true
}

pub async fn list_blog_posts(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<BlogPost>> {
    let state = state.read().await;
    let mut posts: Vec<BlogPost> = state
        .blog_posts
        .iter()
        .filter(|post| post.is_published())
        .filter(|post| blog_matches(post, &query))
        .cloned()
        .collect();
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    Json(posts)
}

pub async fn get_blog_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, StatusCode> {
    let state = state.read().await;
    state
        .blog_posts
        .iter()
        .find(|post| post.slug == slug && post.is_published())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_blog_post(
    State(state): State<SharedState>,
    Json(input): Json<BlogPostCreate>,
) -> (StatusCode, Json<BlogPost>) {
    let mut state = state.write().await;
    let taken: Vec<&str> = state.blog_posts.iter().map(|p| p.slug.as_str()).collect();
    let slug = unique_slug(&input.title, &taken);
    let id = state.next_blog_id;
    state.next_blog_id += 1;
    let post = BlogPost {
        id,
        slug,
        title: input.title,
        content: input.content,
        excerpt: input.excerpt,
        tags: input.tags,
        featured_image: input.featured_image,
        is_featured: input.is_featured,
        published_at: Utc::now(),
        status: input.status.unwrap_or_else(|| "draft".to_string()),
    };
    state.blog_posts.push(post.clone());
    (StatusCode::CREATED, Json(post))
}

pub async fn update_blog_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(input): Json<BlogPostUpdate>,
) -> Result<Json<BlogPost>, StatusCode> {
    let mut state = state.write().await;
    let post = state
        .blog_posts
        .iter_mut()
        .find(|post| post.slug == slug)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(content) = input.content {
        post.content = content;
    }
    if let Some(excerpt) = input.excerpt {
        post.excerpt = excerpt;
    }
    if let Some(tags) = input.tags {
        post.tags = tags;
    }
    if let Some(featured_image) = input.featured_image {
        post.featured_image = Some(featured_image);
    }
    if let Some(is_featured) = input.is_featured {
        post.is_featured = is_featured;
    }
    if let Some(status) = input.status {
        post.status = status;
    }
    Ok(Json(post.clone()))
}

pub async fn delete_blog_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut state = state.write().await;
    let before = state.blog_posts.len();
    state.blog_posts.retain(|post| post.slug != slug);
    if state.blog_posts.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- Aggregations ---

#[derive(Debug, Serialize)]
pub struct Tags {
    pub project_tags: Vec<String>,
    pub blog_tags: Vec<String>,
    pub all_tags: Vec<String>,
}

pub async fn get_tags(State(state): State<SharedState>) -> Json<Tags> {
    let state = state.read().await;
    let project_tags: Vec<String> = state
        .projects
        .iter()
        .flat_map(|project| project.tags.iter().cloned())
        .collect();
    let blog_tags: Vec<String> = state
        .blog_posts
        .iter()
        .filter(|post| post.is_published())
        .flat_map(|post| post.tags.iter().cloned())
        .collect();
    let all_tags = dedup(
        project_tags
            .iter()
            .chain(blog_tags.iter())
            .cloned()
            .collect(),
    );
    Json(Tags {
        project_tags: dedup(project_tags),
        blog_tags: dedup(blog_tags),
        all_tags,
    })
}

#[derive(Debug, Serialize)]
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

pub async fn get_stats(State(state): State<SharedState>) -> Json<Stats> {
    let state = state.read().await;
    let published: Vec<&BlogPost> = state
        .blog_posts
        .iter()
        .filter(|post| post.is_published())
        .collect();
    Json(Stats {
        total_projects: state.projects.len() as u64,
        featured_projects: state.projects.iter().filter(|p| p.is_featured).count() as u64,
        total_blog_posts: published.len() as u64,
        featured_blog_posts: published.iter().filter(|p| p.is_featured).count() as u64,
        total_experience: state.experience.len() as u64,
        total_education: state.education.len() as u64,
        total_testimonials: state.testimonials.len() as u64,
        featured_testimonials: state.testimonials.iter().filter(|t| t.is_featured).count() as u64,
    })
}

#[derive(Debug, Serialize)]
pub struct TechStackStats {
    pub tech_stack: HashMap<String, u64>,
    pub most_used: Vec<(String, u64)>,
}

pub async fn get_tech_stack(State(state): State<SharedState>) -> Json<TechStackStats> {
    let state = state.read().await;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for project in &state.projects {
        for tech in &project.tech_stack {
            *counts.entry(tech.clone()).or_insert(0) += 1;
        }
    }
    let mut sorted: Vec<(String, u64)> = counts.clone().into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    sorted.truncate(10);
    Json(TechStackStats {
        tech_stack: counts,
        most_used: sorted,
    })
}

// --- Contact ---

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

pub async fn send_email(
    State(state): State<SharedState>,
    Json(input): Json<EmailRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let blank = [&input.name, &input.email, &input.subject, &input.message]
        .iter()
        .any(|field| field.trim().is_empty());
    if blank {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "All fields are required" })),
        ));
    }
    let mut state = state.write().await;
    state.sent_emails.push(SentEmail {
        name: input.name,
        email: input.email,
        subject: input.subject,
        message: input.message,
    });
    Ok(Json(json!({ "message": "Email sent successfully" })))
}

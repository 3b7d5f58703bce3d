//! Stateless HTTP request builder and response parser for the portfolio API.
//!
//! # Design
//! `PortfolioClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The session layer executes the actual HTTP round-trip
//! (and attaches auth headers), keeping this layer deterministic and free of
//! I/O dependencies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthTokens, BlogPost, BlogPostInput, BlogPostPatch, ContactForm, Education, EducationInput,
    EducationPatch, EmailResponse, Experience, ExperienceInput, ExperiencePatch, ListFilter,
    LoginCredentials, Profile, ProfilePatch, Project, ProjectImage, ProjectImageInput,
    ProjectImagePatch, ProjectInput, ProjectPatch, Stats, Tags, TechStackStats, Testimonial,
    TestimonialInput, TestimonialPatch,
};

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Stateless request builder and parser for the portfolio API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Auth headers are not set here; the session layer
/// owns token attachment.
#[derive(Debug, Clone)]
pub struct PortfolioClient {
    base_url: String,
}

impl PortfolioClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn delete(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    // --- Profile ---

    pub fn build_get_profile(&self) -> HttpRequest {
        self.get("/profile/")
    }

    pub fn parse_get_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_update_profile(&self, patch: &ProfilePatch) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, "/admin/profile/", patch)
    }

    pub fn parse_update_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        parse_json(response, 200)
    }

    // --- Projects ---

    pub fn build_list_projects(&self, filter: &ListFilter) -> HttpRequest {
        self.get(&format!("/projects/{}", query_string(filter)))
    }

    pub fn parse_list_projects(&self, response: HttpResponse) -> Result<Vec<Project>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_project(&self, slug: &str) -> HttpRequest {
        self.get(&format!("/projects/{slug}/"))
    }

    pub fn parse_get_project(&self, response: HttpResponse) -> Result<Project, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_project(&self, input: &ProjectInput) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/admin/projects/", input)
    }

    pub fn parse_create_project(&self, response: HttpResponse) -> Result<Project, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_project(
        &self,
        slug: &str,
        patch: &ProjectPatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, &format!("/admin/projects/{slug}/"), patch)
    }

    pub fn parse_update_project(&self, response: HttpResponse) -> Result<Project, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_project(&self, slug: &str) -> HttpRequest {
        self.delete(&format!("/admin/projects/{slug}/"))
    }

    pub fn parse_delete_project(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Project images ---

    pub fn build_list_project_images(&self, project_slug: &str) -> HttpRequest {
        self.get(&format!("/admin/projects/{project_slug}/images/"))
    }

    pub fn parse_list_project_images(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<ProjectImage>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_project_image(
        &self,
        project_slug: &str,
        input: &ProjectImageInput,
    ) -> Result<HttpRequest, ApiError> {
        self.json(
            HttpMethod::Post,
            &format!("/admin/projects/{project_slug}/images/"),
            input,
        )
    }

    pub fn parse_create_project_image(
        &self,
        response: HttpResponse,
    ) -> Result<ProjectImage, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_project_image(
        &self,
        id: i64,
        patch: &ProjectImagePatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(
            HttpMethod::Patch,
            &format!("/admin/project-images/{id}/"),
            patch,
        )
    }

    pub fn parse_update_project_image(
        &self,
        response: HttpResponse,
    ) -> Result<ProjectImage, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_project_image(&self, id: i64) -> HttpRequest {
        self.delete(&format!("/admin/project-images/{id}/"))
    }

    pub fn parse_delete_project_image(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Experience ---

    pub fn build_list_experience(&self) -> HttpRequest {
        self.get("/experience/")
    }

    pub fn parse_list_experience(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Experience>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_experience(
        &self,
        input: &ExperienceInput,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/admin/experience/", input)
    }

    pub fn parse_create_experience(&self, response: HttpResponse) -> Result<Experience, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_experience(
        &self,
        id: i64,
        patch: &ExperiencePatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, &format!("/admin/experience/{id}/"), patch)
    }

    pub fn parse_update_experience(&self, response: HttpResponse) -> Result<Experience, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_experience(&self, id: i64) -> HttpRequest {
        self.delete(&format!("/admin/experience/{id}/"))
    }

    pub fn parse_delete_experience(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Education ---

    pub fn build_list_education(&self) -> HttpRequest {
        self.get("/education/")
    }

    pub fn parse_list_education(&self, response: HttpResponse) -> Result<Vec<Education>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_education(&self, input: &EducationInput) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/admin/education/", input)
    }

    pub fn parse_create_education(&self, response: HttpResponse) -> Result<Education, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_education(
        &self,
        id: i64,
        patch: &EducationPatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, &format!("/admin/education/{id}/"), patch)
    }

    pub fn parse_update_education(&self, response: HttpResponse) -> Result<Education, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_education(&self, id: i64) -> HttpRequest {
        self.delete(&format!("/admin/education/{id}/"))
    }

    pub fn parse_delete_education(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Testimonials ---

    pub fn build_list_testimonials(&self, featured: Option<bool>) -> HttpRequest {
        let query = match featured {
            Some(value) => format!("?featured={value}"),
            None => String::new(),
        };
        self.get(&format!("/testimonials/{query}"))
    }

    pub fn parse_list_testimonials(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Testimonial>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_testimonial(
        &self,
        input: &TestimonialInput,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/admin/testimonials/", input)
    }

    pub fn parse_create_testimonial(
        &self,
        response: HttpResponse,
    ) -> Result<Testimonial, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_testimonial(
        &self,
        id: i64,
        patch: &TestimonialPatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(
            HttpMethod::Patch,
            &format!("/admin/testimonials/{id}/"),
            patch,
        )
    }

    pub fn parse_update_testimonial(
        &self,
        response: HttpResponse,
    ) -> Result<Testimonial, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_testimonial(&self, id: i64) -> HttpRequest {
        self.delete(&format!("/admin/testimonials/{id}/"))
    }

    pub fn parse_delete_testimonial(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Blog posts ---

    pub fn build_list_blog_posts(&self, filter: &ListFilter) -> HttpRequest {
        self.get(&format!("/blogs/{}", query_string(filter)))
    }

    pub fn parse_list_blog_posts(&self, response: HttpResponse) -> Result<Vec<BlogPost>, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_blog_post(&self, slug: &str) -> HttpRequest {
        self.get(&format!("/blogs/{slug}/"))
    }

    pub fn parse_get_blog_post(&self, response: HttpResponse) -> Result<BlogPost, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_create_blog_post(&self, input: &BlogPostInput) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/admin/blogs/", input)
    }

    pub fn parse_create_blog_post(&self, response: HttpResponse) -> Result<BlogPost, ApiError> {
        parse_json(response, 201)
    }

    pub fn build_update_blog_post(
        &self,
        slug: &str,
        patch: &BlogPostPatch,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Patch, &format!("/admin/blogs/{slug}/"), patch)
    }

    pub fn parse_update_blog_post(&self, response: HttpResponse) -> Result<BlogPost, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_delete_blog_post(&self, slug: &str) -> HttpRequest {
        self.delete(&format!("/admin/blogs/{slug}/"))
    }

    pub fn parse_delete_blog_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- Aggregations ---

    pub fn build_get_tags(&self) -> HttpRequest {
        self.get("/tags/")
    }

    pub fn parse_get_tags(&self, response: HttpResponse) -> Result<Tags, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_stats(&self) -> HttpRequest {
        self.get("/stats/")
    }

    pub fn parse_get_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_get_tech_stack(&self) -> HttpRequest {
        self.get("/tech-stack/")
    }

    pub fn parse_get_tech_stack(&self, response: HttpResponse) -> Result<TechStackStats, ApiError> {
        parse_json(response, 200)
    }

    // --- Contact ---

    pub fn build_send_email(&self, form: &ContactForm) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/send-email/", form)
    }

    pub fn parse_send_email(&self, response: HttpResponse) -> Result<EmailResponse, ApiError> {
        parse_json(response, 200)
    }

    // --- Auth ---

    pub fn build_login(&self, credentials: &LoginCredentials) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/auth/login/", credentials)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthTokens, ApiError> {
        parse_json(response, 200)
    }

    pub fn build_refresh_token(&self, refresh: &str) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/auth/refresh/", &RefreshRequest { refresh })
    }

    /// Returns the fresh access token on success.
    pub fn parse_refresh_token(&self, response: HttpResponse) -> Result<String, ApiError> {
        let parsed: RefreshResponse = parse_json(response, 200)?;
        Ok(parsed.access)
    }

    pub fn build_verify_token(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/auth/verify/", &VerifyRequest { token })
    }

    pub fn parse_verify_token(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }
}

/// Render list filters as a query string, empty when nothing is set.
fn query_string(filter: &ListFilter) -> String {
    let mut parts = Vec::new();
    if let Some(featured) = filter.featured {
        parts.push(format!("featured={featured}"));
    }
    if let Some(tag) = &filter.tag {
        parts.push(format!("tag={tag}"));
    }
    if let Some(search) = &filter.search {
        parts.push(format!("search={search}"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PortfolioClient {
        PortfolioClient::new("http://localhost:8000/api")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_profile_produces_correct_request() {
        let req = client().build_get_profile();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/profile/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PortfolioClient::new("http://localhost:8000/api/");
        let req = client.build_get_profile();
        assert_eq!(req.path, "http://localhost:8000/api/profile/");
    }

    #[test]
    fn list_projects_filter_renders_query_string() {
        let filter = ListFilter::default().featured(true).tag("web");
        let req = client().build_list_projects(&filter);
        assert_eq!(
            req.path,
            "http://localhost:8000/api/projects/?featured=true&tag=web"
        );
    }

    #[test]
    fn list_projects_without_filter_has_no_query_string() {
        let req = client().build_list_projects(&ListFilter::default());
        assert_eq!(req.path, "http://localhost:8000/api/projects/");
    }

    #[test]
    fn list_blog_posts_search_filter() {
        let filter = ListFilter::default().search("rust");
        let req = client().build_list_blog_posts(&filter);
        assert_eq!(req.path, "http://localhost:8000/api/blogs/?search=rust");
    }

    #[test]
    fn testimonials_featured_flag() {
        let req = client().build_list_testimonials(Some(false));
        assert_eq!(
            req.path,
            "http://localhost:8000/api/testimonials/?featured=false"
        );
        let req = client().build_list_testimonials(None);
        assert_eq!(req.path, "http://localhost:8000/api/testimonials/");
    }

    #[test]
    fn create_project_sets_json_content_type() {
        let input = ProjectInput {
            title: "Site".to_string(),
            description: "A site".to_string(),
            tech_stack: vec!["Rust".to_string()],
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            github_url: None,
            live_demo_url: None,
            playstore_url: None,
            tags: vec!["web".to_string()],
            is_featured: false,
        };
        let req = client().build_create_project(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/admin/projects/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Site");
        assert!(body.get("end_date").is_none());
    }

    #[test]
    fn update_project_patch_omits_unset_fields() {
        let patch = ProjectPatch {
            is_featured: Some(true),
            ..Default::default()
        };
        let req = client().build_update_project("my-site", &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(
            req.path,
            "http://localhost:8000/api/admin/projects/my-site/"
        );
        assert_eq!(req.body.as_deref(), Some(r#"{"is_featured":true}"#));
    }

    #[test]
    fn delete_endpoints_are_keyed_correctly() {
        let req = client().build_delete_blog_post("old-post");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8000/api/admin/blogs/old-post/");

        let req = client().build_delete_testimonial(7);
        assert_eq!(
            req.path,
            "http://localhost:8000/api/admin/testimonials/7/"
        );
    }

    #[test]
    fn project_image_routes_nest_under_project_slug() {
        let req = client().build_list_project_images("my-site");
        assert_eq!(
            req.path,
            "http://localhost:8000/api/admin/projects/my-site/images/"
        );
        let req = client().build_delete_project_image(3);
        assert_eq!(
            req.path,
            "http://localhost:8000/api/admin/project-images/3/"
        );
    }

    #[test]
    fn parse_get_project_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_get_project(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_project_wrong_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_create_project(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_login_returns_token_pair() {
        let tokens = client()
            .parse_login(ok(r#"{"access":"a1","refresh":"r1"}"#))
            .unwrap();
        assert_eq!(tokens.access, "a1");
        assert_eq!(tokens.refresh, "r1");
    }

    #[test]
    fn refresh_request_carries_refresh_token() {
        let req = client().build_refresh_token("r1").unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/auth/refresh/");
        assert_eq!(req.body.as_deref(), Some(r#"{"refresh":"r1"}"#));
        let access = client()
            .parse_refresh_token(ok(r#"{"access":"a2"}"#))
            .unwrap();
        assert_eq!(access, "a2");
    }

    #[test]
    fn parse_send_email_returns_acknowledgement() {
        let ack = client()
            .parse_send_email(ok(r#"{"message":"Email sent successfully"}"#))
            .unwrap();
        assert_eq!(ack.message, "Email sent successfully");
    }

    #[test]
    fn parse_send_email_surfaces_error_body() {
        let response = HttpResponse {
            status: 400,
            headers: Vec::new(),
            body: r#"{"error":"All fields are required"}"#.to_string(),
        };
        let err = client().parse_send_email(response).unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("All fields are required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_list_projects_bad_json() {
        let err = client().parse_list_projects(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}

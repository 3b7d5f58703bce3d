//! Authenticated request flow and typed resource methods.
//!
//! # Design
//! `PortfolioApi` ties a transport, the stateless request builder, and the
//! session store together. Every request goes through one dispatch path:
//! attach the stored access token as a bearer header, execute, and on a 401
//! perform at most one refresh-token exchange before reissuing the original
//! request. The reissued request never triggers a second refresh. When the
//! refresh itself fails the original 401 is surfaced unchanged and the
//! stored tokens are left alone.
//!
//! Concurrent requests that hit 401 at the same time refresh independently;
//! the store serializes the writes so the last refresh wins.

use tracing::warn;

use crate::client::PortfolioClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::store::SessionStore;
use crate::transport::ReqwestTransport;
use crate::types::{
    AuthTokens, BlogPost, BlogPostInput, BlogPostPatch, ContactForm, Education, EducationInput,
    EducationPatch, EmailResponse, Experience, ExperienceInput, ExperiencePatch, ListFilter,
    LoginCredentials, Profile, ProfilePatch, Project, ProjectImage, ProjectImageInput,
    ProjectImagePatch, ProjectInput, ProjectPatch, Stats, Tags, TechStackStats, Testimonial,
    TestimonialInput, TestimonialPatch,
};
use crate::validate;

fn bearer(access: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {access}"))
}

/// Typed, authenticated client for the portfolio API.
pub struct PortfolioApi<T: HttpTransport> {
    transport: T,
    client: PortfolioClient,
    store: SessionStore,
}

impl PortfolioApi<ReqwestTransport> {
    /// Production client over `reqwest` with a fresh session store.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> PortfolioApi<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            transport,
            client: PortfolioClient::new(base_url),
            store: SessionStore::new(),
        }
    }

    /// The session store backing this client. Shared with any clones the
    /// caller has taken of it.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        match self.transport.execute(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                warn!(method, path = %path, %error, "request failed");
                Err(error)
            }
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut first = request.clone();
        if let Some(access) = self.store.access_token().await {
            first.headers.push(bearer(&access));
        }
        let response = self.execute(first).await?;
        if response.status != 401 {
            return Ok(response);
        }

        let Some(refresh) = self.store.refresh_token().await else {
            return Ok(response);
        };
        let refresh_request = self.client.build_refresh_token(&refresh)?;
        let access = match self.execute(refresh_request).await {
            Ok(refresh_response) => match self.client.parse_refresh_token(refresh_response) {
                Ok(access) => access,
                Err(error) => {
                    warn!(%error, "token refresh rejected");
                    return Ok(response);
                }
            },
            Err(error) => {
                warn!(%error, "token refresh failed");
                return Ok(response);
            }
        };
        self.store.set_access_token(access.clone()).await;

        // The reissued request carries the new token and is never retried.
        let mut second = request;
        second.headers.push(bearer(&access));
        self.execute(second).await
    }

    // --- Auth lifecycle ---

    /// Exchange credentials for a token pair, then fetch and cache the
    /// profile once.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthTokens, ApiError> {
        let request = self.client.build_login(credentials)?;
        let response = self.dispatch(request).await?;
        let tokens = self.client.parse_login(response)?;
        self.store.set_tokens(&tokens).await;
        self.profile().await?;
        Ok(tokens)
    }

    pub async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let request = self.client.build_verify_token(token)?;
        let response = self.dispatch(request).await?;
        self.client.parse_verify_token(response)
    }

    /// Drop both tokens. Purely local, never fails.
    pub async fn logout(&self) {
        self.store.clear_tokens().await;
    }

    // --- Public reads ---

    /// Fetch the profile and cache it in the store.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let response = self.dispatch(self.client.build_get_profile()).await?;
        let profile = self.client.parse_get_profile(response)?;
        self.store.cache_profile(profile.clone()).await;
        Ok(profile)
    }

    pub async fn projects(&self, filter: &ListFilter) -> Result<Vec<Project>, ApiError> {
        let response = self.dispatch(self.client.build_list_projects(filter)).await?;
        self.client.parse_list_projects(response)
    }

    pub async fn project(&self, slug: &str) -> Result<Project, ApiError> {
        let response = self.dispatch(self.client.build_get_project(slug)).await?;
        self.client.parse_get_project(response)
    }

    pub async fn experience(&self) -> Result<Vec<Experience>, ApiError> {
        let response = self.dispatch(self.client.build_list_experience()).await?;
        self.client.parse_list_experience(response)
    }

    pub async fn education(&self) -> Result<Vec<Education>, ApiError> {
        let response = self.dispatch(self.client.build_list_education()).await?;
        self.client.parse_list_education(response)
    }

    pub async fn testimonials(&self, featured: Option<bool>) -> Result<Vec<Testimonial>, ApiError> {
        let response = self
            .dispatch(self.client.build_list_testimonials(featured))
            .await?;
        self.client.parse_list_testimonials(response)
    }

    pub async fn blog_posts(&self, filter: &ListFilter) -> Result<Vec<BlogPost>, ApiError> {
        let response = self
            .dispatch(self.client.build_list_blog_posts(filter))
            .await?;
        self.client.parse_list_blog_posts(response)
    }

    pub async fn blog_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        let response = self.dispatch(self.client.build_get_blog_post(slug)).await?;
        self.client.parse_get_blog_post(response)
    }

    pub async fn tags(&self) -> Result<Tags, ApiError> {
        let response = self.dispatch(self.client.build_get_tags()).await?;
        self.client.parse_get_tags(response)
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let response = self.dispatch(self.client.build_get_stats()).await?;
        self.client.parse_get_stats(response)
    }

    pub async fn tech_stack(&self) -> Result<TechStackStats, ApiError> {
        let response = self.dispatch(self.client.build_get_tech_stack()).await?;
        self.client.parse_get_tech_stack(response)
    }

    // --- Contact ---

    pub async fn send_email(&self, form: &ContactForm) -> Result<EmailResponse, ApiError> {
        validate::contact_form(form)?;
        let request = self.client.build_send_email(form)?;
        let response = self.dispatch(request).await?;
        self.client.parse_send_email(response)
    }

    // --- Admin: profile ---

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
        let request = self.client.build_update_profile(patch)?;
        let response = self.dispatch(request).await?;
        let profile = self.client.parse_update_profile(response)?;
        self.store.cache_profile(profile.clone()).await;
        Ok(profile)
    }

    // --- Admin: projects ---

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        validate::project_input(input)?;
        let request = self.client.build_create_project(input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_project(response)
    }

    pub async fn update_project(
        &self,
        slug: &str,
        patch: &ProjectPatch,
    ) -> Result<Project, ApiError> {
        let request = self.client.build_update_project(slug, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_project(response)
    }

    pub async fn delete_project(&self, slug: &str) -> Result<(), ApiError> {
        let response = self.dispatch(self.client.build_delete_project(slug)).await?;
        self.client.parse_delete_project(response)
    }

    // --- Admin: project images ---

    pub async fn project_images(&self, project_slug: &str) -> Result<Vec<ProjectImage>, ApiError> {
        let response = self
            .dispatch(self.client.build_list_project_images(project_slug))
            .await?;
        self.client.parse_list_project_images(response)
    }

    pub async fn create_project_image(
        &self,
        project_slug: &str,
        input: &ProjectImageInput,
    ) -> Result<ProjectImage, ApiError> {
        validate::project_image_input(input)?;
        let request = self.client.build_create_project_image(project_slug, input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_project_image(response)
    }

    pub async fn update_project_image(
        &self,
        id: i64,
        patch: &ProjectImagePatch,
    ) -> Result<ProjectImage, ApiError> {
        validate::project_image_patch(patch)?;
        let request = self.client.build_update_project_image(id, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_project_image(response)
    }

    pub async fn delete_project_image(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .dispatch(self.client.build_delete_project_image(id))
            .await?;
        self.client.parse_delete_project_image(response)
    }

    // --- Admin: experience ---

    pub async fn create_experience(&self, input: &ExperienceInput) -> Result<Experience, ApiError> {
        validate::experience_input(input)?;
        let request = self.client.build_create_experience(input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_experience(response)
    }

    pub async fn update_experience(
        &self,
        id: i64,
        patch: &ExperiencePatch,
    ) -> Result<Experience, ApiError> {
        let request = self.client.build_update_experience(id, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_experience(response)
    }

    pub async fn delete_experience(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .dispatch(self.client.build_delete_experience(id))
            .await?;
        self.client.parse_delete_experience(response)
    }

    // --- Admin: education ---

    pub async fn create_education(&self, input: &EducationInput) -> Result<Education, ApiError> {
        let request = self.client.build_create_education(input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_education(response)
    }

    pub async fn update_education(
        &self,
        id: i64,
        patch: &EducationPatch,
    ) -> Result<Education, ApiError> {
        let request = self.client.build_update_education(id, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_education(response)
    }

    pub async fn delete_education(&self, id: i64) -> Result<(), ApiError> {
        let response = self.dispatch(self.client.build_delete_education(id)).await?;
        self.client.parse_delete_education(response)
    }

    // --- Admin: testimonials ---

    pub async fn create_testimonial(
        &self,
        input: &TestimonialInput,
    ) -> Result<Testimonial, ApiError> {
        validate::testimonial_input(input)?;
        let request = self.client.build_create_testimonial(input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_testimonial(response)
    }

    pub async fn update_testimonial(
        &self,
        id: i64,
        patch: &TestimonialPatch,
    ) -> Result<Testimonial, ApiError> {
        validate::testimonial_patch(patch)?;
        let request = self.client.build_update_testimonial(id, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_testimonial(response)
    }

    pub async fn delete_testimonial(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .dispatch(self.client.build_delete_testimonial(id))
            .await?;
        self.client.parse_delete_testimonial(response)
    }

    // --- Admin: blog posts ---

    pub async fn create_blog_post(&self, input: &BlogPostInput) -> Result<BlogPost, ApiError> {
        validate::blog_post_input(input)?;
        let request = self.client.build_create_blog_post(input)?;
        let response = self.dispatch(request).await?;
        self.client.parse_create_blog_post(response)
    }

    pub async fn update_blog_post(
        &self,
        slug: &str,
        patch: &BlogPostPatch,
    ) -> Result<BlogPost, ApiError> {
        validate::blog_post_patch(patch)?;
        let request = self.client.build_update_blog_post(slug, patch)?;
        let response = self.dispatch(request).await?;
        self.client.parse_update_blog_post(response)
    }

    pub async fn delete_blog_post(&self, slug: &str) -> Result<(), ApiError> {
        let response = self
            .dispatch(self.client.build_delete_blog_post(slug))
            .await?;
        self.client.parse_delete_blog_post(response)
    }
}

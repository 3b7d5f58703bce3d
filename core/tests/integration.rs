//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives it through
//! `PortfolioApi` over real HTTP. This exercises request building, the
//! reqwest transport, the bearer/refresh flow, and response parsing against
//! the actual wire format, so schema drift between the two crates fails here
//! instead of in production.

use chrono::NaiveDate;
use portfolio_core::{
    ApiError, BlogPostInput, BlogPostPatch, BlogStatus, ContactForm, Degree, EducationInput,
    ExperienceInput, ExperiencePatch, ListFilter, LoginCredentials, PortfolioApi, ProfilePatch,
    ProjectImageInput, ProjectInput, ProjectPatch, ReqwestTransport, TestimonialInput,
};

/// Serve a fresh mock instance on a random port, returning the API base URL.
async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { mock_server::run(listener).await });
    format!("http://{addr}/api")
}

async fn logged_in_api() -> PortfolioApi<ReqwestTransport> {
    let api = PortfolioApi::new(&start_server().await);
    api.login(&LoginCredentials {
        username: mock_server::DEFAULT_USERNAME.to_string(),
        password: mock_server::DEFAULT_PASSWORD.to_string(),
    })
    .await
    .expect("login with default credentials");
    api
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date literal")
}

fn project_input(title: &str) -> ProjectInput {
    ProjectInput {
        title: title.to_string(),
        description: "A project built for the integration suite".to_string(),
        tech_stack: vec!["Rust".to_string(), "Axum".to_string()],
        start_date: date("2024-01-15"),
        end_date: None,
        github_url: None,
        live_demo_url: None,
        playstore_url: None,
        tags: vec!["web".to_string()],
        is_featured: false,
    }
}

#[tokio::test]
async fn login_caches_profile_and_unlocks_admin() {
    let api = logged_in_api().await;

    let cached = api.store().cached_profile().await.expect("cached profile");
    assert_eq!(cached.name, "Site Owner");
    assert!(api.store().access_token().await.is_some());
    assert!(api.store().refresh_token().await.is_some());

    let updated = api
        .update_profile(&ProfilePatch {
            bio: Some("Rust engineer".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.bio, "Rust engineer");
    assert_eq!(updated.name, "Site Owner");

    let fetched = api.profile().await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(api.store().cached_profile().await, Some(fetched));
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let api = PortfolioApi::new(&start_server().await);
    let err = api
        .login(&LoginCredentials {
            username: mock_server::DEFAULT_USERNAME.to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
    assert_eq!(api.store().access_token().await, None);
}

#[tokio::test]
async fn admin_write_without_login_is_unauthorized() {
    let api = PortfolioApi::new(&start_server().await);
    let err = api.create_project(&project_input("Nope")).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
}

#[tokio::test]
async fn stale_access_token_is_refreshed_transparently() {
    let api = logged_in_api().await;

    // Invalidate only the access token; the refresh token stays valid, so
    // the next admin call must recover through the refresh exchange.
    api.store().set_access_token("stale".to_string()).await;

    let created = api
        .create_experience(&ExperienceInput {
            company_name: "Acme".to_string(),
            position: "Engineer".to_string(),
            responsibilities: "Shipped the product".to_string(),
            start_date: date("2022-03-01"),
            end_date: None,
            is_current: true,
            company_url: None,
            location: "Remote".to_string(),
        })
        .await
        .unwrap();
    assert!(created.is_current);

    let new_access = api.store().access_token().await.expect("refreshed token");
    assert_ne!(new_access, "stale");

    api.verify_token(&new_access).await.unwrap();
    let err = api.verify_token("stale").await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
}

#[tokio::test]
async fn project_lifecycle_with_slug_dedup_and_filters() {
    let api = logged_in_api().await;

    let first = api.create_project(&project_input("Portfolio Site")).await.unwrap();
    assert_eq!(first.slug, "portfolio-site");

    let second = api.create_project(&project_input("Portfolio Site")).await.unwrap();
    assert_eq!(second.slug, "portfolio-site-1");

    let mut cli_input = project_input("CLI Toolkit");
    cli_input.tags = vec!["tooling".to_string()];
    cli_input.is_featured = true;
    let cli = api.create_project(&cli_input).await.unwrap();

    // Newest first.
    let all = api.projects(&ListFilter::default()).await.unwrap();
    let slugs: Vec<&str> = all.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["cli-toolkit", "portfolio-site-1", "portfolio-site"]);

    let featured = api.projects(&ListFilter::default().featured(true)).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].slug, "cli-toolkit");

    let tagged = api.projects(&ListFilter::default().tag("web")).await.unwrap();
    assert_eq!(tagged.len(), 2);

    let searched = api.projects(&ListFilter::default().search("toolkit")).await.unwrap();
    assert_eq!(searched.len(), 1);

    let updated = api
        .update_project(
            &cli.slug,
            &ProjectPatch {
                description: Some("Now with subcommands".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "Now with subcommands");
    assert_eq!(updated.slug, cli.slug);
    assert_eq!(updated.tech_stack, cli.tech_stack);

    api.delete_project(&cli.slug).await.unwrap();
    let err = api.project(&cli.slug).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = api.delete_project(&cli.slug).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn project_images_are_ordered_within_the_gallery() {
    let api = logged_in_api().await;
    let project = api.create_project(&project_input("Gallery")).await.unwrap();

    let cover = api
        .create_project_image(
            &project.slug,
            &ProjectImageInput {
                image: "https://img.example/cover.png".to_string(),
                caption: Some("Cover".to_string()),
                order: 2,
            },
        )
        .await
        .unwrap();
    api.create_project_image(
        &project.slug,
        &ProjectImageInput {
            image: "https://img.example/detail.png".to_string(),
            caption: None,
            order: 1,
        },
    )
    .await
    .unwrap();

    let images = api.project_images(&project.slug).await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].order, 1);
    assert_eq!(images[1].order, 2);

    let fetched = api.project(&project.slug).await.unwrap();
    assert_eq!(fetched.images, images);

    api.delete_project_image(cover.id).await.unwrap();
    let images = api.project_images(&project.slug).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].caption, None);
}

#[tokio::test]
async fn experience_updates_keep_current_role_invariant() {
    let api = logged_in_api().await;

    let current = api
        .create_experience(&ExperienceInput {
            company_name: "Acme".to_string(),
            position: "Engineer".to_string(),
            responsibilities: "Backend services".to_string(),
            start_date: date("2023-06-01"),
            end_date: None,
            is_current: true,
            company_url: None,
            location: "Nairobi".to_string(),
        })
        .await
        .unwrap();

    api.create_experience(&ExperienceInput {
        company_name: "Initech".to_string(),
        position: "Junior Engineer".to_string(),
        responsibilities: "Internal tools".to_string(),
        start_date: date("2020-01-01"),
        end_date: Some(date("2023-05-31")),
        is_current: false,
        company_url: None,
        location: "Nairobi".to_string(),
    })
    .await
    .unwrap();

    // Most recent start date first.
    let entries = api.experience().await.unwrap();
    assert_eq!(entries[0].company_name, "Acme");
    assert_eq!(entries[1].company_name, "Initech");

    // Flipping back to current clears the end date on the server.
    let closed = api
        .update_experience(
            current.id,
            &ExperiencePatch {
                end_date: Some(date("2024-12-31")),
                is_current: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!closed.is_current);
    let reopened = api
        .update_experience(
            current.id,
            &ExperiencePatch {
                is_current: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(reopened.is_current);
    assert_eq!(reopened.end_date, None);

    api.delete_experience(current.id).await.unwrap();
    assert_eq!(api.experience().await.unwrap().len(), 1);
}

#[tokio::test]
async fn education_roundtrips_the_degree_enum() {
    let api = logged_in_api().await;

    let entry = api
        .create_education(&EducationInput {
            institution: "University of Nairobi".to_string(),
            degree: Degree::Master,
            field_of_study: "Computer Science".to_string(),
            start_date: date("2018-09-01"),
            end_date: Some(date("2020-06-30")),
            grade: Some("First Class".to_string()),
            details: None,
        })
        .await
        .unwrap();
    assert_eq!(entry.degree, Degree::Master);

    let listed = api.education().await.unwrap();
    assert_eq!(listed, vec![entry.clone()]);

    api.delete_education(entry.id).await.unwrap();
    assert!(api.education().await.unwrap().is_empty());
}

#[tokio::test]
async fn testimonials_sort_by_manual_order() {
    let api = logged_in_api().await;

    let input = |name: &str, order: i32, featured: bool| TestimonialInput {
        reviewer_name: name.to_string(),
        reviewer_position: "CTO".to_string(),
        reviewer_company: "Acme".to_string(),
        quote: "Great work".to_string(),
        reviewer_image: None,
        reviewer_linkedin: None,
        is_featured: featured,
        order,
    };
    api.create_testimonial(&input("Second", 2, false)).await.unwrap();
    api.create_testimonial(&input("First", 1, true)).await.unwrap();

    let all = api.testimonials(None).await.unwrap();
    let names: Vec<&str> = all.iter().map(|t| t.reviewer_name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);

    let featured = api.testimonials(Some(true)).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].reviewer_name, "First");
}

#[tokio::test]
async fn blog_posts_stay_hidden_until_published() {
    let api = logged_in_api().await;

    let draft = api
        .create_blog_post(&BlogPostInput {
            title: "Writing a Typed API Client".to_string(),
            content: "Long form content".to_string(),
            excerpt: "Short form".to_string(),
            tags: vec!["rust".to_string()],
            featured_image: None,
            is_featured: false,
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(draft.slug, "writing-a-typed-api-client");

    // Default status is draft, invisible on the public surface.
    assert!(api.blog_posts(&ListFilter::default()).await.unwrap().is_empty());
    let err = api.blog_post(&draft.slug).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    api.update_blog_post(
        &draft.slug,
        &BlogPostPatch {
            status: Some(BlogStatus::Published),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let visible = api.blog_posts(&ListFilter::default()).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].slug, draft.slug);
    let fetched = api.blog_post(&draft.slug).await.unwrap();
    assert_eq!(fetched.title, "Writing a Typed API Client");

    let searched = api
        .blog_posts(&ListFilter::default().search("typed"))
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);

    api.delete_blog_post(&draft.slug).await.unwrap();
    assert!(api.blog_posts(&ListFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn aggregates_reflect_the_stored_content() {
    let api = logged_in_api().await;

    let mut featured_project = project_input("Portfolio Site");
    featured_project.is_featured = true;
    api.create_project(&featured_project).await.unwrap();
    let mut second = project_input("CLI Toolkit");
    second.tags = vec!["tooling".to_string()];
    api.create_project(&second).await.unwrap();

    api.create_blog_post(&BlogPostInput {
        title: "Hello".to_string(),
        content: "World".to_string(),
        excerpt: "World".to_string(),
        tags: vec!["intro".to_string()],
        featured_image: None,
        is_featured: true,
        status: Some(BlogStatus::Published),
    })
    .await
    .unwrap();

    let tags = api.tags().await.unwrap();
    assert_eq!(tags.project_tags, ["web", "tooling"]);
    assert_eq!(tags.blog_tags, ["intro"]);
    assert_eq!(tags.all_tags, ["web", "tooling", "intro"]);

    let stats = api.stats().await.unwrap();
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.featured_projects, 1);
    assert_eq!(stats.total_blog_posts, 1);
    assert_eq!(stats.featured_blog_posts, 1);
    assert_eq!(stats.total_experience, 0);
    assert_eq!(stats.featured_testimonials, 0);

    let tech = api.tech_stack().await.unwrap();
    assert_eq!(tech.tech_stack.get("Rust"), Some(&2));
    assert_eq!(tech.tech_stack.get("Axum"), Some(&2));
    assert_eq!(tech.most_used.len(), 2);
    assert_eq!(tech.most_used[0].1, 2);
}

#[tokio::test]
async fn contact_form_reaches_the_relay() {
    let api = PortfolioApi::new(&start_server().await);
    let ack = api
        .send_email(&ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "I would like to talk about a project.".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ack.message, "Email sent successfully");
}

#[tokio::test]
async fn unknown_slugs_surface_not_found() {
    let api = PortfolioApi::new(&start_server().await);
    let err = api.project("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = api.blog_post("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

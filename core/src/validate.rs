//! Client-side validation applied before a request is issued.
//!
//! These checks mirror what the server rejects anyway; running them locally
//! turns a guaranteed 400 into an [`ApiError::Validation`] without a round
//! trip. Only payloads with rules worth checking get a function here.

use chrono::NaiveDate;
use email_address::EmailAddress;

use crate::error::ApiError;
use crate::types::{
    BlogPostInput, BlogPostPatch, ContactForm, ExperienceInput, ProjectImageInput,
    ProjectImagePatch, ProjectInput, TestimonialInput, TestimonialPatch,
};

/// Maximum length accepted for a blog excerpt.
pub const MAX_EXCERPT_LEN: usize = 500;

fn err(msg: impl Into<String>) -> ApiError {
    ApiError::Validation(msg.into())
}

fn check_date_range(
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if let Some(end) = end {
        if end < start {
            return Err(err("end_date must not be before start_date"));
        }
    }
    Ok(())
}

/// A contact form needs every field non-blank and a well-formed address.
pub fn contact_form(form: &ContactForm) -> Result<(), ApiError> {
    for (field, value) in [
        ("name", &form.name),
        ("email", &form.email),
        ("subject", &form.subject),
        ("message", &form.message),
    ] {
        if value.trim().is_empty() {
            return Err(err(format!("{field} is required")));
        }
    }
    if !EmailAddress::is_valid(&form.email) {
        return Err(err("email is not a valid address"));
    }
    Ok(())
}

pub fn project_input(input: &ProjectInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(err("title is required"));
    }
    check_date_range(input.start_date, input.end_date)
}

/// A current role carries no end date; a finished one must be ordered.
pub fn experience_input(input: &ExperienceInput) -> Result<(), ApiError> {
    if input.is_current && input.end_date.is_some() {
        return Err(err("a current position must not have an end_date"));
    }
    if !input.is_current {
        check_date_range(input.start_date, input.end_date)?;
    }
    Ok(())
}

pub fn blog_post_input(input: &BlogPostInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(err("title is required"));
    }
    check_excerpt(&input.excerpt)
}

pub fn blog_post_patch(patch: &BlogPostPatch) -> Result<(), ApiError> {
    match &patch.excerpt {
        Some(excerpt) => check_excerpt(excerpt),
        None => Ok(()),
    }
}

fn check_excerpt(excerpt: &str) -> Result<(), ApiError> {
    if excerpt.chars().count() > MAX_EXCERPT_LEN {
        return Err(err(format!(
            "excerpt must be at most {MAX_EXCERPT_LEN} characters"
        )));
    }
    Ok(())
}

pub fn testimonial_input(input: &TestimonialInput) -> Result<(), ApiError> {
    check_order(input.order)
}

pub fn testimonial_patch(patch: &TestimonialPatch) -> Result<(), ApiError> {
    patch.order.map_or(Ok(()), check_order)
}

pub fn project_image_input(input: &ProjectImageInput) -> Result<(), ApiError> {
    check_order(input.order)
}

pub fn project_image_patch(patch: &ProjectImagePatch) -> Result<(), ApiError> {
    patch.order.map_or(Ok(()), check_order)
}

fn check_order(order: i32) -> Result<(), ApiError> {
    if order < 0 {
        return Err(err("order must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "A question about your work.".to_string(),
        }
    }

    #[test]
    fn contact_form_accepts_valid_input() {
        assert!(contact_form(&valid_form()).is_ok());
    }

    #[test]
    fn contact_form_rejects_blank_fields() {
        let mut form = valid_form();
        form.subject = "   ".to_string();
        let error = contact_form(&form).unwrap_err();
        assert!(matches!(error, ApiError::Validation(msg) if msg.contains("subject")));
    }

    #[test]
    fn contact_form_rejects_bad_email() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        assert!(contact_form(&form).is_err());
    }

    #[test]
    fn excerpt_over_limit_is_rejected() {
        let input = BlogPostInput {
            title: "Post".to_string(),
            content: "body".to_string(),
            excerpt: "x".repeat(MAX_EXCERPT_LEN + 1),
            tags: vec![],
            featured_image: None,
            is_featured: false,
            status: None,
        };
        assert!(blog_post_input(&input).is_err());

        let patch = BlogPostPatch {
            excerpt: Some("x".repeat(MAX_EXCERPT_LEN)),
            ..Default::default()
        };
        assert!(blog_post_patch(&patch).is_ok());
    }

    #[test]
    fn current_experience_must_not_have_end_date() {
        let input = ExperienceInput {
            company_name: "Acme".to_string(),
            position: "Engineer".to_string(),
            responsibilities: "Things".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            is_current: true,
            company_url: None,
            location: "Remote".to_string(),
        };
        assert!(experience_input(&input).is_err());
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        let input = ExperienceInput {
            company_name: "Acme".to_string(),
            position: "Engineer".to_string(),
            responsibilities: "Things".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
            is_current: false,
            company_url: None,
            location: "Remote".to_string(),
        };
        assert!(experience_input(&input).is_err());
    }

    #[test]
    fn negative_order_is_rejected() {
        let patch = TestimonialPatch {
            order: Some(-1),
            ..Default::default()
        };
        assert!(testimonial_patch(&patch).is_err());
    }
}

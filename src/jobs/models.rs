use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::entity::{ActiveModel, Education, Experience, Industry, JobType, Model};
use crate::validation::{Validatable, ValidationErrors, validators};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
/// Applications stay open this long when `lastDate` is not given.
pub const DEFAULT_OPEN_DAYS: i64 = 7;

const TITLE_REQUIRED: &str = "Please enter a Job title.";
const TITLE_TOO_LONG: &str = "Job title cannot exceed 100 characters.";
const DESCRIPTION_REQUIRED: &str = "Please enter a Job description.";
const DESCRIPTION_TOO_LONG: &str = "Job description cannot exceed 1000 characters.";
const EMAIL_INVALID: &str = "Please enter a valid email id.";
const ADDRESS_REQUIRED: &str = "Please enter an address.";
const COMPANY_REQUIRED: &str = "Please enter the company name";
const INDUSTRY_REQUIRED: &str = "Please specify the industry type";
const JOB_TYPE_REQUIRED: &str = "Please specify the Job Type";
const EDUCATION_REQUIRED: &str = "Please specify the required minimum education";
const EXPERIENCE_REQUIRED: &str = "Please specify the experience required";
const SALARY_REQUIRED: &str = "Please enter an expected salary amount";
const POSITIONS_TOO_FEW: &str = "Positions must be at least 1.";

/// Lowercase, hyphen-separated form of a title used in job URLs.
///
/// `"Senior Rust Developer (Remote)"` becomes `"senior-rust-developer-remote"`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Body of `POST /api/v1/jobs/new`.
///
/// Required fields default to empty so that a missing field is reported with
/// its own message rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub email: Option<String>,
    pub address: String,
    pub company: String,
    pub industry: Option<Industry>,
    pub job_type: Option<JobType>,
    pub min_education: Option<Education>,
    pub positions: Option<i32>,
    pub experience: Option<Experience>,
    pub salary: Option<i64>,
    pub last_date: Option<DateTime<Utc>>,
}

impl Validatable for NewJob {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_title(&mut errors, &self.title);
        check_description(&mut errors, &self.description);
        if let Some(email) = &self.email {
            errors.check(validators::email("email", email, EMAIL_INVALID));
        }
        errors.check(validators::required("address", &self.address, ADDRESS_REQUIRED));
        errors.check(validators::required("company", &self.company, COMPANY_REQUIRED));
        errors.check(validators::present("industry", self.industry.as_ref(), INDUSTRY_REQUIRED));
        errors.check(validators::present("jobType", self.job_type.as_ref(), JOB_TYPE_REQUIRED));
        errors.check(validators::present(
            "minEducation",
            self.min_education.as_ref(),
            EDUCATION_REQUIRED,
        ));
        if let Some(positions) = self.positions {
            check_positions(&mut errors, positions);
        }
        errors.check(validators::present(
            "experience",
            self.experience.as_ref(),
            EXPERIENCE_REQUIRED,
        ));
        errors.check(validators::present("salary", self.salary.as_ref(), SALARY_REQUIRED));

        errors.result()
    }
}

impl NewJob {
    /// Validate and build the row to insert, stamped with `now`.
    ///
    /// # Errors
    ///
    /// Every validation message for the payload.
    pub fn into_model(self, now: DateTime<Utc>) -> Result<Model, ValidationErrors> {
        self.validate()?;

        let (Some(industry), Some(job_type), Some(min_education), Some(experience), Some(salary)) = (
            self.industry,
            self.job_type,
            self.min_education,
            self.experience,
            self.salary,
        ) else {
            return Err(ValidationErrors::new());
        };

        let title = self.title.trim().to_string();
        Ok(Model {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            description: self.description,
            email: self.email,
            address: self.address,
            company: self.company,
            industry,
            job_type,
            min_education,
            positions: self.positions.unwrap_or(1),
            experience,
            salary,
            posting_date: now,
            last_date: self
                .last_date
                .unwrap_or_else(|| now + Duration::days(DEFAULT_OPEN_DAYS)),
            version: 0,
        })
    }
}

/// Body of `PUT /api/v1/jobs/{id}`; only the fields present are changed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub industry: Option<Industry>,
    pub job_type: Option<JobType>,
    pub min_education: Option<Education>,
    pub positions: Option<i32>,
    pub experience: Option<Experience>,
    pub salary: Option<i64>,
    pub last_date: Option<DateTime<Utc>>,
}

impl Validatable for JobUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(description) = &self.description {
            check_description(&mut errors, description);
        }
        if let Some(email) = &self.email {
            errors.check(validators::email("email", email, EMAIL_INVALID));
        }
        if let Some(address) = &self.address {
            errors.check(validators::required("address", address, ADDRESS_REQUIRED));
        }
        if let Some(company) = &self.company {
            errors.check(validators::required("company", company, COMPANY_REQUIRED));
        }
        if let Some(positions) = self.positions {
            check_positions(&mut errors, positions);
        }

        errors.result()
    }
}

impl JobUpdate {
    /// Validate and merge into `current`. A new title re-derives the slug and
    /// every update bumps `version`.
    ///
    /// # Errors
    ///
    /// Every validation message for the payload.
    pub fn merge_into(self, current: Model) -> Result<ActiveModel, ValidationErrors> {
        self.validate()?;

        let version = current.version.saturating_add(1);
        let mut active: ActiveModel = current.into();

        if let Some(title) = self.title {
            let title = title.trim().to_string();
            active.slug = Set(slugify(&title));
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(email) = self.email {
            active.email = Set(Some(email));
        }
        if let Some(address) = self.address {
            active.address = Set(address);
        }
        if let Some(company) = self.company {
            active.company = Set(company);
        }
        if let Some(industry) = self.industry {
            active.industry = Set(industry);
        }
        if let Some(job_type) = self.job_type {
            active.job_type = Set(job_type);
        }
        if let Some(min_education) = self.min_education {
            active.min_education = Set(min_education);
        }
        if let Some(positions) = self.positions {
            active.positions = Set(positions);
        }
        if let Some(experience) = self.experience {
            active.experience = Set(experience);
        }
        if let Some(salary) = self.salary {
            active.salary = Set(salary);
        }
        if let Some(last_date) = self.last_date {
            active.last_date = Set(last_date);
        }
        active.version = Set(version);

        Ok(active)
    }
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    errors.check(validators::required("title", title, TITLE_REQUIRED));
    errors.check(validators::max_length("title", title.trim(), TITLE_MAX_CHARS, TITLE_TOO_LONG));
}

fn check_description(errors: &mut ValidationErrors, description: &str) {
    errors.check(validators::required("description", description, DESCRIPTION_REQUIRED));
    errors.check(validators::max_length(
        "description",
        description,
        DESCRIPTION_MAX_CHARS,
        DESCRIPTION_TOO_LONG,
    ));
}

fn check_positions(errors: &mut ValidationErrors, positions: i32) {
    errors.check(validators::range("positions", positions, Some(1), None, POSITIONS_TOO_FEW));
}

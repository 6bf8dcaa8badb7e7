#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jobboard::jobs::{Education, Experience, Industry, Job, JobType};
use jobboard::migration::Migrator;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, IntoActiveModel};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use uuid::Uuid;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn setup_test_app(db: &DatabaseConnection) -> Router {
    jobboard::app(db)
}

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// (title, company, salary, jobType, experience, positions); posted one day apart.
pub const FIXTURE: [(&str, &str, i64, JobType, Experience, i32); 8] = [
    ("Junior Node Developer", "Acme", 45_000, JobType::Permanent, Experience::NoExperience, 2),
    ("Node Developer", "Globex", 60_000, JobType::Permanent, Experience::OneToTwoYears, 1),
    ("Senior Node Developer", "Initech", 95_000, JobType::Permanent, Experience::TwoToFiveYears, 3),
    ("Rust Engineer", "Hooli", 110_000, JobType::Temporary, Experience::TwoToFiveYears, 1),
    ("Data Analyst", "Acme", 52_000, JobType::Temporary, Experience::OneToTwoYears, 4),
    ("Support Intern", "Globex", 20_000, JobType::Internship, Experience::NoExperience, 5),
    ("Node Developer Lead", "Umbrella", 130_000, JobType::Permanent, Experience::FiveYearsPlus, 1),
    ("QA Engineer", "Initech", 58_000, JobType::Permanent, Experience::OneToTwoYears, 2),
];

pub fn fixture_job(index: usize) -> Job {
    let (title, company, salary, job_type, experience, positions) = FIXTURE[index];
    let posted = base_date() + Duration::days(index as i64);
    Job {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: jobboard::jobs::slugify(title),
        description: format!("{title} at {company}"),
        email: Some(format!("jobs@{}.io", company.to_lowercase())),
        address: "1 Main St".to_string(),
        company: company.to_string(),
        industry: Industry::It,
        job_type,
        min_education: Education::Bachelors,
        positions,
        experience,
        salary,
        posting_date: posted,
        last_date: posted + Duration::days(7),
        version: 0,
    }
}

/// Insert every fixture row and return them in fixture order.
pub async fn seed_jobs(db: &DatabaseConnection) -> Result<Vec<Job>, DbErr> {
    let mut jobs = Vec::with_capacity(FIXTURE.len());
    for index in 0..FIXTURE.len() {
        let job = fixture_job(index)
            .into_active_model()
            .reset_all()
            .insert(db)
            .await?;
        jobs.push(job);
    }
    Ok(jobs)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn titles(data: &Value) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|job| job["title"].as_str().unwrap().to_string())
        .collect()
}

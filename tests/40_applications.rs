#[macro_use]
mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::TestServer;

store_tests!(
    applications_list_by_job_id,
    applicant_listing_is_enriched,
);

async fn applications_list_by_job_id(server: &TestServer) -> Result<()> {
    let job_a = server.create_job(json!({"title": "A"})).await?;
    let job_b = server.create_job(json!({"title": "B"})).await?;

    server.create_application(json!({"job_id": job_a, "applicant_email": "one@x.io"})).await?;
    server.create_application(json!({"job_id": job_a, "applicant_email": "two@x.io"})).await?;
    server.create_application(json!({"job_id": job_b, "applicant_email": "one@x.io"})).await?;

    let (status, body) = server.get_json(&format!("/job-applications/jobs/{}", job_a)).await?;
    assert_eq!(status, StatusCode::OK);
    let apps = body.as_array().unwrap();
    assert_eq!(apps.len(), 2);
    for app in apps {
        assert_eq!(app["job_id"], json!(job_a));
        assert!(app["_id"].is_string());
        // Stored as posted, no enrichment here
        assert!(app.get("title").is_none());
    }

    let (_, body) = server.get_json("/job-applications/jobs/unknown").await?;
    assert_eq!(body, json!([]));
    Ok(())
}

async fn applicant_listing_is_enriched(server: &TestServer) -> Result<()> {
    let job = server
        .create_job(json!({
            "title": "Rust Engineer",
            "company": "Acme",
            "company_logo": "https://acme.io/logo.png",
            "hr_email": "hr@acme.io"
        }))
        .await?;

    server
        .create_application(json!({"job_id": job, "applicant_email": "me@x.io", "resume": "https://cv"}))
        .await?;
    server
        .create_application(json!({"job_id": uuid::Uuid::new_v4().to_string(), "applicant_email": "me@x.io"}))
        .await?;
    server
        .create_application(json!({"job_id": job, "applicant_email": "someone@else.io"}))
        .await?;

    let cookie = server.login(json!({"email": "me@x.io"})).await?;
    let res = server
        .client
        .get(server.url("/job-application?email=me@x.io"))
        .header(header::COOKIE, cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let apps = body.as_array().unwrap();
    assert_eq!(apps.len(), 2);

    assert_eq!(apps[0]["title"], "Rust Engineer");
    assert_eq!(apps[0]["company"], "Acme");
    assert_eq!(apps[0]["company_logo"], "https://acme.io/logo.png");
    assert_eq!(apps[0]["resume"], "https://cv");
    assert!(apps[0].get("hr_email").is_none());

    // Dangling reference is returned as stored
    assert!(apps[1].get("title").is_none());
    assert_eq!(apps[1]["applicant_email"], "me@x.io");
    Ok(())
}

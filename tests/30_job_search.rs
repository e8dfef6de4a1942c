#[macro_use]
mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

store_tests!(
    no_parameters_returns_everything,
    filters_by_hr_email,
    search_is_case_insensitive_substring,
    salary_range_needs_both_bounds,
    non_integer_bound_is_rejected,
    sort_orders_by_minimum_salary_descending,
    conditions_combine,
);

async fn seed(server: &TestServer) -> Result<()> {
    let jobs = [
        json!({"title": "Backend Engineer", "hr_email": "hr@acme.io", "salaryRange": {"min": 3000, "max": 5000}}),
        json!({"title": "Product Designer", "hr_email": "hr@acme.io", "salaryRange": {"min": 5000, "max": 7000}}),
        json!({"title": "ENGINEERING Manager", "hr_email": "jobs@globex.io", "salaryRange": {"min": 6000, "max": 9000}}),
        json!({"title": "Data Engineer", "hr_email": "jobs@globex.io", "salaryRange": {"min": 4000, "max": 6000}}),
        json!({"title": "Intern", "hr_email": "jobs@globex.io"}),
    ];
    for job in jobs {
        server.create_job(job).await?;
    }
    Ok(())
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|j| j["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

async fn no_parameters_returns_everything(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (status, body) = server.get_json("/job").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body).len(), 5);

    // Empty values count as absent
    let (_, body) = server.get_json("/job?email=&search=&min=&max=&sort=").await?;
    assert_eq!(titles(&body).len(), 5);
    Ok(())
}

async fn filters_by_hr_email(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (_, body) = server.get_json("/job?email=hr@acme.io").await?;
    assert_eq!(titles(&body), vec!["Backend Engineer", "Product Designer"]);
    Ok(())
}

async fn search_is_case_insensitive_substring(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (_, body) = server.get_json("/job?search=eng").await?;
    assert_eq!(
        titles(&body),
        vec!["Backend Engineer", "ENGINEERING Manager", "Data Engineer"]
    );

    // Pattern characters are matched literally
    let (_, body) = server.get_json("/job?search=%25").await?;
    assert!(titles(&body).is_empty());
    Ok(())
}

async fn salary_range_needs_both_bounds(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (_, body) = server.get_json("/job?min=3500&max=7000").await?;
    assert_eq!(titles(&body), vec!["Product Designer", "Data Engineer"]);

    // A lone bound is ignored
    let (_, body) = server.get_json("/job?min=3500").await?;
    assert_eq!(titles(&body).len(), 5);
    Ok(())
}

async fn non_integer_bound_is_rejected(server: &TestServer) -> Result<()> {
    seed(server).await?;

    for path in ["/job?min=abc&max=5000", "/job?max=lots"] {
        let (status, body) = server.get_json(path).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "path {}", path);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"].is_object(), "body: {}", body);
    }
    Ok(())
}

async fn sort_orders_by_minimum_salary_descending(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (_, body) = server.get_json("/job?sort=true").await?;
    assert_eq!(
        titles(&body),
        vec![
            "ENGINEERING Manager",
            "Product Designer",
            "Data Engineer",
            "Backend Engineer",
            "Intern"
        ]
    );

    // Only the literal "true" sorts
    let (_, body) = server.get_json("/job?sort=1").await?;
    assert_eq!(titles(&body)[0], "Backend Engineer");
    Ok(())
}

async fn conditions_combine(server: &TestServer) -> Result<()> {
    seed(server).await?;

    let (_, body) = server
        .get_json("/job?email=jobs@globex.io&search=engineer&min=3000&max=10000&sort=true")
        .await?;
    assert_eq!(titles(&body), vec!["ENGINEERING Manager", "Data Engineer"]);
    Ok(())
}

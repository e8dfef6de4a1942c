use serde_json::Value;
use uuid::Uuid;

use crate::database::{Collection, DatabaseError, Document, DocumentStore};
use crate::filter::FilterData;

pub const JOB_ID: &str = "job_id";
pub const APPLICANT_EMAIL: &str = "applicant_email";

/// Job fields copied onto an application when it is listed for its applicant
pub const ENRICHED_FIELDS: [&str; 3] = ["title", "company", "company_logo"];

/// Applications submitted for one job, as stored
pub async fn list_for_job(store: &dyn DocumentStore, job_id: &str) -> Result<Vec<Document>, DatabaseError> {
    let filter = FilterData::new().where_eq(JOB_ID, job_id);
    store.find_many(Collection::JobApplications, &filter).await
}

/// Applications of one applicant, each enriched with its job's display fields.
/// One job lookup per application; a dangling or malformed `job_id` leaves the
/// application as stored.
pub async fn list_for_applicant(store: &dyn DocumentStore, email: &str) -> Result<Vec<Document>, DatabaseError> {
    let filter = FilterData::new().where_eq(APPLICANT_EMAIL, email);
    let mut applications = store.find_many(Collection::JobApplications, &filter).await?;

    for application in applications.iter_mut() {
        let Some(job_id) = referenced_job(application) else {
            continue;
        };
        if let Some(job) = store.find_by_id(Collection::Jobs, job_id).await? {
            enrich(application, &job);
        }
    }

    Ok(applications)
}

fn referenced_job(application: &Document) -> Option<Uuid> {
    application
        .get(JOB_ID)
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// Copy display fields the job actually has; absent fields stay absent.
pub fn enrich(application: &mut Document, job: &Document) {
    for field in ENRICHED_FIELDS {
        if let Some(value) = job.get(field) {
            application.insert(field.to_string(), value.clone());
        }
    }
}

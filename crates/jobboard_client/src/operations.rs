//! Typed job board operations.
//!
//! Each operation pairs a GraphQL document with the Rust types of its
//! variables and its `data` payload.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A strongly typed GraphQL operation.
///
/// # Example
///
/// ```ignore
/// struct GreetingQuery;
///
/// impl TypedOperation for GreetingQuery {
///     type Variables = NoVariables;
///     type Response = GreetingData;
///
///     const OPERATION: &'static str = "query GreetingQuery { greeting }";
///     const OPERATION_NAME: &'static str = "GreetingQuery";
///     const KIND: OperationKind = OperationKind::Query;
/// }
/// ```
pub trait TypedOperation {
    /// The input variables type.
    type Variables: Serialize;

    /// The response data type.
    type Response: DeserializeOwned;

    /// The GraphQL operation string.
    const OPERATION: &'static str;

    /// The operation name.
    const OPERATION_NAME: &'static str;

    /// The kind of operation.
    const KIND: OperationKind;
}

/// The kind of GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Marker type for operations without variables.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables;

// Appends the JobDetail fragment to a document.
macro_rules! with_job_detail {
    ($document:literal) => {
        concat!(
            $document,
            "\n",
            "fragment JobDetail on Job {\n",
            "  id\n",
            "  title\n",
            "  company {\n",
            "    id\n",
            "    name\n",
            "  }\n",
            "  description\n",
            "}\n"
        )
    };
}

// ============================================================================
// Operations
// ============================================================================

/// `createJob`, aliased to `job`.
pub struct CreateJob;

impl TypedOperation for CreateJob {
    type Variables = CreateJobVariables;
    type Response = CreateJobData;

    const OPERATION: &'static str = with_job_detail!(
        "mutation CreateJob($input: CreateJobInput!) {\n  job: createJob(input: $input) {\n    ...JobDetail\n  }\n}\n"
    );
    const OPERATION_NAME: &'static str = "CreateJob";
    const KIND: OperationKind = OperationKind::Mutation;
}

/// A company with its jobs.
pub struct CompanyQuery;

impl TypedOperation for CompanyQuery {
    type Variables = IdVariables;
    type Response = CompanyData;

    const OPERATION: &'static str = "query CompanyQuery($id: ID!) {\n  company(id: $id) {\n    id\n    name\n    description\n    jobs {\n      id\n      title\n    }\n  }\n}\n";
    const OPERATION_NAME: &'static str = "CompanyQuery";
    const KIND: OperationKind = OperationKind::Query;
}

/// A single job.
pub struct JobQuery;

impl TypedOperation for JobQuery {
    type Variables = IdVariables;
    type Response = JobData;

    const OPERATION: &'static str = with_job_detail!(
        "query JobQuery($id: ID!) {\n  job(id: $id) {\n    ...JobDetail\n  }\n}\n"
    );
    const OPERATION_NAME: &'static str = "JobQuery";
    const KIND: OperationKind = OperationKind::Query;
}

/// Every job, with its company's name.
pub struct JobsQuery;

impl TypedOperation for JobsQuery {
    type Variables = NoVariables;
    type Response = JobsData;

    const OPERATION: &'static str = "query JobsQuery {\n  jobs {\n    id\n    title\n    company {\n      id\n      name\n    }\n  }\n}\n";
    const OPERATION_NAME: &'static str = "JobsQuery";
    const KIND: OperationKind = OperationKind::Query;
}

// ============================================================================
// Variables
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdVariables {
    pub id: String,
}

impl IdVariables {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateJobVariables {
    pub input: CreateJobInput,
}

/// Fields of a job to create. The company comes from the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateJobInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateJobInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ============================================================================
// Response data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
}

/// Fields selected by the `JobDetail` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `None` when the job points at a company that no longer exists.
    pub company: Option<CompanyRef>,
}

/// A row of the job list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub company: Option<CompanyRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobData {
    pub job: JobDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobData {
    pub job: Option<JobDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsData {
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyData {
    pub company: Option<CompanyDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fragment_is_appended() {
        assert!(JobQuery::OPERATION.contains("...JobDetail"));
        assert!(JobQuery::OPERATION.contains("fragment JobDetail on Job"));
        assert!(CreateJob::OPERATION.contains("job: createJob(input: $input)"));
        assert!(CreateJob::OPERATION.contains("fragment JobDetail on Job"));
        assert!(!JobsQuery::OPERATION.contains("fragment"));
    }

    #[test]
    fn test_operation_kinds() {
        assert_eq!(CreateJob::KIND, OperationKind::Mutation);
        assert_eq!(JobQuery::KIND, OperationKind::Query);
        assert_eq!(JobsQuery::OPERATION_NAME, "JobsQuery");
    }

    #[test]
    fn test_create_job_variables() {
        let vars = CreateJobVariables {
            input: CreateJobInput::new("Rust Engineer"),
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({"input": {"title": "Rust Engineer"}})
        );

        let vars = CreateJobVariables {
            input: CreateJobInput::new("Rust Engineer").description("Remote"),
        };
        assert_eq!(vars.input.description.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_no_variables_is_null() {
        assert!(serde_json::to_value(NoVariables).unwrap().is_null());
    }

    #[test]
    fn test_job_without_company() {
        let data: JobsData = serde_json::from_value(json!({
            "jobs": [{"id": "job_9", "title": "Orphan", "company": null}]
        }))
        .unwrap();
        assert_eq!(data.jobs[0].company, None);
    }

    #[test]
    fn test_job_data_missing_job() {
        let data: JobData = serde_json::from_value(json!({"job": null})).unwrap();
        assert!(data.job.is_none());
    }
}

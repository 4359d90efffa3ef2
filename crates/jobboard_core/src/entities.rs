//! Domain entities - Job board records.

use serde::{Deserialize, Serialize};

// Value Objects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A job posting. `company_id` is expected to reference an existing company
/// but nothing checks it on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An employer account. Every user posts on behalf of one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub company_id: CompanyId,
}

impl User {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// Fields of a job before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub company_id: CompanyId,
    pub title: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_uses_camel_case_fields() {
        let job = Job {
            id: JobId::new("job_1"),
            company_id: CompanyId::new("company_1"),
            title: "Backend Engineer".to_string(),
            description: None,
        };

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["id"], "job_1");
        assert_eq!(json["companyId"], "company_1");
    }

    #[test]
    fn test_company_description_is_optional() {
        let company: Company =
            serde_json::from_str(r#"{"id": "c1", "name": "Initech"}"#).unwrap();
        assert_eq!(company.id, CompanyId::new("c1"));
        assert_eq!(company.description, None);
    }

    #[test]
    fn test_password_matches() {
        let user = User {
            id: UserId::new("u1"),
            email: "alice@facegle.example".to_string(),
            password: "alice123".to_string(),
            company_id: CompanyId::new("c1"),
        };
        assert!(user.password_matches("alice123"));
        assert!(!user.password_matches("wrong"));
    }
}

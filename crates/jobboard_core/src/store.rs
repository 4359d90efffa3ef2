//! Repository implementations - Data access layer.
//!
//! Collections live in memory behind async locks. They can be seeded with a
//! small fixed data set or loaded once at start-up from a directory holding
//! `companies.json`, `jobs.json` and `users.json`.

use crate::entities::*;
use crate::error::{DomainError, DomainResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

// Repository Traits
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn list(&self) -> Vec<Job>;
    async fn get(&self, id: &JobId) -> Option<Job>;
    async fn list_by_company(&self, company_id: &CompanyId) -> Vec<Job>;
    async fn create(&self, job: NewJob) -> Job;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn list(&self) -> Vec<Company>;
    async fn get(&self, id: &CompanyId) -> Option<Company>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: &UserId) -> Option<User>;
    async fn find_by_email(&self, email: &str) -> Option<User>;
}

/// Shared handles to every collection.
#[derive(Clone)]
pub struct Store {
    pub jobs: Arc<dyn JobRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Store {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        companies: Arc<dyn CompanyRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            jobs,
            companies,
            users,
        }
    }

    /// Creates a store holding the built-in sample data.
    pub fn with_seed_data() -> Self {
        Self::new(
            Arc::new(InMemoryJobRepository::with_seed_data()),
            Arc::new(InMemoryCompanyRepository::with_seed_data()),
            Arc::new(InMemoryUserRepository::with_seed_data()),
        )
    }

    /// Loads `companies.json`, `jobs.json` and `users.json` from `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> DomainResult<Self> {
        let dir = dir.as_ref();
        let companies = read_records(&dir.join("companies.json"), |c: &Company| c.id.as_ref())?;
        let jobs = read_records(&dir.join("jobs.json"), |j: &Job| j.id.as_ref())?;
        let users = read_records(&dir.join("users.json"), |u: &User| u.id.as_ref())?;
        debug!(
            companies = companies.len(),
            jobs = jobs.len(),
            users = users.len(),
            "Loaded records from {}",
            dir.display()
        );

        Ok(Self::new(
            Arc::new(InMemoryJobRepository::from_records(jobs)),
            Arc::new(InMemoryCompanyRepository::from_records(companies)),
            Arc::new(InMemoryUserRepository::from_records(users)),
        ))
    }
}

/// Reads a JSON array of records. Every record must have a distinct id.
fn read_records<T: DeserializeOwned>(
    path: &Path,
    id: impl Fn(&T) -> &str,
) -> DomainResult<Vec<T>> {
    let load_error = |message: String| DomainError::DataLoad {
        path: path.to_path_buf(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

    {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let id = id(record);
            if !seen.insert(id) {
                return Err(load_error(format!("duplicate id `{}`", id)));
            }
        }
    }

    Ok(records)
}

fn index_by<K: Hash + Eq, T>(records: Vec<T>, key: impl Fn(&T) -> K) -> IndexMap<K, T> {
    records.into_iter().map(|r| (key(&r), r)).collect()
}

// In-Memory Job Repository
pub struct InMemoryJobRepository {
    jobs: RwLock<IndexMap<JobId, Job>>,
    next_id: RwLock<u64>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(jobs: Vec<Job>) -> Self {
        let next_id = jobs.len() as u64 + 1;
        Self {
            jobs: RwLock::new(index_by(jobs, |j| j.id.clone())),
            next_id: RwLock::new(next_id),
        }
    }

    pub fn with_seed_data() -> Self {
        let jobs = [
            (
                "job_1",
                "company_1",
                "Frontend Developer",
                "We are looking for a Frontend Developer familiar with React.",
            ),
            (
                "job_2",
                "company_1",
                "Backend Developer",
                "We are looking for a Backend Developer familiar with Rust.",
            ),
            (
                "job_3",
                "company_2",
                "Full-Stack Developer",
                "We are looking for a Full-Stack Developer familiar with GraphQL.",
            ),
            (
                "job_4",
                "company_2",
                "Site Reliability Engineer",
                "On-call rotation, observability and capacity planning.",
            ),
        ]
        .into_iter()
        .map(|(id, company_id, title, description)| Job {
            id: JobId::new(id),
            company_id: CompanyId::new(company_id),
            title: title.to_string(),
            description: Some(description.to_string()),
        })
        .collect();

        Self::from_records(jobs)
    }
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn list(&self) -> Vec<Job> {
        self.jobs.read().await.values().cloned().collect()
    }

    async fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn list_by_company(&self, company_id: &CompanyId) -> Vec<Job> {
        self.jobs
            .read()
            .await
            .values()
            .filter(|j| &j.company_id == company_id)
            .cloned()
            .collect()
    }

    async fn create(&self, job: NewJob) -> Job {
        let mut jobs = self.jobs.write().await;
        let mut next_id = self.next_id.write().await;

        // Loaded records may already use the `job_<n>` form.
        let id = loop {
            let candidate = JobId::new(format!("job_{}", *next_id));
            *next_id += 1;
            if !jobs.contains_key(&candidate) {
                break candidate;
            }
        };

        let job = Job {
            id: id.clone(),
            company_id: job.company_id,
            title: job.title,
            description: job.description,
        };
        jobs.insert(id, job.clone());
        job
    }
}

// In-Memory Company Repository
pub struct InMemoryCompanyRepository {
    companies: RwLock<IndexMap<CompanyId, Company>>,
}

impl InMemoryCompanyRepository {
    pub fn from_records(companies: Vec<Company>) -> Self {
        Self {
            companies: RwLock::new(index_by(companies, |c| c.id.clone())),
        }
    }

    pub fn with_seed_data() -> Self {
        let companies = [
            (
                "company_1",
                "Facegle",
                "We are a startup on a mission to disrupt social search engines. Think Facebook meets Google.",
            ),
            (
                "company_2",
                "Goobook",
                "We are a startup on a mission to disrupt search social media. Think Google meets Facebook.",
            ),
        ]
        .into_iter()
        .map(|(id, name, description)| Company {
            id: CompanyId::new(id),
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .collect();

        Self::from_records(companies)
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn list(&self) -> Vec<Company> {
        self.companies.read().await.values().cloned().collect()
    }

    async fn get(&self, id: &CompanyId) -> Option<Company> {
        self.companies.read().await.get(id).cloned()
    }
}

// In-Memory User Repository
pub struct InMemoryUserRepository {
    users: RwLock<IndexMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn from_records(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(index_by(users, |u| u.id.clone())),
        }
    }

    pub fn with_seed_data() -> Self {
        let users = [
            ("user_1", "alice@facegle.com", "alice123", "company_1"),
            ("user_2", "bob@goobook.com", "bob123", "company_2"),
        ]
        .into_iter()
        .map(|(id, email, password, company_id)| User {
            id: UserId::new(id),
            email: email.to_string(),
            password: password.to_string(),
            company_id: CompanyId::new(company_id),
        })
        .collect();

        Self::from_records(users)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

//! Job board requests.
//!
//! [`JobBoardClient`] wires the auth link into a [`GraphQLClient`] and
//! exposes one method per job board operation.

use crate::auth::{auth_link, Session};
use crate::cache::{FetchPolicy, QueryCache};
use crate::client::{GraphQLClient, MiddlewareFuture, Next, Request};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::operations::{
    CompanyDetail, CompanyQuery, CreateJob, CreateJobInput, CreateJobVariables, IdVariables,
    JobData, JobDetail, JobQuery, JobSummary, JobsQuery, NoVariables,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for the job board API.
#[derive(Clone)]
pub struct JobBoardClient {
    inner: GraphQLClient,
    session: Session,
}

impl JobBoardClient {
    /// Creates a client with a fresh, logged-out session.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_session(config, Session::new())
    }

    /// Creates a client sharing an existing session.
    pub fn with_session(config: ClientConfig, session: Session) -> ClientResult<Self> {
        let link = auth_link(session.clone());
        let inner = GraphQLClient::with_config(config)?
            .use_middleware(move |request: Request, next: Next| -> MiddlewareFuture {
                link(request, next)
            });
        Ok(Self { inner, session })
    }

    /// Appends a middleware after the auth link.
    pub fn use_middleware<F>(mut self, middleware: F) -> Self
    where
        F: Fn(Request, Next) -> MiddlewareFuture + Send + Sync + 'static,
    {
        self.inner = self.inner.use_middleware(middleware);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &QueryCache {
        self.inner.cache()
    }

    pub fn graphql(&self) -> &GraphQLClient {
        &self.inner
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.is_logged_in().await
    }

    /// Exchanges credentials for a token. Returns `false` when the server
    /// rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<bool> {
        let url = self.inner.config().resolved_login_url()?;
        let response = self
            .inner
            .http()
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            info!(email, "Login rejected");
            self.session.clear().await;
            return Ok(false);
        }
        if !status.is_success() {
            return Err(ClientError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Login failed"),
            ));
        }

        let LoginResponse { token } = response.json().await?;
        self.session.set_token(token).await;
        Ok(true)
    }

    /// Forgets the session token.
    pub async fn logout(&self) {
        self.session.clear().await;
    }

    /// Creates a job for the logged-in user's company.
    ///
    /// The new job is written to the cache as the result of `JobQuery` for
    /// its id, so [`load_job`](Self::load_job) finds it without a request.
    pub async fn create_job(&self, input: CreateJobInput) -> ClientResult<JobDetail> {
        let data = self
            .inner
            .mutate::<CreateJob>(&CreateJobVariables { input })
            .await?;
        let job = data.job;

        self.inner
            .cache()
            .write_query::<JobQuery>(
                &IdVariables::new(job.id.clone()),
                &JobData {
                    job: Some(job.clone()),
                },
            )
            .await?;
        debug!(job_id = %job.id, "Cached created job");

        Ok(job)
    }

    /// Loads a company and its jobs. `None` if no company has that id.
    pub async fn load_company(&self, id: &str) -> ClientResult<Option<CompanyDetail>> {
        let data = self
            .inner
            .query::<CompanyQuery>(&IdVariables::new(id), FetchPolicy::CacheFirst)
            .await?;
        Ok(data.company)
    }

    /// Loads a job. `None` if no job has that id.
    pub async fn load_job(&self, id: &str) -> ClientResult<Option<JobDetail>> {
        let data = self
            .inner
            .query::<JobQuery>(&IdVariables::new(id), FetchPolicy::CacheFirst)
            .await?;
        Ok(data.job)
    }

    /// Loads every job. Always hits the server and never touches the cache.
    pub async fn load_jobs(&self) -> ClientResult<Vec<JobSummary>> {
        let data = self
            .inner
            .query::<JobsQuery>(&NoVariables, FetchPolicy::NoCache)
            .await?;
        Ok(data.jobs)
    }
}

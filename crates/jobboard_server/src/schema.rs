//! GraphQL schema and resolvers.
//!
//! Resolvers delegate straight to the store. Relational fields
//! (`Company.jobs`, `Job.company`) are resolved lazily from the shared
//! [`Store`] in the schema data.

use crate::auth::CurrentUser;
use async_graphql::{Context, EmptySubscription, InputObject, Object, Result, Schema, ID};
use jobboard_core::{Company, CompanyId, DomainError, Job, JobId, NewJob, Store};
use tracing::info;

/// The job board schema.
pub type JobBoardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema over `store`.
pub fn build_schema(store: Store) -> JobBoardSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn greeting(&self) -> String {
        "Welcome to the job board".to_string()
    }

    async fn job(&self, ctx: &Context<'_>, id: ID) -> Result<Option<JobNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.jobs.get(&JobId::new(id.0)).await.map(JobNode))
    }

    async fn jobs(&self, ctx: &Context<'_>) -> Result<Vec<JobNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store.jobs.list().await.into_iter().map(JobNode).collect())
    }

    async fn company(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CompanyNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store
            .companies
            .get(&CompanyId::new(id.0))
            .await
            .map(CompanyNode))
    }
}

#[derive(Debug, InputObject)]
pub struct CreateJobInput {
    pub title: String,
    pub description: Option<String>,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Posts a job on behalf of the authenticated user's company.
    async fn create_job(&self, ctx: &Context<'_>, input: CreateJobInput) -> Result<JobNode> {
        let user = ctx
            .data_opt::<CurrentUser>()
            .ok_or(DomainError::Unauthorized)?;

        if input.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title is required").into());
        }

        let store = ctx.data::<Store>()?;
        let job = store
            .jobs
            .create(NewJob {
                company_id: user.company_id.clone(),
                title: input.title,
                description: input.description,
            })
            .await;
        info!(job_id = %job.id.0, company_id = %job.company_id.0, "Job created");

        Ok(JobNode(job))
    }
}

pub struct JobNode(pub Job);

#[Object(name = "Job")]
impl JobNode {
    async fn id(&self) -> ID {
        ID(self.0.id.0.clone())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn company(&self, ctx: &Context<'_>) -> Result<Option<CompanyNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store
            .companies
            .get(&self.0.company_id)
            .await
            .map(CompanyNode))
    }
}

pub struct CompanyNode(pub Company);

#[Object(name = "Company")]
impl CompanyNode {
    async fn id(&self) -> ID {
        ID(self.0.id.0.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn jobs(&self, ctx: &Context<'_>) -> Result<Vec<JobNode>> {
        let store = ctx.data::<Store>()?;
        Ok(store
            .jobs
            .list_by_company(&self.0.id)
            .await
            .into_iter()
            .map(JobNode)
            .collect())
    }
}

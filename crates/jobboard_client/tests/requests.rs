//! Client requests against a live server.

use jobboard_client::operations::{IdVariables, JobQuery};
use jobboard_client::{
    ClientConfig, CreateJobInput, FetchPolicy, GraphQLClient, JobBoardClient, MiddlewareFuture,
    Next, Request,
};
use jobboard_core::{
    Company, CompanyId, ErrorCode, InMemoryCompanyRepository, InMemoryJobRepository,
    InMemoryUserRepository, Job, JobId, Store,
};
use jobboard_server::{JobBoardServer, ServerConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server(store: Store) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = JobBoardServer::builder()
        .config(ServerConfig::new().jwt_secret("client-tests"))
        .store(store)
        .build()
        .unwrap();
    tokio::spawn(server.serve(listener));
    addr
}

/// Client whose requests are counted as they leave the middleware chain.
async fn counting_client_for(store: Store) -> (JobBoardClient, Arc<AtomicUsize>) {
    let addr = spawn_server(store).await;
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let client = JobBoardClient::new(ClientConfig::new(format!("http://{addr}/graphql")))
        .unwrap()
        .use_middleware(move |request: Request, next: Next| -> MiddlewareFuture {
            counter.fetch_add(1, Ordering::SeqCst);
            next(request)
        });
    (client, count)
}

async fn counting_client() -> (JobBoardClient, Arc<AtomicUsize>) {
    counting_client_for(Store::with_seed_data()).await
}

/// One job whose company exists and one whose company was removed.
fn store_with_orphaned_job() -> Store {
    let job = |id: &str, company: &str| Job {
        id: JobId::new(id),
        company_id: CompanyId::new(company),
        title: format!("Title {id}"),
        description: None,
    };
    Store::new(
        Arc::new(InMemoryJobRepository::from_records(vec![
            job("j1", "c1"),
            job("j2", "gone"),
        ])),
        Arc::new(InMemoryCompanyRepository::from_records(vec![Company {
            id: CompanyId::new("c1"),
            name: "Acme".to_string(),
            description: None,
        }])),
        Arc::new(InMemoryUserRepository::from_records(Vec::new())),
    )
}

#[tokio::test]
async fn test_create_job_requires_login() {
    let (client, _) = counting_client().await;

    let err = client
        .create_job(CreateJobInput::new("Rust Engineer"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message, "Unauthorized");
}

#[tokio::test]
async fn test_created_job_is_served_from_cache() {
    let (client, count) = counting_client().await;
    assert!(client.login("alice@facegle.com", "alice123").await.unwrap());

    let job = client
        .create_job(CreateJobInput::new("Rust Engineer").description("Remote"))
        .await
        .unwrap();
    assert_eq!(job.company.as_ref().unwrap().id, "company_1");
    assert_eq!(count.load(Ordering::SeqCst), 1);

    let loaded = client.load_job(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded, job);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_load_job_fetches_once() {
    let (client, count) = counting_client().await;

    let job = client.load_job("job_1").await.unwrap().unwrap();
    assert_eq!(job.title, "Frontend Developer");
    assert_eq!(job.company.unwrap().name, "Facegle");

    client.load_job("job_1").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(client.load_job("job_missing").await.unwrap().is_none());
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_load_jobs_always_fetches() {
    let (client, count) = counting_client().await;

    let jobs = client.load_jobs().await.unwrap();
    assert_eq!(jobs.len(), 4);
    client.load_jobs().await.unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_load_company_lists_its_jobs() {
    let (client, _) = counting_client().await;
    assert!(client.login("bob@goobook.com", "bob123").await.unwrap());

    let job = client
        .create_job(CreateJobInput::new("Platform Engineer"))
        .await
        .unwrap();

    let company = client.load_company("company_2").await.unwrap().unwrap();
    assert_eq!(company.name, "Goobook");
    let ids: Vec<_> = company.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["job_3", "job_4", job.id.as_str()]);

    assert!(client.load_company("company_404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let (client, count) = counting_client().await;

    assert!(!client.login("alice@facegle.com", "nope").await.unwrap());
    assert!(!client.is_logged_in().await);
    // Login bypasses the GraphQL middleware chain.
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_logout_drops_authorization() {
    let (client, _) = counting_client().await;
    assert!(client.login("alice@facegle.com", "alice123").await.unwrap());
    client.logout().await;

    let err = client
        .create_job(CreateJobInput::new("Rust Engineer"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (client, _) = counting_client().await;
    client.session().set_token("not-a-jwt").await;

    let err = client.load_jobs().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn test_jobs_without_company_still_load() {
    let (client, _) = counting_client_for(store_with_orphaned_job()).await;

    let jobs = client.load_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].company.as_ref().unwrap().name, "Acme");
    assert!(jobs[1].company.is_none());

    let orphan = client.load_job("j2").await.unwrap().unwrap();
    assert_eq!(orphan.title, "Title j2");
    assert!(orphan.company.is_none());
}

#[tokio::test]
async fn test_network_only_fetches_and_stores() {
    let (client, count) = counting_client().await;
    let graphql = client.graphql();
    let vars = IdVariables::new("job_2");

    for _ in 0..2 {
        let data = graphql
            .query::<JobQuery>(&vars, FetchPolicy::NetworkOnly)
            .await
            .unwrap();
        assert_eq!(data.job.unwrap().title, "Backend Developer");
    }
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(client.cache().len().await, 1);

    // The stored result now answers cache-first reads.
    client.load_job("job_2").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_status_without_graphql_body() {
    let addr = spawn_server(Store::with_seed_data()).await;
    let client = GraphQLClient::new(format!("http://{addr}/elsewhere")).unwrap();

    let err = client
        .query::<JobQuery>(&IdVariables::new("job_1"), FetchPolicy::NoCache)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::HttpError);
    assert!(err.message.starts_with("HTTP 404"), "{}", err.message);
}

//! Live integration tests against the real provider APIs
//!
//! Run with:
//! ```bash
//! GITHUB_TOKEN=xxx REPO_OWNER=xxx VERCEL_TOKEN=xxx \
//! CLOUDFLARE_API_TOKEN=xxx CLOUDFLARE_ZONE_ID=xxx TEST_DOMAIN=example.com \
//!     cargo test -p sitedrop-provider --test live_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use sitedrop_provider::{
    CreateDnsRecordRequest, CreateRepositoryRequest, DnsRecordType, PutFileRequest,
    RecordQueryParams,
};

#[tokio::test]
#[ignore = "integration test: requires GITHUB_TOKEN and REPO_OWNER"]
async fn test_github_repository_lifecycle() {
    skip_if_no_credentials!("GITHUB_TOKEN", "REPO_OWNER");

    let github = require_some!(common::github(), "failed to build GitHub client");
    let name = common::generate_test_label();

    let repo = require_ok!(
        github
            .create_repository(&CreateRepositoryRequest {
                name: name.clone(),
                private: true,
                description: Some("sitedrop integration test".into()),
            })
            .await,
        "create_repository failed"
    );
    assert_eq!(repo.name, name);

    let sha = github
        .put_file(
            &name,
            &PutFileRequest {
                path: "index.html".into(),
                content: b"<h1>hi</h1>".to_vec(),
                message: "Initial commit".into(),
                sha: None,
            },
        )
        .await;
    let file = github.get_file(&name, "index.html").await;
    let missing = github.get_file(&name, "nope.txt").await;

    // Clean up before asserting so a failure does not leak the repository.
    let _ = github.delete_repository(&name).await;

    let sha = require_ok!(sha, "put_file failed");
    let file = require_some!(require_ok!(file, "get_file failed"), "file missing");
    assert_eq!(file.sha, sha);
    assert_eq!(file.content, b"<h1>hi</h1>");
    assert!(matches!(missing, Ok(None)));

    println!("✓ repository lifecycle passed: {}", repo.full_name);
}

#[tokio::test]
#[ignore = "integration test: requires VERCEL_TOKEN"]
async fn test_vercel_list_projects() {
    skip_if_no_credentials!("VERCEL_TOKEN");

    let vercel = require_some!(common::vercel(), "failed to build Vercel client");
    let projects = require_ok!(vercel.list_projects().await, "list_projects failed");
    let missing = require_ok!(
        vercel.get_project(&common::generate_test_label()).await,
        "get_project failed"
    );
    assert!(missing.is_none());

    let unclaimed = format!("{}.invalid", common::generate_test_label());
    let owner = require_ok!(vercel.domain_project(&unclaimed).await, "domain_project failed");
    assert!(owner.is_none());

    println!("✓ list_projects passed, {} projects", projects.len());
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_record_lifecycle() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let (dns, zone_id, zone_name) =
        require_some!(common::cloudflare(), "failed to build Cloudflare client");
    let label = common::generate_test_label();
    let fqdn = format!("{label}.{zone_name}");

    let record = require_ok!(
        dns.create_record(&CreateDnsRecordRequest {
            zone_id: zone_id.clone(),
            name: label.clone(),
            record_type: DnsRecordType::A,
            content: "192.0.2.1".into(),
            ttl: 1,
            proxied: Some(false),
        })
        .await,
        "create_record failed"
    );

    let found = dns
        .list_records(&zone_id, &RecordQueryParams::by_name(&fqdn))
        .await;
    let deleted = dns
        .batch_delete_records(&zone_id, std::slice::from_ref(&record.id))
        .await;

    let found = require_ok!(found, "list_records failed");
    assert!(found.iter().any(|r| r.id == record.id));
    let deleted = require_ok!(deleted, "batch_delete_records failed");
    assert_eq!(deleted.success_count, 1);

    println!("✓ record lifecycle passed: {fqdn}");
}

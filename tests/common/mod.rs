use chrono::{DateTime, SecondsFormat, Utc};
use restic_mon::configuration::{MonitorSettings, S3Settings, Settings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Settings pointing the monitor at a mock S3 server.
pub fn settings_for(s3_url: &str) -> Settings {
    Settings {
        s3: S3Settings {
            url: s3_url.to_string(),
            access_key_id: "test-access-key".to_string(),
            secret_access_key: "test-secret-key".to_string(),
            region: "us-east-1".to_string(),
        },
        monitor: MonitorSettings {
            bucket_prefix: String::new(),
            bucket_names: String::new(),
            search_folders: false,
            warn_age_hours: 36,
            crit_age_hours: 72,
        },
    }
}

/// Run the server on an ephemeral port in a background task.
pub async fn spawn_app(settings: Settings) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = restic_mon::startup::run(listener, settings).expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

pub fn list_buckets_body(names: &[&str]) -> String {
    let buckets: String = names
        .iter()
        .map(|name| {
            format!(
                "<Bucket><Name>{}</Name><CreationDate>2026-01-01T00:00:00.000Z</CreationDate></Bucket>",
                name
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListAllMyBucketsResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Owner><ID>test</ID></Owner><Buckets>{}</Buckets></ListAllMyBucketsResult>",
        buckets
    )
}

pub fn list_objects_body(bucket: &str, entries: &[(&str, DateTime<Utc>)]) -> String {
    let contents: String = entries
        .iter()
        .map(|(key, modified)| {
            format!(
                "<Contents><Key>{}</Key><LastModified>{}</LastModified>\
                 <ETag>&quot;etag&quot;</ETag><Size>1</Size>\
                 <StorageClass>STANDARD</StorageClass></Contents>",
                key,
                modified.to_rfc3339_opts(SecondsFormat::Millis, true)
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>{}</Name><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>\
         <IsTruncated>false</IsTruncated>{}</ListBucketResult>",
        bucket,
        entries.len(),
        contents
    )
}

pub fn list_folders_body(bucket: &str, folders: &[&str]) -> String {
    let prefixes: String = folders
        .iter()
        .map(|folder| format!("<CommonPrefixes><Prefix>{}</Prefix></CommonPrefixes>", folder))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>{}</Name><Delimiter>/</Delimiter><KeyCount>0</KeyCount>\
         <MaxKeys>1000</MaxKeys><IsTruncated>false</IsTruncated>{}</ListBucketResult>",
        bucket, prefixes
    )
}

pub async fn mock_bucket_listing(s3: &MockServer, names: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(xml_response(list_buckets_body(names)))
        .mount(s3)
        .await;
}

/// GetBucketLocation answering with the classic (empty) location constraint.
pub async fn mock_bucket_location(s3: &MockServer, bucket: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("location", ""))
        .respond_with(xml_response(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <LocationConstraint xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\"/>"
                .to_string(),
        ))
        .mount(s3)
        .await;
}

/// Snapshot objects under `<folder>snapshots` in a bucket; ages are in hours
/// relative to now.
pub async fn mock_snapshot_objects(s3: &MockServer, bucket: &str, folder: &str, ages: &[f64]) {
    let now = Utc::now();
    let entries: Vec<(String, DateTime<Utc>)> = ages
        .iter()
        .enumerate()
        .map(|(i, age)| {
            let modified = now - chrono::Duration::seconds((age * 3600.0) as i64);
            (format!("{}snapshots/{:02}", folder, i), modified)
        })
        .collect();
    let borrowed: Vec<(&str, DateTime<Utc>)> = entries
        .iter()
        .map(|(key, modified)| (key.as_str(), *modified))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("list-type", "2"))
        .and(query_param("prefix", format!("{}snapshots", folder)))
        .respond_with(xml_response(list_objects_body(bucket, &borrowed)))
        .mount(s3)
        .await;
}

pub async fn mock_folder_listing(s3: &MockServer, bucket: &str, folders: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("list-type", "2"))
        .and(query_param("delimiter", "/"))
        .respond_with(xml_response(list_folders_body(bucket, folders)))
        .mount(s3)
        .await;
}

fn access_denied() -> ResponseTemplate {
    ResponseTemplate::new(403).set_body_raw(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Error><Code>AccessDenied</Code><Message>Access Denied</Message>\
         <RequestId>req</RequestId><HostId>host</HostId></Error>",
        "application/xml",
    )
}

/// Object listing that fails with AccessDenied.
pub async fn mock_listing_failure(s3: &MockServer, bucket: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("list-type", "2"))
        .respond_with(access_denied())
        .mount(s3)
        .await;
}

struct MissingQueryParam(&'static str);

impl Match for MissingQueryParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

fn truncated_list_objects_body(
    bucket: &str,
    entries: &[(&str, DateTime<Utc>)],
    next_token: &str,
) -> String {
    let contents: String = entries
        .iter()
        .map(|(key, modified)| {
            format!(
                "<Contents><Key>{}</Key><LastModified>{}</LastModified>\
                 <ETag>&quot;etag&quot;</ETag><Size>1</Size>\
                 <StorageClass>STANDARD</StorageClass></Contents>",
                key,
                modified.to_rfc3339_opts(SecondsFormat::Millis, true)
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>{}</Name><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>\
         <IsTruncated>true</IsTruncated>\
         <NextContinuationToken>{}</NextContinuationToken>{}</ListBucketResult>",
        bucket,
        entries.len(),
        next_token,
        contents
    )
}

/// First snapshot listing page: truncated, carrying a continuation token.
/// Matches only the initial request (no continuation-token parameter).
pub async fn mock_truncated_snapshot_objects(
    s3: &MockServer,
    bucket: &str,
    ages: &[f64],
    next_token: &str,
) {
    let now = Utc::now();
    let entries: Vec<(String, DateTime<Utc>)> = ages
        .iter()
        .enumerate()
        .map(|(i, age)| {
            let modified = now - chrono::Duration::seconds((age * 3600.0) as i64);
            (format!("snapshots/{:02}", i), modified)
        })
        .collect();
    let borrowed: Vec<(&str, DateTime<Utc>)> = entries
        .iter()
        .map(|(key, modified)| (key.as_str(), *modified))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("list-type", "2"))
        .and(query_param("prefix", "snapshots"))
        .and(MissingQueryParam("continuation-token"))
        .respond_with(xml_response(truncated_list_objects_body(
            bucket, &borrowed, next_token,
        )))
        .mount(s3)
        .await;
}

/// The continuation request for a truncated listing fails with AccessDenied.
pub async fn mock_continuation_failure(s3: &MockServer, bucket: &str, token: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/", bucket)))
        .and(query_param("list-type", "2"))
        .and(query_param("continuation-token", token))
        .respond_with(access_denied())
        .mount(s3)
        .await;
}

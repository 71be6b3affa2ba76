#![allow(dead_code)]

use tokio_postgres::{Client, NoTls, Transaction};

/// Tables are created as temporaries inside the test transaction, so they
/// shadow any real `companies`/`jobs` tables and vanish on rollback.
const SCHEMA: &str = r#"
CREATE TEMP TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
) ON COMMIT DROP;

CREATE TEMP TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL
        REFERENCES companies ON DELETE CASCADE
) ON COMMIT DROP;
"#;

const SEED: &str = r#"
INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
       ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
       ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

INSERT INTO jobs (title, salary, equity, company_handle)
VALUES ('testJob1', 100000, 0.01, 'c3'),
       ('testJob2', 200000, 0.02, 'c1'),
       ('testJob3', 300000, 0, 'c2'),
       ('testJob4', 400000, NULL, 'c1');
"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobly=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub async fn try_connect() -> Option<Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    init_tracing();
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

/// Create and seed the fixture tables inside `tx`.
pub async fn seed(tx: &Transaction<'_>) {
    tx.batch_execute(SCHEMA).await.expect("create schema");
    tx.batch_execute(SEED).await.expect("seed fixtures");
}

pub async fn job_id(tx: &Transaction<'_>, title: &str) -> i32 {
    tx.query_one("SELECT id FROM jobs WHERE title = $1", &[&title])
        .await
        .expect("fixture job")
        .get(0)
}

//! Shared fixtures for database-backed tests.
//!
//! Tests connect only when `DATABASE_URL` is set and otherwise skip. Each
//! test gets its own connection and builds the schema as TEMP tables, so
//! parallel tests never see each other's rows.

use jobdesk::BoardResult;

pub async fn try_connect() -> Option<tokio_postgres::Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

/// Create the schema and seed the fixture rows the tests expect.
pub async fn setup(client: &tokio_postgres::Client) -> BoardResult<()> {
    client
        .batch_execute(
            "CREATE TEMP TABLE companies (
                 handle text PRIMARY KEY,
                 name text NOT NULL,
                 description text NOT NULL,
                 num_employees integer,
                 logo_url text
             );
             CREATE TEMP TABLE jobs (
                 id serial PRIMARY KEY,
                 title text NOT NULL,
                 salary integer CHECK (salary >= 0),
                 equity text,
                 company_handle text NOT NULL REFERENCES companies ON DELETE CASCADE
             );
             CREATE TEMP TABLE users (
                 username text PRIMARY KEY,
                 first_name text NOT NULL,
                 last_name text NOT NULL,
                 email text NOT NULL,
                 is_admin boolean NOT NULL DEFAULT false
             );
             INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ('c1', 'C1', 'Desc1', 1, 'http://c1.img'),
                    ('c2', 'C2', 'Desc2', 2, 'http://c2.img'),
                    ('c3', 'C3', 'Desc3', 3, NULL);
             INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ('J1', 1, '0', 'c1'),
                    ('J2', 1, '0.9', 'c2');
             INSERT INTO users (username, first_name, last_name, email, is_admin)
             VALUES ('u1', 'U1F', 'U1L', 'u1@user.com', true),
                    ('u2', 'U2F', 'U2L', 'u2@user.com', false);",
        )
        .await?;
    Ok(())
}

//! MongoDB database wrapper.

use mongodb::{Client, Collection, options::ClientOptions};
use tokio::sync::OnceCell;
use tracing::info;
use url::Url;

/// Connection parameters for MongoDB.
#[derive(Debug, Clone)]
pub struct MongoSettings {
    /// Full connection string; when set, host/port/credentials are ignored.
    pub uri: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub collection: String,
}

impl MongoSettings {
    /// Connection string built from the settings.
    ///
    /// Credentials are percent-encoded.
    pub fn connection_uri(&self) -> anyhow::Result<String> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let mut url = Url::parse(&format!("mongodb://{}:{}", self.host, self.port))?;
        if let Some(user) = &self.user {
            url.set_username(user)
                .map_err(|_| anyhow::anyhow!("MongoDB host cannot carry credentials"))?;
            url.set_password(self.password.as_deref())
                .map_err(|_| anyhow::anyhow!("MongoDB host cannot carry credentials"))?;
        }
        Ok(url.to_string())
    }

    /// Host list for logging, without credentials, path or options.
    pub fn display_host(&self) -> String {
        let Some(uri) = &self.uri else {
            return format!("{}:{}", self.host, self.port);
        };

        let rest = uri.split_once("://").map_or(uri.as_str(), |(_, rest)| rest);
        let authority = rest.split(['/', '?']).next().unwrap_or(rest);
        authority
            .rsplit_once('@')
            .map_or(authority, |(_, hosts)| hosts)
            .to_string()
    }
}

/// Database wrapper for MongoDB operations.
///
/// The connection is opened on first use and then shared.
#[derive(Debug)]
pub struct Database {
    settings: MongoSettings,
    db: OnceCell<mongodb::Database>,
}

impl Database {
    pub fn new(settings: MongoSettings) -> Self {
        Self {
            settings,
            db: OnceCell::new(),
        }
    }

    /// Get the database handle, connecting if needed.
    ///
    /// # Errors
    /// Returns error if the connection or the initial ping fails. A failed
    /// attempt is retried on the next call.
    pub async fn db(&self) -> anyhow::Result<&mongodb::Database> {
        self.db.get_or_try_init(|| self.connect()).await
    }

    /// Get a typed collection from the database.
    pub async fn collection<T: Send + Sync>(&self, name: &str) -> anyhow::Result<Collection<T>> {
        Ok(self.db().await?.collection(name))
    }

    async fn connect(&self) -> anyhow::Result<mongodb::Database> {
        info!("Connecting to MongoDB at {}...", self.settings.display_host());

        let options = ClientOptions::parse(self.settings.connection_uri()?).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        Ok(client.database(&self.settings.database))
    }
}

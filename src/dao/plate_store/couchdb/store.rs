use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};

use crate::dao::{models::PlateEntity, plate_store::PlateStore, storage::StorageResult};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        CouchPlateDocument, CreatedResponse, FIND_PAGE_SIZE, FindRequest, FindResponse,
        IndexRequest,
    },
};

const FIND_PATH: &str = "_find";
const INDEX_PATH: &str = "_index";

/// Plate store backed by a CouchDB database, queried through Mango.
#[derive(Clone)]
pub struct CouchPlateStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchPlateStore {
    /// Establish a connection to CouchDB, creating the database and its plate index if needed.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        store.ensure_index().await?;
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn request(&self, method: Method, path: Option<&str>) -> reqwest::RequestBuilder {
        let url = match path {
            Some(path) => format!("{}/{}", self.database_url(), path),
            None => self.database_url(),
        };
        let builder = self.client.request(method, url);
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let response = self
            .request(Method::GET, None)
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .request(Method::PUT, None)
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    })?;
                // 412 means another instance created it first.
                if create.status().is_success() || create.status() == StatusCode::PRECONDITION_FAILED
                {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn ensure_index(&self) -> CouchResult<()> {
        let response = self
            .request(Method::POST, Some(INDEX_PATH))
            .json(&IndexRequest::plate_index())
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: INDEX_PATH.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: INDEX_PATH.to_string(),
                status: response.status(),
            })
        }
    }

    async fn insert_plate(&self, plate: PlateEntity) -> CouchResult<String> {
        let path = self.database.to_string();
        let document = CouchPlateDocument::from_entity(plate);
        let response = self
            .request(Method::POST, None)
            .json(&document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        let created = response
            .json::<CreatedResponse>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse { path, source })?;
        Ok(created.id)
    }

    /// Run the Mango query page by page until CouchDB returns a short page.
    async fn find_plates(&self, plate: String) -> CouchResult<Vec<PlateEntity>> {
        let mut entities = Vec::new();
        let mut bookmark: Option<String> = None;

        loop {
            let body = FindRequest::for_plate(&plate, bookmark.as_deref());
            let response = self
                .request(Method::POST, Some(FIND_PATH))
                .json(&body)
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: FIND_PATH.to_string(),
                    source,
                })?;

            if !response.status().is_success() {
                return Err(CouchDaoError::RequestStatus {
                    path: FIND_PATH.to_string(),
                    status: response.status(),
                });
            }

            let page = response.json::<FindResponse>().await.map_err(|source| {
                CouchDaoError::DecodeResponse {
                    path: FIND_PATH.to_string(),
                    source,
                }
            })?;

            let page_len = page.docs.len();
            entities.extend(page.docs.into_iter().map(CouchPlateDocument::into_entity));

            match page.bookmark {
                Some(next) if page_len == FIND_PAGE_SIZE => bookmark = Some(next),
                _ => break,
            }
        }

        Ok(entities)
    }
}

impl PlateStore for CouchPlateStore {
    fn backend(&self) -> &'static str {
        "couchdb"
    }

    fn add_plate(&self, plate: PlateEntity) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        Box::pin(async move { store.insert_plate(plate).await.map_err(Into::into) })
    }

    fn find_by_plate(&self, plate: String) -> BoxFuture<'static, StorageResult<Vec<PlateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_plates(plate).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = store.database_url();
            let response = store
                .request(Method::GET, None)
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: url.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_database().await?;
            store.ensure_index().await.map_err(Into::into)
        })
    }
}

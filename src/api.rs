use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::config::ClientConfig;
use crate::protocol::{Catalog, EntitySnapshot, GameStatus, MapData, PlaceRequest, PlaceResponse, Resources};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("could not decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("missing page element #{0}")]
    MissingElement(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        ClientError::Js(format!("{:?}", value))
    }
}

impl From<ClientError> for JsValue {
    fn from(err: ClientError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn transport(path: &str, err: gloo_net::Error) -> ClientError {
    ClientError::Transport { path: path.to_string(), message: err.to_string() }
}

/// Parses a response body; kept separate from the HTTP call so it can be
/// exercised without a browser.
pub fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode { path: path.to_string(), message: e.to_string() })
}

// --- BACKEND ---

/// Stateless request/response access to the game backend. Nothing here is
/// cached; every call is a fresh round-trip.
pub struct Backend {
    config: ClientConfig,
}

impl Backend {
    pub fn new(config: ClientConfig) -> Backend {
        Backend { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_text(&self, path: &str) -> Result<String, ClientError> {
        let resp = Request::get(&self.config.endpoint(path))
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        resp.text().await.map_err(|e| transport(path, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.get_text(path).await?;
        decode(path, &body)
    }

    pub async fn ping(&self) -> Result<String, ClientError> {
        self.get_text("/").await
    }

    pub async fn resources(&self) -> Result<Resources, ClientError> {
        self.get_json("/resources").await
    }

    pub async fn catalog(&self) -> Result<Catalog, ClientError> {
        self.get_json("/available_entities").await
    }

    pub async fn map(&self) -> Result<MapData, ClientError> {
        self.get_json("/map").await
    }

    pub async fn entities(&self) -> Result<EntitySnapshot, ClientError> {
        self.get_json("/entities").await
    }

    pub async fn game_state(&self) -> Result<GameStatus, ClientError> {
        self.get_json("/game_state").await
    }

    /// Rejections arrive with a 4xx status but still carry a
    /// `{success, message}` body, so the status code is not inspected.
    pub async fn place(&self, req: &PlaceRequest) -> Result<PlaceResponse, ClientError> {
        let path = "/place_entity";
        let resp = Request::post(&self.config.endpoint(path))
            .json(req)
            .map_err(|e| transport(path, e))?
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        let body = resp.text().await.map_err(|e| transport(path, e))?;
        decode(path, &body)
    }

    pub async fn stop_game(&self) -> Result<(), ClientError> {
        self.get_text("/stop_game").await.map(|_| ())
    }
}

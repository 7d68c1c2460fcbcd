//! REST client capability: the uniform response envelope, the transport
//! seam and typed resource operations on top of it.

pub mod http;

use std::{fmt, sync::Arc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    common::{null_as_default, Identifiable},
    Booking, BookingInput, Room, RoomInput,
};

pub use http::HttpTransport;

/// Uniform `{ status, msg, data }` wrapper returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(rename = "msg", default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: true,
            message: message.into(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: None,
        }
    }

    /// Local stand-in for a non-2xx transport response.
    pub fn http_failure(code: u16, body: &str) -> Self {
        Self::failure(format!("HTTP {}: {}", code, body))
    }

    /// Payload of a successful envelope, `None` when the server reported a
    /// failure or sent no data.
    pub fn into_data(self) -> Option<T> {
        if self.status {
            self.data
        } else {
            None
        }
    }
}

impl Envelope<Value> {
    /// Decodes the raw JSON payload into the caller's type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, ApiError> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(Envelope {
            status: self.status,
            message: self.message,
            data,
        })
    }
}

/// Transport-level failure: the request never produced an envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Connection refused or timed out.
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API base URL `{0}`")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(label)
    }
}

/// A single request against the backend, path relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Executes requests and yields raw envelopes. Non-2xx responses must be
/// turned into failure envelopes; only transport problems are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &ApiRequest) -> Result<Envelope<Value>, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &ApiRequest) -> Result<Envelope<Value>, ApiError> {
        (**self).execute(request)
    }
}

/// Describes a CRUD resource exposed by the backend.
pub trait Resource: DeserializeOwned + Identifiable + Clone + Default + fmt::Debug {
    type Input: Serialize + fmt::Debug;

    /// Singular, human-facing name used in messages.
    const NAME: &'static str;
    const LIST_PATH: &'static str;
    const ITEM_PATH: &'static str;
    const CREATE_PATH: &'static str;
    const UPDATE_PATH: &'static str;
    const DELETE_PATH: &'static str;
}

impl Resource for Room {
    type Input = RoomInput;

    const NAME: &'static str = "room";
    const LIST_PATH: &'static str = "salas/lista-salas";
    const ITEM_PATH: &'static str = "salas/sala";
    const CREATE_PATH: &'static str = "salas/adicionar";
    const UPDATE_PATH: &'static str = "salas/atualizar";
    const DELETE_PATH: &'static str = "salas/eliminar";
}

impl Resource for Booking {
    type Input = BookingInput;

    const NAME: &'static str = "booking";
    const LIST_PATH: &'static str = "agendamentos/listaAgendamentos";
    const ITEM_PATH: &'static str = "agendamentos/agendamento";
    const CREATE_PATH: &'static str = "agendamentos/adicionar";
    const UPDATE_PATH: &'static str = "agendamentos/atualizar";
    const DELETE_PATH: &'static str = "agendamentos/eliminar";
}

/// Typed resource operations over a [`Transport`].
pub struct ApiClient {
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn list<E: Resource>(&self) -> Result<Envelope<Vec<E>>, ApiError> {
        self.send(ApiRequest::new(Method::Get, E::LIST_PATH))
    }

    pub fn get<E: Resource>(&self, id: u32) -> Result<Envelope<E>, ApiError> {
        self.send(ApiRequest::new(
            Method::Get,
            format!("{}/{}", E::ITEM_PATH, id),
        ))
    }

    pub fn create<E: Resource>(&self, input: &E::Input) -> Result<Envelope<E>, ApiError> {
        let body = serde_json::to_value(input)?;
        self.send(ApiRequest::new(Method::Post, E::CREATE_PATH).with_body(body))
    }

    pub fn update<E: Resource>(&self, id: u32, input: &E::Input) -> Result<Envelope<E>, ApiError> {
        let body = serde_json::to_value(input)?;
        self.send(
            ApiRequest::new(Method::Put, format!("{}/{}", E::UPDATE_PATH, id)).with_body(body),
        )
    }

    pub fn delete<E: Resource>(&self, id: u32) -> Result<Envelope<bool>, ApiError> {
        self.send(ApiRequest::new(
            Method::Delete,
            format!("{}/{}", E::DELETE_PATH, id),
        ))
    }

    fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Envelope<T>, ApiError> {
        tracing::info!(method = %request.method, path = %request.path, "issuing request");
        let envelope = self.transport.execute(&request).map_err(|err| {
            tracing::error!(path = %request.path, error = %err, "request failed");
            err
        })?;
        if !envelope.status {
            tracing::warn!(path = %request.path, message = %envelope.message, "server reported failure");
        }
        envelope.decode()
    }
}

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use booking_core::{
    api::{ApiError, ApiRequest, Envelope, Method, Transport},
    clock::FixedClock,
    controllers::AppContext,
    notify::MemoryNotifier,
};
use serde_json::{json, Map, Value};

/// Instant every test context runs at.
pub const NOW: &str = "2026-10-16 10:00";

#[derive(Default)]
struct BackendState {
    rooms: Vec<Value>,
    bookings: Vec<Value>,
    next_id: u32,
    requests: Vec<ApiRequest>,
    offline: bool,
    reject: Option<String>,
}

/// In-memory stand-in for the booking REST backend.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        backend.state.lock().unwrap().next_id = 100;
        Arc::new(backend)
    }

    pub fn add_room(&self, id: u32, name: &str, location: &str) {
        self.state.lock().unwrap().rooms.push(json!({
            "id": id,
            "nome": name,
            "local": location,
            "ativo": true,
            "dataCriacao": "01/10/2026"
        }));
    }

    pub fn add_booking(&self, booking: Value) {
        self.state.lock().unwrap().bookings.push(booking);
    }

    /// Every request fails at the transport level.
    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    /// Every request is answered with `status: false` and `message`.
    pub fn reject_with(&self, message: &str) {
        self.state.lock().unwrap().reject = Some(message.to_string());
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// `"METHOD path"` for each request received.
    pub fn request_log(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub fn writes(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method != Method::Get)
            .collect()
    }

    pub fn bookings(&self) -> Vec<Value> {
        self.state.lock().unwrap().bookings.clone()
    }
}

impl Transport for FakeBackend {
    fn execute(&self, request: &ApiRequest) -> Result<Envelope<Value>, ApiError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.requests.push(request.clone());

        if state.offline {
            return Err(ApiError::Unreachable("connection refused".into()));
        }
        if let Some(message) = state.reject.clone() {
            return Ok(Envelope::failure(message));
        }

        let segments: Vec<&str> = request.path.split('/').collect();
        let (resource, action, id) = match segments.as_slice() {
            [resource, action] => (*resource, *action, None),
            [resource, action, id] => (*resource, *action, id.parse::<u32>().ok()),
            _ => return Ok(Envelope::http_failure(404, "not found")),
        };

        let next_id = state.next_id;
        let collection = match resource {
            "salas" => &mut state.rooms,
            "agendamentos" => &mut state.bookings,
            _ => return Ok(Envelope::http_failure(404, "not found")),
        };

        let envelope = match (request.method, action, id) {
            (Method::Get, "lista-salas" | "listaAgendamentos", None) => {
                Envelope::success("", Some(Value::Array(collection.clone())))
            }
            (Method::Get, "sala" | "agendamento", Some(id)) => {
                match collection.iter().find(|item| item["id"] == id) {
                    Some(item) => Envelope::success("", Some(item.clone())),
                    None => Envelope::failure("Registro não encontrado"),
                }
            }
            (Method::Post, "adicionar", None) => {
                let mut item = request.body.clone().unwrap_or_else(|| json!({}));
                item["id"] = json!(next_id);
                collection.push(item.clone());
                state.next_id += 1;
                Envelope::success("Registro gravado com sucesso", Some(item))
            }
            (Method::Put, "atualizar", Some(id)) => {
                match collection.iter_mut().find(|item| item["id"] == id) {
                    Some(item) => {
                        merge(item, request.body.clone().unwrap_or_else(|| json!({})));
                        Envelope::success("Registro atualizado", Some(item.clone()))
                    }
                    None => Envelope::failure("Registro não encontrado"),
                }
            }
            (Method::Delete, "eliminar", Some(id)) => {
                let before = collection.len();
                collection.retain(|item| item["id"] != id);
                if collection.len() < before {
                    Envelope::success("Registro eliminado", Some(json!(true)))
                } else {
                    Envelope::failure("Registro não encontrado")
                }
            }
            _ => Envelope::http_failure(405, "method not allowed"),
        };
        Ok(envelope)
    }
}

fn merge(target: &mut Value, patch: Value) {
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        let patch: Map<String, Value> = patch;
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

/// Context over `backend` with a recording notifier that answers
/// confirmations with `confirm`.
pub fn context(backend: &Arc<FakeBackend>, confirm: bool) -> (AppContext, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new(confirm));
    let clock = FixedClock::parse(NOW).expect("valid test instant");
    let ctx = AppContext::new(Arc::clone(backend), Arc::clone(&notifier), clock);
    (ctx, notifier)
}

pub fn booking_json(id: u32, room_id: u32, date: &str) -> Value {
    json!({
        "id": id,
        "salaId": room_id,
        "salaNome": format!("Sala {}", room_id),
        "local": "Bloco A",
        "dataAgendamento": date,
        "horaInicio": "09:00:00",
        "horaFim": "10:00:00",
        "responsavel": "Ana",
        "cafe": false,
        "cafeQuantidade": null,
        "cafeDescricao": null,
        "dataCriacao": "01/10/2026"
    })
}

/// A request seen by [`serve`]: request line plus body.
#[derive(Debug, Clone)]
pub struct Captured {
    pub request_line: String,
    pub headers: String,
    pub body: String,
}

/// Serves one canned `(status, body)` response per accepted connection on
/// an ephemeral port. Returns the base URL and a handle yielding what was
/// received.
pub fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            captured.push(read_request(&mut stream));

            let reason = if status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
        captured
    });

    (format!("http://{}/", addr), handle)
}

fn read_request(stream: &mut impl Read) -> Captured {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut chunk).unwrap_or(0);
        if read == 0 {
            break None;
        }
        data.extend_from_slice(&chunk[..read]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break Some(pos + 4);
        }
    };
    let Some(header_end) = header_end else {
        return Captured {
            request_line: String::from_utf8_lossy(&data).into_owned(),
            headers: String::new(),
            body: String::new(),
        };
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let read = stream.read(&mut chunk).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);
    }

    let (request_line, headers) = head.split_once("\r\n").unwrap_or((head.as_str(), ""));
    Captured {
        request_line: request_line.to_string(),
        headers: headers.to_ascii_lowercase(),
        body: String::from_utf8_lossy(&data[header_end..]).into_owned(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

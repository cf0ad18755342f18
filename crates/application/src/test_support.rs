//! In-memory Todos server for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};
use todos_domain::{HttpMethod, RequestSpec, ResponseSpec, TodoItem};

use crate::ports::{HttpClient, HttpClientError, HttpFuture};

/// Deviations from the Todos contract the fake can be told to make.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub create_status: Option<u16>,
    pub omit_location: bool,
    pub relative_location: bool,
    pub cors_origin: Option<String>,
    pub omit_cors_headers: bool,
    pub ignore_updates: bool,
    pub delete_status: Option<u16>,
    pub fail_deletes: bool,
}

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    items: BTreeMap<u64, TodoItem>,
}

/// Stateful fake implementing the Todos wire contract.
#[derive(Debug, Default)]
pub struct FakeTodoServer {
    store: Mutex<Store>,
    requests: Mutex<Vec<RequestSpec>>,
    unreachable: bool,
    faults: Faults,
}

impl FakeTodoServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }

    pub fn live_items(&self) -> Vec<TodoItem> {
        self.store.lock().unwrap().items.values().cloned().collect()
    }

    fn handle(&self, request: &RequestSpec) -> ResponseSpec {
        let url = request.parse_url().unwrap();
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();
        let id = match segments.as_slice() {
            ["todos"] => None,
            ["todos", id] => match id.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => return respond(404, &[], Value::Null),
            },
            _ => return respond(404, &[], Value::Null),
        };

        let mut store = self.store.lock().unwrap();
        match (request.method, id) {
            (HttpMethod::Options, _) => self.preflight(),
            (HttpMethod::Post, None) => {
                let title = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("title"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                store.next_id += 1;
                let id = store.next_id;
                let item = TodoItem {
                    id: Some(id),
                    title,
                    completed: false,
                };
                store.items.insert(id, item.clone());

                let location = if self.faults.relative_location {
                    format!("/todos/{id}")
                } else {
                    let mut absolute = url.clone();
                    absolute.set_path(&format!("/todos/{id}"));
                    absolute.set_query(None);
                    absolute.to_string()
                };
                let mut headers = vec![];
                if !self.faults.omit_location {
                    headers.push(("Location".to_string(), location));
                }
                respond(
                    self.faults.create_status.unwrap_or(201),
                    &headers,
                    serde_json::to_value(&item).unwrap(),
                )
            }
            (HttpMethod::Get, None) => {
                let items: Vec<&TodoItem> = store.items.values().collect();
                respond(200, &[], serde_json::to_value(items).unwrap())
            }
            (HttpMethod::Get, Some(id)) => match store.items.get(&id) {
                Some(item) => respond(200, &[], serde_json::to_value(item).unwrap()),
                None => respond(404, &[], json!({"error": "Not Found"})),
            },
            (HttpMethod::Put | HttpMethod::Patch, Some(id)) => {
                let ignore = self.faults.ignore_updates;
                match store.items.get_mut(&id) {
                    Some(item) => {
                        if !ignore {
                            if let Some(completed) = request
                                .body
                                .as_ref()
                                .and_then(|b| b.get("completed"))
                                .and_then(Value::as_bool)
                            {
                                item.completed = completed;
                            }
                        }
                        respond(200, &[], serde_json::to_value(&*item).unwrap())
                    }
                    None => respond(404, &[], json!({"error": "Not Found"})),
                }
            }
            (HttpMethod::Delete, Some(id)) => {
                if self.faults.fail_deletes {
                    return respond(500, &[], Value::Null);
                }
                if store.items.remove(&id).is_some() {
                    respond(self.faults.delete_status.unwrap_or(204), &[], Value::Null)
                } else {
                    respond(404, &[], json!({"error": "Not Found"}))
                }
            }
            _ => respond(405, &[], Value::Null),
        }
    }

    fn preflight(&self) -> ResponseSpec {
        if self.faults.omit_cors_headers {
            return respond(204, &[], Value::Null);
        }
        let origin = self
            .faults
            .cors_origin
            .clone()
            .unwrap_or_else(|| "*".to_string());
        respond(
            204,
            &[
                ("Access-Control-Allow-Origin".to_string(), origin),
                (
                    "Access-Control-Allow-Methods".to_string(),
                    "GET,POST,PUT,PATCH,DELETE".to_string(),
                ),
                (
                    "Access-Control-Allow-Headers".to_string(),
                    "content-type".to_string(),
                ),
            ],
            Value::Null,
        )
    }
}

impl HttpClient for FakeTodoServer {
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let result = if self.unreachable {
            Err(HttpClientError::ConnectionRefused {
                host: "localhost".to_string(),
                port: 8000,
            })
        } else {
            Ok(self.handle(request))
        };
        Box::pin(std::future::ready(result))
    }
}

fn respond(status: u16, headers: &[(String, String)], body: Value) -> ResponseSpec {
    let mut map: HashMap<String, String> = headers.iter().cloned().collect();
    let body = if body.is_null() {
        Vec::new()
    } else {
        map.insert("Content-Type".to_string(), "application/json".to_string());
        serde_json::to_vec(&body).unwrap()
    };
    ResponseSpec::new(status, map, body, Duration::from_millis(1))
}

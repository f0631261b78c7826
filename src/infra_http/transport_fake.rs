use crate::application_port::*;
use crate::domain_port::*;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

type Scripted = Result<HttpResponse, TransportError>;

#[derive(Debug, Default)]
struct Route {
    replies: VecDeque<Scripted>,
    last_served: bool,
}

/// In-process transport with scripted replies per `(method, path)`.
///
/// Replies are served in order and the last one repeats. Scripting a route
/// again after its last reply was served replaces that reply. Unscripted
/// routes answer 404. Every request is recorded for later inspection.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Path (and query) part of an absolute URL.
fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.find('/').map_or("/", |idx| &rest[idx..])
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        let body = serde_json::to_vec(&body).unwrap_or_default();
        self.push(method, path, Ok(HttpResponse { status, body }));
    }

    pub fn respond_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: TransportError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Scripted) {
        let mut routes = guard(&self.routes);
        let route = routes.entry((method, path.to_string())).or_default();
        if route.last_served {
            route.replies.clear();
            route.last_served = false;
        }
        route.replies.push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        guard(&self.requests).clone()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        guard(&self.requests)
            .iter()
            .filter(|request| request.method == method && path_of(&request.url) == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, path_of(&request.url).to_string());
        guard(&self.requests).push(request);

        let mut routes = guard(&self.routes);
        match routes.get_mut(&key) {
            Some(route) if route.replies.len() > 1 => route
                .replies
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("empty script".into()))),
            Some(route) => {
                route.last_served = true;
                route
                    .replies
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Err(TransportError::Network("empty script".into())))
            }
            None => Ok(HttpResponse {
                status: 404,
                body: br#"{"detail":"Not Found"}"#.to_vec(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_taken_after_the_origin() {
        assert_eq!(path_of("https://api.example.test/auth/me"), "/auth/me");
        assert_eq!(path_of("http://127.0.0.1:8080"), "/");
        assert_eq!(path_of("/bookings/bookings"), "/bookings/bookings");
    }

    fn get(path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("https://api.example.test{path}"),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn replies_are_served_in_order_then_repeat() {
        let transport = FakeTransport::new();
        transport.respond_raw(HttpMethod::Get, "/a", 401, "");
        transport.respond_raw(HttpMethod::Get, "/a", 200, "");

        assert_eq!(transport.send(get("/a")).await.unwrap().status, 401);
        assert_eq!(transport.send(get("/a")).await.unwrap().status, 200);
        assert_eq!(transport.send(get("/a")).await.unwrap().status, 200);

        transport.respond_raw(HttpMethod::Get, "/a", 500, "");
        assert_eq!(transport.send(get("/a")).await.unwrap().status, 500);
        assert_eq!(transport.send(get("/b")).await.unwrap().status, 404);
        assert_eq!(transport.count(HttpMethod::Get, "/a"), 4);
    }
}

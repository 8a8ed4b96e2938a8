//! In-process stand-ins for the video platform and the row store.
//!
//! The mock serves canned JSON per route and records every request it sees, so tests can assert
//! both on results and on which calls were (not) made.

#![allow(dead_code)]

use bytes::Bytes;
use channel_tracker::Config;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const YOUTUBE_PREFIX: &str = "/youtube/v3";
pub const ROWS_PATH: &str = "/api/database/rows/table/638/";
pub const API_KEY: &str = "test-key";
pub const STORE_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct Route {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    status: u16,
    body: Value,
}

#[derive(Debug, Clone)]
pub struct MockServer {
    addr: SocketAddr,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to localhost");
        let addr = listener.local_addr().expect("get local address");
        let server = Self {
            addr,
            routes: Arc::default(),
            requests: Arc::default(),
        };

        let shared = server.clone();
        tokio::spawn(async move {
            while let Ok((conn, _)) = listener.accept().await {
                let shared = shared.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let shared = shared.clone();
                        async move { Ok::<_, Infallible>(shared.handle(req).await) }
                    });
                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(TokioIo::new(conn), service)
                        .await;
                });
            }
        });

        server
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn config(&self) -> Config {
        Config::new(
            API_KEY,
            self.url(YOUTUBE_PREFIX),
            self.url(ROWS_PATH),
            STORE_TOKEN,
        )
    }

    /// Serves `body` with `status` for requests whose query contains every pair in `query`.
    ///
    /// The route with the most matching query pairs wins; on a tie the later one does.
    /// A `null` body is sent as an empty response.
    pub fn on(&self, method: &str, path: &str, query: &[(&str, &str)], status: u16, body: Value) {
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            status,
            body,
        });
    }

    /// Shorthand for a YouTube endpoint under [`YOUTUBE_PREFIX`].
    pub fn on_youtube(&self, resource: &str, query: &[(&str, &str)], status: u16, body: Value) {
        self.on("GET", &format!("{YOUTUBE_PREFIX}/{resource}"), query, status, body);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn youtube_requests(&self, resource: &str) -> Vec<Recorded> {
        self.requests_to("GET", &format!("{YOUTUBE_PREFIX}/{resource}"))
    }

    async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query: HashMap<String, String> =
            form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
                .into_owned()
                .collect();
        let authorization = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = req
            .into_body()
            .collect()
            .await
            .map(|b| b.to_bytes())
            .unwrap_or_default();
        let body = serde_json::from_slice(&bytes).ok();

        self.requests.lock().unwrap().push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: query.clone(),
            authorization,
            body,
        });

        let routes = self.routes.lock().unwrap();
        let route = routes
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .filter(|r| r.query.iter().all(|(k, v)| query.get(k) == Some(v)))
            .max_by_key(|r| r.query.len());

        let (status, body) = match route {
            Some(route) if route.body.is_null() => (route.status, Bytes::new()),
            Some(route) => (route.status, Bytes::from(route.body.to_string())),
            None => (
                404,
                Bytes::from(json!({ "error": "ERROR_NO_ROUTE", "detail": path }).to_string()),
            ),
        };

        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Full::new(body))
            .expect("static response parts are valid")
    }
}

pub fn channel_resource(id: &str, title: &str, views: &str, subscribers: &str, videos: &str) -> Value {
    json!({
        "kind": "youtube#channel",
        "id": id,
        "snippet": {
            "title": title,
            "description": "",
            "publishedAt": "2012-04-01T12:00:00Z"
        },
        "statistics": {
            "viewCount": views,
            "subscriberCount": subscribers,
            "hiddenSubscriberCount": false,
            "videoCount": videos
        }
    })
}

pub fn channel_list(items: Vec<Value>) -> Value {
    let total = items.len();
    let mut response = json!({
        "kind": "youtube#channelListResponse",
        "pageInfo": { "totalResults": total, "resultsPerPage": 5 }
    });
    // YouTube leaves `items` out entirely when nothing matched.
    if !items.is_empty() {
        response["items"] = Value::Array(items);
    }
    response
}

pub fn search_list(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "kind": "youtube#searchListResponse",
        "pageInfo": { "totalResults": total, "resultsPerPage": 5 },
        "items": items
    })
}

pub fn channel_hit(channel_id: &str, title: &str) -> Value {
    json!({
        "kind": "youtube#searchResult",
        "id": { "kind": "youtube#channel", "channelId": channel_id },
        "snippet": {
            "publishedAt": "2012-04-01T12:00:00Z",
            "channelId": channel_id,
            "title": title,
            "channelTitle": title
        }
    })
}

pub fn video_hit(video_id: &str, title: &str, published_at: &str) -> Value {
    json!({
        "kind": "youtube#searchResult",
        "id": { "kind": "youtube#video", "videoId": video_id },
        "snippet": {
            "publishedAt": published_at,
            "channelId": "UCsomething",
            "title": title,
            "thumbnails": {
                "default": { "url": format!("https://i.ytimg.com/vi/{video_id}/default.jpg"), "width": 120, "height": 90 },
                "high": { "url": format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"), "width": 480, "height": 360 }
            }
        }
    })
}

pub fn video_stats(video_id: &str, views: &str, likes: &str, comments: &str) -> Value {
    json!({
        "kind": "youtube#video",
        "id": video_id,
        "statistics": {
            "viewCount": views,
            "likeCount": likes,
            "favoriteCount": "0",
            "commentCount": comments
        }
    })
}

pub fn video_list(items: Vec<Value>) -> Value {
    json!({
        "kind": "youtube#videoListResponse",
        "pageInfo": { "totalResults": items.len(), "resultsPerPage": items.len() },
        "items": items
    })
}

pub fn row(id: u64, name: &str, views: Value, subscribers: Value, videos: Value) -> Value {
    json!({
        "id": id,
        "order": format!("{id}.00000000000000000000"),
        "NombreCanal": name,
        "CantidadVistas": views,
        "CantidadSuscriptores": subscribers,
        "CantidadVideos": videos,
        "IdCanal": ""
    })
}

pub fn rows_page(results: Vec<Value>, next: Option<String>) -> Value {
    json!({
        "count": results.len(),
        "next": next,
        "previous": null,
        "results": results
    })
}

//! In-memory fakes for exercising client state without a browser or network.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::channel::oneshot;

use crate::api::{ApiClient, Navigator};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::readiness::Timer;
use crate::storage::MemoryStore;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

pub const BASE: &str = "http://api.test/api";

type Reply = Result<HttpResponse, ApiError>;

enum Script {
    /// Replies in order; the last one delivered repeats once the queue drains.
    Queue { pending: VecDeque<Reply>, last: Option<Reply> },
    /// Reply delivered later through a oneshot channel.
    Gate(Option<oneshot::Receiver<Reply>>),
}

struct Route {
    method: Method,
    path: String,
    script: Script,
}

/// Transport answering from per-route scripts and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Rc<RefCell<Vec<Route>>>,
    sent: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn respond(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let mut routes = self.routes.borrow_mut();
        if let Some(route) = routes.iter_mut().find(|r| r.method == method && r.path == path) {
            if let Script::Queue { pending, .. } = &mut route.script {
                pending.push_back(reply);
                return self;
            }
        }
        routes.push(Route {
            method,
            path: path.to_owned(),
            script: Script::Queue { pending: VecDeque::from([reply]), last: None },
        });
        self
    }

    pub fn ok(&self, method: Method, path: &str, body: serde_json::Value) -> &Self {
        self.respond(method, path, Ok(HttpResponse::new(200, body.to_string())))
    }

    pub fn status(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.respond(method, path, Ok(HttpResponse::new(status, body)))
    }

    /// Hold the reply for `path` until the returned sender fires. Each gate
    /// answers one request; several gates on a path answer in creation order.
    pub fn gate(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.routes.borrow_mut().push(Route {
            method,
            path: path.to_owned(),
            script: Script::Gate(Some(rx)),
        });
        tx
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        let url = format!("{BASE}{path}");
        self.sent.borrow().iter().filter(|r| r.method == method && r.url == url).count()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push(request.clone());
        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url).to_owned();

        let gated = {
            let mut routes = self.routes.borrow_mut();
            let matches = |r: &Route| r.method == request.method && r.path == path;
            // Gates on one path are used in the order they were created.
            let index = routes
                .iter()
                .position(|r| matches(r) && !matches!(r.script, Script::Gate(None)))
                .or_else(|| routes.iter().position(matches));
            let Some(index) = index else {
                return Ok(HttpResponse::new(404, r#"{"message":"no route"}"#));
            };
            match &mut routes[index].script {
                Script::Queue { pending, last } => {
                    if let Some(reply) = pending.pop_front() {
                        *last = Some(reply.clone());
                        return reply;
                    }
                    return last.clone().unwrap_or_else(|| Ok(HttpResponse::new(404, "")));
                }
                Script::Gate(rx) => rx.take(),
            }
        };

        match gated {
            Some(rx) => rx.await.unwrap_or(Err(ApiError::Network("gate dropped".to_owned()))),
            None => Err(ApiError::Network("gate already used".to_owned())),
        }
    }
}

/// Navigator with a settable current path that records redirects.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    path: Rc<RefCell<String>>,
    redirects: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        let nav = Self::default();
        *nav.path.borrow_mut() = path.to_owned();
        nav
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
        *self.path.borrow_mut() = path.to_owned();
    }
}

/// Virtual clock. Time jumps to the earliest pending sleep deadline, so
/// overlapping sleeps (a slow probe racing a deadline) settle in order.
/// Every non-zero sleep yields at least once.
#[derive(Clone, Default)]
pub struct FakeTimer {
    now: Rc<Cell<Duration>>,
    sleeps: Rc<Cell<usize>>,
    pending: Rc<RefCell<Vec<Duration>>>,
}

impl FakeTimer {
    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }

    fn earliest(&self) -> Option<Duration> {
        self.pending.borrow().iter().min().copied()
    }

    fn unregister(&self, deadline: Duration) {
        let mut pending = self.pending.borrow_mut();
        if let Some(pos) = pending.iter().position(|d| *d == deadline) {
            pending.swap_remove(pos);
        }
    }
}

impl Timer for FakeTimer {
    fn now(&self) -> Duration {
        self.now.get()
    }

    /// The deadline is fixed and registered when the sleep is created, not
    /// when first polled.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        let deadline = self.now.get() + duration;
        let registered = !duration.is_zero();
        if registered {
            self.pending.borrow_mut().push(deadline);
        }
        FakeSleep { timer: self.clone(), deadline, registered, polled: false }
    }
}

struct FakeSleep {
    timer: FakeTimer,
    deadline: Duration,
    registered: bool,
    polled: bool,
}

impl Future for FakeSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.timer.now.get() >= self.deadline {
            if self.registered {
                self.registered = false;
                self.timer.unregister(self.deadline);
            }
            return Poll::Ready(());
        }
        if !self.polled {
            self.polled = true;
            self.timer.sleeps.set(self.timer.sleeps.get() + 1);
        }
        if self.timer.earliest() == Some(self.deadline) {
            self.timer.now.set(self.deadline);
        }
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

impl Drop for FakeSleep {
    fn drop(&mut self) {
        if self.registered {
            self.timer.unregister(self.deadline);
        }
    }
}

pub type TestApi = ApiClient<ScriptedTransport, MemoryStore, RecordingNavigator>;

pub struct Harness {
    pub transport: ScriptedTransport,
    pub store: MemoryStore,
    pub navigator: RecordingNavigator,
    pub api: TestApi,
}

pub fn harness_at(path: &str) -> Harness {
    let transport = ScriptedTransport::default();
    let store = MemoryStore::new();
    let navigator = RecordingNavigator::at(path);
    let api = ApiClient::new(ApiConfig::new(BASE), transport.clone(), store.clone(), navigator.clone());
    Harness { transport, store, navigator, api }
}

pub fn harness() -> Harness {
    harness_at("/")
}

pub fn user_json(id: i64, username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "isAdmin": false,
        "tokenBalance": 50.0,
        "walletAddress": null,
        "profilePicture": null,
        "bio": null
    })
}

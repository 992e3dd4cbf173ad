#[cfg(test)]
pub mod mock {
    use crate::api::client::{register_mock, MockResponse, TestResponder};
    use crate::api::ApiError;
    use reqwest::Method;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub const GET: Method = Method::GET;
    pub const PUT: Method = Method::PUT;

    #[derive(Clone)]
    pub struct MockServer {
        inner: Arc<Mutex<Inner>>,
        base: String,
    }

    struct Inner {
        routes: Vec<Route>,
    }

    #[derive(Clone)]
    struct Route {
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        response: MockResponse,
    }

    impl MockServer {
        pub fn start() -> Self {
            static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
            let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
            Self {
                inner: Arc::new(Mutex::new(Inner { routes: Vec::new() })),
                base: format!("http://mock-{}", id),
            }
        }

        pub fn url(&self, path: &str) -> String {
            let base_url = format!("{}{}", self.base, path);
            register_mock(base_url.clone(), Arc::new(self.clone()));
            base_url
        }

        /// Routes anything reaching this server's host to an arbitrary
        /// responder, for tests that need stateful behavior (failure
        /// counters, per-call responses).
        pub fn respond_with(&self, responder: Arc<dyn TestResponder>) {
            register_mock(self.base.clone(), responder);
        }

        pub fn mock<F>(&self, f: F)
        where
            F: FnOnce(&mut When, &mut Then),
        {
            let mut when = When::default();
            let mut then = Then::default();
            f(&mut when, &mut then);

            let method = when.method.clone().expect("mock requires method");
            let path = when.path.clone().expect("mock requires path");
            let response = MockResponse::json(
                then.status.unwrap_or(200),
                then.body.unwrap_or_else(|| serde_json::json!({})),
            );

            let mut inner = self.inner.lock().expect("mock lock");
            inner.routes.push(Route {
                method,
                path,
                query: when.query.clone(),
                response,
            });
        }
    }

    impl TestResponder for MockServer {
        fn respond(&self, request: &reqwest::Request) -> Result<MockResponse, ApiError> {
            let method = request.method();
            let path = request.url().path();
            let pairs: Vec<(String, String)> = request
                .url()
                .query_pairs()
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect();
            let inner = self.inner.lock().map_err(|_| ApiError::unknown("mock lock"))?;

            let route = inner
                .routes
                .iter()
                .rev()
                .find(|route| {
                    route.method == *method
                        && route.path == path
                        && route.query.iter().all(|expected| pairs.contains(expected))
                })
                .cloned();

            route
                .map(|route| route.response)
                .ok_or_else(|| {
                    ApiError::unknown(format!(
                        "No mock for {} {}?{}",
                        method,
                        path,
                        request.url().query().unwrap_or("")
                    ))
                })
        }
    }

    #[derive(Default)]
    pub struct When {
        method: Option<Method>,
        path: Option<String>,
        query: Vec<(String, String)>,
    }

    impl When {
        pub fn method(&mut self, method: Method) -> &mut Self {
            self.method = Some(method);
            self
        }

        pub fn path(&mut self, path: &str) -> &mut Self {
            self.path = Some(path.to_string());
            self
        }

        /// Constrains the route to requests carrying this query pair.
        /// Routes without constraints match any query, so paginated
        /// endpoints can mock each page separately.
        pub fn query_param(&mut self, key: &str, value: &str) -> &mut Self {
            self.query.push((key.to_string(), value.to_string()));
            self
        }
    }

    #[derive(Default)]
    pub struct Then {
        status: Option<u16>,
        body: Option<Value>,
    }

    impl Then {
        pub fn status(&mut self, status: u16) -> &mut Self {
            self.status = Some(status);
            self
        }

        pub fn json_body(&mut self, body: Value) -> &mut Self {
            self.body = Some(body);
            self
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::api::types::{Session, SessionMetrics, SessionPage};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    // Deterministic per-id timestamp so fixture ordering is reproducible.
    fn created_at_for(id: &str) -> DateTime<Utc> {
        let offset: i64 = id.bytes().map(|b| b as i64).sum();
        base_time() + Duration::seconds(offset)
    }

    pub fn session(id: &str, score: f64) -> Session {
        Session {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: format!("Session {}", id),
            score,
            metrics: SessionMetrics {
                clarity: score,
                confidence: score,
                engagement: score,
            },
            created_at: created_at_for(id),
            duration_seconds: 600,
            feedback: None,
        }
    }

    pub fn session_at(id: &str, created_at: &str) -> Session {
        Session {
            created_at: created_at
                .parse::<DateTime<Utc>>()
                .expect("fixture timestamp"),
            ..session(id, 5.0)
        }
    }

    pub fn session_titled(id: &str, title: &str) -> Session {
        Session {
            title: title.to_string(),
            ..session(id, 5.0)
        }
    }

    pub fn page_of(ids: &[&str], total: usize, page: u32, page_size: u32) -> SessionPage {
        SessionPage {
            sessions: ids
                .iter()
                .enumerate()
                .map(|(index, id)| Session {
                    created_at: base_time() + Duration::seconds(index as i64),
                    ..session(id, 5.0)
                })
                .collect(),
            total,
            page,
            page_size,
        }
    }
}

use crate::etymology::format_etymology;
use crate::model::{EtymologyBlock, WordRecord};
use crate::provider::{WordProvider, fetch_illustration, fetch_word};
use crate::session::{
    DEFAULT_MAX_SESSIONS, SessionHandle, SessionStore, session_cookie, session_id_from_headers,
};
use crate::state::{FetchPlan, FetchState, GENERATION_ERROR_MESSAGE, Phase, ViewController};
use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn};

type SharedState = Arc<AppState>;

/// Seconds between automatic reloads while a cycle is still loading.
const LOADING_REFRESH_SECS: u32 = 2;

pub struct AppState {
    pub sessions: SessionStore,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub base_url: String,
    /// Upper bound on concurrently tracked browser sessions.
    pub max_sessions: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            base_url: "http://127.0.0.1:8080".to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let addr = lookup("ORDSKATT_ADDR")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.addr);
        let base_url = lookup("ORDSKATT_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("http://{addr}"));
        let max_sessions = lookup("ORDSKATT_MAX_SESSIONS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|max| *max > 0)
            .unwrap_or(defaults.max_sessions);
        Self {
            addr,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            max_sessions,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn serve(config: WebConfig, provider: Arc<dyn WordProvider>) -> Result<(), WebError> {
    let state = Arc::new(AppState {
        sessions: SessionStore::with_capacity(provider, config.max_sessions),
        base_url: config.base_url.clone(),
    });
    let router = build_router(state);
    info!(
        %config.addr,
        base = %config.base_url,
        max_sessions = config.max_sessions,
        "Binding HTTP listener"
    );
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route("/refresh", get(refresh).post(refresh))
        .route("/retry", get(retry).post(retry))
        .route("/api/state", get(api_state))
        .route("/api/word", get(api_word))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn session(state: &AppState, headers: &HeaderMap) -> SessionHandle {
    state
        .sessions
        .resolve(session_id_from_headers(headers).as_deref())
}

/// Runs a started cycle in the background; the page polls for the result.
fn spawn_cycle(controller: &Arc<ViewController>, plan: FetchPlan) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.run(plan).await;
    });
}

fn with_session(mut response: Response, session: &SessionHandle) -> Response {
    if session.is_new {
        match HeaderValue::from_str(&session_cookie(&session.id)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => warn!(error = %err, "failed to encode session cookie"),
        }
    }
    response
}

async fn home(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = session(&state, &headers);
    if session.controller.phase() == Phase::Idle {
        spawn_cycle(&session.controller, session.controller.begin_random());
    }
    let snapshot = session.controller.snapshot();
    let page = render_page(&snapshot, &state.base_url);
    with_session(Html(page).into_response(), &session)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let session = session(&state, &headers);
    session.controller.set_query(params.q.unwrap_or_default());
    if let Some(plan) = session.controller.begin_search() {
        spawn_cycle(&session.controller, plan);
    }
    with_session(Redirect::to("/").into_response(), &session)
}

async fn refresh(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = session(&state, &headers);
    spawn_cycle(&session.controller, session.controller.begin_random());
    with_session(Redirect::to("/").into_response(), &session)
}

async fn retry(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = session(&state, &headers);
    spawn_cycle(&session.controller, session.controller.begin_retry());
    with_session(Redirect::to("/").into_response(), &session)
}

#[derive(Debug, Serialize)]
struct StatePayload {
    #[serde(flatten)]
    state: FetchState,
    etymology: Vec<EtymologyBlock>,
}

async fn api_state(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = session(&state, &headers);
    let snapshot = session.controller.snapshot();
    let payload = StatePayload {
        etymology: snapshot.etymology_blocks(),
        state: snapshot,
    };
    with_session(Json(payload).into_response(), &session)
}

#[derive(Debug, Deserialize)]
struct WordParams {
    word: Option<String>,
    image: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WordPayload {
    record: WordRecord,
    etymology: Vec<EtymologyBlock>,
    image_url: Option<String>,
}

async fn api_word(
    State(state): State<SharedState>,
    Query(params): Query<WordParams>,
) -> Result<Json<WordPayload>, ApiError> {
    let provider = state.sessions.provider();
    let record = fetch_word(provider.as_ref(), params.word.as_deref())
        .await
        .map_err(|_| ApiError::bad_gateway(GENERATION_ERROR_MESSAGE))?;
    let image_url = if params.image.unwrap_or(true) {
        fetch_illustration(provider.as_ref(), &record).await
    } else {
        None
    };
    Ok(Json(WordPayload {
        etymology: format_etymology(&record.etymology),
        record,
        image_url,
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "ordskatt-web" }))
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn search_path(word: &str) -> String {
    format!("/search?q={}", encode_component(word))
}

struct BlockView<'a> {
    is_list: bool,
    text: &'a str,
}

struct InflectionLink<'a> {
    text: &'a str,
    href: String,
}

fn render_page(state: &FetchState, base_url: &str) -> String {
    let blocks = state.etymology_blocks();
    let record = state.record.as_ref();
    let template = PageTemplate {
        base_url,
        query: &state.query,
        record,
        blocks: blocks
            .iter()
            .map(|block| BlockView {
                is_list: block.is_list_item(),
                text: block.text(),
            })
            .collect(),
        inflections: record
            .map(|record| {
                record
                    .inflections
                    .iter()
                    .map(|form| InflectionLink {
                        text: form,
                        href: search_path(form),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        image_url: state.image_url.as_deref(),
        error: state.error.as_deref(),
        is_loading_text: state.is_loading_text,
        is_loading_image: state.is_loading_image,
        refresh_secs: state.is_busy().then_some(LOADING_REFRESH_SECS),
    };
    template.render().unwrap_or_else(|err| {
        warn!(error = %err, "page template failed to render");
        format!("<!DOCTYPE html><p>{GENERATION_ERROR_MESSAGE}</p>")
    })
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="nb">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    {% match refresh_secs %}{% when Some with (secs) %}<meta http-equiv="refresh" content="{{ secs }}">{% when None %}{% endmatch %}
    <title>Ordskatt{% match record %}{% when Some with (record) %} • {{ record.word }}{% when None %}{% endmatch %}</title>
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    <link rel="canonical" href="{{ base_url }}/">
  </head>
  <body class="min-h-screen bg-[#FDFBF7] text-slate-800">
    <header class="fixed top-0 w-full bg-white/90 border-b border-stone-100 z-50">
      <div class="max-w-7xl mx-auto px-4 h-20 flex items-center justify-between gap-4">
        <form action="/refresh" method="post">
          <button class="text-xl font-serif font-bold text-stone-800">🌲 Ordskatt</button>
        </form>
        <form action="/search" method="get" class="flex-1 max-w-lg">
          <input type="text" name="q" value="{{ query }}" placeholder="Søk etter et ord..."
                 class="block w-full px-4 py-2.5 border border-stone-200 rounded-full bg-stone-50">
        </form>
        <form action="/refresh" method="post">
          <button class="px-5 py-2.5 bg-stone-900 text-white rounded-full text-sm font-medium disabled:opacity-50"{% if is_loading_text %} disabled{% endif %}>↻ Nytt tilfeldig ord</button>
        </form>
      </div>
    </header>

    <main class="pt-32 pb-12 px-4 flex flex-col">
      {% match error %}{% when Some with (message) %}
      <div id="error" class="max-w-md mx-auto mb-10 p-4 bg-red-50 text-red-700 rounded-lg border border-red-100 text-center">
        {{ message }}
        <form action="/retry" method="post">
          <button class="block mx-auto mt-2 text-sm font-bold hover:underline">Prøv på nytt</button>
        </form>
      </div>
      {% when None %}{% endmatch %}

      {% if is_loading_text %}
      <div id="loading" class="max-w-4xl mx-auto w-full grid grid-cols-1 md:grid-cols-2 gap-8 animate-pulse">
        <div class="space-y-6">
          <div class="h-16 w-3/4 bg-slate-200 rounded-lg"></div>
          <div class="h-6 w-1/4 bg-slate-200 rounded"></div>
          <div class="h-32 bg-slate-200 rounded-lg"></div>
        </div>
        <div class="aspect-[4/3] bg-slate-200 rounded-2xl min-h-[300px]"></div>
      </div>
      {% else %}
      {% match record %}{% when Some with (record) %}
      <article id="word" class="max-w-6xl mx-auto w-full grid grid-cols-1 lg:grid-cols-12 gap-12 items-start">
        <div class="lg:col-span-7 flex flex-col gap-10">
          <section class="border-b border-stone-200 pb-8">
            <span class="inline-flex px-3 py-1 rounded-full text-xs font-medium bg-emerald-50 text-emerald-700 uppercase">{{ record.word_class }}</span>
            <h1 class="text-6xl font-serif font-bold text-stone-900 my-6">{{ record.word }}</h1>
            <p class="text-xl text-stone-600 font-light">{{ record.definition }}</p>
          </section>

          <section id="etymology">
            <h2 class="text-sm font-bold uppercase tracking-wider text-stone-400 mb-4">Opprinnelse</h2>
            <div class="text-stone-800 leading-8 text-lg font-serif">
              {% for block in blocks %}
              {% if block.is_list %}
              <div class="etymology-item flex items-start gap-3 ml-2 mb-2 pl-4 border-l-2 border-emerald-100"><span class="text-emerald-700">●</span><span>{{ block.text }}</span></div>
              {% else %}
              <p class="etymology-paragraph mb-4">{{ block.text }}</p>
              {% endif %}
              {% endfor %}
            </div>
          </section>

          {% if inflections.len() > 0 %}
          <section id="inflections">
            <h2 class="text-sm font-bold uppercase tracking-wider text-stone-400 mb-3">Bøyning &amp; former</h2>
            <div class="flex flex-wrap gap-2">
              {% for form in inflections %}
              <a href="{{ form.href }}" class="px-4 py-1.5 bg-white border border-stone-200 rounded-lg text-sm">{{ form.text }}</a>
              {% endfor %}
            </div>
          </section>
          {% endif %}

          <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
            <section id="example" class="bg-white p-6 rounded-2xl border border-stone-100">
              <h2 class="text-xs font-bold uppercase tracking-wider text-stone-400 mb-3">Eksempel</h2>
              <p class="text-lg italic font-serif">“{{ record.usage_example }}”</p>
            </section>
            {% match record.fun_fact %}{% when Some with (fact) %}
            <section id="fun-fact" class="bg-amber-50/50 p-6 rounded-2xl border border-amber-100/50">
              <h2 class="text-xs font-bold uppercase tracking-wider text-amber-800/60 mb-3">💡 Visste du?</h2>
              <p class="text-amber-900/80">{{ fact }}</p>
            </section>
            {% when None %}{% endmatch %}
          </div>
        </div>

        <div id="illustration" class="lg:col-span-5 aspect-[4/5] w-full rounded-2xl overflow-hidden bg-stone-100 relative">
          {% match image_url %}{% when Some with (url) %}
          <img src="{{ url }}" alt="Illustrasjon av ordet {{ record.word }}" class="w-full h-full object-cover">
          {% when None %}
          {% if is_loading_image %}
          <p class="absolute inset-0 flex items-center justify-center text-xs uppercase tracking-widest text-stone-400">Skisserer...</p>
          {% else %}
          <p class="absolute inset-0 flex items-center justify-center text-4xl text-stone-300">?</p>
          {% endif %}
          {% endmatch %}
        </div>
      </article>
      {% when None %}{% endmatch %}
      {% endif %}
    </main>
  </body>
</html>"#,
    ext = "html"
)]
struct PageTemplate<'a> {
    base_url: &'a str,
    query: &'a str,
    record: Option<&'a WordRecord>,
    blocks: Vec<BlockView<'a>>,
    inflections: Vec<InflectionLink<'a>>,
    image_url: Option<&'a str>,
    error: Option<&'a str>,
    is_loading_text: bool,
    is_loading_image: bool,
    refresh_secs: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::{Call, FakeProvider, sample_record};
    use axum::{body, body::Body, http::Request, http::header};
    use tower::ServiceExt;

    fn test_router(provider: Arc<FakeProvider>) -> Router {
        let state = Arc::new(AppState {
            sessions: SessionStore::new(provider),
            base_url: "http://127.0.0.1:8080".to_string(),
        });
        build_router(state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn cookie_pair(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn get_with_cookie(router: &Router, uri: &str, cookie: &str) -> Response {
        router
            .clone()
            .oneshot(
                Request::get(uri)
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn wait_for_phase(router: &Router, cookie: &str, phase: &str) -> serde_json::Value {
        for _ in 0..100 {
            let response = get_with_cookie(router, "/api/state", cookie).await;
            let value: serde_json::Value =
                serde_json::from_str(&body_text(response).await).unwrap();
            if value["phase"] == phase {
                return value;
            }
            tokio::task::yield_now().await;
        }
        panic!("session never reached phase {phase}");
    }

    #[tokio::test]
    async fn first_visit_sets_cookie_and_starts_random_fetch() {
        let provider = Arc::new(FakeProvider::new());
        let router = test_router(provider.clone());
        let response = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_success());
        let cookie = cookie_pair(&response);
        assert!(cookie.starts_with("ordskatt_session="));
        let html = body_text(response).await;
        assert!(html.contains("id=\"loading\""));
        assert!(html.contains("http-equiv=\"refresh\""));

        let state = wait_for_phase(&router, &cookie, "ready").await;
        assert_eq!(state["record"]["word"], "tilfeldig");
        assert_eq!(state["etymology"][1]["kind"], "listItem");
        assert_eq!(provider.calls()[0], Call::Random);
    }

    #[tokio::test]
    async fn search_looks_up_the_word_for_the_session() {
        let provider = Arc::new(FakeProvider::new());
        let router = test_router(provider.clone());
        let first = router
            .clone()
            .oneshot(Request::get("/api/state").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = cookie_pair(&first);

        let response = get_with_cookie(&router, "/search?q=%20fjord%20", &cookie).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get(SET_COOKIE).is_none());

        let state = wait_for_phase(&router, &cookie, "ready").await;
        assert_eq!(state["record"]["word"], "fjord");
        assert_eq!(state["query"], " fjord ");
        assert_eq!(state["lastQuery"], "fjord");
        assert!(provider.calls().contains(&Call::Lookup("fjord".into())));

        let page = body_text(get_with_cookie(&router, "/", &cookie).await).await;
        assert!(page.contains("my-6\">fjord<"));
        assert!(page.contains("etymology-item"));
        assert!(page.contains("base64,aW1n"));
        assert!(page.contains("q=fjorden"));
        assert!(!page.contains("http-equiv=\"refresh\""));
    }

    #[tokio::test]
    async fn blank_search_issues_no_request() {
        let provider = Arc::new(FakeProvider::new());
        let router = test_router(provider.clone());
        let response = router
            .clone()
            .oneshot(Request::get("/search?q=%20%20").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = cookie_pair(&response);
        tokio::task::yield_now().await;
        assert!(provider.calls().is_empty());
        let state: serde_json::Value = serde_json::from_str(
            &body_text(get_with_cookie(&router, "/api/state", &cookie).await).await,
        )
        .unwrap();
        assert_eq!(state["phase"], "idle");
    }

    #[tokio::test]
    async fn failed_generation_shows_error_and_retry() {
        let provider = Arc::new(FakeProvider::failing_text());
        let router = test_router(provider.clone());
        let response = router
            .clone()
            .oneshot(Request::post("/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = cookie_pair(&response);
        let state = wait_for_phase(&router, &cookie, "error").await;
        assert_eq!(state["error"], GENERATION_ERROR_MESSAGE);
        assert!(state["record"].is_null());

        let page = body_text(get_with_cookie(&router, "/", &cookie).await).await;
        assert!(page.contains("id=\"error\""));
        assert!(page.contains("action=\"/retry\""));
    }

    #[tokio::test]
    async fn api_word_returns_record_blocks_and_image() {
        let router = test_router(Arc::new(FakeProvider::new()));
        let response = router
            .oneshot(
                Request::get("/api/word?word=fjell")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        let payload: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(payload["record"]["word"], "fjell");
        assert_eq!(payload["record"]["wordClass"], "Substantiv");
        assert_eq!(payload["etymology"][0]["kind"], "paragraph");
        assert_eq!(payload["imageUrl"], "data:image/png;base64,aW1n");
    }

    #[tokio::test]
    async fn api_word_without_image_skips_illustration() {
        let provider = Arc::new(FakeProvider::new());
        let router = test_router(provider.clone());
        let response = router
            .oneshot(
                Request::get("/api/word?image=false")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(provider.calls(), vec![Call::Random]);
    }

    #[tokio::test]
    async fn api_word_failure_is_bad_gateway() {
        let router = test_router(Arc::new(FakeProvider::failing_text()));
        let response = router
            .oneshot(
                Request::get("/api/word?word=fjell")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(payload["error"], GENERATION_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let router = test_router(Arc::new(FakeProvider::new()));
        let response = router
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[test]
    fn web_config_reads_lookup_and_falls_back() {
        let config = WebConfig::from_lookup(|key: &str| match key {
            "ORDSKATT_ADDR" => Some("0.0.0.0:9000".to_string()),
            "ORDSKATT_BASE_URL" => Some("https://ord.example.no/".to_string()),
            "ORDSKATT_MAX_SESSIONS" => Some("32".to_string()),
            _ => None,
        });
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert_eq!(config.base_url, "https://ord.example.no");
        assert_eq!(config.max_sessions, 32);

        let config = WebConfig::from_lookup(|key: &str| match key {
            "ORDSKATT_MAX_SESSIONS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn page_escapes_generated_text_and_shows_placeholder() {
        let mut record = sample_record("<b>ord</b>");
        record.fun_fact = Some("Et & morsomt faktum".into());
        let state = FetchState {
            record: Some(record),
            phase: Phase::Ready,
            ..FetchState::default()
        };
        let html = render_page(&state, "http://localhost");
        assert!(html.contains("&lt;b&gt;ord"));
        assert!(!html.contains("<b>ord"));
        assert!(html.contains("id=\"fun-fact\""));
        assert!(html.contains("text-4xl text-stone-300"));
        assert!(!html.contains("Skisserer"));
    }

    #[test]
    fn page_shows_sketching_while_image_loads() {
        let state = FetchState {
            record: Some(sample_record("ord")),
            is_loading_image: true,
            phase: Phase::PartiallyLoaded,
            ..FetchState::default()
        };
        let html = render_page(&state, "http://localhost");
        assert!(html.contains("Skisserer"));
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(!html.contains("id=\"fun-fact\""));
    }
}

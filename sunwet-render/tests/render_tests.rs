//! End-to-end rendering against in-memory collaborators.

use async_trait::async_trait;
use futures::FutureExt;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sunwet_api::{DataContext, PlaylistEntry, Value, ViewConfig, WidgetSpec};
use sunwet_layout::{RenderNode, SlotId};
use sunwet_render::{
    BaseUrlFiles, LogPlayback, Playback, QuerySource, RenderConfig, RenderError, Renderer, SlotUpdate,
    StaticQueries,
};
use tokio::sync::oneshot;

// =========================================================================
// Collaborator doubles
// =========================================================================

type Rows = anyhow::Result<Vec<DataContext>>;

/// Queries that only answer when the test releases them.
#[derive(Default)]
struct GatedQueries {
    gates: Mutex<HashMap<String, oneshot::Receiver<Rows>>>,
}

impl GatedQueries {
    fn gate(&self, id: &str) -> oneshot::Sender<Rows> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }
}

#[async_trait]
impl QuerySource for GatedQueries {
    async fn query(&self, id: &str, _params: &IndexMap<String, Value>) -> Rows {
        let rx = self.gates.lock().unwrap().remove(id);
        match rx {
            Some(rx) => rx.await?,
            None => anyhow::bail!("no gate for {}", id),
        }
    }
}

/// Queries answered by a function of the parameters. Records every call.
struct FnQueries<F> {
    answer: F,
    calls: Mutex<Vec<(String, IndexMap<String, Value>)>>,
}

impl<F> FnQueries<F>
where
    F: Fn(&str, &IndexMap<String, Value>) -> Rows + Send + Sync,
{
    fn new(answer: F) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<F> QuerySource for FnQueries<F>
where
    F: Fn(&str, &IndexMap<String, Value>) -> Rows + Send + Sync,
{
    async fn query(&self, id: &str, params: &IndexMap<String, Value>) -> Rows {
        self.calls.lock().unwrap().push((id.to_string(), params.clone()));
        (self.answer)(id, params)
    }
}

#[derive(Default)]
struct RecordingPlayback {
    playlists: Mutex<Vec<Vec<PlaylistEntry>>>,
    toggles: Mutex<Vec<usize>>,
}

impl Playback for RecordingPlayback {
    fn set_playlist(&self, entries: Vec<PlaylistEntry>) {
        self.playlists.lock().unwrap().push(entries);
    }

    fn toggle_play(&self, index: usize) {
        self.toggles.lock().unwrap().push(index);
    }
}

fn renderer(queries: Arc<dyn QuerySource>) -> Renderer {
    Renderer::new(
        queries,
        Arc::new(BaseUrlFiles::new("https://media.example")),
        Arc::new(LogPlayback),
        RenderConfig::default(),
    )
}

fn spec(json: &str) -> WidgetSpec {
    WidgetSpec::from_json(json).unwrap()
}

fn ctx(json: &str) -> DataContext {
    DataContext::from_json(json).unwrap()
}

fn rows(json: &str) -> Vec<DataContext> {
    serde_json::from_str(json).unwrap()
}

/// Two sibling query-backed lists in a vertical layout.
fn siblings(a: &str, b: &str) -> WidgetSpec {
    spec(&format!(
        r#"{{"layout": {{"direction": "down", "elements": [
            {{"data_rows": {{"data": {{"query": {{"id": "{}"}}}}, "rows": {{"list": {{"direction": "down", "widget": {{"text": {{"data": {{"field": "name"}}}}}}}}}}}}}},
            {{"data_rows": {{"data": {{"query": {{"id": "{}"}}}}, "rows": {{"list": {{"direction": "down", "widget": {{"text": {{"data": {{"field": "name"}}}}}}}}}}}}}}
        ]}}}}"#,
        a, b
    ))
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_album_with_track_table() {
    let spec = spec(
        r#"{"layout": {"direction": "down", "elements": [
            {"text": {"data": {"field": "title"}}},
            {"data_rows": {
                "data": {"field": "tracks"},
                "rows": {"table": {"orientation": "right_down", "elements": [{"text": {"data": {"field": "name"}}}]}}
            }}
        ]}}"#,
    );
    let ctx = ctx(r#"{"title": "Album", "tracks": [{"name": "A"}, {"name": "B"}]}"#);
    let root = renderer(Arc::new(StaticQueries::new()))
        .render(&spec, &ctx)
        .unwrap()
        .settle()
        .await
        .unwrap();

    assert_eq!(
        root.outline(),
        "linear down\n  text \"Album\"\n  table right_down 1x2\n    [1,1] text \"A\"\n    [1,2] text \"B\"\n"
    );
}

#[tokio::test]
async fn test_failing_sibling_is_isolated() {
    let queries = StaticQueries::new().with("good", rows(r#"[{"name": "one"}, {"name": "two"}]"#));
    let root = renderer(Arc::new(queries))
        .render(&siblings("broken", "good"), &DataContext::empty())
        .unwrap()
        .settle()
        .await
        .unwrap();

    let RenderNode::Linear(line) = &root else {
        panic!("expected linear root");
    };
    let RenderNode::Error(leaf) = &line.children[0].node else {
        panic!("expected error leaf, got {}", root.outline());
    };
    assert_eq!(leaf.kind, "query");
    assert!(leaf.message.contains("broken"));
    assert_eq!(line.children[1].node.texts(), vec!["one", "two"]);
}

#[tokio::test]
async fn test_out_of_order_completion_keeps_placement() {
    let queries = Arc::new(GatedQueries::default());
    let first = queries.gate("first");
    let second = queries.gate("second");
    let mut view = renderer(queries.clone())
        .render(&siblings("first", "second"), &DataContext::empty())
        .unwrap();
    assert_eq!(view.pending_count(), 2);

    second.send(Ok(rows(r#"[{"name": "late sibling"}]"#))).unwrap();
    let update = view.next().await.unwrap().unwrap();
    assert_eq!(update, SlotUpdate::Filled { slot: SlotId(1), rows: 1 });
    assert_eq!(view.root().pending_slots(), vec![SlotId(0)]);

    first.send(Ok(rows(r#"[{"name": "early sibling"}]"#))).unwrap();
    let update = view.next().await.unwrap().unwrap();
    assert_eq!(update, SlotUpdate::Filled { slot: SlotId(0), rows: 1 });

    assert!(view.is_settled());
    assert_eq!(view.root().texts(), vec!["early sibling", "late sibling"]);
}

#[tokio::test]
async fn test_dropping_view_cancels_resolutions() {
    let queries = Arc::new(GatedQueries::default());
    let gate = queries.gate("slow");
    let spec = spec(
        r#"{"data_rows": {"data": {"query": {"id": "slow"}}, "rows": {"list": {"direction": "down", "widget": {"text": {"data": {"field": "name"}}}}}}}"#,
    );
    let mut view = renderer(queries.clone()).render(&spec, &DataContext::empty()).unwrap();

    // Poll once so the resolution is actually waiting on the gate.
    assert!(view.next().now_or_never().is_none());
    assert!(!gate.is_closed());

    drop(view);
    assert!(gate.is_closed());
    assert!(gate.send(Ok(Vec::new())).is_err());
}

#[tokio::test]
async fn test_nested_sub_queries_use_row_params() {
    let queries = Arc::new(FnQueries::new(|id, params| match id {
        "albums" => Ok(rows(r#"[{"id": "al1", "title": "First"}, {"id": "al2", "title": "Second"}]"#)),
        "tracks" => {
            let album = params["album"].as_str().unwrap_or_default().to_string();
            Ok(vec![[("name", Value::from(format!("{} track", album)))].into_iter().collect::<Value>().into()])
        }
        other => anyhow::bail!("unknown query {}", other),
    }));
    let spec = spec(
        r#"{"data_rows": {
            "data": {"query": {"id": "albums"}},
            "rows": {"list": {"direction": "down", "widget": {"layout": {"direction": "right", "elements": [
                {"text": {"data": {"field": "title"}}},
                {"data_rows": {
                    "data": {"query": {"id": "tracks", "params": {"album": {"field": "id"}}}},
                    "rows": {"list": {"direction": "down", "widget": {"text": {"data": {"field": "name"}}}}}
                }}
            ]}}}}
        }}"#,
    );
    let root = renderer(queries.clone())
        .render(&spec, &DataContext::empty())
        .unwrap()
        .settle()
        .await
        .unwrap();

    assert_eq!(root.texts(), vec!["First", "al1 track", "Second", "al2 track"]);
    assert!(root.pending_slots().is_empty());
    let calls = queries.calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, "albums");
    let albums: Vec<&Value> = calls[1..].iter().map(|(_, p)| &p["album"]).collect();
    assert!(albums.contains(&&Value::from("al1")));
    assert!(albums.contains(&&Value::from("al2")));
}

#[tokio::test]
async fn test_config_error_aborts_view() {
    let queries = StaticQueries::new()
        .with("good", rows(r#"[{"name": "one"}]"#))
        .with("tagged", rows(r#"[{"name": ["a", "b"]}]"#));
    let mut view = renderer(Arc::new(queries))
        .render(&siblings("tagged", "good"), &DataContext::empty())
        .unwrap();

    let mut outcome = None;
    while let Some(update) = view.next().await {
        if let Err(e) = update {
            outcome = Some(e);
            break;
        }
    }
    assert!(matches!(outcome, Some(RenderError::Config(_))));
    assert!(view.is_settled());
    assert!(matches!(view.root(), RenderNode::ErrorBlock { .. }));
}

#[tokio::test]
async fn test_debug_composites_serialize() {
    let queries = StaticQueries::new().with("tagged", rows(r#"[{"name": ["a", "b"]}]"#));
    let config = RenderConfig {
        debug_composites: true,
        ..RenderConfig::default()
    };
    let renderer = Renderer::new(
        Arc::new(queries),
        Arc::new(BaseUrlFiles::new("")),
        Arc::new(LogPlayback),
        config,
    );
    let spec = spec(
        r#"{"data_rows": {"data": {"query": {"id": "tagged"}}, "rows": {"list": {"direction": "down", "widget": {"text": {"data": {"field": "name"}}}}}}}"#,
    );
    let root = renderer.render(&spec, &DataContext::empty()).unwrap().settle().await.unwrap();
    assert_eq!(root.texts(), vec![r#"["a","b"]"#]);
}

#[tokio::test]
async fn test_page_renders_with_params() {
    let queries = Arc::new(FnQueries::new(|_, params| {
        let artist = params["artist"].as_str().unwrap_or_default().to_string();
        Ok(vec![[("name", Value::from(format!("{} album", artist)))].into_iter().collect::<Value>().into()])
    }));
    let view = ViewConfig::from_json(
        r#"{"id": "by_artist", "name": "By artist", "parameters": [["artist", "text"]],
            "root": {"layout": {"direction": "down", "elements": [
                {"text": {"data": {"field": "artist"}, "prefix": "Artist: "}},
                {"data_rows": {
                    "data": {"query": {"id": "albums", "params": {"artist": {"field": "artist"}}}},
                    "rows": {"list": {"direction": "down", "widget": {"text": {"data": {"field": "name"}}}}}
                }}
            ]}}}"#,
    )
    .unwrap();
    let params: IndexMap<String, Value> = [("artist".to_string(), Value::from("Can"))].into_iter().collect();

    let page = renderer(queries).render_page(&view, &params).await;
    assert_eq!(page.root.texts(), vec!["Artist: Can", "Can album"]);
    assert!(page.playlist.is_empty());
    assert!(!page.media_controls);
}

#[tokio::test]
async fn test_page_error_block_on_root_failure() {
    let view = ViewConfig::from_json(
        r#"{"id": "v", "name": "V", "parameters": [["artist", "text"]],
            "root": {"text": {"data": {"field": "artist"}}}}"#,
    )
    .unwrap();
    let page = renderer(Arc::new(StaticQueries::new()))
        .render_page(&view, &IndexMap::new())
        .await;
    assert_eq!(
        page.root,
        RenderNode::ErrorBlock {
            message: "missing field `artist`".to_string()
        }
    );

    let bad = ViewConfig::from_json(r#"{"id": "v", "name": "V", "root": {"text": {"data": {"field": "nope"}}}}"#)
        .unwrap();
    let page = renderer(Arc::new(StaticQueries::new()))
        .render_page(&bad, &IndexMap::new())
        .await;
    assert!(matches!(page.root, RenderNode::ErrorBlock { .. }));
}

#[tokio::test]
async fn test_play_button_toggles_index_in_playlist() {
    let playback = Arc::new(RecordingPlayback::default());
    let renderer = Renderer::new(
        Arc::new(StaticQueries::new()),
        Arc::new(BaseUrlFiles::new("")),
        playback.clone(),
        RenderConfig::default(),
    );
    // An upward list shows the last track first; the playlist still follows
    // the rows.
    let spec = spec(
        r#"{"data_rows": {"data": {"field": "tracks"}, "rows": {"list": {"direction": "up", "widget":
            {"play_button": {"file_field": "file", "media": {"field": "media"}, "name_field": "name"}}}}}}"#,
    );
    let ctx = ctx(
        r#"{"tracks": [
            {"file": "sha256:01", "media": "sunwet/1/audio", "name": "Intro"},
            {"file": "sha256:02", "media": "sunwet/1/audio", "name": "Middle"},
            {"file": "sha256:03", "media": "sunwet/1/audio", "name": "Outro"}
        ]}"#,
    );
    let root = renderer.render(&spec, &ctx).unwrap().settle().await.unwrap();

    let mut buttons = Vec::new();
    root.visit(&mut |node| {
        if let RenderNode::PlayButton(leaf) = node {
            buttons.push(leaf);
        }
    });
    assert_eq!(buttons.len(), 3);
    let first = buttons
        .iter()
        .find(|leaf| leaf.entry.file.token() == "sha256:01")
        .unwrap();
    assert_eq!(first.index, 0);
    renderer.request_play(first);

    let playlists = playback.playlists.lock().unwrap();
    assert_eq!(playlists.len(), 1);
    let tokens: Vec<String> = playlists[0].iter().map(|e| e.file.token()).collect();
    assert_eq!(tokens, vec!["sha256:01", "sha256:02", "sha256:03"]);
    assert_eq!(playlists[0][2].name.as_deref(), Some("Outro"));
    assert_eq!(*playback.toggles.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn test_bad_play_bundle_fails_its_rows() {
    let spec = spec(
        r#"{"data_rows": {"data": {"field": "tracks"}, "rows": {"list": {"direction": "down", "widget":
            {"play_button": {"file_field": "file", "media": {"literal": "sunwet/1/audio"}}}}}}}"#,
    );
    let ctx = ctx(r#"{"tracks": [{"file": "sha256:01"}, {"name": "no file"}]}"#);
    let mut view = renderer(Arc::new(StaticQueries::new())).render(&spec, &ctx).unwrap();
    let update = view.next().await.unwrap().unwrap();
    assert!(matches!(update, SlotUpdate::Failed { .. }));
    assert!(view.playlist().is_empty());
}

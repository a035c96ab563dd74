//! End-to-end resolution over whole pages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mural_armature::{resolve_destination, resolve_traced, DestinationOptions, ReferenceError};
use mural_atelier::{
    init_tracing, ActionChain, ActionChainFactory, ActionChainOptions, ActionResult, Blueprint,
    ChainError, Collaborators, Component, ComponentEvent, ComponentExt, ComponentTree,
    IteratorScope, Pipeline, QueryObjectProvider, ResolveContext, ResolveOptions, ResolverChain,
    Root, Scope,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

fn page(value: Value) -> Arc<Blueprint> {
    Blueprint::from_value(&value).unwrap()
}

fn child(tree: &ComponentTree, index: usize) -> &Component {
    let root = tree.root().unwrap();
    tree.get(tree.children(root)[index]).unwrap()
}

fn fingerprints(tree: &ComponentTree) -> Vec<(u64, u64)> {
    let mut prints: Vec<(u64, u64)> = tree.iter().map(|c| (c.id, c.fingerprint())).collect();
    prints.sort_unstable();
    prints
}

#[tokio::test]
async fn resolving_twice_is_idempotent() {
    init_tracing();
    let root = Root::from_value(json!({
        "Home": {
            "title": "Welcome",
            "rows": [{ "name": "a", "tint": "0xff0000" }, { "name": "b", "tint": "0x00ff00" }]
        },
        "Theme": { "radius": 8 }
    }));
    let blueprint = page(json!({
        "type": "view",
        "style": { "axis": "vertical", "borderRadius": ".Theme.radius" },
        "children": [
            { "type": "label", "dataKey": "title", "style": { "fontSize": 14 } },
            {
                "type": "list",
                "listObject": "..rows",
                "iteratorVar": "row",
                "children": [{
                    "type": "listItem",
                    "style": { "color": "row.tint" },
                    "children": [{ "type": "label", "dataKey": "row.name" }]
                }]
            }
        ]
    }));
    let options = ResolveOptions::for_page("Home").with_viewport(375.0, 667.0);
    let pipeline = Pipeline::default();

    let mut tree = pipeline.resolve_blueprint(blueprint, &root, &options).await;
    let first = fingerprints(&tree);
    pipeline.resolve_tree(&mut tree, &root, &options).await;

    assert_eq!(fingerprints(&tree), first);
    assert_eq!(child(&tree, 0).prop("data-value"), Some(&json!("Welcome")));
}

#[test]
fn reference_chains_take_one_lookup_per_hop() {
    let root = Root::from_value(json!({ "A": ".B", "B": ".C", "C": 42 }));
    let scope = Scope::new(&root, "Home");

    let resolved = resolve_traced(".A", &scope).unwrap();
    assert_eq!(resolved.value, json!(42));
    assert_eq!(resolved.lookups, 3);
}

#[test]
fn reference_cycles_are_reported() {
    let root = Root::from_value(json!({ "A": ".B", "B": ".A" }));
    let scope = Scope::new(&root, "Home");

    match resolve_traced(".A", &scope) {
        Err(ReferenceError::Circular { chain }) => assert_eq!(chain, vec![".A", ".B", ".A"]),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

/// Counts how often the data-key scopes are consulted.
#[derive(Default)]
struct CountingQueries {
    calls: Arc<AtomicUsize>,
}

impl QueryObjectProvider for CountingQueries {
    fn query_objects(&self, _component: &Component, _page: &str, root: &Root) -> Vec<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![root.snapshot()]
    }
}

#[tokio::test]
async fn iterator_scope_wins_over_query_objects() {
    let queries = CountingQueries::default();
    let calls = queries.calls.clone();
    let pipeline = Pipeline::new(Collaborators::new().with_queries(queries));
    let root = Root::from_value(json!({ "item": { "value": 99 } }));

    let mut component = Component::new(
        1,
        Arc::new(Blueprint::new("label").with("dataKey", json!("item.value"))),
    )
    .with_iterator(Some(Arc::new(IteratorScope::new("item", json!({ "value": 5 }), 0))));
    pipeline
        .resolve_component(&mut component, &ComponentTree::new(), &root, &ResolveOptions::for_page("Home"))
        .await;

    assert_eq!(component.prop("data-value"), Some(&json!(5)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn conditionals_select_and_resolve_branches() {
    let root = Root::from_value(json!({
        "Flags": { "premium": true, "beta": false },
        "Home": { "gold": "Gold member", "plain": "Member" }
    }));
    let options = ResolveOptions::for_page("Home");
    let tree = Pipeline::default()
        .resolve_blueprint(
            page(json!({
                "type": "view",
                "children": [
                    { "type": "label", "text": { "if": [".Flags.premium", "..gold", "..plain"] } },
                    { "type": "label", "text": { "if": [".Flags.beta", "..gold", "..plain"] } },
                    { "type": "label", "text": { "if": [".Flags.missing", "yes", "no"] } }
                ]
            })),
            &root,
            &options,
        )
        .await;

    let collaborators = Collaborators::default();
    let ctx = ResolveContext::new(&root, &tree, &options, &collaborators);
    let texts: Vec<Option<Value>> = (0..3).map(|i| child(&tree, i).reader(&ctx).get("text")).collect();
    assert_eq!(
        texts,
        vec![Some(json!("Gold member")), Some(json!("Member")), Some(json!("no"))]
    );
}

#[tokio::test]
async fn if_hook_overrides_default_predicate() {
    let root = Root::new();
    let options = ResolveOptions::for_page("Home");
    let collaborators = Collaborators::new()
        .with_if_hook(|ctx: &mural_atelier::IfContext<'_>| ctx.value.as_str() == Some("always"));
    let pipeline = Pipeline::new(collaborators.clone());
    let tree = pipeline
        .resolve_blueprint(
            page(json!({ "type": "label", "text": { "if": ["always", "A", "B"] } })),
            &root,
            &options,
        )
        .await;

    let ctx = ResolveContext::new(&root, &tree, &options, &collaborators);
    let label = tree.get(tree.root().unwrap()).unwrap();
    assert_eq!(label.reader(&ctx).get("text"), Some(json!("A")));
}

#[test]
fn page_component_urls_resolve_each_segment() {
    let root = Root::from_value(json!({ "Sun": { "field": "PasswordValue" } }));
    let scope = Scope::new(&root, "Sun");
    let options = DestinationOptions::default();

    assert_eq!(
        resolve_destination("Rawr@Sun#PasswordValue", &scope, &options).to_value(),
        json!({ "targetPage": "Rawr", "currentPage": "Sun", "viewTag": "PasswordValue" })
    );
    assert_eq!(
        resolve_destination("Rawr@Sun#..field", &scope, &options).to_value(),
        json!({ "targetPage": "Rawr", "currentPage": "Sun", "viewTag": "PasswordValue" })
    );
    assert_eq!(
        resolve_destination("^top", &scope, &options).to_value(),
        json!({ "destination": "", "id": "top", "isSamePage": true, "duration": 350 })
    );
}

#[tokio::test]
async fn styles_are_normalized_in_the_pipeline() {
    let tree = Pipeline::default()
        .resolve_blueprint(
            page(json!({
                "type": "view",
                "style": { "axis": "horizontal", "borderRadius": 8, "fontSize": "10" }
            })),
            &Root::new(),
            &ResolveOptions::default(),
        )
        .await;

    let style = &tree.get(tree.root().unwrap()).unwrap().style;
    let get = |key: &str| style.get(key).map(String::as_str);
    assert_eq!(get("display"), Some("flex"));
    assert_eq!(get("flexWrap"), Some("nowrap"));
    assert_eq!(get("borderRadius"), Some("8px"));
    assert_eq!(get("fontSize"), Some("10px"));
    assert_eq!(get("borderWidth"), Some("1px"));
    assert_eq!(get("borderStyle"), Some("solid"));
    assert_eq!(get("borderColor"), Some("transparent"));
}

#[tokio::test]
async fn a_failing_component_does_not_affect_siblings() {
    init_tracing();
    let root = Root::from_value(json!({ "Home": { "user": { "name": "Ann" } } }));
    let tree = Pipeline::default()
        .resolve_blueprint(
            page(json!({
                "type": "view",
                "children": [
                    {
                        "type": "list",
                        "listObject": 5,
                        "iteratorVar": "x",
                        "children": [{ "type": "label" }]
                    },
                    { "type": "label", "dataKey": "user.name" }
                ]
            })),
            &root,
            &ResolveOptions::for_page("Home"),
        )
        .await;

    let list = child(&tree, 0);
    assert!(list.has_failures());
    assert!(list.children.is_empty());
    // Later stages still ran for the failing component.
    assert_eq!(list.style.get("listStyle").map(String::as_str), Some("none"));

    let label = child(&tree, 1);
    assert!(!label.has_failures());
    assert_eq!(label.prop("data-value"), Some(&json!("Ann")));
}

#[tokio::test]
async fn reads_see_root_mutations() {
    let root = Root::from_value(json!({ "Home": { "greeting": "Hello" } }));
    let options = ResolveOptions::for_page("Home");
    let collaborators = Collaborators::default();
    let tree = Pipeline::new(collaborators.clone())
        .resolve_blueprint(
            page(json!({ "type": "label", "text": "..greeting" })),
            &root,
            &options,
        )
        .await;

    let ctx = ResolveContext::new(&root, &tree, &options, &collaborators);
    let label = tree.get(tree.root().unwrap()).unwrap();
    assert_eq!(label.reader(&ctx).get("text"), Some(json!("Hello")));

    root.set_path("Home.greeting", json!("Bonjour"));
    assert_eq!(label.reader(&ctx).get("text"), Some(json!("Bonjour")));
}

#[test]
fn internal_stages_cannot_be_disabled() {
    let mut pipeline = Pipeline::default();
    assert_eq!(
        pipeline.chain_mut().set_enabled("setup", false),
        Err(ChainError::InternalStage("setup".into()))
    );
    assert_eq!(pipeline.chain().is_enabled("setup"), Some(true));
    assert!(pipeline.chain_mut().set_enabled("dataAttribs", false).is_ok());
}

#[tokio::test]
async fn disabled_stages_are_skipped() {
    let mut chain = ResolverChain::standard();
    chain.set_enabled("styles", false).unwrap();
    let pipeline = Pipeline::with_chain(chain, Collaborators::default());

    let tree = pipeline
        .resolve_blueprint(
            page(json!({ "type": "header", "style": { "color": "red" } })),
            &Root::new(),
            &ResolveOptions::default(),
        )
        .await;
    assert!(tree.get(tree.root().unwrap()).unwrap().style.is_empty());
}

/// Answers every chain with the `result` of its first action.
struct Scripted {
    hook_calls: Arc<Mutex<Vec<String>>>,
}

struct ScriptedChain(Option<Value>);

#[async_trait]
impl ActionChain for ScriptedChain {
    async fn execute(&self) -> Vec<ActionResult> {
        match &self.0 {
            Some(result) => vec![ActionResult::with_result(result.clone())],
            None => Vec::new(),
        }
    }
}

impl ActionChainFactory for Scripted {
    fn create(
        &self,
        trigger: &str,
        actions: &[Value],
        options: &ActionChainOptions<'_>,
    ) -> Result<Arc<dyn ActionChain>, String> {
        if let Some(hook) = options.hook {
            hook(trigger, &json!(options.page));
        }
        self.hook_calls.lock().push(trigger.to_string());
        let result = actions.first().and_then(|action| action.get("result")).cloned();
        Ok(Arc::new(ScriptedChain(result)))
    }
}

#[tokio::test]
async fn primed_emits_and_event_chains() {
    let created = Arc::new(Mutex::new(Vec::new()));
    let hooked = Arc::new(Mutex::new(Vec::new()));
    let hook_sink = hooked.clone();
    let collaborators = Collaborators::new()
        .with_actions(Scripted {
            hook_calls: created.clone(),
        })
        .with_action_hook(move |trigger: &str, page: &Value| {
            hook_sink.lock().push(format!("{trigger}:{}", page.as_str().unwrap_or_default()));
        });
    let pipeline = Pipeline::new(collaborators);
    let options = ResolveOptions::for_page("Home")
        .with_base_url("https://cdn.test/")
        .with_prime_emits(true);

    let tree = pipeline
        .resolve_blueprint(
            page(json!({
                "type": "view",
                "children": [
                    {
                        "type": "image",
                        "path": { "emit": { "actions": [{ "result": "https://img.test/a.png" }] } },
                        "onClick": [{ "actionType": "goto", "destination": "Next" }]
                    },
                    {
                        "type": "textField",
                        "placeholder": { "emit": { "actions": [{ "actionType": "noop" }] } }
                    }
                ]
            })),
            &Root::new(),
            &options,
        )
        .await;

    let image = child(&tree, 0);
    assert_eq!(image.prop("src"), Some(&json!("https://img.test/a.png")));
    assert_eq!(image.prop("data-clickable"), Some(&json!(true)));
    assert!(image.action("onClick").is_some());
    assert!(image.events.contains(&ComponentEvent::EmitResolved {
        trigger: "path".into(),
        key: "src".into(),
        value: json!("https://img.test/a.png"),
    }));

    let field = child(&tree, 1);
    assert!(field.action("placeholder").is_some());
    assert_eq!(field.prop("placeholder"), None);

    let mut created = created.lock().clone();
    created.sort();
    assert_eq!(created, vec!["onClick", "path", "placeholder"]);
    assert_eq!(hooked.lock().len(), 3);
    assert!(hooked.lock().iter().all(|entry| entry.ends_with(":Home")));
}

//! Integration tests for query and mutation execution.

use std::sync::OnceLock;

use serde_json::{Value, json};
use typegraph_core::Declaration;
use typegraph_core::builders::*;
use typegraph_graphql::{ResolveParams, Resolver, SchemaAssembler};

fn data(response: async_graphql::Response) -> Value {
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

fn bot_noise() -> Declaration {
    let beep = object("Beep", None, [("beepiness", integer())]);
    let boop = object("Boop", None, [("boopiness", integer())]);
    let (beep_member, boop_member) = (beep.clone(), boop.clone());
    union("BotNoise", [beep, boop], move |value| {
        let boopy = value
            .get("boopiness")
            .is_some_and(|b| b.as_i64().unwrap_or(0) != 0);
        Some(if boopy {
            boop_member.clone()
        } else {
            beep_member.clone()
        })
    })
}

#[tokio::test]
async fn test_bot_noises_resolve_through_union_dispatch() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("botNoises", list(maybe(bot_noise())))])
        .add_resolvers([(
            "Query",
            [("botNoises", Resolver::value(json!([{"boopiness": 20}])))],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute(
            "{ botNoises { __typename ... on Boop { boopiness } ... on Beep { beepiness } } }",
            Value::Null,
            json!({}),
            None,
        )
        .await;
    assert_eq!(
        data(response),
        json!({"botNoises": [{"__typename": "Boop", "boopiness": 20}]})
    );
}

#[tokio::test]
async fn test_arguments_and_sync_resolver() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([(
            "hello",
            func(
                [
                    ("name", string()),
                    ("times", arg(maybe(integer()), Some(json!(2)), None)),
                ],
                string(),
                None,
                None,
            ),
        )])
        .add_resolvers([(
            "Query",
            [(
                "hello",
                Resolver::sync(|p: ResolveParams| {
                    let name = p.arg("name").and_then(Value::as_str).unwrap_or("?");
                    let times = p.arg("times").and_then(Value::as_u64).unwrap_or(1);
                    Ok(json!(vec![name; times as usize].join(" ")))
                }),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute(r#"{ hello(name: "Ada") }"#, Value::Null, json!({}), None)
        .await;
    assert_eq!(data(response), json!({"hello": "Ada Ada"}));

    let response = executor
        .execute(
            "query($n: Int) { hello(name: \"Bo\", times: $n) }",
            Value::Null,
            json!({}),
            Some(json!({"n": 3})),
        )
        .await;
    assert_eq!(data(response), json!({"hello": "Bo Bo Bo"}));
}

#[tokio::test]
async fn test_enum_values_map_to_domain_values() {
    let color = enumeration("Color", [("RED", json!("r")), ("GREEN", json!("g"))]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([(
            "echo",
            func(
                [("color", arg(color.clone(), Some(json!("g")), None))],
                color,
                None,
                None,
            ),
        )])
        .add_resolvers([(
            "Query",
            [(
                "echo",
                Resolver::new(|p: ResolveParams| async move {
                    match p.arg("color").and_then(Value::as_str) {
                        Some("r") => Ok(json!("r")),
                        Some("g") => Ok(json!("g")),
                        other => Err(async_graphql::Error::new(format!("unexpected {other:?}"))),
                    }
                }),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute("{ echo(color: RED) }", Value::Null, json!({}), None)
        .await;
    assert_eq!(data(response), json!({"echo": "RED"}));

    let response = executor.execute("{ echo }", Value::Null, json!({}), None).await;
    assert_eq!(data(response), json!({"echo": "GREEN"}));
}

#[tokio::test]
async fn test_input_object_defaults_reach_resolver() {
    let filter = input(
        "NameFilter",
        None,
        [
            ("prefix", string()),
            ("limit", arg(maybe(integer()), Some(json!(2)), None)),
        ],
    );
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([(
            "names",
            func([("filter", filter)], list(string()), None, None),
        )])
        .add_resolvers([(
            "Query",
            [(
                "names",
                Resolver::sync(|p: ResolveParams| {
                    let filter = p.arg("filter").cloned().unwrap_or_default();
                    let prefix = filter["prefix"].as_str().unwrap_or_default().to_owned();
                    let limit = filter["limit"].as_u64().unwrap_or(100) as usize;
                    let names: Vec<&str> = ["Ada", "Alan", "Anita", "Bob"]
                        .into_iter()
                        .filter(|n| n.starts_with(&prefix))
                        .take(limit)
                        .collect();
                    Ok(json!(names))
                }),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute(r#"{ names(filter: {prefix: "A"}) }"#, Value::Null, json!({}), None)
        .await;
    assert_eq!(data(response), json!({"names": ["Ada", "Alan"]}));
}

#[tokio::test]
async fn test_root_value_feeds_fields_without_resolvers() {
    let user = object("User", None, [("name", string()), ("age", maybe(integer()))]);
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("greeting", string()), ("me", user)]);
    let executor = assembler.compile().unwrap();

    let root = json!({"greeting": "hi", "me": {"name": "Ada"}});
    let response = executor
        .execute("{ greeting me { name age } }", root, json!({}), None)
        .await;
    assert_eq!(
        data(response),
        json!({"greeting": "hi", "me": {"name": "Ada", "age": null}})
    );
}

#[tokio::test]
async fn test_nested_resolver_receives_parent() {
    let user = object("User", None, [("first", string()), ("full", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("me", user)])
        .add_resolvers([("Query", [("me", Resolver::value(json!({"first": "Ada"})))])])
        .add_resolvers([(
            "User",
            [(
                "full",
                Resolver::sync(|p: ResolveParams| {
                    let first = p.parent["first"].as_str().unwrap_or_default();
                    Ok(json!(format!("{first} Lovelace")))
                }),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute("{ me { first full } }", Value::Null, json!({}), None)
        .await;
    assert_eq!(
        data(response),
        json!({"me": {"first": "Ada", "full": "Ada Lovelace"}})
    );
}

#[tokio::test]
async fn test_interface_resolves_by_typename() {
    let node = interface("Node", None, [("id", id())], None);
    let user = object_implementing("User", None, [("id", id()), ("name", string())], [node.clone()]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("node", node), ("users", list(user))])
        .add_resolvers([(
            "Query",
            [(
                "node",
                Resolver::value(json!({"__typename": "User", "id": "1", "name": "Ada"})),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute("{ node { id ... on User { name } } }", Value::Null, json!({}), None)
        .await;
    assert_eq!(data(response), json!({"node": {"id": "1", "name": "Ada"}}));
}

#[tokio::test]
async fn test_recursive_types_execute() {
    static CATEGORY: OnceLock<Declaration> = OnceLock::new();

    fn category() -> Declaration {
        CATEGORY
            .get_or_init(|| {
                object(
                    "Category",
                    None,
                    [
                        ("name", string()),
                        ("children", list(Declaration::lazy(category))),
                    ],
                )
            })
            .clone()
    }

    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("root", category())]);
    let executor = assembler.compile().unwrap();

    let root = json!({
        "root": {
            "name": "all",
            "children": [{"name": "books", "children": []}]
        }
    });
    let response = executor
        .execute("{ root { name children { name children { name } } } }", root, json!({}), None)
        .await;
    assert_eq!(
        data(response),
        json!({"root": {"name": "all", "children": [{"name": "books", "children": []}]}})
    );
}

#[tokio::test]
async fn test_later_resolver_registration_overwrites_same_field_only() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("a", string()), ("b", string())])
        .add_resolvers([(
            "Query",
            vec![("a", Resolver::value(json!("a1"))), ("b", Resolver::value(json!("b1")))],
        )])
        .add_resolvers([("Query", [("a", Resolver::value(json!("a2")))])]);
    let executor = assembler.compile().unwrap();

    let response = executor.execute("{ a b }", Value::Null, json!({}), None).await;
    assert_eq!(data(response), json!({"a": "a2", "b": "b1"}));
}

#[tokio::test]
async fn test_resolver_errors_are_reported_per_field() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("broken", maybe(string())), ("fine", string())])
        .add_resolvers([(
            "Query",
            vec![
                (
                    "broken",
                    Resolver::sync(|_| Err(async_graphql::Error::new("backend unavailable"))),
                ),
                ("fine", Resolver::value(json!("ok"))),
            ],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor.execute("{ broken fine }", Value::Null, json!({}), None).await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "backend unavailable");
    assert_eq!(
        response.errors[0].path,
        vec![async_graphql::PathSegment::Field("broken".to_string())]
    );
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({"broken": null, "fine": "ok"})
    );
}

#[tokio::test]
async fn test_mutation_executes() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("ping", string())])
        .add_mutations([(
            "rename",
            func([("to", string())], string(), None, Some("Renames the thing")),
        )])
        .add_resolvers([(
            "Mutation",
            [(
                "rename",
                Resolver::sync(|p: ResolveParams| Ok(p.arg("to").cloned().unwrap_or_default())),
            )],
        )]);
    let executor = assembler.compile().unwrap();

    let response = executor
        .execute(r#"mutation { rename(to: "new") }"#, Value::Null, json!({}), None)
        .await;
    assert_eq!(data(response), json!({"rename": "new"}));
}

//! Integration tests for SDL generation from declarations.

use serde_json::json;
use typegraph_core::Declaration;
use typegraph_core::builders::*;
use typegraph_graphql::{ResolveResult, Resolver, SchemaAssembler, SchemaConfig, SchemaError};

fn bot_noise() -> Declaration {
    let beep = object("Beep", None, [("beepiness", integer())]);
    let boop = object("Boop", None, [("boopiness", integer())]);
    let (beep_member, boop_member) = (beep.clone(), boop.clone());
    union("BotNoise", [beep, boop], move |value| {
        let boopy = value
            .get("boopiness")
            .is_some_and(|b| !b.is_null() && b != &json!(0) && b != &json!(false));
        Some(if boopy {
            boop_member.clone()
        } else {
            beep_member.clone()
        })
    })
}

#[test]
fn test_query_only_schema_omits_other_roots() {
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("hello", string())]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("type Query {"), "{sdl}");
    assert!(sdl.contains("hello: String!"), "{sdl}");
    assert!(!sdl.contains("type Mutation"), "{sdl}");
    assert!(!sdl.contains("type Subscription"), "{sdl}");
}

#[test]
fn test_empty_assembler_emits_placeholder_query() {
    let sdl = SchemaAssembler::new().print().unwrap();
    assert!(sdl.contains("_placeholder: String"), "{sdl}");
    assert!(!sdl.contains("_placeholder: String!"), "{sdl}");
}

#[test]
fn test_union_sdl() {
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("botNoises", list(maybe(bot_noise())))]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("union BotNoise = Beep | Boop"), "{sdl}");
    assert!(sdl.contains("botNoises: [BotNoise]!"), "{sdl}");
    assert!(sdl.contains("type Beep {"), "{sdl}");
    assert!(sdl.contains("boopiness: Int!"), "{sdl}");
}

#[test]
fn test_optionality_in_sdl() {
    let user = object(
        "User",
        Some("A registered user"),
        [
            ("name", string()),
            ("nickname", maybe(string())),
            ("tags", list(maybe(string()))),
            ("aliases", maybe(list(string()))),
        ],
    );
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("me", maybe(user))]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("me: User\n"), "{sdl}");
    assert!(sdl.contains("name: String!"), "{sdl}");
    assert!(sdl.contains("nickname: String\n"), "{sdl}");
    assert!(sdl.contains("tags: [String]!"), "{sdl}");
    assert!(sdl.contains("aliases: [String!]\n"), "{sdl}");
    assert!(sdl.contains("A registered user"), "{sdl}");
}

#[test]
fn test_mutation_with_publish_derives_subscription() {
    let message = object("Message", None, [("text", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("messages", list(message.clone()))])
        .add_mutations([(
            "sendMessage",
            func([("text", string())], message.clone(), Some(message), None),
        )]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("type Mutation {"), "{sdl}");
    assert!(sdl.contains("sendMessage(text: String!): Message!"), "{sdl}");
    assert!(sdl.contains("type Subscription {"), "{sdl}");
    assert!(sdl.contains("sendMessage: Message!"), "{sdl}");
}

#[test]
fn test_custom_and_date_scalars() {
    let event = object(
        "Event",
        None,
        [
            ("on", date()),
            ("contact", Declaration::scalar("Email")),
        ],
    );
    let mut assembler = SchemaAssembler::new();
    assembler
        .register_scalar("Email", Some("An e-mail address"))
        .add_queries([("events", list(event))]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("scalar Date"), "{sdl}");
    assert!(sdl.contains("scalar Email"), "{sdl}");
    assert!(sdl.contains("contact: Email!"), "{sdl}");
}

#[test]
fn test_unknown_scalar_is_a_build_error() {
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("contact", Declaration::scalar("Email"))]);

    let err = assembler.print().unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { .. }));
    assert_eq!(err.error_code(), "UNKNOWN_TYPE");
}

#[test]
fn test_enum_input_and_arguments_sdl() {
    let color = enumeration("Color", [("RED", json!("r")), ("GREEN", json!("g"))]);
    let filter = input(
        "PaintFilter",
        Some("Filters paints"),
        [
            ("color", maybe(color.clone())),
            ("limit", arg(maybe(integer()), Some(json!(10)), None)),
        ],
    );
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([(
        "paints",
        func(
            [
                ("filter", maybe(filter)),
                ("shade", arg(color.clone(), Some(json!("g")), Some("Preferred shade"))),
            ],
            list(color),
            None,
            Some("Lists paints"),
        ),
    )]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("enum Color {"), "{sdl}");
    assert!(sdl.contains("RED"), "{sdl}");
    assert!(sdl.contains("input PaintFilter {"), "{sdl}");
    assert!(sdl.contains("limit: Int = 10"), "{sdl}");
    assert!(sdl.contains("shade: Color! = GREEN"), "{sdl}");
    assert!(sdl.contains("): [Color!]!"), "{sdl}");
}

#[test]
fn test_interfaces_in_sdl() {
    let node = interface("Node", Some("Anything with an id"), [("id", id())], None);
    let user = object_implementing("User", None, [("id", id()), ("name", string())], [node.clone()]);
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("node", maybe(node)), ("users", list(user))]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("interface Node {"), "{sdl}");
    assert!(sdl.contains("type User implements Node {"), "{sdl}");
}

#[test]
fn test_duplicate_type_names_are_rejected() {
    let first = object("Thing", None, [("a", string())]);
    let second = object("Thing", None, [("b", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("first", first), ("second", second)]);

    let err = assembler.print().unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_TYPE_NAME");
}

#[test]
fn test_subscription_resolver_on_query_field_is_rejected() {
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("ticks", integer())])
        .add_resolvers([(
            "Query",
            [(
                "ticks",
                Resolver::subscription(|_| async {
                    Ok(futures_util::stream::empty::<ResolveResult>())
                }),
            )],
        )]);

    let err = assembler.compile().unwrap_err();
    assert!(matches!(err, SchemaError::ResolverMismatch { .. }));
}

#[test]
fn test_introspection_can_be_disabled() {
    let config = SchemaConfig {
        introspection: false,
        ..SchemaConfig::default()
    };
    let mut assembler = SchemaAssembler::with_config(config).unwrap();
    assembler.add_queries([("hello", string())]);
    assert!(assembler.compile().is_ok());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SchemaConfig {
        max_depth: 0,
        ..SchemaConfig::default()
    };
    let err = SchemaAssembler::with_config(config).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

#[test]
fn test_adapt_receives_builder() {
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("hello", string())]);

    let mut adapted = false;
    let schema = assembler.to_graphql_with(|builder| {
        adapted = true;
        builder.limit_depth(3)
    });
    assert!(schema.is_ok());
    assert!(adapted);
}

#[test]
fn test_sdl_lists_types_in_registration_order() {
    let zeta = object("Zeta", None, [("z", string())]);
    let alpha = object("Alpha", None, [("a", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([("zeta", zeta), ("alpha", alpha)]);

    let sdl = assembler.print().unwrap();
    let query = sdl.find("type Query {").unwrap();
    let zeta = sdl.find("type Zeta {").unwrap();
    let alpha = sdl.find("type Alpha {").unwrap();
    assert!(query < zeta && zeta < alpha, "{sdl}");
}

#[test]
fn test_type_description_independent_of_first_reference() {
    let user = object("User", Some("A registered user"), [("name", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler.add_queries([
        (
            "lookupUser",
            func([("id", id())], user.clone(), None, Some("Looks a user up")),
        ),
        ("me", user),
    ]);

    let sdl = assembler.print().unwrap();
    let head = &sdl[..sdl.find("type User {").unwrap()];
    let type_doc = head.trim_end().trim_end_matches('"').trim_end();
    assert!(type_doc.ends_with("A registered user"), "{sdl}");
    assert!(sdl.contains("Looks a user up"), "{sdl}");
}

#[test]
fn test_replacing_mutation_without_publish_drops_derived_subscription() {
    let message = object("Message", None, [("text", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("ping", string())])
        .add_mutations([(
            "send",
            func([("text", string())], message.clone(), Some(message.clone()), None),
        )]);
    assert!(assembler.print().unwrap().contains("type Subscription {"));

    assembler.add_mutations([("send", func([("text", string())], message, None, None))]);
    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("type Mutation {"), "{sdl}");
    assert!(!sdl.contains("type Subscription"), "{sdl}");
}

#[test]
fn test_explicit_subscription_survives_mutation_replacement() {
    let message = object("Message", None, [("text", string())]);
    let mut assembler = SchemaAssembler::new();
    assembler
        .add_queries([("ping", string())])
        .add_mutations([(
            "send",
            func([("text", string())], message.clone(), Some(message.clone()), None),
        )])
        .add_subscriptions([("send", message.clone())])
        .add_mutations([("send", func([("text", string())], message, None, None))]);

    let sdl = assembler.print().unwrap();
    assert!(sdl.contains("type Subscription {"), "{sdl}");
}

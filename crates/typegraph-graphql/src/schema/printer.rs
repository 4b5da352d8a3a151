//! SDL rendering in registration order.
//!
//! The engine prints type definitions sorted by name. [`order_definitions`]
//! splits its output into top-level definitions and moves the named ones into
//! the order the registry first reached them. Definitions the order does not
//! mention (schema block, directives) keep their positions.

const DEFINITION_KEYWORDS: [&str; 8] = [
    "type",
    "input",
    "enum",
    "interface",
    "union",
    "scalar",
    "directive",
    "schema",
];

/// One top-level SDL definition, including its description.
struct Definition<'a> {
    lines: Vec<&'a str>,
    name: Option<&'a str>,
}

impl<'a> Definition<'a> {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            name: None,
        }
    }

    fn has_header(&self) -> bool {
        self.lines.iter().any(|line| definition_header(line).is_some())
    }
}

/// Keyword and name of a definition header line such as `type User {`.
fn definition_header(line: &str) -> Option<(&str, Option<&str>)> {
    let mut words = line.split_whitespace();
    let keyword = words.next()?;
    if !DEFINITION_KEYWORDS.contains(&keyword) || line.starts_with(char::is_whitespace) {
        return None;
    }
    let name = words
        .next()
        .map(|word| word.trim_end_matches(['{', '=']))
        .filter(|word| !word.is_empty());
    Some((keyword, name))
}

fn split_definitions(sdl: &str) -> Vec<Definition<'_>> {
    let mut definitions = Vec::new();
    let mut current = Definition::new();
    let mut in_block_string = false;

    for line in sdl.lines() {
        if !in_block_string {
            let starts_new = line.trim().is_empty()
                || ((line.starts_with("\"\"\"") || definition_header(line).is_some())
                    && current.has_header());
            if starts_new && !current.lines.is_empty() {
                definitions.push(std::mem::replace(&mut current, Definition::new()));
            }
            if line.trim().is_empty() {
                continue;
            }
            match definition_header(line) {
                Some(("directive" | "schema", _)) | None => {}
                Some((_, name)) => current.name = name,
            }
        }
        if line.matches("\"\"\"").count() % 2 == 1 {
            in_block_string = !in_block_string;
        }
        current.lines.push(line);
    }
    if !current.lines.is_empty() {
        definitions.push(current);
    }
    definitions
}

/// Reorders the named definitions of `sdl` to follow `order`.
pub(crate) fn order_definitions(sdl: &str, order: &[String]) -> String {
    let definitions = split_definitions(sdl);
    let rank = |def: &Definition<'_>| {
        def.name
            .and_then(|name| order.iter().position(|ordered| ordered == name))
    };

    let mut ranked: Vec<(usize, &Definition<'_>)> = definitions
        .iter()
        .filter_map(|def| rank(def).map(|r| (r, def)))
        .collect();
    ranked.sort_by_key(|(r, _)| *r);
    let mut ranked = ranked.into_iter().map(|(_, def)| def);

    let blocks: Vec<String> = definitions
        .iter()
        .filter_map(|def| match rank(def) {
            Some(_) => ranked.next(),
            None => Some(def),
        })
        .map(|def| def.lines.join("\n"))
        .collect();

    let mut out = blocks.join("\n\n");
    if sdl.ends_with('\n') {
        out.push('\n');
    }
    out
}

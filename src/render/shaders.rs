// shaders.rs - Built-in shader sources and source inspection

/// Vertex stage every program is linked against.
pub const VERTEX_SRC: &str = include_str!("shaders/quad.vert");

/// Ray-marched scene loaded into the editor at startup.
pub const DEFAULT_FRAGMENT_SRC: &str = include_str!("shaders/scene.frag");

/// Simpler scene without a resolution uniform. Offered as a sample in the
/// editor and used as a fixture by the tests.
pub const SAMPLE_GRADIENT_FRAGMENT: &str = include_str!("shaders/gradient.frag");

/// Name of the `vec3` position attribute in [`VERTEX_SRC`].
pub const POSITION_ATTRIBUTE: &str = "v_position";

/// Name of the optional `vec2` uniform carrying the output size in pixels.
pub const RESOLUTION_UNIFORM: &str = "f_resolution";

/// Whether `source` declares `uniform vec2 f_resolution`.
///
/// Precision qualifiers are allowed between the keyword and the type.
/// Declarations inside comments and preprocessor lines are ignored.
pub fn declares_resolution_uniform(source: &str) -> bool {
    let code: String = strip_comments(source)
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    code.split(|c: char| matches!(c, ';' | '{' | '}')).any(|statement| {
        let tokens: Vec<&str> = statement.split_whitespace().collect();
        matches!(
            tokens.as_slice(),
            ["uniform", "vec2", name]
                | ["uniform", "lowp" | "mediump" | "highp", "vec2", name]
                if *name == RESOLUTION_UNIFORM
        )
    })
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |i| &after[i..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |i| &after[i + 2..]);
            out.push(' ');
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    out
}

use super::bindings::LocalVariable;

/// An accumulator field declared by a local in init code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_name: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Init code with its locals turned into attribute assignments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoistedInitCode {
    pub code: String,
    /// One per declared identifier, in source order.
    pub attributes: Vec<Attribute>,
}

/// Rewrite `Type a = init, b;` into `a = init;b;` so the declared names
/// survive across `init`, `action` and `result` as accumulator attributes.
///
/// Whitespace and `;` following each rewritten identifier are dropped.
pub fn hoist_locals(code: &str, locals: &[LocalVariable]) -> HoistedInitCode {
    let mut sorted: Vec<&LocalVariable> = locals.iter().collect();
    sorted.sort_by_key(|local| local.range.start());

    let bytes = code.as_bytes();
    let mut out = String::with_capacity(code.len());
    let mut attributes = Vec::new();
    let mut last = 0usize;

    for local in sorted {
        let start = usize::from(local.range.start());
        if start >= last {
            out.push_str(&code[last..start]);
        }
        last = last.max(usize::from(local.range.end()));

        for id in &local.identifiers {
            out.push_str(&code[id.range]);
            out.push(';');
            attributes.push(Attribute::new(&id.name, &local.type_name));

            last = usize::from(id.range.end());
            while last < bytes.len() && (bytes[last].is_ascii_whitespace() || bytes[last] == b';')
            {
                last += 1;
            }
        }
    }
    out.push_str(&code[last..]);

    HoistedInitCode {
        code: out,
        attributes,
    }
}

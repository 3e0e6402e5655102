/// Rewrite every `{name}` in a pathname to the executor's `:name` syntax.
///
/// Only braces trigger a substitution, so running this on an already
/// converted path is a no-op.
pub fn to_path_template(pathname: &str) -> String {
    let mut out = String::with_capacity(pathname.len());
    let mut rest = pathname;

    while let Some(open) = rest.find('{') {
        // The name needs at least one character, so a bare `{}` never matches.
        let Some(first) = rest[open + 1..].chars().next() else {
            break;
        };
        let search_from = open + 1 + first.len_utf8();
        let Some(close) = rest[search_from..].find('}').map(|i| i + search_from) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push(':');
        out.push_str(&rest[open + 1..close]);
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Whether a whole segment is an interpolation such as `{petId}`.
pub fn is_interpolated(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Segments that become nesting levels of the route tree: non-empty and
/// not interpolated.
pub fn literal_segments(pathname: &str) -> impl Iterator<Item = &str> {
    pathname
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_interpolated(segment))
}

/// Keys of a Paths object that name a path. Vendor extensions (`x-…`) and
/// anything else not starting with `/` are not path items.
pub fn is_path_key(key: &str) -> bool {
    key.starts_with('/')
}

/// Drop a resource path prefix shared by all APIs of a Swagger 1.2
/// declaration.
pub fn strip_resource_path<'p>(resource_path: &str, path: &'p str) -> &'p str {
    path.strip_prefix(resource_path).unwrap_or(path)
}

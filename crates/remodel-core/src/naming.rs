//! Canonical names for entity types
//!
//! Payload keys and default resource locations use the snake_case form of
//! the type name (`TaskList` -> `task_list`) and its plural (`task_lists`).

/// Irregular plurals (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

/// Words that are the same in singular and plural
const UNCOUNTABLE: &[&str] = &["equipment", "information", "series", "species", "news"];

/// Convert a type name to snake_case
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == ':' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                // Acronym followed by a word: "HTTPServer" -> "http_server"
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Pluralize the last word of a snake_case name
pub fn pluralize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(pos) => word.split_at(pos + 1),
        None => ("", word),
    };

    if last.is_empty() || UNCOUNTABLE.contains(&last) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == last) {
        return format!("{}{}", head, plural);
    }

    let plural = if let Some(stem) = last.strip_suffix('y') {
        if stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            format!("{}s", last)
        } else {
            format!("{}ies", stem)
        }
    } else if last.ends_with('s')
        || last.ends_with('x')
        || last.ends_with('z')
        || last.ends_with("ch")
        || last.ends_with("sh")
    {
        format!("{}es", last)
    } else {
        format!("{}s", last)
    };

    format!("{}{}", head, plural)
}

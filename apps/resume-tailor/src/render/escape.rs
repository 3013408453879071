use serde_json::Value;

/// Escapes one string for LaTeX body text.
///
/// Single pass over the characters, so replacement text (which itself contains `\`, `{`, `}`)
/// is never escaped a second time.
pub fn escape_latex(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    for c in raw.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\^{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            '\n' => out.push_str(r"\newline{}"),
            '-' => out.push_str("{-}"),
            '\u{00A0}' => out.push('~'),
            '[' => out.push_str("{[}"),
            ']' => out.push_str("{]}"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes every string leaf of a JSON tree in place. Object keys are left alone.
pub fn escape_tree(value: &mut Value) {
    match value {
        Value::String(s) => *s = escape_latex(s),
        Value::Array(items) => items.iter_mut().for_each(escape_tree),
        Value::Object(map) => map.values_mut().for_each(escape_tree),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_special_character_escaped() {
        assert_eq!(escape_latex("R&D"), r"R\&D");
        assert_eq!(escape_latex("50%"), r"50\%");
        assert_eq!(escape_latex("$2M"), r"\$2M");
        assert_eq!(escape_latex("C#"), r"C\#");
        assert_eq!(escape_latex("snake_case"), r"snake\_case");
        assert_eq!(escape_latex("{x}"), r"\{x\}");
        assert_eq!(escape_latex("~/bin"), r"\textasciitilde{}/bin");
        assert_eq!(escape_latex("2^10"), r"2\^{}10");
        assert_eq!(escape_latex(r"C:\tmp"), r"C:\textbackslash{}tmp");
        assert_eq!(escape_latex("a\nb"), r"a\newline{}b");
        assert_eq!(escape_latex("2019-2021"), "2019{-}2021");
        assert_eq!(escape_latex("10\u{00A0}ms"), "10~ms");
        assert_eq!(escape_latex("[1]"), "{[}1{]}");
    }

    #[test]
    fn test_replacements_are_not_re_escaped() {
        // `\` becomes `\textbackslash{}`; its braces must stay literal.
        assert_eq!(escape_latex(r"\{"), r"\textbackslash{}\{");
        assert_eq!(escape_latex("plain text, 100 users"), "plain text, 100 users");
    }

    #[test]
    fn test_tree_escapes_nested_leaves_only() {
        let mut value = json!({
            "summary_&": "Cut costs 30% & grew #1 team",
            "work_experience": [
                {"description": ["Saved $2M/day", "Used snake_case"], "nice_to_add": null}
            ],
            "count": 3,
            "flag": true
        });
        escape_tree(&mut value);

        assert_eq!(value["summary_&"], json!(r"Cut costs 30\% \& grew \#1 team"));
        assert_eq!(
            value["work_experience"][0]["description"],
            json!([r"Saved \$2M/day", r"Used snake\_case"])
        );
        assert_eq!(value["work_experience"][0]["nice_to_add"], Value::Null);
        assert_eq!(value["count"], json!(3));
        assert_eq!(value["flag"], json!(true));
    }
}

use lazy_json_path::{format_path, parse_path, PathError, PathStep, SmartPath};

fn key(k: &str) -> PathStep {
    PathStep::Key(k.to_string())
}

#[test]
fn accepted_path_matrix() {
    let cases: Vec<(&str, Vec<PathStep>)> = vec![
        ("code", vec![key("code")]),
        ("data.object.a", vec![key("data"), key("object"), key("a")]),
        ("array[0]", vec![key("array"), PathStep::Index(0)]),
        ("[0]", vec![PathStep::Index(0)]),
        ("[0].a[0].x", vec![PathStep::Index(0), key("a"), PathStep::Index(0), key("x")]),
        ("a[0][-1][2]", vec![key("a"), PathStep::Index(0), PathStep::Index(-1), PathStep::Index(2)]),
        ("[1][2]", vec![PathStep::Index(1), PathStep::Index(2)]),
        ("a.", vec![key("a"), key("")]),
        (".a", vec![key(""), key("a")]),
        ("-1", vec![key("-1")]),
    ];

    for (input, expected) in cases {
        let path = parse_path(input).unwrap_or_else(|e| panic!("parse failed for '{input}': {e}"));
        assert_eq!(path.steps(), expected.as_slice(), "steps for '{input}'");
    }
}

#[test]
fn rejected_path_matrix() {
    let cases = [
        ("a]", "UnbalancedBracket"),
        ("]a[0", "UnbalancedBracket"),
        ("a[0", "UnterminatedIndex"),
        ("[0", "UnterminatedIndex"),
        ("a.[0]", "MisplacedIndex"),
        ("a.b.[1]", "MisplacedIndex"),
        ("a[b]", "InvalidIndex"),
        ("a[ 1]", "InvalidIndex"),
        ("a[0]b", "UnexpectedText"),
        ("a[0]x[1]", "UnexpectedText"),
    ];

    for (input, kind) in cases {
        let err = parse_path(input).expect_err(input);
        let name = match err {
            PathError::UnbalancedBracket { .. } => "UnbalancedBracket",
            PathError::UnterminatedIndex { .. } => "UnterminatedIndex",
            PathError::MisplacedIndex { .. } => "MisplacedIndex",
            PathError::UnexpectedText { .. } => "UnexpectedText",
            PathError::InvalidIndex { .. } => "InvalidIndex",
            PathError::UnrepresentableKey(_) => "UnrepresentableKey",
        };
        assert_eq!(name, kind, "error kind for '{input}'");
    }
}

#[test]
fn rejection_is_whole_path() {
    // A bad trailing segment rejects the valid prefix too.
    assert!(parse_path("a.b.c[x]").is_err());
    assert!(parse_path("[0].a.[1]").is_err());
}

#[test]
fn format_then_parse_preserves_steps() {
    let steps = vec![
        PathStep::Index(-2),
        key("user"),
        PathStep::Index(3),
        PathStep::Index(0),
        key("name"),
    ];
    let text = format_path(&steps).unwrap();
    assert_eq!(text, "[-2].user[3][0].name");
    assert_eq!(parse_path(&text).unwrap(), SmartPath::from_steps(steps));
}

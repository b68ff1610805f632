// Tests for split
use crate::*;

fn strs(items: &[Option<&str>]) -> Vec<Option<String>> {
    items.iter().map(|s| s.map(str::to_string)).collect()
}

fn all(items: &[&str]) -> Vec<Option<String>> {
    items.iter().map(|s| Some(s.to_string())).collect()
}

#[test]
fn test_split_with_patterns() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let cases: &[(&str, &str, &[Option<&str>])] = &[
        ("abc", "(?:)", &[Some("a"), Some("b"), Some("c")]),
        ("abc", "()", &[Some("a"), Some(""), Some("b"), Some(""), Some("c")]),
        ("abc", "()*?", &[Some("a"), None, Some("b"), None, Some("c")]),
        ("abc", "^", &[Some("abc")]),
        ("abc", "(^)", &[Some("abc")]),
        ("abc", "a", &[Some(""), Some("bc")]),
        ("abc", "a?", &[Some(""), Some("b"), Some("c")]),
        ("abc", "a??", &[Some("a"), Some("b"), Some("c")]),
        ("abc", "(a)", &[Some(""), Some("a"), Some("bc")]),
        ("abc", "(b)", &[Some("a"), Some("b"), Some("c")]),
        ("", ".", &[Some("")]),
        ("", ".?", &[]),
        ("ab", "a*", &[Some(""), Some("b")]),
        ("ab", "a*?", &[Some("a"), Some("b")]),
        ("ab", "(?:ab)", &[Some(""), Some("")]),
        ("ab", "(?:ab)*", &[Some(""), Some("")]),
        ("a", "a", &[Some(""), Some("")]),
        ("a", "a??", &[Some("a")]),
        ("a-b", "-??", &[Some("a"), Some("-"), Some("b")]),
        ("a--b", "-", &[Some("a"), Some(""), Some("b")]),
        ("a--b", "-?", &[Some("a"), Some(""), Some("b")]),
        ("", "()()", &[]),
        (".", "()()", &[Some(".")]),
        (".", "(.?)(.?)", &[Some(""), Some("."), Some(""), Some("")]),
        (".", "(.)?(.)?", &[Some(""), Some("."), None, Some("")]),
        ("tesst", "(s)*", &[Some("t"), None, Some("e"), Some("s"), Some("t")]),
        ("tesst", "(s*)", &[Some("t"), Some(""), Some("e"), Some("ss"), Some("t")]),
        ("tesst", "(?:s)*", &[Some("t"), Some("e"), Some("t")]),
        ("tesst", "(?=s+)", &[Some("te"), Some("s"), Some("st")]),
        ("test", "t", &[Some(""), Some("es"), Some("")]),
        ("test", "(t)", &[Some(""), Some("t"), Some("es"), Some("t"), Some("")]),
        ("test", "(t)(e)(s)(t)", &[Some(""), Some("t"), Some("e"), Some("s"), Some("t"), Some("")]),
    ];
    for (subject, source, expected) in cases {
        let p = engine.compile(source, "").unwrap();
        let result = engine.split(*subject, &p, SplitLimit::Unlimited).unwrap();
        assert_eq!(result, strs(expected), "split({subject:?}, /{source}/)");
    }
}

#[test]
fn test_split_with_strings() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    assert_eq!(engine.split("", "", None::<u32>).unwrap(), all(&[]));
    assert_eq!(engine.split("", "x", None::<u32>).unwrap(), all(&[""]));
    assert_eq!(engine.split("abc", "", None::<u32>).unwrap(), all(&["a", "b", "c"]));
    assert_eq!(engine.split("test", "t", None::<u32>).unwrap(), all(&["", "es", ""]));
    assert_eq!(engine.split("test", "es", None::<u32>).unwrap(), all(&["t", "t"]));
    assert_eq!(engine.split("a--b", "-", None::<u32>).unwrap(), all(&["a", "", "b"]));
    // the separator is literal, not a pattern
    assert_eq!(engine.split("a.b", ".", None::<u32>).unwrap(), all(&["a", "b"]));
}

#[test]
fn test_split_limits() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let empty = engine.compile("(?:)", "").unwrap();
    let full = all(&["t", "e", "s", "t"]);
    for limit in 0..=5u32 {
        let expected: Vec<_> = full.iter().take(limit as usize).cloned().collect();
        assert_eq!(engine.split("test", &empty, limit).unwrap(), expected);
    }
    assert_eq!(engine.split("test", &empty, -1i32).unwrap(), full);
    assert_eq!(engine.split("test", &empty, None::<f64>).unwrap(), full);
    assert_eq!(engine.split("test", &empty, SplitLimit::Count(0)).unwrap(), all(&[]));
    assert_eq!(engine.split("test", &empty, f64::NAN).unwrap(), all(&[]));
    assert_eq!(engine.split("test", &empty, true).unwrap(), all(&["t"]));
    assert_eq!(engine.split("test", &empty, "2").unwrap(), all(&["t", "e"]));
    assert_eq!(engine.split("test", &empty, "two").unwrap(), all(&[]));

    let space = engine.compile(" ", "").unwrap();
    let huge_negative = -(2f64.powi(32) - 1.0);
    assert_eq!(engine.split("a b c d", &space, huge_negative).unwrap(), all(&["a"]));
    assert_eq!(engine.split("a b c d", &space, 2f64.powi(32) + 1.0).unwrap(), all(&["a"]));
    assert_eq!(engine.split("a b c d", &space, f64::INFINITY).unwrap(), all(&[]));
}

#[test]
fn test_split_ignores_and_keeps_cursor() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    for flags in ["", "g"] {
        let p = engine.compile("t", flags).unwrap();
        p.set_last_index(2);
        assert_eq!(
            engine.split("test", &p, SplitLimit::Unlimited).unwrap(),
            all(&["", "es", ""])
        );
        assert_eq!(p.last_index(), 2);
    }
}

#[test]
fn test_split_converts_subjects() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("123", "").unwrap();
    assert_eq!(engine.split(123_i32, &p, SplitLimit::Unlimited).unwrap(), all(&["", ""]));
    assert_eq!(engine.split(111_i32, "1", SplitLimit::Unlimited).unwrap(), all(&["", "", "", ""]));
    let err = engine.split(None::<&str>, &p, SplitLimit::Unlimited).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
}

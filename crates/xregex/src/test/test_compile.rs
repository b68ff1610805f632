// Tests for augmented syntax compilation
use crate::*;

#[test]
fn test_named_groups_become_plain_groups() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let date = engine.compile("(?<year>\\d{4})-(?<month>\\d{2})", "").unwrap();
    assert_eq!(date.source(), "(\\d{4})-(\\d{2})");
    assert_eq!(date.capture_count(), 2);
    assert_eq!(date.capture_names()[0].as_deref(), Some("year"));
    assert_eq!(date.capture_names()[1].as_deref(), Some("month"));

    let m = engine.search("due 2024-05", &date).unwrap().unwrap();
    assert_eq!(m.name("year"), Some("2024"));
    assert_eq!(m.name("month"), Some("05"));
    assert_eq!(m.index(), 4);
}

#[test]
fn test_python_style_named_group() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("(?P<word>\\w+)", "").unwrap();
    assert_eq!(p.source(), "(\\w+)");
    let m = engine.search("hi there", &p).unwrap().unwrap();
    assert_eq!(m.name("word"), Some("hi"));
}

#[test]
fn test_named_backreference() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("(?<n>a)\\k<n>", "").unwrap();
    assert_eq!(p.source(), "(a)\\1");
    assert!(engine.test("xaa", &p).unwrap());
    assert!(!engine.test("xab", &p).unwrap());

    // a following digit must not extend the group number
    let p = engine.compile("(?<n>a)\\k<n>0", "").unwrap();
    assert_eq!(p.source(), "(a)\\1(?:)0");
    assert!(engine.test("aa0", &p).unwrap());

    let err = engine.compile("(?<n>a)\\k<m>", "").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_group_name_errors() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let err = engine.compile("(?<a>x)(?<a>y)", "").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.message.contains("Cannot use same name for multiple groups"));

    assert!(engine.compile("(?<1a>x)", "").unwrap_err().is_syntax());
}

#[test]
fn test_explicit_capture_flag() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("(a)(?<b>c)", "n").unwrap();
    assert_eq!(p.source(), "(?:a)(c)");
    assert_eq!(p.capture_count(), 1);
    assert_eq!(p.xflags().as_deref(), Some("n"));
    assert_eq!(p.flags(), "");
}

#[test]
fn test_free_spacing() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("a b # comment\n c", "x").unwrap();
    assert_eq!(p.source(), "a(?:)b(?:)c");
    assert!(engine.test("abc", &p).unwrap());

    let p = engine.compile("(a)\\1 0", "x").unwrap();
    assert_eq!(p.source(), "(a)\\1(?:)0");

    let p = engine.compile("a +", "x").unwrap();
    assert_eq!(p.source(), "a+");

    let p = engine.compile("( a | b )", "x").unwrap();
    assert_eq!(p.source(), "(a|b)");

    // whitespace inside a class is kept
    let p = engine.compile("[ a]", "x").unwrap();
    assert_eq!(p.source(), "[ a]");
}

#[test]
fn test_inline_comments() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("a(?#note)b", "").unwrap();
    assert_eq!(p.source(), "a(?:)b");
    let p = engine.compile("a(?#note)*", "").unwrap();
    assert_eq!(p.source(), "a*");
    let p = engine.compile("(?#lead)a", "").unwrap();
    assert_eq!(p.source(), "a");
}

#[test]
fn test_mode_modifier() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("(?im)^a", "").unwrap();
    assert_eq!(p.source(), "^a");
    assert_eq!(p.flags(), "im");
    assert!(p.ignore_case());
    assert!(engine.test("x\nA", &p).unwrap());

    let p = engine.compile("(?x) a b", "g").unwrap();
    assert_eq!(p.source(), "a(?:)b");
    assert_eq!(p.flags(), "g");
    assert_eq!(p.xflags().as_deref(), Some("g"));

    assert!(engine.compile("(?g)a", "").unwrap_err().is_syntax());
    assert!(engine.compile("(?iy)a", "").unwrap_err().is_syntax());
}

#[test]
fn test_empty_classes() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let never = engine.compile("a[]", "").unwrap();
    assert_eq!(never.source(), "a\\b\\B");
    assert!(!engine.test("a", &never).unwrap());

    let any = engine.compile("[^]", "").unwrap();
    assert_eq!(any.source(), "[\\s\\S]");
    assert!(engine.test("\n", &any).unwrap());
}

#[test]
fn test_code_point_escapes() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("\\u{61}", "").unwrap();
    assert_eq!(p.source(), "\\u0061");
    assert!(engine.test("a", &p).unwrap());

    let err = engine.compile("\\u{1F600}", "").unwrap_err();
    assert!(err.is_syntax());
    let p = engine.compile("\\u{1F600}", "u").unwrap();
    assert!(engine.test("smile \u{1F600}", &p).unwrap());

    assert!(engine.compile("\\u{110000}", "u").unwrap_err().is_syntax());
}

#[test]
fn test_invalid_escapes_and_octals() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let err = engine.compile("ab\\q", "").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset, Some(2));

    assert!(engine.compile("\\2(a)", "").unwrap_err().is_syntax());
    assert!(engine.compile("\\01", "").unwrap_err().is_syntax());
    assert!(engine.compile("[\\1]", "").unwrap_err().is_syntax());
    assert!(engine.compile("\\0", "").is_ok());
    assert!(engine.compile("a\\B", "").is_ok());
}

#[test]
fn test_flag_validation() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let err = engine.compile("a", "gg").unwrap_err();
    assert_eq!(err.message, "Invalid duplicate regex flag gg");
    let err = engine.compile("a", "Q").unwrap_err();
    assert_eq!(err.message, "Unknown regex flag Q");
}

#[test]
fn test_flags_are_sorted() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let p = engine.compile("a", "ygix").unwrap();
    assert_eq!(p.flags(), "giy");
    assert_eq!(p.xflags().as_deref(), Some("gixy"));
    assert_eq!(p.xsource().as_deref(), Some("a"));
    assert!(p.is_global() && p.is_sticky());
}

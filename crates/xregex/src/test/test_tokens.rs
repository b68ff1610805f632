// Tests for custom token registration
use crate::*;

#[test]
fn test_custom_token_replaces_fragment() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("\\\\a", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Ok(Some("\\x07".to_string())),
            TokenOptions::default(),
        )
        .unwrap();

    let bell = engine.compile("\\a", "").unwrap();
    assert_eq!(bell.source(), "\\x07");
    assert!(engine.test("ring \u{7}", &bell).unwrap());
}

#[test]
fn test_newest_token_wins() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("%", "").unwrap();
    engine
        .register_token(&matcher, |_, _| Ok(Some("1".to_string())), TokenOptions::default())
        .unwrap();
    engine
        .register_token(&matcher, |_, _| Ok(Some("2".to_string())), TokenOptions::default())
        .unwrap();
    assert_eq!(engine.compile("%", "").unwrap().source(), "2");
}

#[test]
fn test_handler_can_decline() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("b", "").unwrap();
    engine
        .register_token(&matcher, |_, _| Ok(None), TokenOptions::default())
        .unwrap();
    assert_eq!(engine.compile("abc", "").unwrap().source(), "abc");
}

#[test]
fn test_token_scope() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("~", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Ok(Some("x".to_string())),
            TokenOptions::default().scope(TokenScope::Class),
        )
        .unwrap();
    assert_eq!(engine.compile("~[~]", "").unwrap().source(), "~[x]");

    let matcher = engine.compile("@", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, ctx| {
                let out = if ctx.scope() == Scope::Class { "c" } else { "d" };
                Ok(Some(out.to_string()))
            },
            TokenOptions::default().scope(TokenScope::All),
        )
        .unwrap();
    assert_eq!(engine.compile("@[@]", "").unwrap().source(), "d[c]");
}

#[test]
fn test_token_trigger_flag() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    assert!(engine.compile("%", "Z").unwrap_err().is_syntax());

    let matcher = engine.compile("%", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Ok(Some("pct".to_string())),
            TokenOptions::default().flag("Z"),
        )
        .unwrap();
    assert_eq!(engine.compile("%", "").unwrap().source(), "%");
    let p = engine.compile("%", "Z").unwrap();
    assert_eq!(p.source(), "pct");
    assert_eq!(p.flags(), "");
    assert_eq!(p.xflags().as_deref(), Some("Z"));

    // flags from a mode modifier trigger tokens too
    assert_eq!(engine.compile("(?Z)%", "").unwrap().source(), "pct");
}

#[test]
fn test_optional_flags_become_known() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    assert!(engine.compile("a", "$").is_err());

    let matcher = engine.compile("\\$\\$", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, ctx| {
                let out = if ctx.has_flag('$') { "dollars" } else { "\\$\\$" };
                Ok(Some(out.to_string()))
            },
            TokenOptions::default().optional_flags("$"),
        )
        .unwrap();
    assert_eq!(engine.compile("$$", "").unwrap().source(), "\\$\\$");
    assert_eq!(engine.compile("$$", "$").unwrap().source(), "dollars");
    assert_eq!(engine.compile("(?$)$$", "").unwrap().source(), "dollars");
}

#[test]
fn test_invalid_token_flags() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("%", "").unwrap();
    let err = engine
        .register_token(&matcher, |_, _| Ok(None), TokenOptions::default().flag("ab"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Value);
    let err = engine
        .register_token(
            &matcher,
            |_, _| Ok(None),
            TokenOptions::default().optional_flags("a%"),
        )
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Value);
}

#[test]
fn test_reparse_feeds_builtin_tokens() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("%%", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Ok(Some("(?<pct>x)".to_string())),
            TokenOptions::default().reparse(true),
        )
        .unwrap();
    let p = engine.compile("%%", "").unwrap();
    assert_eq!(p.source(), "(x)");
    assert_eq!(p.capture_names()[0].as_deref(), Some("pct"));
}

#[test]
fn test_reparse_chain_through_custom_tokens() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let first = engine.compile("\\\\SS", "").unwrap();
    engine
        .register_token(
            &first,
            |_, _| Ok(Some("\\S".to_string())),
            TokenOptions::default().reparse(true),
        )
        .unwrap();
    let second = engine.compile("\\\\S(?!S)", "").unwrap();
    engine
        .register_token(
            &second,
            |_, _| Ok(Some("[0-9]".to_string())),
            TokenOptions::default(),
        )
        .unwrap();
    assert_eq!(engine.compile("\\SS", "").unwrap().source(), "[0-9]");
}

#[test]
fn test_reparse_depth_is_bounded() {
    let option = EngineOption {
        max_reparse_depth: 5,
        ..EngineOption::default()
    };
    let engine = Engine::new(option).unwrap();
    let matcher = engine.compile("~", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Ok(Some("~".to_string())),
            TokenOptions::default().reparse(true),
        )
        .unwrap();
    let err = engine.compile("a~", "").unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.offset, Some(1));
}

#[test]
fn test_handler_sees_group_state() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("\\\\G", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, ctx| Ok(Some(format!("\\{}", ctx.capture_count()))),
            TokenOptions::default(),
        )
        .unwrap();
    let p = engine.compile("(a)(b)\\G", "").unwrap();
    assert_eq!(p.source(), "(a)(b)\\2");
    assert!(engine.test("abb", &p).unwrap());
}

#[test]
fn test_handler_errors_carry_position() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("!", "").unwrap();
    engine
        .register_token(
            &matcher,
            |_, _| Err(XRegexError::syntax("bang")),
            TokenOptions::default(),
        )
        .unwrap();
    let err = engine.compile("ab!", "").unwrap_err();
    assert_eq!(err.message, "bang");
    assert_eq!(err.offset, Some(2));
}

#[test]
fn test_registration_flushes_cache() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let before = engine.compile("a", "").unwrap();
    let again = engine.compile("a", "").unwrap();
    assert!(std::rc::Rc::ptr_eq(&before.artifact(), &again.artifact()));

    let matcher = engine.compile("%", "").unwrap();
    engine
        .register_token(&matcher, |_, _| Ok(None), TokenOptions::default())
        .unwrap();
    let after = engine.compile("a", "").unwrap();
    assert!(!std::rc::Rc::ptr_eq(&before.artifact(), &after.artifact()));
    assert_eq!(before.source(), after.source());
}

#[test]
fn test_token_overlapping_native_escape_leaves_it_intact() {
    let engine = Engine::new(EngineOption::default()).unwrap();
    let matcher = engine.compile("00\\$\\$", "").unwrap();
    engine
        .register_token(&matcher, |_, _| Ok(Some("BOOM".to_string())), TokenOptions::default())
        .unwrap();
    let p = engine.compile("^x\\x00$$$", "").unwrap();
    assert!(!p.source().contains("BOOM"));
    assert!(engine.test("x\0", &p).unwrap());
}

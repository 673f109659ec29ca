use super::*;

#[test]
fn strip_removes_package_size() {
    assert_eq!(strip_qualifiers("Widget(500g)"), "Widget");
    assert_eq!(strip_qualifiers("  Orange Juice (1.5L) "), "Orange Juice");
}

#[test]
fn strip_removes_every_segment() {
    assert_eq!(strip_qualifiers("Ramen (5ea) Spicy (120g)"), "Ramen  Spicy");
}

#[test]
fn strip_is_non_greedy() {
    assert_eq!(strip_qualifiers("A(1)B(2)C"), "ABC");
}

#[test]
fn strip_keeps_unclosed_paren() {
    assert_eq!(strip_qualifiers("Soap (bar"), "Soap (bar");
}

#[test]
fn strip_handles_multibyte_names() {
    assert_eq!(strip_qualifiers("핫브레이크 미니(715g)"), "핫브레이크 미니");
}

#[test]
fn fallback_token_takes_first_word() {
    assert_eq!(fallback_token("Widget(500g)"), "Widget");
    assert_eq!(fallback_token("핫브레이크 미니(715g)"), "핫브레이크");
    assert_eq!(fallback_token("  Green Tea Latte"), "Green");
}

#[test]
fn fallback_token_never_empty_for_nonempty_name() {
    assert_eq!(fallback_token("(sample pack)"), "(sample pa");
    assert!(!fallback_token("()").is_empty());
}
